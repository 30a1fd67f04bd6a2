use std::fmt;

pub mod fallback;
pub mod generator;
pub mod models;
pub mod prompt;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Everything needed to build a model client. Passed in explicitly; nothing
/// here is read from the environment.
#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model_name: String,
    pub temperature: f32,
    pub use_mock: bool,
    pub base_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("temperature", &self.temperature)
            .field("use_mock", &self.use_mock)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            use_mock: false,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }
}

pub mod prelude {
    pub use super::generator::{GenerationError, QuizGenerator};
    pub use super::models::create_model;
    pub use super::Config;
    pub use wq_core::{ExtractedArticle, GenerationPayload, LanguageModel};
}

pub use generator::{GenerationError, QuizGenerator};
pub use models::create_model;
