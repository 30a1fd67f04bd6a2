use std::sync::Arc;
use wq_core::{Error, Result};

use crate::Config;

pub mod dummy;
pub mod gemini;

pub use dummy::DummyModel;
pub use gemini::GeminiModel;
pub use wq_core::LanguageModel;

/// Build the model client described by `config`.
///
/// Mock mode never reaches the model, so it gets an inert [`DummyModel`]
/// and needs no credentials.
pub fn create_model(config: &Config) -> Result<Arc<dyn LanguageModel>> {
    if config.use_mock {
        return Ok(Arc::new(DummyModel::new()));
    }
    let api_key = config
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            Error::Config("GEMINI_API_KEY is required unless mock mode is enabled".to_string())
        })?;
    Ok(Arc::new(GeminiModel::new(
        api_key,
        config.model_name.clone(),
        config.temperature,
        config.base_url.clone(),
    )?))
}
