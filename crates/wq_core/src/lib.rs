pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, FetchError, Result};
pub use models::{LanguageModel, ModelInvocationError, ModelResponse};
pub use storage::QuizStorage;
pub use types::*;
