use async_trait::async_trait;
use thiserror::Error;

/// Text returned by a language model for one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    pub text: String,
}

/// A model call that did not produce a response. The message keeps the
/// upstream wording (status codes included) so callers can classify it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ModelInvocationError {
    pub message: String,
}

impl ModelInvocationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// True when the upstream signalled rate limiting or an exhausted quota.
    pub fn is_quota_exhausted(&self) -> bool {
        self.message.contains("429") || self.message.to_lowercase().contains("quota")
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync + std::fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Send a single prompt and return the raw completion text
    async fn invoke(&self, prompt: &str) -> std::result::Result<ModelResponse, ModelInvocationError>;
}
