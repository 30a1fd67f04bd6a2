use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use wq_core::{LanguageModel, ModelInvocationError, ModelResponse};

/// In-process model with a canned reply. Counts how often it was asked.
pub struct DummyModel {
    reply: std::result::Result<String, ModelInvocationError>,
    calls: AtomicUsize,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel")
            .field("calls", &self.calls())
            .finish()
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self::replying("")
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(ModelInvocationError::new(message)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LanguageModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn invoke(&self, _prompt: &str) -> std::result::Result<ModelResponse, ModelInvocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map(|text| ModelResponse { text })
    }
}
