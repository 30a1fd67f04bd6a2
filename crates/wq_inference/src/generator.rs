use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use wq_core::{ExtractedArticle, GenerationPayload, LanguageModel, ModelInvocationError, Result, ShapeError};

use crate::fallback::fallback_payload;
use crate::models::create_model;
use crate::prompt::build_prompt;
use crate::Config;

const LOG_PREVIEW_CHARS: usize = 500;

/// Why a model-backed generation did not produce a usable payload.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("API quota exceeded: {0}")]
    QuotaExceeded(ModelInvocationError),

    #[error("LLM error: {0}")]
    Invocation(ModelInvocationError),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("JSON parse error: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        content: String,
    },

    #[error("payload has the wrong shape: {0}")]
    InvalidShape(#[from] ShapeError),
}

impl From<ModelInvocationError> for GenerationError {
    fn from(err: ModelInvocationError) -> Self {
        if err.is_quota_exhausted() {
            GenerationError::QuotaExceeded(err)
        } else {
            GenerationError::Invocation(err)
        }
    }
}

fn preview(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Remove a markdown code fence around the model output.
///
/// A block opened with ```` ```json ```` wins; otherwise the first fenced
/// block is used, dropping any info string on its opening line. Text
/// without a fence is only trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    const FENCE: &str = "```";
    const JSON_FENCE: &str = "```json";

    let body = if let Some(start) = raw.find(JSON_FENCE) {
        &raw[start + JSON_FENCE.len()..]
    } else if let Some(start) = raw.find(FENCE) {
        let body = &raw[start + FENCE.len()..];
        match body.find('\n') {
            Some(nl) if body[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => &body[nl + 1..],
            _ => body,
        }
    } else {
        return raw.trim();
    };

    let end = body.find(FENCE).unwrap_or(body.len());
    body[..end].trim()
}

/// Turn raw model output into a validated payload.
pub fn parse_payload(raw: &str) -> std::result::Result<GenerationPayload, GenerationError> {
    let cleaned = strip_code_fence(raw);
    if cleaned.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    let payload: GenerationPayload =
        serde_json::from_str(cleaned).map_err(|source| GenerationError::Parse {
            source,
            content: cleaned.to_string(),
        })?;
    let payload = payload.normalize();
    payload.validate()?;
    Ok(payload)
}

pub struct QuizGenerator {
    model: Arc<dyn LanguageModel>,
    use_mock: bool,
}

impl QuizGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, use_mock: bool) -> Self {
        Self { model, use_mock }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(create_model(config)?, config.use_mock))
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Produce a payload for `article`. Never fails: every error path ends
    /// in the deterministic fallback, only the log line differs.
    pub async fn generate(&self, article: &ExtractedArticle) -> GenerationPayload {
        if self.use_mock {
            info!("Using mock quiz generation");
            return fallback_payload(&article.title, &article.summary);
        }

        match self.try_generate(article).await {
            Ok(payload) => payload,
            Err(err) => {
                match &err {
                    GenerationError::QuotaExceeded(cause) => warn!("API quota exceeded: {}", cause),
                    GenerationError::Invocation(cause) => error!("LLM error: {}", cause),
                    GenerationError::EmptyResponse => warn!("LLM returned an empty response"),
                    GenerationError::Parse { source, content } => {
                        warn!("JSON parse error: {}", source);
                        warn!("Failed content: {}", content);
                    }
                    GenerationError::InvalidShape(shape) => warn!("Rejected LLM payload: {}", shape),
                }
                warn!("Falling back to mock quiz generation");
                fallback_payload(&article.title, &article.summary)
            }
        }
    }

    /// Single model round-trip without the fallback.
    pub async fn try_generate(
        &self,
        article: &ExtractedArticle,
    ) -> std::result::Result<GenerationPayload, GenerationError> {
        let prompt = build_prompt(article);
        let response = self.model.invoke(&prompt).await?;
        info!(
            "LLM response ({}): {}...",
            self.model.name(),
            preview(&response.text, LOG_PREVIEW_CHARS)
        );
        parse_payload(&response.text)
    }
}
