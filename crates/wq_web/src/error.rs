use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use wq_core::Error;

/// Maps workspace errors onto HTTP statuses with a `{"detail": ...}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] Error),

    /// The request itself could not be decoded (body, path or query).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Rejected { status, message } => (status, message),
            ApiError::Core(err) => match &err {
                Error::Fetch(e) => (StatusCode::BAD_REQUEST, format!("Failed to scrape URL: {}", e)),
                Error::InvalidUrl(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                Error::NotFound { entity, .. } => {
                    (StatusCode::NOT_FOUND, format!("{} not found", entity))
                }
                other => {
                    tracing::error!(error = %other, "Request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Internal server error: {}", other),
                    )
                }
            },
        };

        (status, axum::Json(json!({ "detail": detail }))).into_response()
    }
}
