use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use wq_core::{ArticleSummary, QuizResponse};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Wiki Quiz API is running." }))
}

pub async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<GenerateRequest>,
) -> ApiResult<(StatusCode, Json<QuizResponse>)> {
    let (quiz, status) = state.manager.generate(&request.url).await?;
    tracing::debug!("Quiz {} for {} ({:?})", quiz.id, request.url, status);
    Ok((StatusCode::CREATED, Json(quiz)))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<HistoryParams>,
) -> ApiResult<Json<Vec<ArticleSummary>>> {
    let history = state.manager.history(params.skip, params.limit).await?;
    Ok(Json(history))
}

pub async fn get_quiz(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<QuizResponse>> {
    Ok(Json(state.manager.quiz(id).await?))
}
