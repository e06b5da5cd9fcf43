use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Extension, Json, Router,
};
use quill_ai::{AuthenticatedUser, ChatOutcome, ChatRequest};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub model_used: String,
    pub processing_time_ms: u64,
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    request.validate()?;

    match state.orchestrator.chat(request, &user).await {
        ChatOutcome::Success {
            response_text,
            model_used,
            processing_time_ms,
        } => Ok(Json(ChatResponse {
            response: response_text,
            model_used,
            processing_time_ms,
        })),
        ChatOutcome::Failure {
            error_message,
            error_kind,
        } => Err(ApiError::chat(error_kind, &error_message)),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ai/chat", post(chat))
}
