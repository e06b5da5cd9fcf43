use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use quill_ai::AuthenticatedUser;
use quill_storage_sqlite::{NewPromptTemplate, PromptTemplateRecord};

async fn list_templates(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<PromptTemplateRecord>>> {
    let templates = state.templates.list_for_owner(&user.id)?;
    Ok(Json(templates))
}

async fn create_template(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(input): Json<NewPromptTemplate>,
) -> ApiResult<(StatusCode, Json<PromptTemplateRecord>)> {
    let record = state.templates.create(&user.id, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn delete_template(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<StatusCode> {
    if state.templates.delete(&id, &user.id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route("/templates/{id}", delete(delete_template))
}
