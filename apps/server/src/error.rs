use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quill_ai::{AiError, ChatErrorKind, INTERNAL_ERROR_MESSAGE};
use quill_storage_sqlite::StorageError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    /// A failed chat outcome. `detail` is already user-facing.
    #[error("{detail}")]
    Chat { kind: ChatErrorKind, detail: String },
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Build the response for a failed chat outcome.
    pub fn chat(kind: ChatErrorKind, message: &str) -> Self {
        let detail = match kind {
            ChatErrorKind::ServiceUnavailable => message.to_string(),
            ChatErrorKind::Internal => INTERNAL_ERROR_MESSAGE.to_string(),
            _ => format!("{}: {}", INTERNAL_ERROR_MESSAGE, message),
        };
        ApiError::Chat { kind, detail }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Chat { kind, .. } => kind.code(),
            ApiError::Storage(err) => err.code(),
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, detail) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            ApiError::Chat { kind, detail } => {
                let status = match kind {
                    ChatErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, detail)
            }
            ApiError::Storage(StorageError::InvalidInput(reason)) => {
                (StatusCode::BAD_REQUEST, reason)
            }
            ApiError::Storage(err) => {
                tracing::error!(error_code = code, "Storage error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ApiError::Internal(reason) => {
                tracing::error!("Internal error: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { code, detail })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::InvalidInput(reason) => ApiError::BadRequest(reason),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
