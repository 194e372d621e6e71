//! Application error type mapping to HTTP status codes.
//!
//! Internal failure detail never reaches the client: the 500 body is a
//! fixed generic message and the true cause goes to the log only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use tidechat_types::error::ChatError;

/// The only message a client ever sees for an internal failure.
pub const GENERIC_ERROR: &str = "An error occurred while processing your request";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// No authenticated principal where one is required.
    Unauthorized,
    /// Bad or missing input.
    Validation(String),
    /// Principal does not own the conversation.
    Forbidden,
    /// Conversation does not exist.
    NotFound,
    /// Storage or provider failure; detail is logged, not surfaced.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::NotFound => AppError::NotFound,
            ChatError::Forbidden => AppError::Forbidden,
            ChatError::Storage(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::Internal(cause) => {
                error!(%cause, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
