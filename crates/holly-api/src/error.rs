//! API error types and JSON error response formatting.
//!
//! Every failing endpoint answers with the same `{error, message}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use holly_core::HollyError;
use holly_dialog::DialogError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// 404 Not Found - resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// 500 Internal Server Error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        if status.is_server_error() {
            tracing::error!(%message, "Request failed");
        }

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DialogError> for ApiError {
    fn from(err: DialogError) -> Self {
        match err {
            DialogError::EmptyMessage | DialogError::MessageTooLong(_) => {
                ApiError::BadRequest(err.to_string())
            }
            DialogError::ConversationNotFound(_) => ApiError::NotFound(err.to_string()),
            DialogError::Storage(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<HollyError> for ApiError {
    fn from(err: HollyError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
