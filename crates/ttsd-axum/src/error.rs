//! Axum-specific error types and mappings.
//!
//! Maps service errors to HTTP status codes with fixed, generic messages.
//! Engine stderr, paths, and cache details stay in the server logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use ttsd_core::GenerateError;

pub const MSG_INITIALIZING: &str = "TTS engine initializing";
pub const MSG_INVALID_BODY: &str = "Invalid request body";
pub const MSG_GENERATION_FAILED: &str = "Generation failed";

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Service not ready to take work yet.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<GenerateError> for HttpError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::NotReady => Self::ServiceUnavailable(MSG_INITIALIZING.to_string()),
            GenerateError::InvalidRequest(_) => Self::BadRequest(MSG_INVALID_BODY.to_string()),
            GenerateError::Synthesis(_) => Self::Internal(MSG_GENERATION_FAILED.to_string()),
        }
    }
}
