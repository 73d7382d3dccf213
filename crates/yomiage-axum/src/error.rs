//! Axum-specific error types and mappings.
//!
//! Maps port errors to HTTP status codes and a JSON response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use yomiage_core::ports::{ProfileStoreError, SpeechPortError};
use yomiage_voice::SpeechError;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Service unavailable (engine or controller down).
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
        let (status, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = axum::Json(ErrorBody {
            error: message,
            status: status.as_u16(),
        });
        (status, body).into_response()
    }
}

impl From<SpeechPortError> for HttpError {
    fn from(err: SpeechPortError) -> Self {
        match err {
            SpeechPortError::ControllerGone => Self::ServiceUnavailable(err.to_string()),
        }
    }
}

impl From<ProfileStoreError> for HttpError {
    fn from(err: ProfileStoreError) -> Self {
        match err {
            ProfileStoreError::Invalid(msg) => Self::BadRequest(msg),
            ProfileStoreError::Io(msg) => Self::Internal(msg),
        }
    }
}

impl From<SpeechError> for HttpError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::EngineUnavailable(_) => Self::ServiceUnavailable(err.to_string()),
            _ => Self::Internal(err.to_string()),
        }
    }
}
