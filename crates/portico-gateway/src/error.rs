//! HTTP error type for the admin API.
//!
//! Every admin failure renders as `{ "error": "<message>" }` with the
//! matching status code. Gateway-side forwarding failures have their own
//! shape (see `forward`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use portico_core::domain::ValidationError;
use portico_core::ports::RepositoryError;

/// Admin-facing error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Referenced mapping does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Conflict (mapping path already taken).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, axum::Json(ErrorBody { error: message })).into_response()
    }
}

impl From<RepositoryError> for HttpError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => Self::NotFound(msg),
            RepositoryError::AlreadyExists(msg) => Self::Conflict(msg),
            RepositoryError::Storage(msg) => Self::Internal(format!("Storage: {msg}")),
            RepositoryError::Constraint(msg) => Self::BadRequest(msg),
        }
    }
}

impl From<ValidationError> for HttpError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
