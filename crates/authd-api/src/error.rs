//! API error handling
//!
//! `AppError` is the internal taxonomy; `ApiError` is the JSON body clients
//! see. Unexpected failures (datastore, hashing) respond with a fixed
//! generic message - full detail goes to the server log only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// API error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ApiError::bad_request(msg)),
            // Duplicate emails are reported as 404 for wire compatibility
            // with existing clients of this service.
            AppError::Conflict(msg) => (StatusCode::NOT_FOUND, ApiError::new("EMAIL_TAKEN", msg)),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ApiError::unauthorized(msg))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::not_found(msg)),
            AppError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::internal_error())
            }
            AppError::Database(detail) => {
                tracing::error!("database error: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::internal_error())
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<authd_core::CoreError> for AppError {
    fn from(err: authd_core::CoreError) -> Self {
        use authd_core::CoreError;

        match err {
            CoreError::NotFound(msg) => AppError::NotFound(msg),
            CoreError::Validation(msg) => AppError::Validation(msg),
            CoreError::Conflict(msg) => AppError::Conflict(msg),
            CoreError::Authentication(msg) => AppError::Unauthorized(msg),
            CoreError::Database(msg) => AppError::Database(msg),
            CoreError::Config(msg) => AppError::Internal(format!("configuration error: {msg}")),
            CoreError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}
