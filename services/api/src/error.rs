//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how it is
//! rendered as an error envelope.

use crate::config::ConfigError;
use crate::web::envelope::{ErrorDetail, ErrorEnvelope};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use lingo_core::ports::PortError;
use lingo_core::validation::{Constraint, ValidationFailure, MAX_AUDIO_BYTES};
use serde_json::json;
use tracing::{error, warn};

const GENERIC_MESSAGE: &str = "An unexpected internal error occurred";

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure applying the database schema at startup.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        ApiError::Port(PortError::Validation(failure))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationFailure::new("body", Constraint::Required, rejection.body_text()).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ValidationFailure::new("path", Constraint::Required, rejection.body_text()).into()
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ValidationFailure::new("body", Constraint::Required, rejection.body_text()).into()
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ValidationFailure::new(
                "file",
                Constraint::MaxSize,
                format!("file must be at most {} MB", MAX_AUDIO_BYTES / (1024 * 1024)),
            )
            .into()
        } else {
            ValidationFailure::new("body", Constraint::Required, e.body_text()).into()
        }
    }
}

impl ApiError {
    /// The status, envelope code, caller-facing message and optional details.
    fn parts(&self) -> (StatusCode, &'static str, String, Option<serde_json::Value>) {
        match self {
            ApiError::Port(PortError::Validation(failure)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                failure.message.clone(),
                Some(json!({ "field": failure.field, "constraint": failure.constraint })),
            ),
            ApiError::Port(PortError::ExternalService { status, message }) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                "EXTERNAL_SERVICE_ERROR",
                message.clone(),
                None,
            ),
            ApiError::Port(PortError::Recovery(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "RECOVERY_FAILED",
                "The AI response could not be processed".to_string(),
                None,
            ),
            ApiError::Port(PortError::NotFound(message)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone(), None)
            }
            ApiError::Port(PortError::Unexpected(_))
            | ApiError::Config(_)
            | ApiError::Database(_)
            | ApiError::Migration(_)
            | ApiError::Io(_)
            | ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                GENERIC_MESSAGE.to_string(),
                None,
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();
        // Adapter and recovery failures were already logged where they were detected.
        match &self {
            ApiError::Port(PortError::Validation(failure)) => {
                warn!(field = %failure.field, "Rejected request: {}", failure.message);
            }
            ApiError::Port(_) => {}
            other => error!("Request failed: {}", other),
        }
        let body = ErrorEnvelope::new(ErrorDetail {
            code,
            message,
            details,
        });
        (status, Json(body)).into_response()
    }
}
