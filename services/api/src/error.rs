//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and the JSON
//! envelope each variant is rendered as.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use essay_review_core::{AggregateError, EssayError, PortError};
use serde_json::json;
use std::path::PathBuf;
use tracing::error;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized - Invalid teacher password";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// An essay definition failed validation.
    #[error("Essay definition error: {0}")]
    Essay(#[from] EssayError),

    /// An essay definition file could not be parsed.
    #[error("Could not parse essay file {path}: {source}")]
    EssayFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    NotFound(String),

    /// A fault on an otherwise valid request, reported as `{ error, message }`.
    #[error("{error}: {message}")]
    Unexpected { error: String, message: String },
}

impl From<AggregateError> for ApiError {
    fn from(e: AggregateError) -> Self {
        ApiError::Unexpected {
            error: "Failed to retrieve submissions".to_string(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Port(PortError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": UNAUTHORIZED_MESSAGE }),
            ),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": METHOD_NOT_ALLOWED_MESSAGE }),
            ),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, json!({ "error": what })),
            ApiError::Unexpected { error, message } => {
                error!("{}: {}", error, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": error, "message": message }),
                )
            }
            other => {
                error!("Unhandled API error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "message": other.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
