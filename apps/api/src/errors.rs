use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Failures of the pure transformation units (prompt builders, normalizer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A required field (listing batch, LLM reply text, upstream record) is absent.
    #[error("Missing input data: {field}")]
    MissingInputData { field: String },

    /// A correlation id resolved to an empty or unusable string.
    #[error("Malformed identifier in '{field}': {value:?}")]
    MalformedIdentifier { field: String, value: String },

    /// The cleaned reply does not parse as a user profile.
    /// Advisory only: `json_content` is still passed through untouched.
    #[error("Unparsable LLM output: {0}")]
    UnparsableLlmOutput(String),
}

impl PipelineError {
    pub fn missing(field: impl Into<String>) -> Self {
        PipelineError::MissingInputData {
            field: field.into(),
        }
    }

    pub fn malformed(field: impl Into<String>, value: impl Into<String>) -> Self {
        PipelineError::MalformedIdentifier {
            field: field.into(),
            value: value.into(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            PipelineError::MissingInputData { .. } => "MISSING_INPUT_DATA",
            PipelineError::MalformedIdentifier { .. } => "MALFORMED_IDENTIFIER",
            PipelineError::UnparsableLlmOutput(_) => "UNPARSABLE_LLM_OUTPUT",
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Pipeline(e) => {
                tracing::warn!("Pipeline input rejected: {e}");
                (StatusCode::UNPROCESSABLE_ENTITY, e.code(), e.to_string())
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The text-generation service failed".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
