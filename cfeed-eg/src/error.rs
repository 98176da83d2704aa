//! Error types for cfeed-eg HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::orchestrator::OrchestratorError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Batch aborted by the enrichment pipeline
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

impl ApiError {
    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Orchestrator(OrchestratorError::Decode(_)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST")
            }
            ApiError::Orchestrator(OrchestratorError::DocumentShape(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DOCUMENT_SHAPE_ERROR")
            }
            ApiError::Orchestrator(OrchestratorError::Embed { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "EMBED_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Orchestrator(err) => err.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
