//! Error types for cfeed-lp HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cfeed_common::DecodeError;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Payload could not be decoded into documents (400)
    #[error("Failed to parse payload: {0}")]
    Decode(#[from] DecodeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Decode(_) => self.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": "BAD_REQUEST",
                "message": message,
            }
        }));

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
