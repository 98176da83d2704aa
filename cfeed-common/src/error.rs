//! Common error types for cfeed

use thiserror::Error;

use crate::payload::DecodeError;

/// Common result type for cfeed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across cfeed handlers
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Trigger payload could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
