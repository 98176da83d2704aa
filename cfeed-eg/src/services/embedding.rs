//! Embedding backend abstraction
//!
//! The enrichment pipeline only needs `embed(text) -> vector`. Backends are
//! shared by all in-flight invocations, so implementations must be usable
//! concurrently through `&self`.

use async_trait::async_trait;
use thiserror::Error;

/// Embedding backend errors
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Backend returned an error response
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Failed to parse the backend response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Backend answered without an embedding
    #[error("no embedding data received")]
    EmptyEmbedding,

    /// Embedding contains NaN or infinity, which JSON cannot carry
    #[error("embedding component {0} is not a finite number")]
    NonFinite(usize),

    /// Client could not be constructed
    #[error("Client setup error: {0}")]
    Setup(String),
}

/// Text embedding backend
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Backend identifier for logs and the health endpoint
    fn name(&self) -> &'static str;

    /// Compute the embedding vector for `text`
    ///
    /// Implementations return a non-empty vector on success.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}
