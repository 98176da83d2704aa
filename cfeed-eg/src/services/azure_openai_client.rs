//! Azure OpenAI embeddings client
//!
//! Calls the deployment-scoped embeddings route:
//! `POST {endpoint}/openai/deployments/{deployment}/embeddings?api-version={v}`
//! with one input string per request. No retries; a failed call fails the
//! invocation and the functions host decides whether to redeliver the batch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::OpenAiSettings;
use crate::services::embedding::{EmbedError, Embedder};

const USER_AGENT: &str = concat!("cfeed-eg/", env!("CARGO_PKG_VERSION"));

/// Longest error body carried into `EmbedError::Api`, in characters
pub const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Embeddings client for one Azure OpenAI deployment
///
/// Holds a pooled `reqwest::Client`; clone freely or share behind `Arc`.
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl AzureOpenAiClient {
    /// Build a client from resolved settings
    pub fn new(settings: &OpenAiSettings) -> Result<Self, EmbedError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| EmbedError::Setup(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: embeddings_url(settings),
            api_key: settings.api_key.clone(),
        })
    }

    /// Fully qualified embeddings URL this client posts to
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Deployment-scoped embeddings URL
pub fn embeddings_url(settings: &OpenAiSettings) -> String {
    format!(
        "{}/openai/deployments/{}/embeddings?api-version={}",
        settings.endpoint.trim_end_matches('/'),
        settings.deployment,
        settings.api_version
    )
}

/// Cap an error body at [`MAX_ERROR_BODY_CHARS`], on a character boundary
fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}... (truncated)", &body[..cut]),
        None => body.to_string(),
    }
}

#[async_trait]
impl Embedder for AzureOpenAiClient {
    fn name(&self) -> &'static str {
        "azure-openai"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&EmbeddingRequest { input: [text] });
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmbedError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EmbedError::Api(status.as_u16(), truncate_body(&body)));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::Parse(e.to_string()))?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or(EmbedError::EmptyEmbedding)?;

        debug!(dimensions = embedding.len(), "Received embedding");
        Ok(embedding)
    }
}
