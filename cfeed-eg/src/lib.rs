//! cfeed-eg library - change-feed embeddings generator
//!
//! Exposes the enrichment pipeline and router for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod orchestrator;
pub mod sanitizer;
pub mod services;

pub use crate::config::EnrichmentConfig;
pub use crate::error::{ApiError, ApiResult};
pub use crate::services::{EmbedError, Embedder};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
///
/// Invocations share only the read-only config and the embedder; logs and
/// documents live in each request.
#[derive(Clone)]
pub struct AppState {
    pub embedder: Arc<dyn Embedder>,
    pub config: Arc<EnrichmentConfig>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(embedder: Arc<dyn Embedder>, config: EnrichmentConfig) -> Self {
        Self {
            embedder,
            config: Arc::new(config),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::processor_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
