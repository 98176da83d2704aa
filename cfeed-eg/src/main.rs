//! cfeed-eg (Embeddings Generator) - change-feed custom handler
//!
//! Receives change-feed trigger invocations from the functions host, embeds
//! the configured text property of new or modified documents, and returns the
//! enriched documents for the output binding.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use cfeed_common::config::resolve_toml_config;
use cfeed_common::shutdown::shutdown_signal;
use cfeed_eg::config::{Args, ServiceConfig};
use cfeed_eg::services::AzureOpenAiClient;
use cfeed_eg::{build_router, AppState};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (toml_config, config_path) = resolve_toml_config(args.config.as_deref())
        .context("Failed to load config file")?;
    let config = ServiceConfig::resolve(args, &toml_config).context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting cfeed Embeddings Generator (cfeed-eg) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found, using arguments, environment and defaults"),
    }
    info!("Vector property: {}", config.enrichment.vector_property);
    info!("Property to embed: {}", config.enrichment.property_to_embed);
    info!("Hash property: {}", config.enrichment.hash_property);
    info!("Output binding: {}", config.enrichment.output_binding);

    let embedder =
        AzureOpenAiClient::new(&config.openai).context("Failed to create OpenAI client")?;
    info!("Embedding endpoint: {}", embedder.url());

    let state = AppState::new(Arc::new(embedder), config.enrichment);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server starting on address {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
