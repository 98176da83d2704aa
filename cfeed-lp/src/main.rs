//! cfeed-lp (Log Processor) - change-feed custom handler
//!
//! Logs every document of each change-feed trigger invocation.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use cfeed_common::config::resolve_toml_config;
use cfeed_common::shutdown::shutdown_signal;
use cfeed_lp::config::{Args, ServiceConfig};
use cfeed_lp::{build_router, AppState};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (toml_config, config_path) = resolve_toml_config(args.config.as_deref())
        .context("Failed to load config file")?;
    let config = ServiceConfig::resolve(args, &toml_config);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .init();

    info!(
        "Starting cfeed Log Processor (cfeed-lp) v{}",
        env!("CARGO_PKG_VERSION")
    );
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let app = build_router(AppState::new());

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
