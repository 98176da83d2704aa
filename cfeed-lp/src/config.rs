//! Configuration resolution for cfeed-lp
//!
//! **Priority:** CLI argument → environment variable → TOML → compiled default

use cfeed_common::config::{pick, TomlConfig};
use clap::Parser;
use std::path::PathBuf;

/// Default listen port when the functions host does not assign one
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line arguments for cfeed-lp
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cfeed-lp")]
#[command(about = "Change-feed log processor custom handler")]
#[command(version)]
pub struct Args {
    /// Port to listen on (assigned by the functions host)
    #[arg(short, long, env = "FUNCTIONS_CUSTOMHANDLER_PORT")]
    pub port: Option<u16>,

    /// Path to config.toml
    #[arg(short, long, env = "CFEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Tracing filter directive used when RUST_LOG is unset
    #[arg(long, env = "CFEED_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Resolved listen settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub log_level: String,
}

impl ServiceConfig {
    pub fn resolve(args: Args, toml: &TomlConfig) -> Self {
        Self {
            port: args.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            log_level: pick(args.log_level, toml.log_level.clone())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}
