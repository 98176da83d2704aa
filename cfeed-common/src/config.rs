//! Configuration file loading and setting resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are merged by each binary's `clap` arguments (`env = ...`),
//! so this module only deals with the TOML tier and the final merge.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Contents of `config.toml`
///
/// Every field is optional; absent values fall through to compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Listen port for the custom handler
    pub port: Option<u16>,
    /// Default tracing filter directive (e.g. "info", "cfeed_eg=debug")
    pub log_level: Option<String>,
    #[serde(default)]
    pub properties: PropertyConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Document field names used by the enrichment pipeline
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PropertyConfig {
    pub vector: Option<String>,
    pub to_embed: Option<String>,
    pub hash: Option<String>,
    pub output_binding: Option<String>,
}

/// Embedding endpoint settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub endpoint: Option<String>,
    pub deployment: Option<String>,
    pub api_key: Option<String>,
    pub api_version: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Platform default location of the config file
///
/// Linux checks `~/.config/cfeed/config.toml` then `/etc/cfeed/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("cfeed").join("config.toml"));

    if cfg!(target_os = "linux") {
        if let Some(path) = user_config.as_ref().filter(|p| p.exists()) {
            return Some(path.clone());
        }
        let system_config = PathBuf::from("/etc/cfeed/config.toml");
        return system_config.exists().then_some(system_config);
    }

    user_config.filter(|p| p.exists())
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Locate and load the TOML tier
///
/// An explicitly requested file must exist. Without one, the platform default
/// is used when present; a missing default is not an error. Returns the path
/// that was loaded so the caller can report it once logging is up.
pub fn resolve_toml_config(explicit: Option<&Path>) -> Result<(TomlConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    match path {
        Some(path) => {
            let config = load_toml_config(&path)?;
            Ok((config, Some(path)))
        }
        None => Ok((TomlConfig::default(), None)),
    }
}

/// Non-empty, non-whitespace
pub fn is_set(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Merge an argument/env value with the TOML value; blank values do not count
pub fn pick(primary: Option<String>, toml: Option<String>) -> Option<String> {
    primary
        .filter(|v| is_set(v))
        .or_else(|| toml.filter(|v| is_set(v)))
}

/// Like [`pick`], but the setting must be supplied by some tier
pub fn require(name: &str, env_var: &str, primary: Option<String>, toml: Option<String>) -> Result<String> {
    pick(primary, toml).ok_or_else(|| {
        Error::Config(format!(
            "{} not configured. Set the {} environment variable, pass it on the \
             command line, or add it to config.toml",
            name, env_var
        ))
    })
}
