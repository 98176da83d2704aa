//! Configuration resolution for cfeed-eg
//!
//! **Priority:** CLI argument → environment variable → TOML → compiled default
//!
//! The three document property names and the embedding endpoint have no
//! defaults; startup fails when any of them is missing.

use cfeed_common::config::{is_set, pick, require, TomlConfig};
use cfeed_common::response::DEFAULT_OUTPUT_BINDING;
use cfeed_common::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

/// Default listen port when the functions host does not assign one
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_VERSION: &str = "2024-02-01";
pub const DEFAULT_EMBED_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line arguments for cfeed-eg
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cfeed-eg")]
#[command(about = "Change-feed embeddings generator custom handler")]
#[command(version)]
pub struct Args {
    /// Port to listen on (assigned by the functions host)
    #[arg(short, long, env = "FUNCTIONS_CUSTOMHANDLER_PORT")]
    pub port: Option<u16>,

    /// Path to config.toml
    #[arg(short, long, env = "CFEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Document property that receives the embedding vector
    #[arg(long, env = "COSMOS_VECTOR_PROPERTY")]
    pub vector_property: Option<String>,

    /// Document property whose text is embedded
    #[arg(long, env = "COSMOS_PROPERTY_TO_EMBED")]
    pub property_to_embed: Option<String>,

    /// Document property that stores the content fingerprint
    #[arg(long, env = "COSMOS_HASH_PROPERTY")]
    pub hash_property: Option<String>,

    /// Output binding name for enriched documents
    #[arg(long, env = "CFEED_OUTPUT_BINDING")]
    pub output_binding: Option<String>,

    /// Azure OpenAI resource endpoint
    #[arg(long, env = "OPENAI_ENDPOINT")]
    pub openai_endpoint: Option<String>,

    /// Embedding model deployment name
    #[arg(long, env = "OPENAI_DEPLOYMENT_NAME")]
    pub openai_deployment: Option<String>,

    /// API key sent in the `api-key` header
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Azure OpenAI REST API version
    #[arg(long, env = "OPENAI_API_VERSION")]
    pub openai_api_version: Option<String>,

    /// Per-request timeout for embedding calls, in seconds
    #[arg(long, env = "CFEED_EMBED_TIMEOUT_SECS")]
    pub embed_timeout_secs: Option<u64>,

    /// Tracing filter directive used when RUST_LOG is unset
    #[arg(long, env = "CFEED_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Document property names driving the enrichment pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentConfig {
    pub vector_property: String,
    pub property_to_embed: String,
    pub hash_property: String,
    pub output_binding: String,
}

impl EnrichmentConfig {
    /// Create config writing to the default output binding
    pub fn new(
        vector_property: impl Into<String>,
        property_to_embed: impl Into<String>,
        hash_property: impl Into<String>,
    ) -> Self {
        Self {
            vector_property: vector_property.into(),
            property_to_embed: property_to_embed.into(),
            hash_property: hash_property.into(),
            output_binding: DEFAULT_OUTPUT_BINDING.to_string(),
        }
    }

    pub fn with_output_binding(mut self, binding: impl Into<String>) -> Self {
        self.output_binding = binding.into();
        self
    }

    /// All names set, and the three document properties distinct
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("vector property", &self.vector_property),
            ("property to embed", &self.property_to_embed),
            ("hash property", &self.hash_property),
            ("output binding", &self.output_binding),
        ];
        for (name, value) in named {
            if !is_set(value) {
                return Err(Error::Config(format!("{} must not be empty", name)));
            }
        }

        if self.vector_property == self.property_to_embed
            || self.vector_property == self.hash_property
            || self.hash_property == self.property_to_embed
        {
            return Err(Error::Config(format!(
                "vector ({}), embed source ({}) and hash ({}) properties must be distinct",
                self.vector_property, self.property_to_embed, self.hash_property
            )));
        }

        Ok(())
    }
}

/// Embedding endpoint settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiSettings {
    pub endpoint: String,
    pub deployment: String,
    pub api_key: Option<String>,
    pub api_version: String,
    pub timeout_secs: u64,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub log_level: String,
    pub enrichment: EnrichmentConfig,
    pub openai: OpenAiSettings,
}

impl ServiceConfig {
    /// Merge arguments (CLI/env) with the TOML tier and defaults
    pub fn resolve(args: Args, toml: &TomlConfig) -> Result<Self> {
        let props = toml.properties.clone();
        let openai = toml.openai.clone();

        let enrichment = EnrichmentConfig {
            vector_property: require(
                "Vector property",
                "COSMOS_VECTOR_PROPERTY",
                args.vector_property,
                props.vector,
            )?,
            property_to_embed: require(
                "Property to embed",
                "COSMOS_PROPERTY_TO_EMBED",
                args.property_to_embed,
                props.to_embed,
            )?,
            hash_property: require(
                "Hash property",
                "COSMOS_HASH_PROPERTY",
                args.hash_property,
                props.hash,
            )?,
            output_binding: pick(args.output_binding, props.output_binding)
                .unwrap_or_else(|| DEFAULT_OUTPUT_BINDING.to_string()),
        };
        enrichment.validate()?;

        let timeout_secs = args
            .embed_timeout_secs
            .or(openai.timeout_secs)
            .unwrap_or(DEFAULT_EMBED_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config(
                "embedding timeout must be greater than zero".to_string(),
            ));
        }

        let openai = OpenAiSettings {
            endpoint: require(
                "OpenAI endpoint",
                "OPENAI_ENDPOINT",
                args.openai_endpoint,
                openai.endpoint,
            )?,
            deployment: require(
                "OpenAI deployment name",
                "OPENAI_DEPLOYMENT_NAME",
                args.openai_deployment,
                openai.deployment,
            )?,
            api_key: pick(args.openai_api_key, openai.api_key),
            api_version: pick(args.openai_api_version, openai.api_version)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout_secs,
        };

        Ok(Self {
            port: args.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            log_level: pick(args.log_level, toml.log_level.clone())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            enrichment,
            openai,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_distinct_names() {
        let config = EnrichmentConfig::new("vector", "customerNotes", "hash");
        assert!(config.validate().is_ok());
        assert_eq!(config.output_binding, DEFAULT_OUTPUT_BINDING);
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let config = EnrichmentConfig::new("vector", " ", "hash");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("property to embed"));
    }

    #[test]
    fn test_validate_rejects_shared_name() {
        let config = EnrichmentConfig::new("vector", "notes", "vector");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_binding() {
        let config = EnrichmentConfig::new("vector", "notes", "hash").with_output_binding("");
        assert!(config.validate().is_err());
    }
}
