//! # Runtime Configuration
//!
//! Read from the environment at startup. Everything has a default; only a
//! malformed value is an error.

use std::path::PathBuf;

use shared_types::CampaignValidationError;
use sl_04_cycle_engine::EngineConfig;
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// JSON catalog of businesses and campaigns. `None` starts the demo catalog.
    pub catalog_path: Option<PathBuf>,
    /// Cycle engine configuration.
    pub engine: EngineConfig,
}

impl RuntimeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SL_CATALOG_PATH`: catalog file (default: built-in demo catalog)
    /// - `SL_SERIALIZE_PAIRS`: per-pair scan lock (default: true)
    /// - `SL_MAX_PAYLOAD_BYTES`: QR payload size limit (default: 512)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("SL_CATALOG_PATH").filter(|p| !p.trim().is_empty()) {
            config.catalog_path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup("SL_SERIALIZE_PAIRS") {
            config.engine.serialize_pairs = match value.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => return Err(ConfigError::invalid("SL_SERIALIZE_PAIRS", value)),
            };
        }

        if let Some(value) = lookup("SL_MAX_PAYLOAD_BYTES") {
            config.engine.max_payload_bytes = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("SL_MAX_PAYLOAD_BYTES", value.clone()))?;
        }

        Ok(config)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Failed to read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid campaign in catalog: {0}")]
    InvalidCampaign(#[from] CampaignValidationError),
}

impl ConfigError {
    fn invalid(var: &'static str, value: String) -> Self {
        Self::InvalidValue { var, value }
    }
}
