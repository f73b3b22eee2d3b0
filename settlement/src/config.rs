//! Configuration for the settlement engine

use serde::{Deserialize, Serialize};

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Maximum deposits accepted in one batch_settle call
    pub max_batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "settlement-engine".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            max_batch_size: 1000,
        }
    }
}

impl Config {
    /// Load from TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(name) = std::env::var("SETTLEMENT_SERVICE_NAME") {
            config.service_name = name;
        }

        if let Ok(size) = std::env::var("SETTLEMENT_MAX_BATCH_SIZE") {
            config.max_batch_size = size
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid batch size: {}", e)))?;
        }

        Ok(config)
    }
}
