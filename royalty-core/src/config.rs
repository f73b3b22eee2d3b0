//! Configuration for royalty bookkeeping

use crate::types::AssetId;
use serde::{Deserialize, Serialize};

/// Core bookkeeping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Assets accepted by the deposit ledger
    ///
    /// The native asset is always accepted even if absent from this list.
    pub supported_assets: Vec<AssetId>,

    /// Maximum active recipients in one split table
    pub max_recipients_per_table: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supported_assets: vec![AssetId::native()],
            max_recipients_per_table: 32,
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

        if let Ok(assets) = std::env::var("ROYALTY_SUPPORTED_ASSETS") {
            config.supported_assets = assets
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(AssetId::new)
                .collect();
        }

        if let Ok(max) = std::env::var("ROYALTY_MAX_RECIPIENTS") {
            config.max_recipients_per_table = max
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid max recipients: {}", e)))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_supports_native() {
        let config = Config::default();
        assert_eq!(config.supported_assets, vec![AssetId::native()]);
        assert_eq!(config.max_recipients_per_table, 32);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "supported_assets = [\"NATIVE\", \"USDC\"]\nmax_recipients_per_table = 8"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.supported_assets.len(), 2);
        assert_eq!(config.max_recipients_per_table, 8);
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml = = =").unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }
}
