//! Client configuration
//!
//! Grid geometry, replay pacing and the unit/trigger catalog. Everything has
//! a default matching the live server, so a config file only needs to list
//! what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hex::layout::GridConfig;
use crate::unit::catalog::UnitCatalog;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Pacing of server-confirmed turn playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Delay between consecutive steps (milliseconds)
    pub step_delay_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 1500,
        }
    }
}

impl ReplayConfig {
    pub fn step_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.step_delay_ms)
    }
}

/// Top-level client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub grid: GridConfig,
    pub replay: ReplayConfig,
    pub catalog: UnitCatalog,
}

impl ClientConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded client config");
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.grid_width <= 0 || self.grid.grid_height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be non-empty, got {}x{}",
                self.grid.grid_width, self.grid.grid_height
            )));
        }

        if !(self.grid.hex_radius.is_finite() && self.grid.hex_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "hex_radius must be positive, got {}",
                self.grid.hex_radius
            )));
        }

        self.catalog.validate().map_err(ConfigError::Invalid)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.replay.step_delay_ms, 1500);
        assert_eq!(config.grid.grid_width, 36);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            [replay]
            step_delay_ms = 200

            [grid]
            hex_radius = 16.0
            "#,
        )
        .unwrap();
        assert_eq!(config.replay.step_delay_ms, 200);
        assert_eq!(config.grid.hex_radius, 16.0);
        assert_eq!(config.grid.grid_height, 36);
        assert!(config.catalog.trigger("KOGETSU").is_some());
    }

    #[test]
    fn test_rejects_empty_grid() {
        let err = ClientConfig::from_toml_str("[grid]\ngrid_width = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_toml() {
        let err = ClientConfig::from_toml_str("[grid\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ClientConfig::load(Path::new("/nonexistent/client.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
