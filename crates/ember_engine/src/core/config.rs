//! Engine configuration
//!
//! Strongly typed configuration with defaults, loadable from TOML files.
//! Every field is optional in the file; omitted sections fall back to
//! their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Application name used in log output
    pub app_name: String,

    /// Warning threshold for scheduled callbacks, in milliseconds
    pub scheduler_warn_ms: u64,

    /// Which default systems the engine wires at startup
    pub features: EngineFeatures,
}

/// Default system toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineFeatures {
    /// Wire the motion integration system
    pub motion: bool,

    /// Wire the lifetime countdown system
    pub lifetime: bool,

    /// Wire the render collection system
    pub render: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_name: "Ember Engine Application".to_string(),
            scheduler_warn_ms: 10,
            features: EngineFeatures::default(),
        }
    }
}

impl Default for EngineFeatures {
    fn default() -> Self {
        Self {
            motion: true,
            lifetime: true,
            render: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse { source })
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("could not read config file {path}: {source}")]
    Io {
        /// Path that failed to load
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file contents were not valid TOML for this schema
    #[error("could not parse config: {source}")]
    Parse {
        /// Underlying parse error
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.scheduler_warn_ms, 10);
        assert!(config.features.motion);
        assert!(config.features.lifetime);
        assert!(config.features.render);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            app_name = "sandbox"

            [features]
            render = false
            "#,
        )
        .expect("valid config");

        assert_eq!(config.app_name, "sandbox");
        assert!(!config.features.render);
        assert!(config.features.motion);
        assert_eq!(config.scheduler_warn_ms, 10);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(EngineConfig::from_toml("app_name = [not toml").is_err());
    }

    #[test]
    fn test_round_trip() {
        let config = EngineConfig::default();
        let text = toml::to_string(&config).expect("serializable");
        let parsed = EngineConfig::from_toml(&text).expect("parseable");
        assert_eq!(parsed.app_name, config.app_name);
        assert_eq!(parsed.scheduler_warn_ms, config.scheduler_warn_ms);
    }
}
