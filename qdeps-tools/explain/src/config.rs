//! Explainer Configuration
//!
//! Defines options for plan walking and report output.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for the qdeps explainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum call path length while walking a dependency plan.
    pub max_depth: usize,

    /// List every applicable binding, not just the winner.
    pub show_candidates: bool,

    /// Fail when the plan reaches a type the manifest does not declare.
    pub require_declared: bool,

    /// Report output format.
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 32,
            show_candidates: false,
            require_declared: false,
            format: OutputFormat::Text,
        }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tree.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Errors from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TOML configuration file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("max_depth = 4\nformat = \"json\"\n").unwrap();

        assert_eq!(config.max_depth, 4);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.show_candidates);
        assert!(!config.require_declared);
    }

    #[test]
    fn test_default_config_round_trips() {
        let text = Config::default().to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Config::from_toml("format = \"yaml\"").is_err());
    }
}
