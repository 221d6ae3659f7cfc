//! Reading, parsing and validating `config.toml`.
//!
//! A missing file is not an error: every field has a default, so an
//! unconfigured install binds `libwgrib2` in-process.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::args::Splitter;
use crate::config::types::{ShimConfig, SplitterConfig};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl ShimConfig {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/wgrib-shim/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("wgrib-shim").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// A missing file yields `ShimConfig::default()`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(ShimConfig::default());
        }

        Self::load_from(&path)
    }

    /// Loads configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_owned(),
            source: e,
        })?;

        let config: ShimConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_owned(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - `splitter.max_args` is at least 1
    /// - configured paths are not empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.splitter.build()?;

        for (key, path) in [("library", &self.library), ("executable", &self.executable)] {
            if path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(ConfigError::ValidationError {
                    message: format!("'{}' must not be empty", key),
                });
            }
        }

        Ok(())
    }
}

impl SplitterConfig {
    /// Splitter described by these settings.
    pub fn build(&self) -> Result<Splitter, ConfigError> {
        let splitter =
            Splitter::with_max_args(self.max_args).map_err(|e| ConfigError::ValidationError {
                message: format!("splitter.max_args: {}", e),
            })?;
        Ok(splitter
            .grammar(self.grammar)
            .unterminated(self.unterminated_quote))
    }
}
