//! Configuration management
//!
//! Strongly-typed settings loaded from optional config files and
//! `CKLVIEW__`-prefixed environment variables. Only ambient concerns live
//! here; view state is session state and document content is never
//! configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `config/default` (optional), `config/local`
    /// (optional), and the environment.
    ///
    /// Environment variables use the `CKLVIEW__` prefix with double
    /// underscore separators, e.g. `CKLVIEW__LOGGING__LEVEL=debug`.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CKLVIEW").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
