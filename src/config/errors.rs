//! Configuration error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid(message.into())
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "SQLQUERY_CONFIG_READ",
            ConfigError::Parse(_) => "SQLQUERY_CONFIG_PARSE",
            ConfigError::Invalid(_) => "SQLQUERY_CONFIG_INVALID",
        }
    }
}
