//! Adapter error types.
//!
//! Writers and sessions never fail. These errors cover configuration loading
//! and logging setup only.

use thiserror::Error;

/// Errors that can occur while configuring the adapter.
#[derive(Debug, Error)]
pub enum LokitelError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    ParseError {
        /// Path of the offending file.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// Initialization error.
    #[error("Initialization error: {0}")]
    InitError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for adapter configuration.
pub type LokitelResult<T> = Result<T, LokitelError>;
