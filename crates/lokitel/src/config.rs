//! Adapter configuration loaded from TOML.
//!
//! ```toml
//! prewarm = 4
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LokitelError, LokitelResult};
use crate::logging::{LogConfig, setup_logging};

/// Settings for the session pool and the adapter's own logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Pool entries to build before the first checkout.
    #[serde(default)]
    pub prewarm: usize,
    /// Logging setup for the process embedding the adapter.
    #[serde(default)]
    pub logging: LogConfig,
}

impl AdapterConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_toml_str(input: &str) -> LokitelResult<Self> {
        Self::parse(input, "<inline>")
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> LokitelResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        let config = Self::parse(&input, &path.display().to_string())?;
        debug!(path = %path.display(), "loaded adapter config");
        Ok(config)
    }

    fn parse(input: &str, origin: &str) -> LokitelResult<Self> {
        let config: Self = toml::from_str(input).map_err(|source| LokitelError::ParseError {
            path: origin.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`LokitelError::ConfigError`] if the logging level or one of
    /// its directives is not a valid filter.
    pub fn validate(&self) -> LokitelResult<()> {
        self.logging.build_filter().map(|_| ())
    }

    /// Install the `[logging]` settings as the global subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if the logging settings are invalid or a global
    /// subscriber is already installed.
    pub fn init_logging(&self) -> LokitelResult<()> {
        setup_logging(&self.logging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AdapterConfig::from_toml_str("").unwrap();
        assert_eq!(config, AdapterConfig::default());
        assert_eq!(config.prewarm, 0);
    }

    #[test]
    fn test_full_document() {
        let config = AdapterConfig::from_toml_str(
            r#"
            prewarm = 4

            [logging]
            level = "debug"
            format = "json"
            directives = ["lokitel=trace"]
            "#,
        )
        .unwrap();

        assert_eq!(config.prewarm, 4);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.directives, vec!["lokitel=trace"]);
    }

    #[test]
    fn test_malformed() {
        let err = AdapterConfig::from_toml_str("prewarm = \"many\"").unwrap_err();
        assert!(matches!(err, LokitelError::ParseError { ref path, .. } if path == "<inline>"));
    }

    #[test]
    fn test_invalid_logging_directive() {
        let err = AdapterConfig::from_toml_str(
            r#"
            [logging]
            directives = ["[invalid=syntax"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LokitelError::ConfigError(_)));
    }

    #[test]
    fn test_init_logging_rejects_invalid_filter() {
        let config = AdapterConfig {
            logging: LogConfig::new("debug").with_directive("[invalid=syntax"),
            ..AdapterConfig::default()
        };

        let err = config.init_logging().unwrap_err();
        assert!(matches!(err, LokitelError::ConfigError(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prewarm = 2").unwrap();

        let config = AdapterConfig::load(file.path()).unwrap();
        assert_eq!(config.prewarm, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AdapterConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, LokitelError::IoError(_)));
    }
}
