//! Configuration for the report binary.
//!
//! One YAML file carries both the aggregation settings and the logging
//! settings. Every field has a default, so the file itself is optional.
//!
//! ```yaml
//! stats:
//!   unspecified_key: "Unknown"
//! logging:
//!   level: "debug"
//!   json: false
//! ```
//!
//! The `REALM_LOG_LEVEL` environment variable overrides `logging.level`.
//! `RUST_LOG`, when set, still wins over both at subscriber setup.

use std::path::Path;

use realm_stats::{ConfigError, StatsConfig};
use serde::Deserialize;

/// Environment variable overriding the configured log level.
pub const LOG_LEVEL_ENV: &str = "REALM_LOG_LEVEL";

/// Root configuration for `realm-report`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ReportConfig {
    /// Aggregation labels and thresholds.
    #[serde(default)]
    pub stats: StatsConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl ReportConfig {
    /// Load configuration from `path`, or defaults when no path is given,
    /// then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override settings from environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        self.override_log_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
    }

    /// Replace the log level with `level` if it is present and not blank.
    pub fn override_log_level(&mut self, level: Option<&str>) {
        if let Some(level) = level.map(str::trim).filter(|l| !l.is_empty()) {
            level.clone_into(&mut self.logging.level);
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = ReportConfig::parse("").ok();
        assert_eq!(config, Some(ReportConfig::default()));
        let config = ReportConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert_eq!(config.stats.unspecified_key, "Unspecified");
    }

    #[test]
    fn nested_sections_parse() {
        let yaml = "stats:\n  unspecified_key: Unknown\nlogging:\n  level: debug\n  json: true\n";
        let Ok(config) = ReportConfig::parse(yaml) else {
            panic!("valid yaml rejected");
        };
        assert_eq!(config.stats.unspecified_key, "Unknown");
        assert_eq!(config.stats.capital_terms, "Capital (untaxed)");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = ReportConfig::parse("logging: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn log_level_override() {
        let mut config = ReportConfig::default();
        config.override_log_level(Some("  "));
        assert_eq!(config.logging.level, "info");
        config.override_log_level(None);
        assert_eq!(config.logging.level, "info");
        config.override_log_level(Some("warn"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("realm-report-no-such-config.yaml");
        let result = ReportConfig::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
