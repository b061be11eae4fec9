//! Configuration for the aggregation engine.
//!
//! The engine needs very little configuration: the labels it writes into
//! results and the threshold below which a distribution counts as empty.
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields a working [`StatsConfig`].
//!
//! ```yaml
//! unspecified_key: "Unspecified"
//! missing_contract_terms: "No contract found (0% assumed)"
//! capital_terms: "Capital (untaxed)"
//! distribution_epsilon: 0.0001
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Labels and thresholds used while aggregating.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatsConfig {
    /// Demographic bucket for population with no usable distribution.
    #[serde(default = "default_unspecified_key")]
    pub unspecified_key: String,

    /// Terms written on a vassal row when the liege has no contract for it.
    #[serde(default = "default_missing_contract_terms")]
    pub missing_contract_terms: String,

    /// Terms written on the capital-edge row.
    #[serde(default = "default_capital_terms")]
    pub capital_terms: String,

    /// Percent sums at or below this value are treated as no distribution.
    #[serde(default = "default_distribution_epsilon")]
    pub distribution_epsilon: Decimal,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            unspecified_key: default_unspecified_key(),
            missing_contract_terms: default_missing_contract_terms(),
            capital_terms: default_capital_terms(),
            distribution_epsilon: default_distribution_epsilon(),
        }
    }
}

impl StatsConfig {
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
}

fn default_unspecified_key() -> String {
    "Unspecified".to_owned()
}

fn default_missing_contract_terms() -> String {
    "No contract found (0% assumed)".to_owned()
}

fn default_capital_terms() -> String {
    "Capital (untaxed)".to_owned()
}

const fn default_distribution_epsilon() -> Decimal {
    // 0.0001
    Decimal::from_parts(1, 0, 0, false, 4)
}
