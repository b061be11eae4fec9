//! Error types for the `realm-report` binary.
//!
//! [`ReportError`] is the top-level error that wraps every failure mode
//! between reading configuration and writing the report. [`LoadError`]
//! describes why one settlement file was skipped.

use std::path::PathBuf;

/// Top-level error for the report binary.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: realm_stats::ConfigError,
    },

    /// The data directory could not be read.
    #[error("cannot read data directory {}: {source}", path.display())]
    DataDir {
        /// The directory that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A requested settlement does not exist.
    #[error("lookup error: {source}")]
    Lookup {
        /// The underlying stats error.
        #[from]
        source: realm_stats::StatsError,
    },

    /// JSON output could not be produced.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// Writing the report failed.
    #[error("output error: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The conservation audit found violations.
    #[error("audit failed: {count} anomalies found")]
    AuditFailed {
        /// Number of anomalies reported.
        count: usize,
    },

    /// The logging subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}

/// Why a single settlement file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("read error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The file is not a settlement record or an array of them.
    #[error("parse error: {source}")]
    Json {
        /// The underlying deserialization error.
        #[from]
        source: serde_json::Error,
    },
}
