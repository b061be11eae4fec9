//! Realm statistics reports over a directory of settlement JSON files.
//!
//! The `realm-report` binary is a thin wrapper around this library so the
//! whole pipeline can be exercised from tests without spawning a process.
//!
//! # Modules
//!
//! - [`config`] -- [`ReportConfig`]: aggregation and logging settings.
//! - [`loader`] -- [`JsonDirectoryProvider`]: records from `*.json` files.
//! - [`report`] -- Text rendering of realm trees and single settlements.
//! - [`runner`] -- [`run`]: load, aggregate, write.
//! - [`error`] -- [`ReportError`], [`LoadError`].

pub mod config;
pub mod error;
pub mod loader;
pub mod report;
pub mod runner;

pub use config::{LoggingConfig, ReportConfig};
pub use error::{LoadError, ReportError};
pub use loader::JsonDirectoryProvider;
pub use report::{RealmTree, SettlementDetail};
pub use runner::{ReportOptions, run};
