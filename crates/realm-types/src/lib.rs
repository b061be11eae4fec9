//! Shared type definitions for the realm statistics workspace.
//!
//! This crate is the single source of truth for the data that flows between
//! record providers, the aggregation engine in `realm-stats`, and whatever
//! presents the results (the `realm-report` binary, UI panels).
//!
//! # Modules
//!
//! - [`ids`] -- Case-insensitive settlement identifiers
//! - [`records`] -- Raw settlement input: populations, vassals, contracts,
//!   demographic distributions
//! - [`stats`] -- Derived realm statistics produced by the aggregation engine

pub mod ids;
pub mod records;
pub mod stats;

// Re-export all public types at crate root for convenience.
pub use ids::SettlementId;
pub use records::{DistributionShare, SettlementRecord, VassalContract};
pub use stats::{ComputedStats, VassalSummary};
