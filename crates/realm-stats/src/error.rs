//! Error types for the `realm-stats` crate.
//!
//! Aggregation itself never fails: missing records, cycles, absent contracts
//! and malformed distributions are absorbed and logged. The only fallible
//! surface is looking up a settlement the cache does not know about.

use realm_types::SettlementId;

/// Errors returned by stats lookups.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// No record with this id was supplied by any provider.
    #[error("settlement not found: {0}")]
    SettlementNotFound(SettlementId),
}
