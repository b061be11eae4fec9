//! Realm statistics for settlement vassal hierarchies.
//!
//! Settlements swear fealty to lieges and pay a share of their income and
//! troops upward under tax contracts. This crate rolls those relationships
//! up into per-settlement realm figures: gross and net income and troops,
//! total population, race and culture breakdowns, and a summary row for
//! every direct vassal.
//!
//! # Architecture
//!
//! - [`provider`] -- [`SettlementProvider`] sources of raw records.
//! - [`store`] -- [`SettlementStore`]: merged records plus graph queries
//!   (roots, lieges).
//! - [`contract`] -- Tax contract lookup and clamping.
//! - [`demographics`] -- Percent distributions to exact integer counts.
//! - [`names`] -- Display-name resolution with a readable fallback.
//! - [`aggregate`] -- [`Aggregator`]: the memoized, cycle-safe walk.
//! - [`cache`] -- [`SettlementStatsCache`]: lazy build, explicit
//!   invalidation. The entry point for callers.
//! - [`conservation`] -- Audit that the computed figures add up.
//! - [`config`] -- [`StatsConfig`] loaded from YAML.
//!
//! # Example
//!
//! ```
//! use realm_stats::{InMemoryProvider, SettlementStatsCache};
//! use realm_types::{SettlementId, SettlementRecord};
//!
//! let mut kingdom = SettlementRecord::new("Kingdom");
//! kingdom.local_population = 100;
//! kingdom.vassal_ids.push(SettlementId::new("Hamlet"));
//! let mut hamlet = SettlementRecord::new("Hamlet");
//! hamlet.local_population = 20;
//!
//! let mut cache = SettlementStatsCache::default()
//!     .with_provider(InMemoryProvider::new(vec![kingdom, hamlet]));
//! let total = cache.get_stats_or_none("kingdom").map(|s| s.total_population);
//! assert_eq!(total, Some(120));
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod conservation;
pub mod contract;
pub mod demographics;
pub mod error;
pub mod names;
pub mod provider;
pub mod store;

pub use aggregate::{Aggregator, ParentRates};
pub use cache::SettlementStatsCache;
pub use config::{ConfigError, StatsConfig};
pub use conservation::{AnomalyKind, AuditResult, StatsAnomaly, verify_conservation};
pub use contract::{ResolvedTerms, find_contract, resolve_terms};
pub use error::StatsError;
pub use names::{DisplayNameResolver, NameTable};
pub use provider::{InMemoryProvider, SettlementProvider, parse_records};
pub use store::SettlementStore;
