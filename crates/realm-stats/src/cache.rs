//! The realm statistics cache.
//!
//! [`SettlementStatsCache`] is the only entry point UI panels and reports
//! need. It owns the record providers, an optional display-name resolver and
//! the configuration, and keeps the record store and computed stats
//! together in one cached state.
//!
//! # Lifecycle
//!
//! The cache starts empty. The first read builds everything: the record
//! store is drained from the providers and every settlement is aggregated.
//! [`SettlementStatsCache::invalidate`] drops the store and the stats
//! together, and the next read rebuilds both. Nothing detects changes to the
//! underlying data on its own, so whoever mutates world data must invalidate
//! before the next read.
//!
//! Reads take `&mut self` because they may rebuild. Sharing a cache across
//! threads therefore needs the caller's own lock.
//!
//! # Single-liege precondition
//!
//! See [`crate::aggregate`]: a settlement sworn to several lieges is counted
//! by each of them, but its own paid-up fields only describe one.

use std::collections::BTreeMap;

use realm_types::{ComputedStats, SettlementId};
use tracing::info;

use crate::aggregate::Aggregator;
use crate::config::StatsConfig;
use crate::conservation::{AuditResult, verify_conservation};
use crate::error::StatsError;
use crate::names::DisplayNameResolver;
use crate::provider::SettlementProvider;
use crate::store::SettlementStore;

/// Record store and computed stats built from the same provider snapshot.
struct CacheState {
    store: SettlementStore,
    stats: BTreeMap<SettlementId, ComputedStats>,
    roots: Vec<SettlementId>,
}

/// Lazily built, explicitly invalidated realm statistics.
pub struct SettlementStatsCache {
    providers: Vec<Box<dyn SettlementProvider>>,
    names: Option<Box<dyn DisplayNameResolver>>,
    config: StatsConfig,
    state: Option<CacheState>,
}

impl Default for SettlementStatsCache {
    fn default() -> Self {
        Self::new(StatsConfig::default())
    }
}

impl SettlementStatsCache {
    /// Create an empty cache with no providers.
    pub const fn new(config: StatsConfig) -> Self {
        Self {
            providers: Vec::new(),
            names: None,
            config,
            state: None,
        }
    }

    /// Register a provider (builder style).
    #[must_use]
    pub fn with_provider(mut self, provider: impl SettlementProvider + 'static) -> Self {
        self.add_provider(provider);
        self
    }

    /// Register a display-name resolver (builder style).
    #[must_use]
    pub fn with_name_resolver(mut self, names: impl DisplayNameResolver + 'static) -> Self {
        self.names = Some(Box::new(names));
        self.state = None;
        self
    }

    /// Register a provider. Later providers override earlier ones on
    /// duplicate ids. Invalidates the cache.
    pub fn add_provider(&mut self, provider: impl SettlementProvider + 'static) {
        self.providers.push(Box::new(provider));
        self.invalidate();
    }

    /// Drop the record store and all computed stats.
    pub fn invalidate(&mut self) {
        self.state = None;
    }

    /// Whether the cached state is currently built.
    pub const fn is_built(&self) -> bool {
        self.state.is_some()
    }

    /// Stats for `id`, rebuilding first if the cache was invalidated.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::SettlementNotFound`] if no provider supplied a
    /// record with this id.
    pub fn try_get_stats(&mut self, id: &str) -> Result<&ComputedStats, StatsError> {
        let key = SettlementId::new(id);
        self.ensure_built()
            .stats
            .get(&key)
            .ok_or(StatsError::SettlementNotFound(key))
    }

    /// Stats for `id`, or `None` if it is unknown.
    pub fn get_stats_or_none(&mut self, id: &str) -> Option<&ComputedStats> {
        self.ensure_built().stats.get(&SettlementId::new(id))
    }

    /// Top-level realms in id order.
    pub fn roots(&mut self) -> &[SettlementId] {
        &self.ensure_built().roots
    }

    /// Number of settlements known to the cache.
    pub fn settlement_count(&mut self) -> usize {
        self.ensure_built().store.len()
    }

    /// Every computed entry, in id order.
    pub fn all_stats(&mut self) -> impl Iterator<Item = &ComputedStats> {
        self.ensure_built().stats.values()
    }

    /// The settlement `id` is sworn to, if any.
    pub fn liege_of(&mut self, id: &str) -> Option<SettlementId> {
        self.ensure_built()
            .store
            .liege_of(&SettlementId::new(id))
            .cloned()
    }

    /// Re-check the aggregation invariants over every computed entry.
    pub fn audit(&mut self) -> AuditResult {
        verify_conservation(self.ensure_built().stats.values())
    }

    fn ensure_built(&mut self) -> &CacheState {
        let providers = &self.providers;
        let names = self.names.as_deref();
        let config = &self.config;
        self.state
            .get_or_insert_with(|| build_state(providers, names, config))
    }
}

fn build_state(
    providers: &[Box<dyn SettlementProvider>],
    names: Option<&dyn DisplayNameResolver>,
    config: &StatsConfig,
) -> CacheState {
    let store = SettlementStore::from_providers(providers);
    let roots = store.roots();
    let stats = Aggregator::new(&store, config).with_names(names).run();
    info!(
        settlements = store.len(),
        roots = roots.len(),
        "Realm statistics rebuilt"
    );
    CacheState {
        store,
        stats,
        roots,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use realm_types::SettlementRecord;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::names::NameTable;
    use crate::provider::InMemoryProvider;

    use super::*;

    fn record(id: &str, pop: i64, vassals: &[&str]) -> SettlementRecord {
        let mut r = SettlementRecord::new(id);
        r.local_population = pop;
        r.vassal_ids = vassals.iter().copied().map(SettlementId::from).collect();
        r
    }

    #[test]
    fn lazy_build_on_first_read() {
        let mut cache = SettlementStatsCache::default()
            .with_provider(InMemoryProvider::new(vec![record("Vale", 5, &[])]));
        assert!(!cache.is_built());
        assert!(cache.get_stats_or_none("vale").is_some());
        assert!(cache.is_built());
    }

    #[test]
    fn unknown_settlement_is_not_found() {
        let mut cache = SettlementStatsCache::default()
            .with_provider(InMemoryProvider::new(vec![record("Vale", 5, &[])]));
        let err = cache.try_get_stats("Nowhere");
        assert!(matches!(err, Err(StatsError::SettlementNotFound(id)) if id.as_str() == "Nowhere"));
        assert!(cache.get_stats_or_none("Nowhere").is_none());
    }

    #[test]
    fn invalidate_picks_up_new_data() {
        let data = Rc::new(RefCell::new(vec![record("Vale", 5, &[])]));
        let source = Rc::clone(&data);
        let mut cache =
            SettlementStatsCache::default().with_provider(move || source.borrow().clone());

        assert_eq!(cache.try_get_stats("Vale").map(|s| s.total_population).ok(), Some(5));

        data.borrow_mut().push(record("Hill", 7, &[]));
        if let Some(vale) = data.borrow_mut().first_mut() {
            vale.local_population = 6;
        }

        // Stale until invalidated.
        assert_eq!(cache.try_get_stats("Vale").map(|s| s.total_population).ok(), Some(5));
        assert!(cache.get_stats_or_none("Hill").is_none());

        cache.invalidate();
        assert!(!cache.is_built());
        assert_eq!(cache.try_get_stats("Vale").map(|s| s.total_population).ok(), Some(6));
        assert_eq!(cache.settlement_count(), 2);
    }

    #[test]
    fn adding_a_provider_invalidates() {
        let mut cache = SettlementStatsCache::default()
            .with_provider(InMemoryProvider::new(vec![record("Vale", 5, &[])]));
        assert_eq!(cache.settlement_count(), 1);
        cache.add_provider(InMemoryProvider::new(vec![record("Hill", 1, &[])]));
        assert!(!cache.is_built());
        assert_eq!(cache.settlement_count(), 2);
    }

    #[test]
    fn roots_and_lieges() {
        let mut cache = SettlementStatsCache::default().with_provider(InMemoryProvider::new(vec![
            record("Kingdom", 100, &["Duchy"]),
            record("Duchy", 50, &["Hamlet"]),
            record("Hamlet", 10, &[]),
            record("Freehold", 1, &[]),
        ]));
        let roots: Vec<String> = cache.roots().iter().map(ToString::to_string).collect();
        assert_eq!(roots, vec!["Freehold", "Kingdom"]);
        assert_eq!(cache.liege_of("hamlet").map(|l| l.to_string()), Some("Duchy".to_owned()));
        assert_eq!(cache.liege_of("Kingdom"), None);
        assert_eq!(cache.all_stats().count(), 4);
        assert_eq!(
            cache.get_stats_or_none("Kingdom").map(|s| s.total_population),
            Some(160)
        );
    }

    #[test]
    fn name_resolver_is_used_for_rows() {
        let mut names = NameTable::new();
        names.insert("duchy", "The Duchy of Wey");
        let mut cache = SettlementStatsCache::default()
            .with_provider(InMemoryProvider::new(vec![
                record("Kingdom", 1, &["Duchy"]),
                record("Duchy", 1, &[]),
            ]))
            .with_name_resolver(names);

        let row_name = cache
            .get_stats_or_none("Kingdom")
            .and_then(|s| s.direct_vassals.first())
            .map(|v| v.display_name.clone());
        assert_eq!(row_name.as_deref(), Some("The Duchy of Wey"));
        assert_eq!(
            cache.get_stats_or_none("Kingdom").map(|s| s.display_name.clone()),
            Some("Kingdom".to_owned())
        );
    }

    #[test]
    fn audit_on_healthy_data_is_consistent() {
        let mut kingdom = record("Kingdom", 100, &["Duchy"]);
        kingdom.local_income_per_month = dec!(10);
        kingdom.vassal_contracts.push(realm_types::VassalContract {
            vassal_id: SettlementId::new("Duchy"),
            income_tax_rate: dec!(0.3),
            troop_tax_rate: dec!(0.3),
            terms: String::new(),
        });
        let mut duchy = record("Duchy", 50, &[]);
        duchy.local_income_per_month = dec!(33.3);
        duchy.local_troops = 7;

        let mut cache =
            SettlementStatsCache::default().with_provider(InMemoryProvider::new(vec![kingdom, duchy]));
        assert_eq!(cache.audit(), AuditResult::Consistent);
        assert_eq!(
            cache.get_stats_or_none("Kingdom").map(|s| s.gross_income),
            Some(dec!(19.99))
        );
        assert_ne!(
            cache.get_stats_or_none("Duchy").map(|s| s.net_income),
            Some(Decimal::ZERO)
        );
    }
}
