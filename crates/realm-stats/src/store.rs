//! The settlement record store.
//!
//! A [`SettlementStore`] is an immutable-after-build index of records keyed
//! by [`SettlementId`] (and therefore case-insensitive). It is rebuilt from
//! the registered providers whenever the stats cache is invalidated and is
//! never patched in place.

use std::collections::{BTreeMap, BTreeSet};

use realm_types::{SettlementId, SettlementRecord};
use tracing::{debug, warn};

use crate::provider::SettlementProvider;

/// Case-insensitive index of settlement records.
#[derive(Debug, Clone, Default)]
pub struct SettlementStore {
    records: BTreeMap<SettlementId, SettlementRecord>,
}

impl SettlementStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Build a store by draining every provider in order.
    ///
    /// When two providers supply the same id, the later one wins.
    pub fn from_providers(providers: &[Box<dyn SettlementProvider>]) -> Self {
        let mut store = Self::new();
        for provider in providers {
            let records = provider.settlements();
            debug!(
                provider = provider.label(),
                count = records.len(),
                "Loading settlement records"
            );
            for record in records {
                if let Some(previous) = store.insert(record) {
                    debug!(
                        provider = provider.label(),
                        settlement = %previous.id,
                        "Settlement record replaced by later provider"
                    );
                }
            }
        }
        store
    }

    /// Insert a record, returning the record it replaced (if any).
    ///
    /// Records with a blank id are dropped with a warning.
    pub fn insert(&mut self, record: SettlementRecord) -> Option<SettlementRecord> {
        if record.id.is_blank() {
            warn!("Ignoring settlement record with a blank id");
            return None;
        }
        self.records.insert(record.id.clone(), record)
    }

    /// Look up a record by id.
    pub fn get(&self, id: &SettlementId) -> Option<&SettlementRecord> {
        self.records.get(id)
    }

    /// Look up a record by a plain string id.
    pub fn get_str(&self, id: &str) -> Option<&SettlementRecord> {
        self.records.get(&SettlementId::new(id))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All ids in key order.
    pub fn ids(&self) -> impl Iterator<Item = &SettlementId> {
        self.records.keys()
    }

    /// Every id that appears in some record's `vassal_ids`.
    ///
    /// Capital edges are deliberately not included.
    pub fn sworn_vassals(&self) -> BTreeSet<&SettlementId> {
        self.records
            .values()
            .flat_map(|r| r.vassal_ids.iter())
            .collect()
    }

    /// Settlements that are nobody's direct vassal, in key order.
    ///
    /// Being some realm's capital does not stop a settlement from being a
    /// root.
    pub fn roots(&self) -> Vec<SettlementId> {
        let sworn = self.sworn_vassals();
        self.records
            .keys()
            .filter(|id| !sworn.contains(id))
            .cloned()
            .collect()
    }

    /// The first settlement (in key order) that lists `id` as a direct
    /// vassal, falling back to one that holds it as its capital.
    pub fn liege_of(&self, id: &SettlementId) -> Option<&SettlementId> {
        self.records
            .values()
            .find(|r| r.id != *id && r.has_vassal(id))
            .or_else(|| {
                self.records
                    .values()
                    .find(|r| r.id != *id && r.capital_settlement_id.as_ref() == Some(id))
            })
            .map(|r| &r.id)
    }
}
