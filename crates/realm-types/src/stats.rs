//! Derived realm statistics.
//!
//! [`ComputedStats`] is produced exclusively by the aggregation engine in
//! `realm-stats`. Every figure is already clamped and aggregated; consumers
//! only read it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::SettlementId;

/// One row in a liege's list of direct vassals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VassalSummary {
    /// The vassal settlement.
    pub vassal_id: SettlementId,
    /// Resolved human-readable name of the vassal.
    pub display_name: String,
    /// Effective income tax rate applied to the vassal (clamped to 0-1).
    pub income_tax_rate: Decimal,
    /// Effective troop tax rate applied to the vassal (clamped to 0-1).
    pub troop_tax_rate: Decimal,
    /// Contract terms, or the reason no contract applies.
    pub terms: String,
    /// Income the vassal pays to this liege.
    pub income_paid: Decimal,
    /// Troops the vassal sends to this liege.
    pub troops_paid: u64,
    /// Total population of the vassal's realm.
    pub population: u64,
    /// Whether this row is the liege's capital edge.
    pub is_capital: bool,
    /// Set when the vassal was reached again through its own vassal chain,
    /// so this row counts only its local figures.
    #[serde(default)]
    pub cycle_leaf: bool,
}

/// Aggregated statistics for one settlement and everything beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedStats {
    /// The settlement these figures describe.
    pub settlement_id: SettlementId,
    /// Resolved human-readable name.
    pub display_name: String,

    /// Local population after clamping.
    pub local_population: u64,
    /// Local income after clamping.
    pub local_income: Decimal,
    /// Local troops after clamping.
    pub local_troops: u64,

    /// Local income plus the income every direct vassal pays upward.
    pub gross_income: Decimal,
    /// Local troops plus the troops every direct vassal sends upward.
    pub gross_troops: u64,
    /// Local population plus the full population of every direct vassal.
    pub total_population: u64,

    /// Portion of `gross_income` paid to this settlement's liege.
    pub income_paid_up: Decimal,
    /// Portion of `gross_troops` sent to this settlement's liege.
    pub troops_paid_up: u64,
    /// `gross_income - income_paid_up`.
    pub net_income: Decimal,
    /// `gross_troops - troops_paid_up`.
    pub net_troops: u64,

    /// Population per race across the whole realm.
    pub population_by_race: BTreeMap<String, u64>,
    /// Population per culture across the whole realm.
    pub population_by_culture: BTreeMap<String, u64>,

    /// Direct vassals in processing order (capital edge last).
    pub direct_vassals: Vec<VassalSummary>,

    /// Set when these figures are the leaf-only fallback produced because
    /// the settlement was reached again through its own vassal chain.
    ///
    /// The fallback is only handed to the liege that closed the cycle, which
    /// records it as [`VassalSummary::cycle_leaf`]. Cached entries never
    /// carry it.
    #[serde(default)]
    pub cycle_detected: bool,
}

impl ComputedStats {
    /// Sum of the population of all direct vassals.
    pub fn vassal_population(&self) -> u64 {
        self.direct_vassals
            .iter()
            .fold(0_u64, |acc, v| acc.saturating_add(v.population))
    }

    /// Find the summary row for a direct vassal.
    pub fn vassal(&self, id: &SettlementId) -> Option<&VassalSummary> {
        self.direct_vassals.iter().find(|v| &v.vassal_id == id)
    }

    /// The capital-edge row, if this settlement has one.
    pub fn capital(&self) -> Option<&VassalSummary> {
        self.direct_vassals.iter().find(|v| v.is_capital)
    }
}
