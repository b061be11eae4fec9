//! Bottom-up aggregation of realm statistics over the vassal graph.
//!
//! The [`Aggregator`] walks the graph depth-first from every root (a
//! settlement that is nobody's sworn vassal), computing each settlement's
//! gross figures from its own production plus what its direct vassals pay
//! upward. Results are memoized per settlement; a second pass picks up
//! anything the roots did not reach (detached pieces, pure cycles).
//!
//! # Edge order
//!
//! A settlement's children are its `vassal_ids` in authored order,
//! deduplicated case-insensitively, followed by its capital if the capital
//! is not already listed. Self-references are ignored.
//!
//! # Taxes
//!
//! What a vassal pays is always taken from its *gross* figures. Income is
//! taxed exactly; troops are rounded half away from zero, so 10 troops at
//! 25% send 3. Population is never taxed.
//!
//! The capital edge is different: the capital itself pays nothing (its net
//! equals its gross) and its entire gross is counted in the liege's gross.
//!
//! # Cycles
//!
//! A visiting set tracks the settlements on the active call path. It is
//! pushed on entry to each frame and popped on exit, so it only ever
//! describes the current path. Reaching a settlement that is already on the
//! path logs a warning and yields its leaf-only figures (local values, no
//! vassals) flagged with `cycle_detected`. That fallback is handed to the
//! caller but never memoized; the caller's summary row for it is marked
//! `cycle_leaf`.
//!
//! # Single-liege precondition
//!
//! A memoized settlement re-derives its paid-up and net fields for every
//! liege that reaches it, and the memo keeps whichever liege came last. The
//! engine therefore assumes each settlement is sworn to at most one liege.
//! Data that lists the same vassal under two lieges still aggregates (both
//! lieges count it), but the vassal's own paid-up fields describe only one
//! of the two relationships.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use realm_types::{ComputedStats, SettlementId, SettlementRecord, VassalSummary};

use crate::config::StatsConfig;
use crate::contract::{clamp_rate, resolve_terms};
use crate::demographics::{local_breakdown, merge_into};
use crate::names::{DisplayNameResolver, resolve_display_name};
use crate::store::SettlementStore;

/// Tax rates a liege applies to the settlement being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRates {
    /// Fraction of gross income paid upward.
    pub income: Decimal,
    /// Fraction of gross troops sent upward.
    pub troops: Decimal,
}

impl ParentRates {
    /// No liege, or an untaxed edge.
    pub const UNTAXED: Self = Self {
        income: Decimal::ZERO,
        troops: Decimal::ZERO,
    };

    /// Rates clamped into `[0, 1]`.
    pub fn new(income: Decimal, troops: Decimal) -> Self {
        Self {
            income: clamp_rate(income),
            troops: clamp_rate(troops),
        }
    }
}

/// One outgoing edge of a settlement.
#[derive(Debug, Clone, Copy)]
struct ChildEdge<'r> {
    id: &'r SettlementId,
    is_capital: bool,
}

/// A single aggregation run over one [`SettlementStore`].
///
/// Construct one per rebuild; the memo and visiting set are not meant to
/// outlive it.
pub struct Aggregator<'a> {
    store: &'a SettlementStore,
    config: &'a StatsConfig,
    names: Option<&'a dyn DisplayNameResolver>,
    memo: BTreeMap<SettlementId, ComputedStats>,
    visiting: BTreeSet<SettlementId>,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator over `store`.
    pub const fn new(store: &'a SettlementStore, config: &'a StatsConfig) -> Self {
        Self {
            store,
            config,
            names: None,
            memo: BTreeMap::new(),
            visiting: BTreeSet::new(),
        }
    }

    /// Use `names` ahead of record display names when labelling settlements.
    #[must_use]
    pub fn with_names(mut self, names: Option<&'a dyn DisplayNameResolver>) -> Self {
        self.names = names;
        self
    }

    /// Compute statistics for every settlement in the store.
    ///
    /// Roots are processed first, in id order, as untaxed top-level realms.
    /// Anything still missing afterwards is computed the same way.
    pub fn run(mut self) -> BTreeMap<SettlementId, ComputedStats> {
        let store = self.store;
        let roots = store.roots();
        debug!(roots = roots.len(), settlements = store.len(), "Aggregating realms");

        for root in &roots {
            self.compute(root, ParentRates::UNTAXED);
        }

        for id in store.ids() {
            if !self.memo.contains_key(id) {
                debug!(settlement = %id, "Settlement not reachable from any root");
                self.compute(id, ParentRates::UNTAXED);
            }
        }

        self.memo
    }

    /// Compute (or re-tax) one settlement under the given parent rates.
    ///
    /// Returns `None` when no record exists for `id`.
    pub fn compute(&mut self, id: &SettlementId, rates: ParentRates) -> Option<ComputedStats> {
        if let Some(cached) = self.memo.get_mut(id) {
            apply_parent_tax(cached, rates);
            return Some(cached.clone());
        }

        let store = self.store;
        let record = store.get(id)?;

        if self.visiting.contains(id) {
            warn!(
                settlement = %id,
                "Vassal cycle detected, treating settlement as a leaf"
            );
            let mut leaf = self.local_stats(record);
            leaf.cycle_detected = true;
            apply_parent_tax(&mut leaf, rates);
            return Some(leaf);
        }

        self.visiting.insert(id.clone());
        let mut stats = self.local_stats(record);

        for edge in child_edges(record) {
            let terms = resolve_terms(record, edge.id, edge.is_capital, self.config);
            let child_rates = ParentRates::new(terms.income_tax_rate, terms.troop_tax_rate);

            let Some(child) = self.compute(edge.id, child_rates) else {
                warn!(
                    liege = %record.id,
                    vassal = %edge.id,
                    "Vassal record not found, branch skipped"
                );
                continue;
            };

            // The capital is part of the realm's own holdings: its whole
            // gross counts, while it pays no tax of its own.
            let (income_in, troops_in) = if terms.is_capital {
                (child.gross_income, child.gross_troops)
            } else {
                (child.income_paid_up, child.troops_paid_up)
            };

            stats.gross_income = stats.gross_income.saturating_add(income_in);
            stats.gross_troops = stats.gross_troops.saturating_add(troops_in);
            stats.total_population = stats
                .total_population
                .saturating_add(child.total_population);
            merge_into(&mut stats.population_by_race, &child.population_by_race);
            merge_into(&mut stats.population_by_culture, &child.population_by_culture);

            stats.direct_vassals.push(VassalSummary {
                vassal_id: child.settlement_id.clone(),
                display_name: child.display_name.clone(),
                income_tax_rate: terms.income_tax_rate,
                troop_tax_rate: terms.troop_tax_rate,
                terms: terms.terms,
                income_paid: income_in,
                troops_paid: troops_in,
                population: child.total_population,
                is_capital: terms.is_capital,
                cycle_leaf: child.cycle_detected,
            });
        }

        self.visiting.remove(id);

        apply_parent_tax(&mut stats, rates);
        self.memo.insert(id.clone(), stats.clone());
        Some(stats)
    }

    /// Stats for `record` on its own: clamped local figures, local
    /// demographics, no vassals, untaxed.
    fn local_stats(&self, record: &SettlementRecord) -> ComputedStats {
        let population = clamp_count(record.local_population);
        let income = record.local_income_per_month.max(Decimal::ZERO);
        let troops = clamp_count(record.local_troops);

        let population_by_race = local_breakdown(
            population,
            record.race_distribution.as_deref(),
            None,
            self.config,
        );
        let population_by_culture = local_breakdown(
            population,
            record.culture_distribution.as_deref(),
            record.culture.as_deref(),
            self.config,
        );

        ComputedStats {
            settlement_id: record.id.clone(),
            display_name: resolve_display_name(self.names, &record.id, Some(record)),
            local_population: population,
            local_income: income,
            local_troops: troops,
            gross_income: income,
            gross_troops: troops,
            total_population: population,
            income_paid_up: Decimal::ZERO,
            troops_paid_up: 0,
            net_income: income,
            net_troops: troops,
            population_by_race,
            population_by_culture,
            direct_vassals: Vec::new(),
            cycle_detected: false,
        }
    }
}

/// Outgoing edges of `record` in processing order.
fn child_edges(record: &SettlementRecord) -> Vec<ChildEdge<'_>> {
    let mut seen: BTreeSet<&SettlementId> = BTreeSet::new();
    let mut edges = Vec::with_capacity(record.vassal_ids.len().saturating_add(1));

    for vassal in &record.vassal_ids {
        if vassal.is_blank() || *vassal == record.id {
            debug!(settlement = %record.id, "Ignoring blank or self vassal reference");
            continue;
        }
        if seen.insert(vassal) {
            edges.push(ChildEdge {
                id: vassal,
                is_capital: false,
            });
        }
    }

    if let Some(capital) = record.capital_settlement_id.as_ref()
        && !capital.is_blank()
        && *capital != record.id
    {
        if let Some(existing) = edges.iter_mut().find(|e| e.id == capital) {
            existing.is_capital = true;
        } else {
            edges.push(ChildEdge {
                id: capital,
                is_capital: true,
            });
        }
    }

    edges
}

/// Derive paid-up and net fields from gross under `rates`.
fn apply_parent_tax(stats: &mut ComputedStats, rates: ParentRates) {
    let income_rate = clamp_rate(rates.income);
    let troop_rate = clamp_rate(rates.troops);

    stats.income_paid_up = stats
        .gross_income
        .saturating_mul(income_rate)
        .min(stats.gross_income)
        .normalize();
    stats.troops_paid_up = Decimal::from(stats.gross_troops)
        .saturating_mul(troop_rate)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
        .min(stats.gross_troops);

    stats.net_income = stats
        .gross_income
        .saturating_sub(stats.income_paid_up)
        .normalize();
    stats.net_troops = stats.gross_troops.saturating_sub(stats.troops_paid_up);
}

/// Clamp a raw authored count to a non-negative `u64`.
fn clamp_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
