//! Conservation checks over computed realm statistics.
//!
//! Aggregation should satisfy a handful of bookkeeping laws for every
//! settlement:
//!
//! ```text
//! total_population     == local_population + sum(vassal.population)
//! sum(population_by_*) == total_population
//! gross_income         == local_income + sum(vassal.income_paid)
//! gross_troops         == local_troops + sum(vassal.troops_paid)
//! 0 <= income_paid_up <= gross_income,  net_income == gross_income - income_paid_up
//! 0 <= troops_paid_up <= gross_troops,  net_troops == gross_troops - troops_paid_up
//! ```
//!
//! These hold by construction. The audit exists to catch regressions and to
//! let report tooling prove it to a sceptical designer. It never panics; it
//! collects every violation it finds.

use rust_decimal::Decimal;

use realm_types::{ComputedStats, SettlementId};

use crate::demographics::breakdown_total;

/// Which law a settlement broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnomalyKind {
    /// Total population differs from local plus vassal populations.
    PopulationMismatch {
        /// Local plus vassal populations.
        expected: u64,
        /// Recorded total population.
        actual: u64,
    },
    /// A demographic breakdown does not add up to the total population.
    DemographicMismatch {
        /// `race` or `culture`.
        breakdown: &'static str,
        /// Sum of the breakdown.
        counted: u64,
        /// Recorded total population.
        total: u64,
    },
    /// Gross income differs from local income plus vassal payments.
    IncomeMismatch {
        /// Local income plus vassal payments.
        expected: Decimal,
        /// Recorded gross income.
        actual: Decimal,
    },
    /// Gross troops differ from local troops plus vassal levies.
    TroopMismatch {
        /// Local troops plus vassal levies.
        expected: u64,
        /// Recorded gross troops.
        actual: u64,
    },
    /// Paid-up income is negative or exceeds gross, or net is inconsistent.
    IncomeOutOfBounds,
    /// Paid-up troops exceed gross, or net is inconsistent.
    TroopsOutOfBounds,
}

/// One violated law for one settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsAnomaly {
    /// The offending settlement.
    pub settlement_id: SettlementId,
    /// What went wrong.
    pub kind: AnomalyKind,
}

impl core::fmt::Display for StatsAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.kind {
            AnomalyKind::PopulationMismatch { expected, actual } => write!(
                f,
                "{}: total population {actual} but local + vassals is {expected}",
                self.settlement_id
            ),
            AnomalyKind::DemographicMismatch {
                breakdown,
                counted,
                total,
            } => write!(
                f,
                "{}: {breakdown} breakdown counts {counted} of {total} people",
                self.settlement_id
            ),
            AnomalyKind::IncomeMismatch { expected, actual } => write!(
                f,
                "{}: gross income {actual} but local + vassal payments is {expected}",
                self.settlement_id
            ),
            AnomalyKind::TroopMismatch { expected, actual } => write!(
                f,
                "{}: gross troops {actual} but local + vassal levies is {expected}",
                self.settlement_id
            ),
            AnomalyKind::IncomeOutOfBounds => {
                write!(f, "{}: income paid up is out of bounds", self.settlement_id)
            }
            AnomalyKind::TroopsOutOfBounds => {
                write!(f, "{}: troops paid up is out of bounds", self.settlement_id)
            }
        }
    }
}

/// Outcome of an audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditResult {
    /// Every law holds for every settlement.
    Consistent,
    /// At least one violation was found.
    Anomalies(Vec<StatsAnomaly>),
}

impl AuditResult {
    /// Whether no anomalies were found.
    pub const fn is_consistent(&self) -> bool {
        matches!(self, Self::Consistent)
    }
}

/// Audit every entry in `stats`.
pub fn verify_conservation<'a>(stats: impl IntoIterator<Item = &'a ComputedStats>) -> AuditResult {
    let anomalies: Vec<StatsAnomaly> = stats.into_iter().flat_map(audit_one).collect();
    if anomalies.is_empty() {
        AuditResult::Consistent
    } else {
        AuditResult::Anomalies(anomalies)
    }
}

/// Audit a single settlement's figures.
pub fn audit_one(stats: &ComputedStats) -> Vec<StatsAnomaly> {
    let mut kinds = Vec::new();

    let expected_population = stats
        .local_population
        .saturating_add(stats.vassal_population());
    if expected_population != stats.total_population {
        kinds.push(AnomalyKind::PopulationMismatch {
            expected: expected_population,
            actual: stats.total_population,
        });
    }

    for (breakdown, counts) in [
        ("race", &stats.population_by_race),
        ("culture", &stats.population_by_culture),
    ] {
        let counted = breakdown_total(counts);
        if counted != stats.total_population {
            kinds.push(AnomalyKind::DemographicMismatch {
                breakdown,
                counted,
                total: stats.total_population,
            });
        }
    }

    let expected_income = stats
        .direct_vassals
        .iter()
        .fold(stats.local_income, |acc, v| acc.saturating_add(v.income_paid));
    if expected_income != stats.gross_income {
        kinds.push(AnomalyKind::IncomeMismatch {
            expected: expected_income,
            actual: stats.gross_income,
        });
    }

    let expected_troops = stats
        .direct_vassals
        .iter()
        .fold(stats.local_troops, |acc, v| acc.saturating_add(v.troops_paid));
    if expected_troops != stats.gross_troops {
        kinds.push(AnomalyKind::TroopMismatch {
            expected: expected_troops,
            actual: stats.gross_troops,
        });
    }

    let income_ok = stats.income_paid_up >= Decimal::ZERO
        && stats.income_paid_up <= stats.gross_income
        && stats.gross_income.saturating_sub(stats.income_paid_up) == stats.net_income;
    if !income_ok {
        kinds.push(AnomalyKind::IncomeOutOfBounds);
    }

    let troops_ok = stats.troops_paid_up <= stats.gross_troops
        && stats.gross_troops.saturating_sub(stats.troops_paid_up) == stats.net_troops;
    if !troops_ok {
        kinds.push(AnomalyKind::TroopsOutOfBounds);
    }

    kinds
        .into_iter()
        .map(|kind| StatsAnomaly {
            settlement_id: stats.settlement_id.clone(),
            kind,
        })
        .collect()
}
