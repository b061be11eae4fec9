//! Race and culture breakdowns.
//!
//! A settlement's local population is split into integer counts per category
//! using the percentages authored on its record. Counts always add up to the
//! population exactly: every entry but the last is rounded, and the last
//! entry takes whatever is left. Child breakdowns are then merged into the
//! liege's running totals by plain addition.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use realm_types::DistributionShare;

use crate::config::StatsConfig;

/// Population count per category.
pub type Breakdown = BTreeMap<String, u64>;

/// Split `population` across `shares` and add the counts to `target`.
///
/// Percentages are renormalized by their actual sum, so `[60, 60]` behaves
/// like `[50, 50]`. Negative percentages count as zero. If the sum is at or
/// below the configured epsilon, or there are no shares at all, the whole
/// population goes to the unspecified bucket.
pub fn add_percent_distribution(
    target: &mut Breakdown,
    population: u64,
    shares: &[DistributionShare],
    config: &StatsConfig,
) {
    if population == 0 {
        return;
    }

    let total_percent = shares
        .iter()
        .map(|s| s.percent.max(Decimal::ZERO))
        .fold(Decimal::ZERO, Decimal::saturating_add);

    if total_percent <= config.distribution_epsilon {
        add_count(target, &config.unspecified_key, population);
        return;
    }

    let population_dec = Decimal::from(population);
    let last_index = shares.len().saturating_sub(1);
    let mut assigned: u64 = 0;

    for (index, share) in shares.iter().enumerate() {
        let remaining = population.saturating_sub(assigned);
        let count = if index == last_index {
            remaining
        } else {
            population_dec
                .checked_mul(share.percent.max(Decimal::ZERO))
                .and_then(|v| v.checked_div(total_percent))
                .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
                .and_then(|v| v.to_u64())
                .unwrap_or(0)
                .min(remaining)
        };
        assigned = assigned.saturating_add(count);
        let key = if share.key.trim().is_empty() {
            config.unspecified_key.as_str()
        } else {
            share.key.trim()
        };
        add_count(target, key, count);
    }
}

/// Put the whole `population` under one category, or the unspecified bucket
/// if `key` is absent or blank.
pub fn add_single_category(
    target: &mut Breakdown,
    population: u64,
    key: Option<&str>,
    config: &StatsConfig,
) {
    if population == 0 {
        return;
    }
    let key = key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(config.unspecified_key.as_str());
    add_count(target, key, population);
}

/// Breakdown of a settlement's local population.
///
/// Uses `distribution` when present; otherwise falls back to `single_key`,
/// then to the unspecified bucket.
pub fn local_breakdown(
    population: u64,
    distribution: Option<&[DistributionShare]>,
    single_key: Option<&str>,
    config: &StatsConfig,
) -> Breakdown {
    let mut breakdown = Breakdown::new();
    match distribution {
        Some(shares) => add_percent_distribution(&mut breakdown, population, shares, config),
        None => add_single_category(&mut breakdown, population, single_key, config),
    }
    breakdown
}

/// Add every count in `source` to `target`.
pub fn merge_into(target: &mut Breakdown, source: &Breakdown) {
    for (key, count) in source {
        add_count(target, key, *count);
    }
}

/// Total population across all categories.
pub fn breakdown_total(breakdown: &Breakdown) -> u64 {
    breakdown.values().fold(0_u64, |acc, c| acc.saturating_add(*c))
}

fn add_count(target: &mut Breakdown, key: &str, count: u64) {
    if count == 0 {
        return;
    }
    let entry = target.entry(key.to_owned()).or_insert(0);
    *entry = entry.saturating_add(count);
}
