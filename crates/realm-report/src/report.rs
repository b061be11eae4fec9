//! Plain-text rendering of realm statistics.
//!
//! [`RealmTree`] prints every realm as an indented hierarchy starting at its
//! root. [`SettlementDetail`] prints one settlement the way a settlement
//! panel shows it: headline figures, demographic breakdowns and the vassal
//! table.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rust_decimal::Decimal;

use realm_stats::SettlementStatsCache;
use realm_types::{ComputedStats, SettlementId, VassalSummary};

/// Snapshot of a cache rendered as a realm hierarchy.
#[derive(Debug, Clone)]
pub struct RealmTree {
    roots: Vec<SettlementId>,
    stats: BTreeMap<SettlementId, ComputedStats>,
}

impl RealmTree {
    /// Snapshot every realm in `cache`.
    pub fn from_cache(cache: &mut SettlementStatsCache) -> Self {
        let roots = cache.roots().to_vec();
        let stats = cache
            .all_stats()
            .map(|s| (s.settlement_id.clone(), s.clone()))
            .collect();
        Self { roots, stats }
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: &SettlementId,
        row: Option<&VassalSummary>,
        depth: usize,
        printed: &mut BTreeSet<SettlementId>,
    ) -> fmt::Result {
        let Some(stats) = self.stats.get(id) else {
            return Ok(());
        };

        write!(
            f,
            "{:indent$}{} [{}] pop {} | income {} (net {}) | troops {} (net {})",
            "",
            stats.display_name,
            stats.settlement_id,
            stats.total_population,
            stats.gross_income,
            stats.net_income,
            stats.gross_troops,
            stats.net_troops,
            indent = depth.saturating_mul(2),
        )?;
        if let Some(row) = row {
            if row.is_capital {
                write!(f, " | capital")?;
            } else {
                write!(
                    f,
                    " | pays {} and {} troops",
                    row.income_paid, row.troops_paid
                )?;
            }
            if row.cycle_leaf {
                write!(f, " | cycle, counted as leaf")?;
            }
        }

        if !printed.insert(id.clone()) {
            return writeln!(f, " | see above");
        }
        writeln!(f)?;

        for vassal in &stats.direct_vassals {
            self.write_node(
                f,
                &vassal.vassal_id,
                Some(vassal),
                depth.saturating_add(1),
                printed,
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for RealmTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A capital is still a root, but it reads better under its realm.
        let capitals: BTreeSet<&SettlementId> = self
            .stats
            .values()
            .flat_map(|s| s.direct_vassals.iter())
            .filter(|v| v.is_capital)
            .map(|v| &v.vassal_id)
            .collect();
        let (held, free): (Vec<&SettlementId>, Vec<&SettlementId>) =
            self.roots.iter().partition(|id| capitals.contains(id));

        let mut printed = BTreeSet::new();
        for root in free.into_iter().chain(held) {
            if !printed.contains(root) {
                self.write_node(f, root, None, 0, &mut printed)?;
            }
        }

        let detached: Vec<&SettlementId> = self
            .stats
            .keys()
            .filter(|id| !printed.contains(*id))
            .collect();
        if !detached.is_empty() {
            writeln!(f, "Not reachable from any realm:")?;
            for id in detached {
                if !printed.contains(id) {
                    self.write_node(f, id, None, 1, &mut printed)?;
                }
            }
        }
        Ok(())
    }
}

/// One settlement's full figures.
#[derive(Debug, Clone, Copy)]
pub struct SettlementDetail<'a> {
    stats: &'a ComputedStats,
}

impl<'a> SettlementDetail<'a> {
    /// Wrap `stats` for display.
    pub const fn new(stats: &'a ComputedStats) -> Self {
        Self { stats }
    }
}

impl fmt::Display for SettlementDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.stats;
        writeln!(f, "{} [{}]", s.display_name, s.settlement_id)?;
        writeln!(
            f,
            "  Population: {} (local {})",
            s.total_population, s.local_population
        )?;
        writeln!(
            f,
            "  Income: gross {}, paid up {}, net {} (local {})",
            s.gross_income, s.income_paid_up, s.net_income, s.local_income
        )?;
        writeln!(
            f,
            "  Troops: gross {}, paid up {}, net {} (local {})",
            s.gross_troops, s.troops_paid_up, s.net_troops, s.local_troops
        )?;

        write_breakdown(f, "Race", &s.population_by_race)?;
        write_breakdown(f, "Culture", &s.population_by_culture)?;

        if s.direct_vassals.is_empty() {
            return Ok(());
        }
        writeln!(f, "  Vassals:")?;
        for v in &s.direct_vassals {
            writeln!(
                f,
                "    {} [{}]: income {}%, troops {}%, pays {} and {} troops, pop {} ({})",
                v.display_name,
                v.vassal_id,
                percent(v.income_tax_rate),
                percent(v.troop_tax_rate),
                v.income_paid,
                v.troops_paid,
                v.population,
                v.terms
            )?;
            if v.cycle_leaf {
                writeln!(f, "      vassal cycle: only local figures counted")?;
            }
        }
        Ok(())
    }
}

fn write_breakdown(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    counts: &BTreeMap<String, u64>,
) -> fmt::Result {
    if counts.is_empty() {
        return Ok(());
    }
    writeln!(f, "  {title}:")?;
    for (key, count) in counts {
        writeln!(f, "    {key}: {count}")?;
    }
    Ok(())
}

fn percent(rate: Decimal) -> Decimal {
    rate.saturating_mul(Decimal::ONE_HUNDRED).normalize()
}

#[cfg(test)]
mod tests {
    use realm_stats::InMemoryProvider;
    use realm_types::{SettlementRecord, VassalContract};
    use rust_decimal_macros::dec;

    use super::*;

    fn realm_cache() -> SettlementStatsCache {
        let mut kingdom = SettlementRecord::new("Kingdom");
        kingdom.local_population = 100;
        kingdom.local_income_per_month = dec!(50);
        kingdom.vassal_ids.push(SettlementId::new("Duchy"));
        kingdom.vassal_contracts.push(VassalContract {
            vassal_id: SettlementId::new("Duchy"),
            income_tax_rate: dec!(0.5),
            troop_tax_rate: dec!(0.25),
            terms: "Old oath".to_owned(),
        });
        kingdom.capital_settlement_id = Some(SettlementId::new("Crown"));

        let mut duchy = SettlementRecord::new("Duchy");
        duchy.local_population = 50;
        duchy.local_income_per_month = dec!(40);
        duchy.local_troops = 10;

        let mut crown = SettlementRecord::new("Crown");
        crown.local_population = 5;

        let mut a = SettlementRecord::new("LoopA");
        a.vassal_ids.push(SettlementId::new("LoopB"));
        let mut b = SettlementRecord::new("LoopB");
        b.vassal_ids.push(SettlementId::new("LoopA"));

        SettlementStatsCache::default().with_provider(InMemoryProvider::new(vec![
            kingdom, duchy, crown, a, b,
        ]))
    }

    #[test]
    fn tree_indents_vassals_under_roots() {
        let mut cache = realm_cache();
        let text = RealmTree::from_cache(&mut cache).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines.first().copied(),
            Some("Kingdom [Kingdom] pop 155 | income 70 (net 70) | troops 3 (net 3)")
        );
        assert!(lines.contains(
            &"  Duchy [Duchy] pop 50 | income 40 (net 20) | troops 10 (net 7) | pays 20 and 3 troops"
        ));
        assert!(lines.iter().any(|l| l.starts_with("  Crown [Crown]") && l.ends_with("| capital")));
    }

    #[test]
    fn cycles_render_once_under_detached_heading() {
        let mut cache = realm_cache();
        let text = RealmTree::from_cache(&mut cache).to_string();
        assert!(text.contains("Not reachable from any realm:"));
        assert_eq!(text.matches("LoopA [LoopA]").count(), 2);
        assert!(text.contains("see above"));

        // LoopA is entered first, so LoopB's row for LoopA closes the cycle.
        let cycle_rows: Vec<&str> = text
            .lines()
            .filter(|l| l.contains("cycle, counted as leaf"))
            .collect();
        assert_eq!(cycle_rows.len(), 1);
        assert!(
            cycle_rows
                .first()
                .is_some_and(|l| l.trim_start().starts_with("LoopA [LoopA]"))
        );
    }

    #[test]
    fn detail_marks_cycle_leaf_rows() {
        let mut cache = realm_cache();
        let Some(loop_b) = cache.get_stats_or_none("LoopB") else {
            panic!("LoopB missing");
        };
        let text = SettlementDetail::new(loop_b).to_string();
        assert!(text.contains("      vassal cycle: only local figures counted\n"));

        let Some(kingdom) = cache.get_stats_or_none("Kingdom") else {
            panic!("kingdom missing");
        };
        assert!(!SettlementDetail::new(kingdom).to_string().contains("vassal cycle"));
    }

    #[test]
    fn detail_lists_vassals_and_demographics() {
        let mut cache = realm_cache();
        let Some(kingdom) = cache.get_stats_or_none("Kingdom") else {
            panic!("kingdom missing");
        };
        let text = SettlementDetail::new(kingdom).to_string();
        assert!(text.starts_with("Kingdom [Kingdom]\n"));
        assert!(text.contains("  Population: 155 (local 100)\n"));
        assert!(text.contains("    Unspecified: 155\n"));
        assert!(text.contains(
            "    Duchy [Duchy]: income 50%, troops 25%, pays 20 and 3 troops, pop 50 (Old oath)\n"
        ));
        assert!(text.contains("(Capital (untaxed))"));
    }
}
