//! One report run: load the data directory, aggregate, write the output.

use std::io::Write;
use std::path::PathBuf;

use realm_stats::{AuditResult, SettlementStatsCache, StatsConfig};
use realm_types::ComputedStats;
use tracing::{info, warn};

use crate::error::ReportError;
use crate::loader::JsonDirectoryProvider;
use crate::report::{RealmTree, SettlementDetail};

/// What to report on and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Directory of settlement JSON files.
    pub data_dir: PathBuf,
    /// Limit output to this settlement.
    pub settlement: Option<String>,
    /// Print JSON instead of text.
    pub json: bool,
    /// Run the conservation audit instead of printing figures.
    pub audit: bool,
}

impl ReportOptions {
    /// Text report of every realm under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            settlement: None,
            json: false,
            audit: false,
        }
    }
}

/// Produce the report described by `options` on `out`.
///
/// # Errors
///
/// Returns [`ReportError::DataDir`] if the data directory cannot be read,
/// [`ReportError::Lookup`] if the requested settlement is unknown,
/// [`ReportError::AuditFailed`] if an audit finds anomalies, and
/// [`ReportError::Json`] or [`ReportError::Output`] if writing fails.
pub fn run(
    options: &ReportOptions,
    config: StatsConfig,
    out: &mut impl Write,
) -> Result<(), ReportError> {
    let provider = JsonDirectoryProvider::open(&options.data_dir)?;
    let mut cache = SettlementStatsCache::new(config).with_provider(provider);

    let settlements = cache.settlement_count();
    let roots = cache.roots().len();
    info!(settlements, roots, "Settlement data aggregated");

    if options.audit {
        return audit(&mut cache, out);
    }

    match (options.settlement.as_deref(), options.json) {
        (Some(id), true) => {
            let stats = cache.try_get_stats(id)?;
            writeln!(out, "{}", serde_json::to_string_pretty(stats)?)?;
        }
        (Some(id), false) => {
            let stats = cache.try_get_stats(id)?;
            write!(out, "{}", SettlementDetail::new(stats))?;
        }
        (None, true) => {
            let all: Vec<&ComputedStats> = cache.all_stats().collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&all)?)?;
        }
        (None, false) => {
            write!(out, "{}", RealmTree::from_cache(&mut cache))?;
        }
    }
    Ok(())
}

fn audit(cache: &mut SettlementStatsCache, out: &mut impl Write) -> Result<(), ReportError> {
    let checked = cache.settlement_count();
    match cache.audit() {
        AuditResult::Consistent => {
            info!(checked, "Conservation audit passed");
            writeln!(out, "Audit passed: {checked} settlements consistent")?;
            Ok(())
        }
        AuditResult::Anomalies(anomalies) => {
            for anomaly in &anomalies {
                warn!(settlement = %anomaly.settlement_id, "{anomaly}");
                writeln!(out, "{anomaly}")?;
            }
            Err(ReportError::AuditFailed {
                count: anomalies.len(),
            })
        }
    }
}
