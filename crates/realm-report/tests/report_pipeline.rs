//! Integration tests for the report pipeline.
//!
//! Each test writes settlement JSON files into its own scratch directory
//! under the system temp dir and runs the same code path the binary uses.

#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use realm_report::{ReportConfig, ReportError, ReportOptions, run};
use realm_stats::StatsConfig;
use realm_types::ComputedStats;
use rust_decimal_macros::dec;

struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "realm-report-it-{}-{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn write(&self, name: &str, contents: &str) -> &Self {
        std::fs::write(self.0.join(name), contents).unwrap();
        self
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

const IRONHOLD: &str = r#"{
    "id": "Ironhold",
    "displayName": "Ironhold Keep",
    "localPopulation": 100,
    "localIncomePerMonth": 50,
    "localTroops": 20,
    "vassalIds": ["Ashford", "Millbrook"],
    "capitalSettlementId": "Ironhold Town",
    "vassalContracts": [
        { "vassalId": "Ashford", "incomeTaxRate": 0.5, "troopTaxRate": 0.25, "terms": "Oath of the Ford" }
    ],
    "raceDistribution": [ { "key": "Human", "percent": 80 }, { "key": "Dwarf", "percent": 20 } ]
}"#;

const VASSALS: &str = r#"[
    { "id": "Ashford", "localPopulation": 50, "localIncomePerMonth": 40, "localTroops": 10 },
    { "id": "Millbrook", "localPopulation": 30, "localIncomePerMonth": 12, "localTroops": 4 },
    { "id": "Ironhold Town", "localPopulation": 20, "localIncomePerMonth": 8, "localTroops": 2 }
]"#;

fn realm() -> Scratch {
    let scratch = Scratch::new(&format!("{:?}", std::thread::current().id()));
    scratch
        .write("ironhold.json", IRONHOLD)
        .write("vassals.json", VASSALS)
        .write("broken.json", "{ \"id\": ");
    scratch
}

fn report(options: &ReportOptions) -> (Result<(), ReportError>, String) {
    let mut out = Vec::new();
    let result = run(options, StatsConfig::default(), &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn text_tree_covers_the_whole_realm() {
    let scratch = realm();
    let (result, text) = report(&ReportOptions::new(scratch.path()));
    result.unwrap();

    let first = text.lines().next().unwrap();
    // 50 + 20 from Ashford + 0 from Millbrook + 8 from the capital.
    assert_eq!(
        first,
        "Ironhold Keep [Ironhold] pop 200 | income 78 (net 78) | troops 25 (net 25)"
    );
    assert!(text.contains("  Ashford [Ashford] pop 50"));
    assert!(text.contains("  Ironhold Town [Ironhold Town]"));
    assert!(!text.contains("Not reachable"));
}

#[test]
fn single_settlement_json() {
    let scratch = realm();
    let mut options = ReportOptions::new(scratch.path());
    options.settlement = Some("ashford".to_owned());
    options.json = true;

    let (result, text) = report(&options);
    result.unwrap();
    let stats: ComputedStats = serde_json::from_str(&text).unwrap();
    assert_eq!(stats.income_paid_up, dec!(20));
    assert_eq!(stats.troops_paid_up, 3);
    assert_eq!(stats.net_troops, 7);
}

#[test]
fn single_settlement_detail_text() {
    let scratch = realm();
    let mut options = ReportOptions::new(scratch.path());
    options.settlement = Some("Ironhold".to_owned());

    let (result, text) = report(&options);
    result.unwrap();
    assert!(text.starts_with("Ironhold Keep [Ironhold]\n"));
    assert!(text.contains("    Human: 80\n"));
    assert!(text.contains("    Dwarf: 20\n"));
    assert!(text.contains("    Unspecified: 100\n"));
    assert!(text.contains("No contract found (0% assumed)"));
}

#[test]
fn all_stats_json_is_an_array_in_id_order() {
    let scratch = realm();
    let mut options = ReportOptions::new(scratch.path());
    options.json = true;

    let (result, text) = report(&options);
    result.unwrap();
    let all: Vec<ComputedStats> = serde_json::from_str(&text).unwrap();
    let ids: Vec<String> = all.iter().map(|s| s.settlement_id.to_string()).collect();
    assert_eq!(ids, vec!["Ashford", "Ironhold", "Ironhold Town", "Millbrook"]);
}

#[test]
fn audit_passes_on_loaded_data() {
    let scratch = realm();
    let mut options = ReportOptions::new(scratch.path());
    options.audit = true;

    let (result, text) = report(&options);
    result.unwrap();
    assert_eq!(text, "Audit passed: 4 settlements consistent\n");
}

#[test]
fn unknown_settlement_is_an_error() {
    let scratch = realm();
    let mut options = ReportOptions::new(scratch.path());
    options.settlement = Some("Atlantis".to_owned());

    let (result, _) = report(&options);
    assert!(matches!(result, Err(ReportError::Lookup { .. })));
}

#[test]
fn missing_data_directory_is_an_error() {
    let options = ReportOptions::new(std::env::temp_dir().join("realm-report-it-missing"));
    let (result, _) = report(&options);
    assert!(matches!(result, Err(ReportError::DataDir { .. })));
}

#[test]
fn configured_labels_reach_the_output() {
    let scratch = realm();
    let config = ReportConfig::parse("stats:\n  unspecified_key: Unknown\n").unwrap();
    let mut options = ReportOptions::new(scratch.path());
    options.settlement = Some("Millbrook".to_owned());

    let mut out = Vec::new();
    run(&options, config.stats, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("    Unknown: 30\n"));
}
