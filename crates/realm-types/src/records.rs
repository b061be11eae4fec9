//! Raw settlement records as authored in the world data files.
//!
//! A [`SettlementRecord`] is read-only input to the aggregation engine.
//! Numeric fields are stored exactly as authored (negative values included);
//! clamping to valid ranges happens during aggregation, never on load.
//!
//! Loading is lenient where authoring tools disagree: counts may be written
//! as integral floats (`1200.0`), and `null` stands in for a missing count,
//! income or list. A fractional count is still rejected.
//!
//! Field names follow the camelCase convention of the settlement JSON files:
//!
//! ```json
//! {
//!   "id": "Ironhold",
//!   "displayName": "Ironhold Keep",
//!   "localPopulation": 1200,
//!   "localIncomePerMonth": 340.5,
//!   "localTroops": 80,
//!   "vassalIds": ["Ashford", "Millbrook"],
//!   "capitalSettlementId": "Ironhold Town",
//!   "vassalContracts": [
//!     { "vassalId": "Ashford", "incomeTaxRate": 0.2, "troopTaxRate": 0.1, "terms": "Oath of 1203" }
//!   ],
//!   "raceDistribution": [ { "key": "Human", "percent": 80 }, { "key": "Dwarf", "percent": 20 } ],
//!   "culture": "Northmarch"
//! }
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::SettlementId;

/// One entry of a percentage distribution (race or culture).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionShare {
    /// Category name, e.g. `Human` or `Northmarch`.
    #[serde(alias = "name")]
    pub key: String,
    /// Share of the population, nominally in percent (0-100).
    #[serde(default)]
    pub percent: Decimal,
}

impl DistributionShare {
    /// Convenience constructor.
    pub fn new(key: impl Into<String>, percent: Decimal) -> Self {
        Self {
            key: key.into(),
            percent,
        }
    }
}

/// Tax terms a liege applies to one of its vassals.
///
/// Stored on the liege's record, keyed by the vassal's identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VassalContract {
    /// The vassal these terms apply to.
    pub vassal_id: SettlementId,
    /// Fraction of the vassal's gross income paid upward (0-1).
    #[serde(default)]
    pub income_tax_rate: Decimal,
    /// Fraction of the vassal's gross troops sent upward (0-1).
    #[serde(default)]
    pub troop_tax_rate: Decimal,
    /// Free-text description of the arrangement.
    #[serde(default)]
    pub terms: String,
}

/// Raw data for one settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRecord {
    /// Unique identifier (case-insensitive).
    pub id: SettlementId,

    /// Human-readable name, if the author provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// People living in the settlement itself.
    #[serde(default, deserialize_with = "whole_count")]
    pub local_population: i64,

    /// Income produced by the settlement itself, per month.
    #[serde(default, deserialize_with = "null_as_default")]
    pub local_income_per_month: Decimal,

    /// Troops raised by the settlement itself.
    #[serde(default, deserialize_with = "whole_count")]
    pub local_troops: i64,

    /// Direct vassals, in authored order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vassal_ids: Vec<SettlementId>,

    /// Settlement acting as this realm's capital. Always an untaxed child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital_settlement_id: Option<SettlementId>,

    /// Tax contracts with vassals, keyed by vassal id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vassal_contracts: Vec<VassalContract>,

    /// Racial makeup of the local population, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_distribution: Option<Vec<DistributionShare>>,

    /// Cultural makeup of the local population, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture_distribution: Option<Vec<DistributionShare>>,

    /// Single culture for the whole settlement, used when no culture
    /// distribution is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
}

impl SettlementRecord {
    /// Create a record with the given id and every other field empty.
    pub fn new(id: impl Into<SettlementId>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            local_population: 0,
            local_income_per_month: Decimal::ZERO,
            local_troops: 0,
            vassal_ids: Vec::new(),
            capital_settlement_id: None,
            vassal_contracts: Vec::new(),
            race_distribution: None,
            culture_distribution: None,
            culture: None,
        }
    }

    /// Whether `id` is listed as a direct vassal (capital edges excluded).
    pub fn has_vassal(&self, id: &SettlementId) -> bool {
        self.vassal_ids.iter().any(|v| v == id)
    }
}

/// Read a count written as an integer or an integral float. `null` is 0.
fn whole_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let Some(value) = Option::<Decimal>::deserialize(deserializer)? else {
        return Ok(0);
    };
    if !value.fract().is_zero() {
        return Err(D::Error::custom(format!("expected a whole number, got {value}")));
    }
    value
        .to_i64()
        .ok_or_else(|| D::Error::custom(format!("count {value} is out of range")))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
