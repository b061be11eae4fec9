//! Tax contract resolution between a liege and its vassals.
//!
//! Contracts live on the liege's record. A vassal without a contract is not
//! an error: it pays nothing and its summary row says so. The capital edge
//! is always untaxed, whatever a contract might claim.

use rust_decimal::Decimal;
use tracing::debug;

use realm_types::{SettlementId, SettlementRecord, VassalContract};

use crate::config::StatsConfig;

/// Tax terms in effect for one liege-vassal edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTerms {
    /// Income tax rate, clamped to 0-1.
    pub income_tax_rate: Decimal,
    /// Troop tax rate, clamped to 0-1.
    pub troop_tax_rate: Decimal,
    /// Contract text or the reason no contract applies.
    pub terms: String,
    /// Whether this edge is the liege's capital.
    pub is_capital: bool,
}

/// Find the contract `liege` holds for `vassal`, ignoring case.
pub fn find_contract<'a>(
    liege: &'a SettlementRecord,
    vassal: &SettlementId,
) -> Option<&'a VassalContract> {
    liege
        .vassal_contracts
        .iter()
        .find(|c| &c.vassal_id == vassal)
}

/// Clamp a tax rate into `[0, 1]`.
pub fn clamp_rate(rate: Decimal) -> Decimal {
    rate.clamp(Decimal::ZERO, Decimal::ONE)
}

/// Work out the effective terms for the edge `liege -> vassal`.
pub fn resolve_terms(
    liege: &SettlementRecord,
    vassal: &SettlementId,
    is_capital: bool,
    config: &StatsConfig,
) -> ResolvedTerms {
    let contract = find_contract(liege, vassal);

    if is_capital {
        if contract.is_some() {
            debug!(
                liege = %liege.id,
                vassal = %vassal,
                "Ignoring contract on capital edge"
            );
        }
        return ResolvedTerms {
            income_tax_rate: Decimal::ZERO,
            troop_tax_rate: Decimal::ZERO,
            terms: config.capital_terms.clone(),
            is_capital: true,
        };
    }

    let Some(contract) = contract else {
        return ResolvedTerms {
            income_tax_rate: Decimal::ZERO,
            troop_tax_rate: Decimal::ZERO,
            terms: config.missing_contract_terms.clone(),
            is_capital: false,
        };
    };

    let income_tax_rate = clamp_rate(contract.income_tax_rate);
    let troop_tax_rate = clamp_rate(contract.troop_tax_rate);
    if income_tax_rate != contract.income_tax_rate || troop_tax_rate != contract.troop_tax_rate {
        debug!(
            liege = %liege.id,
            vassal = %vassal,
            income_tax_rate = %contract.income_tax_rate,
            troop_tax_rate = %contract.troop_tax_rate,
            "Contract tax rate outside 0-1, clamped"
        );
    }

    ResolvedTerms {
        income_tax_rate,
        troop_tax_rate,
        terms: contract.terms.clone(),
        is_capital: false,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn liege_with_contract(vassal: &str, income: Decimal, troops: Decimal) -> SettlementRecord {
        let mut liege = SettlementRecord::new("Liege");
        liege.vassal_ids.push(SettlementId::new(vassal));
        liege.vassal_contracts.push(VassalContract {
            vassal_id: SettlementId::new(vassal),
            income_tax_rate: income,
            troop_tax_rate: troops,
            terms: "Oath of the Ford".to_owned(),
        });
        liege
    }

    #[test]
    fn lookup_ignores_case() {
        let liege = liege_with_contract("Ashford", dec!(0.5), dec!(0.25));
        assert!(find_contract(&liege, &SettlementId::new("ASHFORD")).is_some());
        assert!(find_contract(&liege, &SettlementId::new("Millbrook")).is_none());
    }

    #[test]
    fn contract_terms_applied() {
        let liege = liege_with_contract("Ashford", dec!(0.5), dec!(0.25));
        let terms = resolve_terms(&liege, &SettlementId::new("ashford"), false, &StatsConfig::default());
        assert_eq!(terms.income_tax_rate, dec!(0.5));
        assert_eq!(terms.troop_tax_rate, dec!(0.25));
        assert_eq!(terms.terms, "Oath of the Ford");
        assert!(!terms.is_capital);
    }

    #[test]
    fn missing_contract_defaults_to_zero() {
        let liege = SettlementRecord::new("Liege");
        let terms = resolve_terms(&liege, &SettlementId::new("Nowhere"), false, &StatsConfig::default());
        assert_eq!(terms.income_tax_rate, Decimal::ZERO);
        assert_eq!(terms.troop_tax_rate, Decimal::ZERO);
        assert_eq!(terms.terms, "No contract found (0% assumed)");
    }

    #[test]
    fn capital_overrides_contract() {
        let liege = liege_with_contract("Crownport", dec!(0.9), dec!(0.9));
        let terms = resolve_terms(&liege, &SettlementId::new("Crownport"), true, &StatsConfig::default());
        assert_eq!(terms.income_tax_rate, Decimal::ZERO);
        assert_eq!(terms.troop_tax_rate, Decimal::ZERO);
        assert_eq!(terms.terms, "Capital (untaxed)");
        assert!(terms.is_capital);
    }

    #[test]
    fn rates_are_clamped() {
        let liege = liege_with_contract("Ashford", dec!(1.5), dec!(-0.2));
        let terms = resolve_terms(&liege, &SettlementId::new("Ashford"), false, &StatsConfig::default());
        assert_eq!(terms.income_tax_rate, Decimal::ONE);
        assert_eq!(terms.troop_tax_rate, Decimal::ZERO);
    }
}
