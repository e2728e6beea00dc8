use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{Result, SimulationError};
use crate::types::{AmortizationSystem, ScheduleMode};

/// product configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub product_name: String,
    pub financing_terms: FinancingTerms,
    pub affordability_rules: AffordabilityRules,
    /// occupancy permit milestone, used only for month-count reporting
    pub habite_se_date: NaiveDate,
}

/// financing terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingTerms {
    pub total_installments: u32,
    /// construction period, charged no interest
    pub zero_interest_installments: u32,
    /// annual rate for the post-construction period
    pub annual_interest_rate: Rate,
    pub amortization_system: AmortizationSystem,
    pub schedule_mode: ScheduleMode,
}

/// affordability thresholds, all percentages expressed as whole numbers (35 = 35%)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityRules {
    pub max_construction_income_ratio: Decimal,
    pub max_post_construction_income_ratio: Decimal,
    pub max_post_construction_vgv_ratio: Decimal,
    /// share of income that can go to coverage checks
    pub income_coverage_factor: Decimal,
    pub annual_coverage_months: u32,
    pub semiannual_coverage_months: u32,
}

impl Default for AffordabilityRules {
    fn default() -> Self {
        Self {
            max_construction_income_ratio: dec!(35),
            max_post_construction_income_ratio: dec!(10),
            max_post_construction_vgv_ratio: dec!(5),
            income_coverage_factor: dec!(0.70),
            annual_coverage_months: 12,
            semiannual_coverage_months: 6,
        }
    }
}

impl ProductConfig {
    /// Crédito Associativo preset: 60 installments, 24 of them during construction
    pub fn credito_associativo() -> Self {
        Self {
            product_name: "Crédito Associativo".to_string(),
            financing_terms: FinancingTerms {
                total_installments: 60,
                zero_interest_installments: 24,
                annual_interest_rate: Rate::from_percentage(12),
                amortization_system: AmortizationSystem::Price,
                schedule_mode: ScheduleMode::MixedZeroInterest,
            },
            affordability_rules: AffordabilityRules::default(),
            habite_se_date: NaiveDate::from_ymd_opt(2027, 4, 30).unwrap_or_default(),
        }
    }

    /// load and validate a configuration from json
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ProductConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let terms = &self.financing_terms;

        if terms.total_installments == 0 {
            return Err(SimulationError::InvalidConfiguration {
                message: "total_installments must be positive".to_string(),
            });
        }

        if terms.zero_interest_installments > terms.total_installments {
            return Err(SimulationError::InvalidConfiguration {
                message: format!(
                    "zero_interest_installments ({}) exceeds total_installments ({})",
                    terms.zero_interest_installments, terms.total_installments
                ),
            });
        }

        if terms.annual_interest_rate.as_decimal() < Decimal::ZERO {
            return Err(SimulationError::InvalidConfiguration {
                message: format!("negative interest rate: {}", terms.annual_interest_rate),
            });
        }

        let rules = &self.affordability_rules;
        if rules.annual_coverage_months == 0 || rules.semiannual_coverage_months == 0 {
            return Err(SimulationError::InvalidConfiguration {
                message: "coverage windows must be at least one month".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self::credito_associativo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credito_associativo_preset() {
        let config = ProductConfig::credito_associativo();
        assert_eq!(config.financing_terms.total_installments, 60);
        assert_eq!(config.financing_terms.zero_interest_installments, 24);
        assert_eq!(config.financing_terms.annual_interest_rate.as_decimal(), dec!(0.12));
        assert_eq!(config.habite_se_date, NaiveDate::from_ymd_opt(2027, 4, 30).unwrap());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_keeps_rules() {
        let config = ProductConfig::credito_associativo();
        let json = config.to_json_pretty().unwrap();
        let loaded = ProductConfig::from_json(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_rejects_zero_interest_above_total() {
        let mut config = ProductConfig::credito_associativo();
        config.financing_terms.zero_interest_installments = 61;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rejects_zero_installments() {
        let mut config = ProductConfig::credito_associativo();
        config.financing_terms.total_installments = 0;
        config.financing_terms.zero_interest_installments = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = ProductConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimulationError::Serialization(_)));
    }
}
