use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::AffordabilityRules;
use crate::decimal::Money;
use crate::errors::{overflow, Result};
use crate::schedule::InstallmentSchedule;
use crate::types::VerdictStatus;

/// a failed affordability rule, carrying the figure that failed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// construction payment takes too much of monthly income
    ConstructionIncomeRatio { ratio: Decimal, limit: Decimal },
    /// post-construction payment takes too much of monthly income
    PostConstructionIncomeRatio { ratio: Decimal, limit: Decimal },
    /// post-construction payment too large relative to VGV
    PostConstructionVgvRatio { ratio: Decimal, limit: Decimal },
    /// neither the annual nor the semiannual window covers the financed amount
    InsufficientIncomeCoverage {
        annual_capacity: Money,
        semiannual_capacity: Money,
        financed_amount: Money,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::ConstructionIncomeRatio { ratio, limit } => write!(
                f,
                "Comprometimento de renda durante a obra excede {}% (atual: {:.2}%)",
                limit, ratio
            ),
            RejectionReason::PostConstructionIncomeRatio { ratio, limit } => write!(
                f,
                "Comprometimento de renda pós-obra excede {}% (atual: {:.2}%)",
                limit, ratio
            ),
            RejectionReason::PostConstructionVgvRatio { ratio, limit } => write!(
                f,
                "Parcela pós-obra excede {}% do VGV (atual: {:.2}%)",
                limit, ratio
            ),
            RejectionReason::InsufficientIncomeCoverage {
                annual_capacity,
                semiannual_capacity,
                financed_amount,
            } => write!(
                f,
                "Parcelas anuais (R$ {}) e semestrais (R$ {}) são insuficientes \
                 para cobrir o valor financiado (R$ {})",
                annual_capacity, semiannual_capacity, financed_amount
            ),
        }
    }
}

/// figures computed while evaluating the rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityMetrics {
    pub construction_payment: Money,
    pub post_construction_payment: Money,
    /// percent of monthly income
    pub construction_income_ratio: Decimal,
    /// percent of monthly income
    pub post_construction_income_ratio: Decimal,
    /// contract value plus total interest
    pub vgv: Money,
    /// percent of VGV
    pub post_construction_vgv_ratio: Decimal,
    pub annual_capacity: Money,
    pub semiannual_capacity: Money,
}

/// approval decision with the reasons for any failed rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityVerdict {
    pub approved: bool,
    pub reasons: Vec<RejectionReason>,
    /// absent when nothing was financed
    pub metrics: Option<AffordabilityMetrics>,
}

impl AffordabilityVerdict {
    /// down payment covers the contract, no rule is evaluated
    pub fn cash_purchase() -> Self {
        Self {
            approved: true,
            reasons: Vec::new(),
            metrics: None,
        }
    }

    pub fn status(&self) -> VerdictStatus {
        VerdictStatus::from_approved(self.approved)
    }

    pub fn reason_messages(&self) -> Vec<String> {
        self.reasons.iter().map(|r| r.to_string()).collect()
    }
}

/// applies the product's affordability rules to a computed schedule
#[derive(Debug, Clone, PartialEq)]
pub struct AffordabilityEvaluator {
    rules: AffordabilityRules,
}

impl AffordabilityEvaluator {
    pub fn new(rules: AffordabilityRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &AffordabilityRules {
        &self.rules
    }

    /// evaluate every rule independently, approval needs all of them
    ///
    /// fails only when a ratio or capacity leaves the decimal range
    pub fn evaluate(
        &self,
        schedule: &InstallmentSchedule,
        principal: Money,
        monthly_income: Money,
        contract_value: Money,
    ) -> Result<AffordabilityVerdict> {
        let rules = &self.rules;

        let construction_payment = schedule.construction_payment().unwrap_or(Money::ZERO);
        let post_construction_payment =
            schedule.post_construction_payment().unwrap_or(Money::ZERO);

        let construction_income_ratio = construction_payment
            .percentage_of(monthly_income)
            .ok_or_else(|| overflow("construction income ratio"))?;
        let post_construction_income_ratio = post_construction_payment
            .percentage_of(monthly_income)
            .ok_or_else(|| overflow("post-construction income ratio"))?;

        let vgv = contract_value
            .checked_add(schedule.total_interest)
            .ok_or_else(|| overflow("VGV"))?;
        let post_construction_vgv_ratio = post_construction_payment
            .percentage_of(vgv)
            .ok_or_else(|| overflow("post-construction VGV ratio"))?;

        let annual_capacity = coverage_capacity(
            monthly_income,
            rules.annual_coverage_months,
            rules.income_coverage_factor,
        )
        .ok_or_else(|| overflow("annual capacity"))?;
        let semiannual_capacity = coverage_capacity(
            monthly_income,
            rules.semiannual_coverage_months,
            rules.income_coverage_factor,
        )
        .ok_or_else(|| overflow("semiannual capacity"))?;

        let annual_covered = annual_capacity >= principal;
        let semiannual_covered = semiannual_capacity >= principal / Decimal::TWO;

        let mut reasons = Vec::new();

        if construction_income_ratio > rules.max_construction_income_ratio {
            reasons.push(RejectionReason::ConstructionIncomeRatio {
                ratio: construction_income_ratio,
                limit: rules.max_construction_income_ratio,
            });
        }
        if post_construction_income_ratio > rules.max_post_construction_income_ratio {
            reasons.push(RejectionReason::PostConstructionIncomeRatio {
                ratio: post_construction_income_ratio,
                limit: rules.max_post_construction_income_ratio,
            });
        }
        if post_construction_vgv_ratio > rules.max_post_construction_vgv_ratio {
            reasons.push(RejectionReason::PostConstructionVgvRatio {
                ratio: post_construction_vgv_ratio,
                limit: rules.max_post_construction_vgv_ratio,
            });
        }
        if !annual_covered && !semiannual_covered {
            reasons.push(RejectionReason::InsufficientIncomeCoverage {
                annual_capacity,
                semiannual_capacity,
                financed_amount: principal,
            });
        }

        let approved = reasons.is_empty();

        log::info!(
            "affordability {}: construction {:.2}%, post-construction {:.2}%, \
             vgv {:.2}%, {} reason(s)",
            VerdictStatus::from_approved(approved),
            construction_income_ratio,
            post_construction_income_ratio,
            post_construction_vgv_ratio,
            reasons.len()
        );

        Ok(AffordabilityVerdict {
            approved,
            reasons,
            metrics: Some(AffordabilityMetrics {
                construction_payment,
                post_construction_payment,
                construction_income_ratio,
                post_construction_income_ratio,
                vgv,
                post_construction_vgv_ratio,
                annual_capacity,
                semiannual_capacity,
            }),
        })
    }
}

/// income available over a coverage window
fn coverage_capacity(monthly_income: Money, months: u32, factor: Decimal) -> Option<Money> {
    Decimal::from(months)
        .checked_mul(factor)
        .and_then(|share| monthly_income.checked_mul(share))
}

impl Default for AffordabilityEvaluator {
    fn default() -> Self {
        Self::new(AffordabilityRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::errors::SimulationError;
    use crate::schedule::AmortizationCalculator;
    use crate::types::{AmortizationSystem, ScheduleMode};
    use rust_decimal_macros::dec;

    fn product_schedule(principal: Money) -> InstallmentSchedule {
        AmortizationCalculator::new(AmortizationSystem::Price, ScheduleMode::MixedZeroInterest)
            .compute(principal, 60, Rate::from_percentage(12), 24)
            .unwrap()
    }

    #[test]
    fn test_approved_with_comfortable_income() {
        let principal = Money::from_major(76_000);
        let schedule = product_schedule(principal);

        let verdict = AffordabilityEvaluator::default()
            .evaluate(
                &schedule,
                principal,
                Money::from_major(20_000),
                Money::from_major(100_000),
            )
            .unwrap();

        assert!(verdict.approved);
        assert!(verdict.reasons.is_empty());
        assert_eq!(verdict.status(), VerdictStatus::Approved);

        let metrics = verdict.metrics.unwrap();
        assert_eq!(metrics.vgv, Money::from_major(100_000) + schedule.total_interest);
        assert_eq!(metrics.annual_capacity, Money::from_major(168_000));
        assert_eq!(metrics.semiannual_capacity, Money::from_major(84_000));
    }

    #[test]
    fn test_low_income_rejects_with_every_income_reason() {
        let principal = Money::from_major(76_000);
        let schedule = product_schedule(principal);

        let verdict = AffordabilityEvaluator::default()
            .evaluate(
                &schedule,
                principal,
                Money::from_major(2_000),
                Money::from_major(100_000),
            )
            .unwrap();

        assert!(!verdict.approved);
        assert_eq!(verdict.reasons.len(), 3);
        assert!(matches!(
            verdict.reasons[0],
            RejectionReason::ConstructionIncomeRatio { .. }
        ));
        assert!(matches!(
            verdict.reasons[1],
            RejectionReason::PostConstructionIncomeRatio { .. }
        ));
        assert!(matches!(
            verdict.reasons[2],
            RejectionReason::InsufficientIncomeCoverage { .. }
        ));

        // 1266.67 / 2000 = 63.33%
        let messages = verdict.reason_messages();
        assert!(messages[0].contains("63.33%"), "{}", messages[0]);
        assert!(messages[0].contains("35%"));
    }

    #[test]
    fn test_coverage_reason_reports_both_windows() {
        let principal = Money::from_major(76_000);
        let schedule = product_schedule(principal);

        let verdict = AffordabilityEvaluator::default()
            .evaluate(
                &schedule,
                principal,
                Money::from_major(2_000),
                Money::from_major(100_000),
            )
            .unwrap();

        let coverage = verdict
            .reasons
            .iter()
            .find(|r| matches!(r, RejectionReason::InsufficientIncomeCoverage { .. }))
            .unwrap();
        let message = coverage.to_string();
        assert!(message.contains("R$ 16800"), "{}", message);
        assert!(message.contains("R$ 8400"), "{}", message);
        assert!(message.contains("R$ 76000"), "{}", message);
    }

    #[test]
    fn test_single_post_construction_failure() {
        let principal = Money::from_major(76_000);
        let schedule = product_schedule(principal);

        // construction 12.67%, post-construction 15.15%, coverage 84_000 >= 76_000
        let verdict = AffordabilityEvaluator::default()
            .evaluate(
                &schedule,
                principal,
                Money::from_major(10_000),
                Money::from_major(100_000),
            )
            .unwrap();

        assert!(!verdict.approved);
        assert_eq!(verdict.reasons.len(), 1);
        match &verdict.reasons[0] {
            RejectionReason::PostConstructionIncomeRatio { ratio, limit } => {
                assert_eq!(ratio.round_dp(2), dec!(15.15));
                assert_eq!(*limit, dec!(10));
            }
            other => panic!("unexpected reason: {:?}", other),
        }
    }

    #[test]
    fn test_vgv_ratio_failure() {
        // no construction period, plain 12 month PRICE
        let principal = Money::from_major(100_000);
        let schedule =
            AmortizationCalculator::new(AmortizationSystem::Price, ScheduleMode::MixedZeroInterest)
                .compute(principal, 12, Rate::from_percentage(12), 0)
                .unwrap();

        let verdict = AffordabilityEvaluator::default()
            .evaluate(
                &schedule,
                principal,
                Money::from_major(200_000),
                Money::from_major(100_000),
            )
            .unwrap();

        assert!(!verdict.approved);
        assert_eq!(verdict.reasons.len(), 1);
        assert!(matches!(
            verdict.reasons[0],
            RejectionReason::PostConstructionVgvRatio { .. }
        ));
        assert!(verdict.reasons[0].to_string().contains("5% do VGV"));
        assert_eq!(verdict.metrics.unwrap().construction_income_ratio, Decimal::ZERO);
    }

    #[test]
    fn test_semiannual_window_alone_suffices() {
        let rules = AffordabilityRules {
            // annual window never covers, semiannual covers half the principal
            annual_coverage_months: 1,
            semiannual_coverage_months: 6,
            ..AffordabilityRules::default()
        };
        let principal = Money::from_major(76_000);
        let schedule = product_schedule(principal);

        let verdict = AffordabilityEvaluator::new(rules)
            .evaluate(
                &schedule,
                principal,
                Money::from_major(20_000),
                Money::from_major(100_000),
            )
            .unwrap();

        let metrics = verdict.metrics.as_ref().unwrap();
        assert!(metrics.annual_capacity < principal);
        assert!(verdict.approved);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        // construction payment exactly 35% of income
        let schedule = AmortizationCalculator::new(AmortizationSystem::Price, ScheduleMode::Flat)
            .compute(Money::from_major(42_000), 60, Rate::ZERO, 24)
            .unwrap();

        let verdict = AffordabilityEvaluator::default()
            .evaluate(
                &schedule,
                Money::from_major(42_000),
                Money::from_major(2_000),
                Money::from_major(42_000),
            )
            .unwrap();

        let metrics = verdict.metrics.as_ref().unwrap();
        assert_eq!(metrics.construction_income_ratio, dec!(35));
        assert!(!verdict
            .reasons
            .iter()
            .any(|r| matches!(r, RejectionReason::ConstructionIncomeRatio { .. })));
    }

    #[test]
    fn test_income_beyond_decimal_range_is_an_error() {
        let principal = Money::from_major(76_000);
        let schedule = product_schedule(principal);

        // 1e28 * 12 * 0.70 does not fit in a decimal
        let err = AffordabilityEvaluator::default()
            .evaluate(
                &schedule,
                principal,
                Money::from_decimal(dec!(10000000000000000000000000000)),
                Money::from_major(100_000),
            )
            .unwrap_err();

        assert!(matches!(err, SimulationError::CalculationError { .. }));
        assert_eq!(err.to_string(), "calculation error: annual capacity overflowed");
    }

    #[test]
    fn test_ratio_beyond_decimal_range_is_an_error() {
        let principal = Money::from_decimal(dec!(100000000000000000000000));
        let schedule = product_schedule(principal);

        let err = AffordabilityEvaluator::default()
            .evaluate(
                &schedule,
                principal,
                Money::from_decimal(dec!(0.00000001)),
                principal,
            )
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "calculation error: construction income ratio overflowed"
        );
    }

    #[test]
    fn test_cash_purchase_verdict() {
        let verdict = AffordabilityVerdict::cash_purchase();
        assert!(verdict.approved);
        assert!(verdict.reasons.is_empty());
        assert!(verdict.metrics.is_none());
    }
}
