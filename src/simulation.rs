use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar;
use crate::config::ProductConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, SimulationError};
use crate::evaluation::{AffordabilityEvaluator, AffordabilityVerdict};
use crate::request::{AmortizationParameters, LoanRequest};
use crate::schedule::{AmortizationCalculator, InstallmentSchedule, ScheduleProducer};
use crate::types::{SimulationId, VerdictStatus};

/// outcome of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub id: SimulationId,
    pub simulated_at: DateTime<Utc>,
    pub product_name: String,
    pub request: LoanRequest,
    pub financed_amount: Money,
    /// informational, does not take part in the decision
    pub months_until_habite_se: i32,
    /// none when the down payment settles the contract
    pub schedule: Option<InstallmentSchedule>,
    pub verdict: AffordabilityVerdict,
    pub final_installment_date: Option<NaiveDate>,
}

impl SimulationResult {
    pub fn approved(&self) -> bool {
        self.verdict.approved
    }

    pub fn status(&self) -> VerdictStatus {
        self.verdict.status()
    }

    pub fn is_cash_purchase(&self) -> bool {
        self.schedule.is_none()
    }

    pub fn construction_payment(&self) -> Option<Money> {
        self.schedule.as_ref().and_then(|s| s.construction_payment())
    }

    pub fn post_construction_payment(&self) -> Option<Money> {
        self.schedule.as_ref().and_then(|s| s.post_construction_payment())
    }

    pub fn total_interest(&self) -> Money {
        self.schedule
            .as_ref()
            .map(|s| s.total_interest)
            .unwrap_or(Money::ZERO)
    }

    /// contract value plus total interest
    pub fn vgv(&self) -> Money {
        self.request.contract_value + self.total_interest()
    }

    pub fn total_installments(&self) -> u32 {
        self.schedule
            .as_ref()
            .map(|s| s.total_installments())
            .unwrap_or(0)
    }

    pub fn last_installment_amount(&self) -> Option<Money> {
        self.schedule.as_ref().and_then(|s| s.last_payment())
    }

    pub fn effective_annual_cost(&self) -> Rate {
        self.schedule
            .as_ref()
            .map(|s| s.effective_annual_cost)
            .unwrap_or(Rate::ZERO)
    }
}

/// runs a request through the schedule producer and the affordability rules
#[derive(Debug, Clone)]
pub struct Simulator {
    config: ProductConfig,
    evaluator: AffordabilityEvaluator,
}

impl Simulator {
    pub fn new(config: ProductConfig) -> Result<Self> {
        config.validate()?;
        let evaluator = AffordabilityEvaluator::new(config.affordability_rules.clone());
        Ok(Self { config, evaluator })
    }

    pub fn credito_associativo() -> Self {
        let config = ProductConfig::credito_associativo();
        let evaluator = AffordabilityEvaluator::new(config.affordability_rules.clone());
        Self { config, evaluator }
    }

    pub fn config(&self) -> &ProductConfig {
        &self.config
    }

    /// simulate from raw form text
    pub fn simulate_raw(
        &self,
        contract_value: &str,
        down_payment: &str,
        monthly_income: &str,
        construction_start_date: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<SimulationResult> {
        let request = LoanRequest::parse(
            contract_value,
            down_payment,
            monthly_income,
            construction_start_date,
        )?;
        self.simulate(&request, time_provider)
    }

    pub fn simulate(
        &self,
        request: &LoanRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<SimulationResult> {
        let months_until_habite_se =
            calendar::months_between(request.construction_start_date, self.config.habite_se_date);

        let mut result = SimulationResult {
            id: Uuid::new_v4(),
            simulated_at: time_provider.now(),
            product_name: self.config.product_name.clone(),
            request: request.clone(),
            financed_amount: request.financed_amount(),
            months_until_habite_se,
            schedule: None,
            verdict: AffordabilityVerdict::cash_purchase(),
            final_installment_date: None,
        };

        if request.is_cash_purchase() {
            log::info!(
                "simulation {}: down payment {} covers contract {}, nothing to finance",
                result.id,
                request.down_payment,
                request.contract_value
            );
            return Ok(result);
        }

        let params = AmortizationParameters::derive(request, &self.config);
        log::debug!(
            "simulation {}: principal {}, {} installments ({} zero-interest) at {}",
            result.id,
            params.principal,
            params.total_installments,
            params.zero_interest_installments,
            params.annual_interest_rate
        );

        let schedule = AmortizationCalculator::from_parameters(&params).produce(&params)?;

        let verdict = self.evaluator.evaluate(
            &schedule,
            params.principal,
            request.monthly_income,
            request.contract_value,
        )?;

        let final_installment_date = calendar::final_installment_date(
            request.construction_start_date,
            params.total_installments,
        )
        .ok_or_else(|| SimulationError::InvalidDate {
            value: request.construction_start_date.to_string(),
        })?;

        result.schedule = Some(schedule);
        result.verdict = verdict;
        result.final_installment_date = Some(final_installment_date);

        Ok(result)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::credito_associativo()
    }
}
