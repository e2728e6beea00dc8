use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::config::ProductConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, SimulationError};
use crate::types::{AmortizationSystem, ScheduleMode};

/// largest amount accepted in any field, R$ 1 quadrillion
///
/// keeps every ratio and capacity of a simulation inside the decimal range
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// applicant input for one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub contract_value: Money,
    pub down_payment: Money,
    pub monthly_income: Money,
    pub construction_start_date: NaiveDate,
}

impl LoanRequest {
    /// build a request from already-typed values
    pub fn new(
        contract_value: Money,
        down_payment: Money,
        monthly_income: Money,
        construction_start_date: NaiveDate,
    ) -> Result<Self> {
        if !contract_value.is_positive() {
            return Err(out_of_range("contract_value", contract_value, "positive"));
        }
        if down_payment.is_negative() {
            return Err(out_of_range("down_payment", down_payment, "zero or more"));
        }
        if !monthly_income.is_positive() {
            return Err(out_of_range("monthly_income", monthly_income, "positive"));
        }
        for (field, amount) in [
            ("contract_value", contract_value),
            ("down_payment", down_payment),
            ("monthly_income", monthly_income),
        ] {
            if amount.as_decimal() > MAX_AMOUNT {
                return Err(out_of_range(field, amount, &format!("at most {}", MAX_AMOUNT)));
            }
        }

        Ok(Self {
            contract_value,
            down_payment,
            monthly_income,
            construction_start_date,
        })
    }

    /// build a request from raw form text, rejecting empty or non-numeric fields
    pub fn parse(
        contract_value: &str,
        down_payment: &str,
        monthly_income: &str,
        construction_start_date: &str,
    ) -> Result<Self> {
        let contract_value = parse_money("contract_value", contract_value)?;
        let down_payment = parse_money("down_payment", down_payment)?;
        let monthly_income = parse_money("monthly_income", monthly_income)?;
        let construction_start_date = calendar::parse_date(construction_start_date)?;

        Self::new(contract_value, down_payment, monthly_income, construction_start_date)
    }

    /// down payment alone settles the contract, nothing to finance
    pub fn is_cash_purchase(&self) -> bool {
        self.down_payment >= self.contract_value
    }

    pub fn financed_amount(&self) -> Money {
        (self.contract_value - self.down_payment).max(Money::ZERO)
    }
}

fn out_of_range(field: &'static str, value: Money, expected: &str) -> SimulationError {
    log::warn!("{} out of range: {}", field, value.as_decimal());
    SimulationError::OutOfRange {
        field,
        value: value.as_decimal().to_string(),
        expected: expected.to_string(),
    }
}

fn parse_money(field: &'static str, raw: &str) -> Result<Money> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        log::warn!("empty numeric field {}", field);
        return Err(SimulationError::InvalidInput {
            field,
            value: raw.to_string(),
        });
    }

    Money::from_str_exact(trimmed).map_err(|_| {
        log::warn!("non-numeric value for {}: {:?}", field, raw);
        SimulationError::InvalidInput {
            field,
            value: raw.to_string(),
        }
    })
}

/// inputs to the schedule producer, fixed once derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationParameters {
    pub principal: Money,
    pub total_installments: u32,
    pub zero_interest_installments: u32,
    pub annual_interest_rate: Rate,
    pub amortization_system: AmortizationSystem,
    pub schedule_mode: ScheduleMode,
}

impl AmortizationParameters {
    /// derive from the request and product terms
    pub fn derive(request: &LoanRequest, config: &ProductConfig) -> Self {
        let terms = &config.financing_terms;
        Self {
            principal: request.financed_amount(),
            total_installments: terms.total_installments,
            zero_interest_installments: terms.zero_interest_installments,
            annual_interest_rate: terms.annual_interest_rate,
            amortization_system: terms.amortization_system,
            schedule_mode: terms.schedule_mode,
        }
    }
}
