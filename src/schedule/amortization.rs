use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{overflow, Result, SimulationError};
use crate::request::AmortizationParameters;
use crate::types::{AmortizationSystem, ScheduleMode};

use super::ScheduleProducer;

/// one installment of the schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub installment_number: u32,
    pub payment_amount: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub ending_balance: Money,
    /// paid during the construction period, no interest charged
    pub zero_interest: bool,
}

/// full installment schedule with aggregate totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentSchedule {
    pub principal: Money,
    pub annual_interest_rate: Rate,
    pub schedule_mode: ScheduleMode,
    /// installments belonging to the construction period
    pub construction_installments: u32,
    pub installments: Vec<ScheduledInstallment>,
    pub total_interest: Money,
    pub total_amount: Money,
    /// simplified CET, informational only
    pub effective_annual_cost: Rate,
}

impl InstallmentSchedule {
    pub fn total_installments(&self) -> u32 {
        self.installments.len() as u32
    }

    /// get installment by 1-based number
    pub fn get_installment(&self, installment_number: u32) -> Option<&ScheduledInstallment> {
        installment_number
            .checked_sub(1)
            .and_then(|idx| self.installments.get(idx as usize))
    }

    pub fn payment_amounts(&self) -> Vec<Money> {
        self.installments.iter().map(|i| i.payment_amount).collect()
    }

    /// first payment made during construction
    pub fn construction_payment(&self) -> Option<Money> {
        if self.construction_installments == 0 {
            return None;
        }
        self.installments.first().map(|i| i.payment_amount)
    }

    /// first payment made after construction
    pub fn post_construction_payment(&self) -> Option<Money> {
        self.installments
            .get(self.construction_installments as usize)
            .map(|i| i.payment_amount)
    }

    pub fn last_payment(&self) -> Option<Money> {
        self.installments.last().map(|i| i.payment_amount)
    }

    pub fn total_principal_repaid(&self) -> Money {
        self.installments.iter().map(|i| i.principal_portion).sum()
    }

    pub fn final_balance(&self) -> Money {
        self.installments
            .last()
            .map(|i| i.ending_balance)
            .unwrap_or(self.principal)
    }
}

/// schedule producer for the PRICE system, in flat or mixed layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmortizationCalculator {
    system: AmortizationSystem,
    mode: ScheduleMode,
}

impl AmortizationCalculator {
    pub fn new(system: AmortizationSystem, mode: ScheduleMode) -> Self {
        Self { system, mode }
    }

    /// calculator configured by the derived parameters
    pub fn from_parameters(params: &AmortizationParameters) -> Self {
        Self::new(params.amortization_system, params.schedule_mode)
    }

    /// compute the installment schedule
    ///
    /// callers guarantee `total_installments > 0`, a non-negative rate and
    /// `zero_interest_installments <= total_installments`
    pub fn compute(
        &self,
        principal: Money,
        total_installments: u32,
        annual_rate: Rate,
        zero_interest_installments: u32,
    ) -> Result<InstallmentSchedule> {
        if self.system != AmortizationSystem::Price {
            return Err(SimulationError::UnsupportedAmortizationSystem {
                system: self.system,
            });
        }

        let schedule = match self.mode {
            ScheduleMode::Flat => self.flat_schedule(
                principal,
                total_installments,
                annual_rate,
                zero_interest_installments,
            )?,
            ScheduleMode::MixedZeroInterest => self.mixed_schedule(
                principal,
                total_installments,
                annual_rate,
                zero_interest_installments,
            )?,
        };

        log::debug!(
            "{:?} schedule: principal {}, {} installments, total interest {}, total amount {}",
            self.mode,
            principal,
            schedule.installments.len(),
            schedule.total_interest,
            schedule.total_amount
        );

        Ok(schedule)
    }

    /// single level payment over every installment
    fn flat_schedule(
        &self,
        principal: Money,
        total_installments: u32,
        annual_rate: Rate,
        construction_installments: u32,
    ) -> Result<InstallmentSchedule> {
        let monthly_rate = annual_rate.monthly_rate();
        let payment = level_payment(principal, annual_rate, total_installments)?;

        let mut installments = Vec::with_capacity(total_installments as usize);
        let mut balance = principal;

        for number in 1..=total_installments {
            let interest = balance * monthly_rate.as_decimal();
            let amortization = payment - interest;
            balance = (balance - amortization).max(Money::ZERO);

            installments.push(ScheduledInstallment {
                installment_number: number,
                payment_amount: payment,
                interest_portion: interest,
                principal_portion: amortization,
                ending_balance: balance,
                zero_interest: interest.is_zero(),
            });
        }

        let total_amount = payment
            .checked_mul(Decimal::from(total_installments))
            .ok_or_else(|| overflow("total amount"))?;

        Ok(InstallmentSchedule {
            principal,
            annual_interest_rate: annual_rate,
            schedule_mode: ScheduleMode::Flat,
            construction_installments,
            installments,
            total_interest: total_amount - principal,
            total_amount,
            effective_annual_cost: effective_annual_cost(annual_rate)?,
        })
    }

    /// zero-interest prefix sized against the full term, then PRICE on what remains
    fn mixed_schedule(
        &self,
        principal: Money,
        total_installments: u32,
        annual_rate: Rate,
        zero_interest_installments: u32,
    ) -> Result<InstallmentSchedule> {
        let flat_payment = principal / Decimal::from(total_installments);

        let mut installments = Vec::with_capacity(total_installments as usize);
        let mut balance = principal;
        let mut total_interest = Money::ZERO;

        for number in 1..=zero_interest_installments {
            balance = (balance - flat_payment).max(Money::ZERO);

            installments.push(ScheduledInstallment {
                installment_number: number,
                payment_amount: flat_payment,
                interest_portion: Money::ZERO,
                principal_portion: flat_payment,
                ending_balance: balance,
                zero_interest: true,
            });
        }

        let remaining = total_installments.saturating_sub(zero_interest_installments);
        let monthly_rate = annual_rate.monthly_rate();
        let payment = if balance.is_positive() {
            level_payment(balance, annual_rate, remaining)?
        } else {
            Money::ZERO
        };

        for number in (zero_interest_installments + 1)..=total_installments {
            let interest = balance * monthly_rate.as_decimal();
            let amortization = payment - interest;
            balance -= amortization;
            total_interest += interest;

            installments.push(ScheduledInstallment {
                installment_number: number,
                payment_amount: payment,
                interest_portion: interest,
                principal_portion: amortization,
                ending_balance: balance,
                zero_interest: false,
            });
        }

        let total_amount: Money = installments.iter().map(|i| i.payment_amount).sum();

        Ok(InstallmentSchedule {
            principal,
            annual_interest_rate: annual_rate,
            schedule_mode: ScheduleMode::MixedZeroInterest,
            construction_installments: zero_interest_installments,
            installments,
            total_interest,
            total_amount,
            effective_annual_cost: effective_annual_cost(annual_rate)?,
        })
    }
}

impl ScheduleProducer for AmortizationCalculator {
    fn produce(&self, params: &AmortizationParameters) -> Result<InstallmentSchedule> {
        self.compute(
            params.principal,
            params.total_installments,
            params.annual_interest_rate,
            params.zero_interest_installments,
        )
    }
}

/// level PRICE payment, degrades to straight division at a zero rate
pub fn level_payment(balance: Money, annual_rate: Rate, periods: u32) -> Result<Money> {
    if periods == 0 {
        return Ok(balance);
    }

    if annual_rate.is_zero() {
        return Ok(balance / Decimal::from(periods));
    }

    // payment = B * r * (1 + r)^n / ((1 + r)^n - 1)
    let r = annual_rate.monthly_rate();
    let compound = r
        .compound_factor(periods)
        .ok_or_else(|| overflow("compound factor"))?;

    let numerator = balance
        .as_decimal()
        .checked_mul(r.as_decimal())
        .and_then(|d| d.checked_mul(compound))
        .ok_or_else(|| overflow("level payment"))?;
    let denominator = compound - Decimal::ONE;

    numerator
        .checked_div(denominator)
        .map(Money::from_decimal)
        .ok_or_else(|| overflow("level payment"))
}

/// ((1 + r)^12 - 1), reported as a percentage through `Rate::as_percentage`
pub fn effective_annual_cost(annual_rate: Rate) -> Result<Rate> {
    if annual_rate.is_zero() {
        return Ok(Rate::ZERO);
    }
    let factor = annual_rate
        .monthly_rate()
        .compound_factor(12)
        .ok_or_else(|| overflow("effective annual cost"))?;
    Ok(Rate::from_decimal(factor - Decimal::ONE))
}
