pub mod amortization;

use crate::errors::Result;
use crate::request::AmortizationParameters;

pub use amortization::{
    effective_annual_cost, level_payment, AmortizationCalculator, InstallmentSchedule,
    ScheduledInstallment,
};

/// anything that turns derived parameters into an installment schedule
pub trait ScheduleProducer {
    fn produce(&self, params: &AmortizationParameters) -> Result<InstallmentSchedule>;
}
