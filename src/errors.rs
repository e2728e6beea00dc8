use thiserror::Error;

use crate::types::AmortizationSystem;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("invalid data: {field} must be a number, got {value:?}")]
    InvalidInput {
        field: &'static str,
        value: String,
    },

    #[error("invalid data: {field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("invalid date: {value:?} (expected YYYY-MM-DD)")]
    InvalidDate {
        value: String,
    },

    #[error("unsupported amortization system: {system}")]
    UnsupportedAmortizationSystem {
        system: AmortizationSystem,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimulationError {
    /// true for the "invalid data" family, where no calculation was attempted
    pub fn is_invalid_data(&self) -> bool {
        matches!(
            self,
            SimulationError::InvalidInput { .. }
                | SimulationError::OutOfRange { .. }
                | SimulationError::InvalidDate { .. }
        )
    }
}

/// figure that no longer fits the decimal range
pub(crate) fn overflow(what: &str) -> SimulationError {
    SimulationError::CalculationError {
        message: format!("{} overflowed", what),
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
