use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a simulation run
pub type SimulationId = Uuid;

/// amortization system requested for the financed amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmortizationSystem {
    /// fixed installments (French system)
    Price,
    /// constant amortization, declared by the product but not offered
    Sac,
}

impl fmt::Display for AmortizationSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmortizationSystem::Price => write!(f, "PRICE"),
            AmortizationSystem::Sac => write!(f, "SAC"),
        }
    }
}

/// how the schedule producer lays out installments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleMode {
    /// one level payment across every installment
    Flat,
    /// flat zero-interest prefix followed by level interest-bearing installments
    MixedZeroInterest,
}

/// simulation outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictStatus {
    Approved,
    Rejected,
}

impl VerdictStatus {
    pub fn from_approved(approved: bool) -> Self {
        if approved {
            VerdictStatus::Approved
        } else {
            VerdictStatus::Rejected
        }
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictStatus::Approved => write!(f, "Aprovado"),
            VerdictStatus::Rejected => write!(f, "Reprovado"),
        }
    }
}
