pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod evaluation;
pub mod report;
pub mod request;
pub mod schedule;
pub mod simulation;
pub mod types;

// re-export key types
pub use config::{AffordabilityRules, FinancingTerms, ProductConfig};
pub use decimal::{Money, Rate};
pub use errors::{Result, SimulationError};
pub use evaluation::{
    AffordabilityEvaluator, AffordabilityMetrics, AffordabilityVerdict, RejectionReason,
};
pub use request::{AmortizationParameters, LoanRequest};
pub use schedule::{
    AmortizationCalculator, InstallmentSchedule, ScheduleProducer, ScheduledInstallment,
};
pub use simulation::{SimulationResult, Simulator};
pub use types::{AmortizationSystem, ScheduleMode, SimulationId, VerdictStatus};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
