pub mod affordability;

pub use affordability::{
    AffordabilityEvaluator, AffordabilityMetrics, AffordabilityVerdict, RejectionReason,
};
