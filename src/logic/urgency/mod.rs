//! Urgency Module - Confidence × environment risk → urgency tier
//!
//! Pure function, không có state giữa các lần gọi.

pub mod types;
pub mod rules;
pub mod engine;

pub use types::{DecisionStep, EnvironmentRisk, UrgencyLevel};
pub use rules::UrgencyPolicy;
pub use engine::{decide, evaluate, Decision, DecisionTable};
