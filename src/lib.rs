//! SAR Triage - victim-presence fusion and rescue urgency decisions
//!
//! ```text
//! SensorReading ──fuse_signals──▶ VictimState ──assign_urgency(risk)──▶ UrgencyResult
//! ```

pub mod api;
pub mod constants;
pub mod logic;

pub use logic::confidence::ConfidenceLevel;
pub use logic::config::TriageConfig;
pub use logic::error::{Stage, TriageError, TriageResult};
pub use logic::pipeline::{
    assign_urgency, fuse_signals, Assessment, TriageEngine, UrgencyResult, VictimState,
};
pub use logic::sensor::{Breathing, DebrisCover, HeatSignature, MotionLevel, SensorReading};
pub use logic::urgency::{EnvironmentRisk, UrgencyLevel};
