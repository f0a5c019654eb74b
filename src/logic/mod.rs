//! Logic Module - Business Logic & Engines
//!
//! Chứa các engines xử lý triage: Sensor → Features → Model → Confidence → Urgency → Explain.
//!
//! ## Architecture
//! - `sensor/` - Typed readings + validation of raw input
//! - `features/` - Versioned feature layout & encoder
//! - `dataset/` - Training dataset (CSV, synthesized prior)
//! - `model/` - Random forest, artifact store, guarded load-or-train registry
//! - `confidence/` - Probability → ConfidenceLevel
//! - `urgency/` - Decision table (confidence × risk → urgency)
//! - `explain/` - Ordered factor trace + renderers
//! - `audit/` - JSONL decision log
//! - `pipeline` - `fuse_signals` / `assign_urgency`

// Ambient
pub mod config;
pub mod error;

// Stage 1
pub mod sensor;
pub mod features;
pub mod dataset;
pub mod model;
pub mod confidence;

// Stage 2
pub mod urgency;
pub mod explain;

pub mod audit;
pub mod pipeline;


pub use error::{Stage, TriageError, TriageResult};
pub use pipeline::{
    assign_urgency, engine, fuse_signals, Assessment, Responsiveness, TriageEngine, UrgencyResult,
    VictimState, VitalSigns,
};
