//! Confidence Module - Statistical output → categorical decision input
//!
//! Ranh giới giữa xác suất của classifier và level mà decision engine dùng.

pub mod types;
pub mod rules;
pub mod synthesizer;

pub use types::ConfidenceLevel;
pub use rules::ConfidenceThresholds;
pub use synthesizer::{level_for, synthesize, synthesize_with_thresholds};
