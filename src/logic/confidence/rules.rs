//! Confidence Thresholds
//!
//! Partition [0, 1] thành 5 confidence level.
//! KHÔNG chứa logic synthesize - chỉ constants và config.

use serde::{Deserialize, Serialize};
use crate::logic::error::TriageError;

// ============================================================================
// THRESHOLDS (defaults)
// ============================================================================

/// Below this = NONE
pub const LOW_THRESHOLD: f32 = 0.15;

/// Below this = LOW
pub const MODERATE_THRESHOLD: f32 = 0.40;

/// Below this = MODERATE
pub const HIGH_THRESHOLD: f32 = 0.70;

/// At or above this = CRITICAL
pub const CRITICAL_THRESHOLD: f32 = 0.90;

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

/// Lower bounds of LOW, MODERATE, HIGH, CRITICAL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    pub low: f32,
    pub moderate: f32,
    pub high: f32,
    pub critical: f32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            low: LOW_THRESHOLD,
            moderate: MODERATE_THRESHOLD,
            high: HIGH_THRESHOLD,
            critical: CRITICAL_THRESHOLD,
        }
    }
}

impl ConfidenceThresholds {
    /// High sensitivity - weaker signals already count as a possible victim
    pub fn high_sensitivity() -> Self {
        Self {
            low: 0.10,
            moderate: 0.30,
            high: 0.60,
            critical: 0.85,
        }
    }

    /// Low sensitivity - fewer teams dispatched on marginal signals
    pub fn low_sensitivity() -> Self {
        Self {
            low: 0.25,
            moderate: 0.50,
            high: 0.80,
            critical: 0.95,
        }
    }

    /// Named preset, as selected by `SAR_SENSITIVITY`
    pub fn preset(name: &str) -> Result<Self, TriageError> {
        match name {
            "standard" => Ok(Self::default()),
            "high" => Ok(Self::high_sensitivity()),
            "low" => Ok(Self::low_sensitivity()),
            other => Err(TriageError::Config(format!(
                "unknown sensitivity preset {:?} (expected standard, high or low)",
                other
            ))),
        }
    }

    /// Strictly increasing, all inside (0, 1)
    pub fn validate(&self) -> Result<(), TriageError> {
        let bounds = [self.low, self.moderate, self.high, self.critical];

        if bounds.iter().any(|b| b.is_nan() || *b <= 0.0 || *b >= 1.0) {
            return Err(TriageError::Config(format!(
                "confidence thresholds must lie inside (0, 1): {:?}",
                bounds
            )));
        }

        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TriageError::Config(format!(
                "confidence thresholds must be strictly increasing: {:?}",
                bounds
            )));
        }

        Ok(())
    }
}
