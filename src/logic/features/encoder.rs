//! Feature Encoder
//!
//! SensorReading → FeatureVector. Pure function, dùng chung bảng code với dataset.

use serde::{Deserialize, Serialize};
use crate::logic::error::TriageError;
use crate::logic::sensor::SensorReading;
use super::layout::{FEATURE_CARDINALITY, FEATURE_COUNT, SIGNAL_FAIR_BELOW, SIGNAL_POOR_BELOW};
use super::vector::{check_code, FeatureVector};

// ============================================================================
// SIGNAL QUALITY BAND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalBand {
    Poor,
    Fair,
    Good,
}

impl SignalBand {
    /// Band a signal quality in [0, 1]
    pub fn from_quality(quality: f32) -> Result<Self, TriageError> {
        if quality.is_nan() || !(0.0..=1.0).contains(&quality) {
            return Err(TriageError::Encoding {
                field: "signal_quality",
                reason: format!("{} outside [0, 1]", quality),
            });
        }

        Ok(if quality < SIGNAL_POOR_BELOW {
            SignalBand::Poor
        } else if quality < SIGNAL_FAIR_BELOW {
            SignalBand::Fair
        } else {
            SignalBand::Good
        })
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            SignalBand::Poor => 0,
            SignalBand::Fair => 1,
            SignalBand::Good => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalBand::Poor => "POOR",
            SignalBand::Fair => "FAIR",
            SignalBand::Good => "GOOD",
        }
    }
}

// ============================================================================
// ENCODE
// ============================================================================

/// Encode a validated reading into the fixed-order feature vector
pub fn encode(reading: &SensorReading) -> Result<FeatureVector, TriageError> {
    let band = SignalBand::from_quality(reading.aux.signal_quality)?;

    let values = [
        if reading.presence { 1.0 } else { 0.0 },
        reading.motion.ordinal() as f32,
        reading.heat.ordinal() as f32,
        reading.breathing.ordinal() as f32,
        reading.aux.debris_cover.ordinal() as f32,
        band.ordinal() as f32,
    ];

    // Hard boundary: bảng code phải khớp cardinality của layout
    for (i, v) in values.iter().enumerate() {
        check_code(i, *v)?;
    }

    Ok(FeatureVector::from_values(values))
}

// ============================================================================
// GRID
// ============================================================================

/// Every point of the categorical feature space, in lexicographic code order
pub fn grid() -> Vec<[f32; FEATURE_COUNT]> {
    let mut cells: Vec<[f32; FEATURE_COUNT]> = vec![[0.0; FEATURE_COUNT]];

    for (index, cardinality) in FEATURE_CARDINALITY.iter().enumerate() {
        let mut next = Vec::with_capacity(cells.len() * cardinality);
        for cell in &cells {
            for code in 0..*cardinality {
                let mut extended = *cell;
                extended[index] = code as f32;
                next.push(extended);
            }
        }
        cells = next;
    }

    cells
}
