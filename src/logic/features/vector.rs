//! Feature Vector - Core data structure for ML input
//!
//! **Versioned feature vector with layout validation**

use serde::{Deserialize, Serialize};
use crate::logic::error::{Stage, TriageError};
use super::layout::{
    FEATURE_CARDINALITY, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION,
    layout_hash, validate_layout,
};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
///
/// Mọi giá trị là category code (0..cardinality) theo FEATURE_LAYOUT.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values with current version
    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Build from a dataset row, rejecting wrong length or out-of-range codes
    pub fn from_row(row: &[f32]) -> Result<Self, TriageError> {
        if row.len() != FEATURE_COUNT {
            return Err(TriageError::ModelSchemaMismatch {
                stage: Stage::Training,
                context: "dataset row".to_string(),
                expected: format!("{} features", FEATURE_COUNT),
                actual: format!("{} features", row.len()),
            });
        }

        let mut values = [0.0f32; FEATURE_COUNT];
        for (i, v) in row.iter().enumerate() {
            check_code(i, *v)?;
            values[i] = *v;
        }
        Ok(Self::from_values(values))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), TriageError> {
        validate_layout(Stage::Inference, "feature vector", self.version, self.layout_hash)
    }
}

/// Check that `value` is an integral category code for feature `index`
pub fn check_code(index: usize, value: f32) -> Result<(), TriageError> {
    let cardinality = FEATURE_CARDINALITY[index] as f32;
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value >= cardinality {
        return Err(TriageError::Encoding {
            field: FEATURE_LAYOUT[index],
            reason: format!("code {} outside 0..{}", value, cardinality),
        });
    }
    Ok(())
}

