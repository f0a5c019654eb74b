//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! Encoder, training dataset và model artifact đều đọc layout từ đây.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Change a category code or band cutoff → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use crate::logic::error::{Stage, TriageError};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Primary signals (0-3) ===
    "presence",             // 0: 0 / 1
    "motion_level",         // 1: NONE 0, LOW 1, MEDIUM 2, HIGH 3
    "heat_signature",       // 2: NONE 0, LOW 1, NORMAL 2, HIGH 3
    "breathing",            // 3: NO 0, UNKNOWN 1, YES 2

    // === Auxiliary (4-5) ===
    "debris_cover",         // 4: OPEN 0, PARTIAL 1, BURIED 2
    "signal_quality_band",  // 5: POOR 0, FAIR 1, GOOD 2
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 6;

/// Number of distinct values each feature can take (same order as FEATURE_LAYOUT)
pub const FEATURE_CARDINALITY: [usize; FEATURE_COUNT] = [2, 4, 4, 3, 3, 3];

/// Signal quality below this is POOR
pub const SIGNAL_POOR_BELOW: f32 = 0.40;
/// Signal quality below this (and not POOR) is FAIR, otherwise GOOD
pub const SIGNAL_FAIR_BELOW: f32 = 0.75;

/// Size of the full categorical grid
pub fn grid_size() -> usize {
    FEATURE_CARDINALITY.iter().product()
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for (name, cardinality) in FEATURE_LAYOUT.iter().zip(FEATURE_CARDINALITY.iter()) {
        hasher.update(name.as_bytes());
        hasher.update(&[*cardinality as u8]);
        hasher.update(&[0]); // Separator
    }

    hasher.update(&SIGNAL_POOR_BELOW.to_le_bytes());
    hasher.update(&SIGNAL_FAIR_BELOW.to_le_bytes());

    hasher.finalize()
}

pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Validate that incoming data matches current layout
///
/// `context` nói rõ dữ liệu đến từ đâu (vector, artifact, dataset) để operator biết chỗ lệch.
pub fn validate_layout(
    stage: Stage,
    context: &str,
    incoming_version: u8,
    incoming_hash: u32,
) -> Result<(), TriageError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(TriageError::ModelSchemaMismatch {
            stage,
            context: context.to_string(),
            expected: format!("v{} (hash: {:08x})", FEATURE_VERSION, current_hash),
            actual: format!("v{} (hash: {:08x})", incoming_version, incoming_hash),
        });
    }

    Ok(())
}

/// Check if layout is compatible (same version, same hash)
pub fn is_layout_compatible(version: u8, hash: u32) -> bool {
    version == FEATURE_VERSION && hash == layout_hash()
}

/// Validate a dataset header against the layout (features then `label`)
pub fn validate_header(header: &[&str]) -> Result<(), TriageError> {
    let expected: Vec<&str> = FEATURE_LAYOUT
        .iter()
        .copied()
        .chain(std::iter::once(LABEL_COLUMN))
        .collect();

    if header != expected.as_slice() {
        return Err(TriageError::ModelSchemaMismatch {
            stage: Stage::Training,
            context: "dataset header".to_string(),
            expected: expected.join(","),
            actual: header.join(","),
        });
    }

    Ok(())
}

/// Name of the label column in training data
pub const LABEL_COLUMN: &str = "label";

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_CARDINALITY.len(), FEATURE_COUNT);
        assert_eq!(grid_size(), 864);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(Stage::Inference, "vector", FEATURE_VERSION, layout_hash()).is_ok());

        let err = validate_layout(Stage::ModelLoad, "artifact", FEATURE_VERSION + 1, layout_hash())
            .unwrap_err();
        assert!(matches!(err, TriageError::ModelSchemaMismatch { stage: Stage::ModelLoad, .. }));

        assert!(validate_layout(Stage::Inference, "vector", FEATURE_VERSION, layout_hash() ^ 1).is_err());
    }

    #[test]
    fn test_validate_header() {
        let good = ["presence", "motion_level", "heat_signature", "breathing",
                    "debris_cover", "signal_quality_band", "label"];
        assert!(validate_header(&good).is_ok());

        let reordered = ["motion_level", "presence", "heat_signature", "breathing",
                         "debris_cover", "signal_quality_band", "label"];
        assert!(validate_header(&reordered).is_err());

        assert!(validate_header(&good[..6]).is_err());
    }
}
