//! Inference - Victim-presence classifier
//!
//! ClassifierModel là read-only sau khi load: nhiều request có thể infer song song
//! trên cùng một `Arc<ClassifierModel>`.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::logic::dataset::TrainingSet;
use crate::logic::error::{Stage, TriageError};
use crate::logic::features::{layout_hash, FeatureVector, FEATURE_VERSION};
use super::forest::{ForestConfig, RandomForest};

/// Tolerance for the probability-sum invariant
pub const PROBABILITY_TOLERANCE: f32 = 1e-4;

// ============================================================================
// CLASSIFIER OUTPUT
// ============================================================================

/// Binary distribution: [P(not viable), P(viable presence)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub probabilities: [f32; 2],
    pub model_id: Uuid,
}

impl ClassifierOutput {
    pub fn new(probabilities: [f32; 2], model_id: Uuid) -> Result<Self, TriageError> {
        if probabilities.iter().any(|p| p.is_nan() || !(0.0..=1.0).contains(p)) {
            return Err(TriageError::InvalidOutput(format!(
                "probabilities {:?} outside [0, 1]",
                probabilities
            )));
        }

        let sum = probabilities[0] + probabilities[1];
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(TriageError::InvalidOutput(format!(
                "probabilities {:?} sum to {}",
                probabilities, sum
            )));
        }

        Ok(Self { probabilities, model_id })
    }

    /// Probability of viable presence
    pub fn positive(&self) -> f32 {
        self.probabilities[1]
    }
}

// ============================================================================
// CLASSIFIER MODEL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierModel {
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub forest: RandomForest,
}

impl ClassifierModel {
    /// Train a fresh model against the current feature layout
    pub fn train(data: &TrainingSet, config: &ForestConfig) -> Result<Self, TriageError> {
        let forest = RandomForest::fit(data, config)?;

        Ok(Self {
            model_id: Uuid::new_v4(),
            trained_at: Utc::now(),
            training_rows: data.len(),
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            forest,
        })
    }

    /// Run inference on one encoded reading
    pub fn infer(&self, vector: &FeatureVector) -> Result<ClassifierOutput, TriageError> {
        if vector.version != self.feature_version || vector.layout_hash != self.layout_hash {
            return Err(TriageError::ModelSchemaMismatch {
                stage: Stage::Inference,
                context: format!("vector vs model {}", self.model_id),
                expected: format!("v{} (hash: {:08x})", self.feature_version, self.layout_hash),
                actual: format!("v{} (hash: {:08x})", vector.version, vector.layout_hash),
            });
        }
        vector.validate()?;

        let p = self.forest.predict_proba(vector.as_slice()) as f32;
        debug!("Model {} inferred p={:.4} for {:?}", self.model_id, p, vector.values);

        ClassifierOutput::new([1.0 - p, p], self.model_id)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::synthesize;

    fn model() -> ClassifierModel {
        let config = ForestConfig { n_trees: 4, ..ForestConfig::default() };
        ClassifierModel::train(&synthesize(20).unwrap(), &config).unwrap()
    }

    #[test]
    fn test_output_sums_to_one() {
        let model = model();
        let vector = FeatureVector::from_values([1.0, 3.0, 2.0, 2.0, 0.0, 2.0]);
        let output = model.infer(&vector).unwrap();

        let sum: f32 = output.probabilities.iter().sum();
        assert!((sum - 1.0).abs() <= PROBABILITY_TOLERANCE);
        assert!((output.positive() - 0.55).abs() < 1e-6);
        assert_eq!(output.model_id, model.model_id);
    }

    #[test]
    fn test_infer_is_deterministic() {
        let model = model();
        let vector = FeatureVector::from_values([1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(model.infer(&vector).unwrap(), model.infer(&vector).unwrap());
    }

    #[test]
    fn test_foreign_vector_is_schema_mismatch() {
        let model = model();
        let mut vector = FeatureVector::from_values([0.0; 6]);
        vector.layout_hash ^= 0xFFFF;

        let err = model.infer(&vector).unwrap_err();
        assert!(matches!(err, TriageError::ModelSchemaMismatch { stage: Stage::Inference, .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_invalid_output_rejected() {
        assert!(ClassifierOutput::new([0.2, 0.2], Uuid::nil()).is_err());
        assert!(ClassifierOutput::new([f32::NAN, 1.0], Uuid::nil()).is_err());
        assert!(ClassifierOutput::new([-0.5, 1.5], Uuid::nil()).is_err());
        assert!(ClassifierOutput::new([0.25, 0.75], Uuid::nil()).is_ok());
    }
}
