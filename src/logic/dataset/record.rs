use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use crate::logic::error::TriageError;
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

/// Labeled training data: one row per example, columns in FEATURE_LAYOUT order
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub features: Array2<f32>,
    /// 1 = viable presence, 0 = not
    pub labels: Vec<u8>,
}

impl TrainingSet {
    pub fn new(features: Array2<f32>, labels: Vec<u8>) -> Result<Self, TriageError> {
        if features.ncols() != FEATURE_COUNT {
            return Err(TriageError::Training(format!(
                "feature matrix has {} columns, layout has {}",
                features.ncols(),
                FEATURE_COUNT
            )));
        }
        if features.nrows() != labels.len() {
            return Err(TriageError::Training(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        if let Some(bad) = labels.iter().find(|l| **l > 1) {
            return Err(TriageError::Training(format!("label {} is not binary", bad)));
        }

        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|l| **l == 1).count()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f32> {
        self.features.row(index)
    }

    /// Row as a versioned vector (for inference over training data)
    pub fn vector(&self, index: usize) -> Result<FeatureVector, TriageError> {
        let row: Vec<f32> = self.row(index).to_vec();
        FeatureVector::from_row(&row)
    }

    /// Subset by row indices (k-fold splits)
    pub fn select(&self, indices: &[usize]) -> TrainingSet {
        TrainingSet {
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

/// Summary printed by the CLI after loading or synthesizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub positives: usize,
    pub negatives: usize,
}

impl From<&TrainingSet> for DatasetSummary {
    fn from(set: &TrainingSet) -> Self {
        let positives = set.positives();
        Self {
            rows: set.len(),
            positives,
            negatives: set.len() - positives,
        }
    }
}
