//! Synthetic Training Data
//!
//! Sinh dataset có nhãn, phủ toàn bộ grid categorical, từ một prior cộng dồn trên logit.
//! Mỗi cell có đúng `rows_per_cell` dòng, trong đó round(p * rows_per_cell) là positive.
//! Deterministic: không dùng RNG.

use log::info;
use ndarray::Array2;
use crate::logic::error::TriageError;
use crate::logic::features::{grid, FEATURE_COUNT};
use super::record::TrainingSet;

pub const DEFAULT_ROWS_PER_CELL: usize = 20;

/// Additive evidence weights on the logit scale, indexed by category code
#[derive(Debug, Clone, PartialEq)]
pub struct EvidencePrior {
    pub bias: f64,
    pub presence: [f64; 2],
    pub motion: [f64; 4],
    pub heat: [f64; 4],
    pub breathing: [f64; 3],
    pub debris: [f64; 3],
    pub signal: [f64; 3],
}

impl Default for EvidencePrior {
    fn default() -> Self {
        Self {
            bias: -4.5,
            presence: [0.0, 2.0],
            motion: [0.0, 0.3, 0.55, 0.8],
            // body heat well above ambient is the strongest trapped-survivor cue
            heat: [0.0, 0.5, 1.0, 5.4],
            breathing: [0.0, 0.3, 0.6],
            debris: [0.0, -0.3, -0.6],
            signal: [-0.4, 0.0, 0.3],
        }
    }
}

impl EvidencePrior {
    /// Logit for one cell of category codes
    ///
    /// Motion, heat và breathing chỉ là bằng chứng nạn nhân khi presence đã được phát hiện;
    /// không có presence thì nhiệt (cháy, máy móc) chỉ là nhiễu.
    pub fn logit(&self, codes: &[f32; FEATURE_COUNT]) -> f64 {
        let c = |i: usize| codes[i] as usize;
        let vital = if c(0) == 1 {
            self.motion[c(1)] + self.heat[c(2)] + self.breathing[c(3)]
        } else {
            0.0
        };
        self.bias + self.presence[c(0)] + vital + self.debris[c(4)] + self.signal[c(5)]
    }

    pub fn probability(&self, codes: &[f32; FEATURE_COUNT]) -> f64 {
        1.0 / (1.0 + (-self.logit(codes)).exp())
    }

    /// Number of positive rows for a cell of `rows_per_cell`
    pub fn positives(&self, codes: &[f32; FEATURE_COUNT], rows_per_cell: usize) -> usize {
        (self.probability(codes) * rows_per_cell as f64).round() as usize
    }
}

/// Synthesize the default training set
pub fn synthesize(rows_per_cell: usize) -> Result<TrainingSet, TriageError> {
    synthesize_with(&EvidencePrior::default(), rows_per_cell)
}

pub fn synthesize_with(prior: &EvidencePrior, rows_per_cell: usize) -> Result<TrainingSet, TriageError> {
    if rows_per_cell == 0 {
        return Err(TriageError::Training("rows_per_cell must be at least 1".to_string()));
    }

    let cells = grid();
    let rows = cells.len() * rows_per_cell;
    let mut values = Vec::with_capacity(rows * FEATURE_COUNT);
    let mut labels = Vec::with_capacity(rows);

    for cell in &cells {
        let positives = prior.positives(cell, rows_per_cell);
        for r in 0..rows_per_cell {
            values.extend_from_slice(cell);
            labels.push(if r < positives { 1 } else { 0 });
        }
    }

    let features = Array2::from_shape_vec((rows, FEATURE_COUNT), values)
        .map_err(|e| TriageError::Training(format!("feature matrix shape: {}", e)))?;

    let set = TrainingSet::new(features, labels)?;
    info!(
        "Synthesized {} rows ({} positive) over {} cells",
        set.len(),
        set.positives(),
        cells.len()
    );
    Ok(set)
}
