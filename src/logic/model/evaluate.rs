//! Model Evaluation - k-fold cross-validation
//!
//! Metrics tính trên prediction out-of-fold tại ngưỡng 0.5.

use log::info;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use crate::logic::dataset::TrainingSet;
use crate::logic::error::TriageError;
use super::forest::{ForestConfig, RandomForest};

pub const DEFAULT_FOLDS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub folds: usize,
    pub fold_accuracy: Vec<f64>,
    pub cv_mean: f64,
    pub cv_std: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// [[tn, fp], [fn, tp]]
    pub confusion_matrix: [[usize; 2]; 2],
}

pub fn cross_validate(
    data: &TrainingSet,
    config: &ForestConfig,
    folds: usize,
) -> Result<EvaluationReport, TriageError> {
    if folds < 2 || folds > data.len() {
        return Err(TriageError::Config(format!(
            "folds must be within 2..={}, got {}",
            data.len(),
            folds
        )));
    }

    let mut order: Vec<usize> = (0..data.len()).collect();
    order.shuffle(&mut ChaCha8Rng::seed_from_u64(config.seed));

    let mut fold_accuracy = Vec::with_capacity(folds);
    let mut confusion = [[0usize; 2]; 2];

    for fold in 0..folds {
        let mut test = Vec::new();
        let mut train = Vec::new();
        for (pos, &row) in order.iter().enumerate() {
            if pos % folds == fold {
                test.push(row);
            } else {
                train.push(row);
            }
        }

        let forest = RandomForest::fit(&data.select(&train), config)?;

        let mut correct = 0usize;
        for &row in &test {
            let x = data.row(row).to_vec();
            let predicted = if forest.predict_proba(&x) >= 0.5 { 1 } else { 0 };
            let actual = data.labels[row] as usize;
            confusion[actual][predicted] += 1;
            if predicted == actual {
                correct += 1;
            }
        }

        let accuracy = correct as f64 / test.len() as f64;
        info!("Fold {}/{}: accuracy {:.4}", fold + 1, folds, accuracy);
        fold_accuracy.push(accuracy);
    }

    let cv_mean = fold_accuracy.iter().sum::<f64>() / folds as f64;
    let cv_std = (fold_accuracy.iter().map(|a| (a - cv_mean).powi(2)).sum::<f64>() / folds as f64).sqrt();

    let tp = confusion[1][1] as f64;
    let fp = confusion[0][1] as f64;
    let fn_ = confusion[1][0] as f64;

    let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
    let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
    let f1_score = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Ok(EvaluationReport {
        folds,
        fold_accuracy,
        cv_mean,
        cv_std,
        precision,
        recall,
        f1_score,
        confusion_matrix: confusion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::synthesize;

    #[test]
    fn test_cross_validation_report() {
        let data = synthesize(2).unwrap();
        let config = ForestConfig { n_trees: 3, ..ForestConfig::default() };
        let report = cross_validate(&data, &config, 3).unwrap();

        assert_eq!(report.fold_accuracy.len(), 3);
        assert!(report.cv_mean > 0.5);
        assert!((0.0..=1.0).contains(&report.precision));
        assert!((0.0..=1.0).contains(&report.recall));

        let total: usize = report.confusion_matrix.iter().flatten().sum();
        assert_eq!(total, data.len());
    }

    #[test]
    fn test_fold_count_validated() {
        let data = synthesize(1).unwrap();
        let config = ForestConfig::default();
        assert!(cross_validate(&data, &config, 1).is_err());
        assert!(cross_validate(&data, &config, data.len() + 1).is_err());
    }
}
