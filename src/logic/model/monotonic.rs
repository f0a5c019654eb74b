//! Monotonicity Audit
//!
//! Quét toàn bộ grid: tăng một bậc presence / motion / heat / breathing (giữ nguyên phần còn lại)
//! không được làm giảm xác suất. Vi phạm chỉ được log + report, model vẫn dùng được.

use log::warn;
use serde::{Deserialize, Serialize};
use crate::logic::features::{grid, FEATURE_CARDINALITY, FEATURE_COUNT, FEATURE_LAYOUT};
use super::inference::ClassifierModel;

/// Features where more signal must never mean less confidence
pub const MONOTONE_FEATURES: [usize; 4] = [0, 1, 2, 3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonotonicityViolation {
    pub feature: String,
    pub lower: [f32; FEATURE_COUNT],
    pub p_lower: f64,
    pub p_higher: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonotonicityReport {
    pub pairs_checked: usize,
    pub violations: Vec<MonotonicityViolation>,
}

impl MonotonicityReport {
    pub fn is_monotone(&self) -> bool {
        self.violations.is_empty()
    }
}

pub fn audit_monotonicity(model: &ClassifierModel) -> MonotonicityReport {
    let mut report = MonotonicityReport::default();

    for cell in grid() {
        let p_lower = model.forest.predict_proba(&cell);

        for &feature in &MONOTONE_FEATURES {
            let code = cell[feature] as usize;
            if code + 1 >= FEATURE_CARDINALITY[feature] {
                continue;
            }

            let mut higher = cell;
            higher[feature] += 1.0;
            let p_higher = model.forest.predict_proba(&higher);
            report.pairs_checked += 1;

            if p_higher < p_lower {
                report.violations.push(MonotonicityViolation {
                    feature: FEATURE_LAYOUT[feature].to_string(),
                    lower: cell,
                    p_lower,
                    p_higher,
                });
            }
        }
    }

    if !report.is_monotone() {
        warn!(
            "Model {} is not monotone: {} of {} single-step increases lower the probability",
            model.model_id,
            report.violations.len(),
            report.pairs_checked
        );
    }

    report
}
