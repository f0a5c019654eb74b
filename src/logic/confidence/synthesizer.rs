//! Confidence Synthesizer
//!
//! CHỈ chứa logic map xác suất → level.
//! Input: ClassifierOutput
//! Output: (ConfidenceLevel, probability)

use crate::logic::error::TriageError;
use crate::logic::model::ClassifierOutput;
use super::rules::ConfidenceThresholds;
use super::types::ConfidenceLevel;

/// Synthesize with default thresholds
pub fn synthesize(output: &ClassifierOutput) -> Result<(ConfidenceLevel, f32), TriageError> {
    synthesize_with_thresholds(output, &ConfidenceThresholds::default())
}

pub fn synthesize_with_thresholds(
    output: &ClassifierOutput,
    thresholds: &ConfidenceThresholds,
) -> Result<(ConfidenceLevel, f32), TriageError> {
    let p = output.positive();
    Ok((level_for(p, thresholds)?, p))
}

/// Total, monotone partition of [0, 1]
pub fn level_for(p: f32, thresholds: &ConfidenceThresholds) -> Result<ConfidenceLevel, TriageError> {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return Err(TriageError::InvalidOutput(format!(
            "probability {} outside [0, 1]",
            p
        )));
    }

    let level = if p < thresholds.low {
        ConfidenceLevel::None
    } else if p < thresholds.moderate {
        ConfidenceLevel::Low
    } else if p < thresholds.high {
        ConfidenceLevel::Moderate
    } else if p < thresholds.critical {
        ConfidenceLevel::High
    } else {
        ConfidenceLevel::Critical
    };

    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn output(p: f32) -> ClassifierOutput {
        ClassifierOutput::new([1.0 - p, p], Uuid::nil()).unwrap()
    }

    #[test]
    fn test_boundaries() {
        let t = ConfidenceThresholds::default();
        assert_eq!(level_for(0.0, &t).unwrap(), ConfidenceLevel::None);
        assert_eq!(level_for(0.149, &t).unwrap(), ConfidenceLevel::None);
        assert_eq!(level_for(0.15, &t).unwrap(), ConfidenceLevel::Low);
        assert_eq!(level_for(0.40, &t).unwrap(), ConfidenceLevel::Moderate);
        assert_eq!(level_for(0.55, &t).unwrap(), ConfidenceLevel::Moderate);
        assert_eq!(level_for(0.70, &t).unwrap(), ConfidenceLevel::High);
        assert_eq!(level_for(0.90, &t).unwrap(), ConfidenceLevel::Critical);
        assert_eq!(level_for(1.0, &t).unwrap(), ConfidenceLevel::Critical);
    }

    #[test]
    fn test_partition_is_total_and_monotone() {
        let t = ConfidenceThresholds::default();
        let mut previous = ConfidenceLevel::None;
        for i in 0..=1000 {
            let level = level_for(i as f32 / 1000.0, &t).unwrap();
            assert!(level >= previous);
            previous = level;
        }
        assert_eq!(previous, ConfidenceLevel::Critical);
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let t = ConfidenceThresholds::default();
        assert!(matches!(level_for(f32::NAN, &t), Err(TriageError::InvalidOutput(_))));
        assert!(level_for(1.01, &t).is_err());
        assert!(level_for(-0.01, &t).is_err());
    }

    #[test]
    fn test_synthesize_returns_probability() {
        let (level, p) = synthesize(&output(0.95)).unwrap();
        assert_eq!(level, ConfidenceLevel::Critical);
        assert!((p - 0.95).abs() < 1e-6);
    }
}
