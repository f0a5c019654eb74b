//! Urgency Policy
//!
//! Base map confidence → urgency. KHÔNG chứa logic escalation - chỉ config + validation.
//!
//! ## Invariants (validate() enforces):
//! - Mọi confidence level đều có base urgency
//! - Base map monotone (confidence cao hơn ⇒ urgency không thấp hơn)
//! - NONE → NONE, CRITICAL → CRITICAL

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::logic::confidence::ConfidenceLevel;
use crate::logic::error::{Stage, TriageError};
use super::types::UrgencyLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyPolicy {
    pub base: BTreeMap<ConfidenceLevel, UrgencyLevel>,
}

impl Default for UrgencyPolicy {
    fn default() -> Self {
        let base = BTreeMap::from([
            (ConfidenceLevel::None, UrgencyLevel::None),
            // a plausible victim is never silently ignored
            (ConfidenceLevel::Low, UrgencyLevel::Moderate),
            (ConfidenceLevel::Moderate, UrgencyLevel::Moderate),
            (ConfidenceLevel::High, UrgencyLevel::High),
            (ConfidenceLevel::Critical, UrgencyLevel::Critical),
        ]);
        Self { base }
    }
}

impl UrgencyPolicy {
    /// Base urgency for a confidence level; a gap in the map fails closed
    pub fn base_urgency(&self, confidence: ConfidenceLevel) -> Result<UrgencyLevel, TriageError> {
        self.base
            .get(&confidence)
            .copied()
            .ok_or_else(|| TriageError::InvalidEnumValue {
                stage: Stage::Decision,
                field: "confidence_level",
                value: confidence.to_string(),
            })
    }

    pub fn validate(&self) -> Result<(), TriageError> {
        let mut previous = UrgencyLevel::None;

        for level in ConfidenceLevel::ALL {
            let urgency = self.base.get(&level).copied().ok_or_else(|| {
                TriageError::Config(format!("urgency policy has no base urgency for {}", level))
            })?;

            if urgency < previous {
                return Err(TriageError::Config(format!(
                    "urgency policy is not monotone: {} maps to {} below {}",
                    level, urgency, previous
                )));
            }
            previous = urgency;
        }

        if self.base.get(&ConfidenceLevel::None) != Some(&UrgencyLevel::None) {
            return Err(TriageError::Config(
                "NONE confidence must map to NONE urgency".to_string(),
            ));
        }
        if self.base.get(&ConfidenceLevel::Critical) != Some(&UrgencyLevel::Critical) {
            return Err(TriageError::Config(
                "CRITICAL confidence must map to CRITICAL urgency".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_valid() {
        assert!(UrgencyPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_incomplete_policy_rejected() {
        let mut policy = UrgencyPolicy::default();
        policy.base.remove(&ConfidenceLevel::High);
        assert!(matches!(policy.validate(), Err(TriageError::Config(_))));
        assert!(matches!(
            policy.base_urgency(ConfidenceLevel::High),
            Err(TriageError::InvalidEnumValue { stage: Stage::Decision, .. })
        ));
    }

    #[test]
    fn test_non_monotone_policy_rejected() {
        let mut policy = UrgencyPolicy::default();
        policy.base.insert(ConfidenceLevel::High, UrgencyLevel::None);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_policy_json_keys() {
        let json = serde_json::to_value(UrgencyPolicy::default()).unwrap();
        assert_eq!(json["base"]["LOW"], "MODERATE");
    }
}
