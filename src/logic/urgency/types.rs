//! Urgency Types
//!
//! Core types cho urgency decision.
//! KHÔNG chứa logic - chỉ data structures.

use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::logic::error::{Stage, TriageError};

// ============================================================================
// URGENCY LEVEL
// ============================================================================

/// Final urgency tier an operator acts on (ordered)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    /// Không cần điều đội
    None,
    /// Điều đội theo thứ tự thông thường
    Moderate,
    /// Ưu tiên cao
    High,
    /// Cứu ngay lập tức
    Critical,
}

impl UrgencyLevel {
    pub const ALL: [UrgencyLevel; 4] = [
        UrgencyLevel::None,
        UrgencyLevel::Moderate,
        UrgencyLevel::High,
        UrgencyLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::None => "NONE",
            UrgencyLevel::Moderate => "MODERATE",
            UrgencyLevel::High => "HIGH",
            UrgencyLevel::Critical => "CRITICAL",
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            UrgencyLevel::None => 0,
            UrgencyLevel::Moderate => 1,
            UrgencyLevel::High => 2,
            UrgencyLevel::Critical => 3,
        }
    }

    /// One tier up; None at the ceiling
    pub fn next(&self) -> Option<UrgencyLevel> {
        match self {
            UrgencyLevel::None => Some(UrgencyLevel::Moderate),
            UrgencyLevel::Moderate => Some(UrgencyLevel::High),
            UrgencyLevel::High => Some(UrgencyLevel::Critical),
            UrgencyLevel::Critical => None,
        }
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UrgencyLevel::ALL
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TriageError::InvalidEnumValue {
                stage: Stage::Decision,
                field: "urgency_level",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// ENVIRONMENT RISK
// ============================================================================

/// Hazard context at the site (structural instability, fire, gas, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvironmentRisk {
    Low,
    Medium,
    High,
}

impl EnvironmentRisk {
    pub const ALL: [EnvironmentRisk; 3] = [
        EnvironmentRisk::Low,
        EnvironmentRisk::Medium,
        EnvironmentRisk::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentRisk::Low => "LOW",
            EnvironmentRisk::Medium => "MEDIUM",
            EnvironmentRisk::High => "HIGH",
        }
    }
}

impl std::fmt::Display for EnvironmentRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EnvironmentRisk {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnvironmentRisk::ALL
            .iter()
            .copied()
            .find(|risk| risk.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TriageError::InvalidEnumValue {
                stage: Stage::Decision,
                field: "environment_risk",
                value: s.to_string(),
            })
    }
}

impl TryFrom<u8> for EnvironmentRisk {
    type Error = TriageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        EnvironmentRisk::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| TriageError::InvalidEnumValue {
                stage: Stage::Decision,
                field: "environment_risk",
                value: value.to_string(),
            })
    }
}

// ============================================================================
// DECISION STEP (factor trace)
// ============================================================================

/// One rule applied on top of the base urgency, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum DecisionStep {
    /// No victim signal: hazard alone does not raise urgency
    Suppressed { risk: EnvironmentRisk },
    /// Risk raised urgency by one tier
    Escalated {
        risk: EnvironmentRisk,
        from: UrgencyLevel,
        to: UrgencyLevel,
    },
    /// Escalation requested at the ceiling
    Capped { risk: EnvironmentRisk },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_stops_at_ceiling() {
        assert_eq!(UrgencyLevel::Moderate.next(), Some(UrgencyLevel::High));
        assert_eq!(UrgencyLevel::Critical.next(), None);
    }

    #[test]
    fn test_risk_parsing() {
        assert_eq!("high".parse::<EnvironmentRisk>().unwrap(), EnvironmentRisk::High);
        assert_eq!(EnvironmentRisk::try_from(1).unwrap(), EnvironmentRisk::Medium);

        let err = "SEVERE".parse::<EnvironmentRisk>().unwrap_err();
        assert!(matches!(err, TriageError::InvalidEnumValue { field: "environment_risk", .. }));
        assert!(err.is_fatal());
        assert!(EnvironmentRisk::try_from(3).is_err());
    }

    #[test]
    fn test_step_json_shape() {
        let step = DecisionStep::Escalated {
            risk: EnvironmentRisk::High,
            from: UrgencyLevel::Moderate,
            to: UrgencyLevel::High,
        };
        let json = serde_json::to_value(step).unwrap();
        assert_eq!(json["step"], "escalated");
        assert_eq!(json["to"], "HIGH");
    }
}
