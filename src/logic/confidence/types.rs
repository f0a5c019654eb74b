//! Confidence Types
//!
//! KHÔNG chứa logic - chỉ data structures.

use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::logic::error::{Stage, TriageError};

/// Categorical confidence that a viable human has been detected (ordered)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    /// Không có tín hiệu nạn nhân đáng tin
    None,
    Low,
    Moderate,
    High,
    /// Gần như chắc chắn có người sống
    Critical,
}

impl ConfidenceLevel {
    pub const ALL: [ConfidenceLevel; 5] = [
        ConfidenceLevel::None,
        ConfidenceLevel::Low,
        ConfidenceLevel::Moderate,
        ConfidenceLevel::High,
        ConfidenceLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::None => "NONE",
            ConfidenceLevel::Low => "LOW",
            ConfidenceLevel::Moderate => "MODERATE",
            ConfidenceLevel::High => "HIGH",
            ConfidenceLevel::Critical => "CRITICAL",
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            ConfidenceLevel::None => 0,
            ConfidenceLevel::Low => 1,
            ConfidenceLevel::Moderate => 2,
            ConfidenceLevel::High => 3,
            ConfidenceLevel::Critical => 4,
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfidenceLevel::ALL
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TriageError::InvalidEnumValue {
                stage: Stage::Decision,
                field: "confidence_level",
                value: s.to_string(),
            })
    }
}

impl TryFrom<u8> for ConfidenceLevel {
    type Error = TriageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ConfidenceLevel::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| TriageError::InvalidEnumValue {
                stage: Stage::Decision,
                field: "confidence_level",
                value: value.to_string(),
            })
    }
}
