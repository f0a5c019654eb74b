//! Explanation Types - Factor, FactorKind, ExplainInput, ExplanationTrace

use serde::{Deserialize, Serialize};
use crate::logic::confidence::ConfidenceLevel;
use crate::logic::urgency::{DecisionStep, EnvironmentRisk, UrgencyLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    ConfidenceBasis,
    BaseUrgency,
    RiskEscalation,
    RiskSuppressed,
    CeilingCap,
    NoEscalation,
}

impl FactorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorKind::ConfidenceBasis => "confidence_basis",
            FactorKind::BaseUrgency => "base_urgency",
            FactorKind::RiskEscalation => "risk_escalation",
            FactorKind::RiskSuppressed => "risk_suppressed",
            FactorKind::CeilingCap => "ceiling_cap",
            FactorKind::NoEscalation => "no_escalation",
        }
    }
}

/// One contributing factor: what was considered and what it did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub kind: FactorKind,
    pub name: String,
    pub effect: String,
}

/// Decisions already made upstream; the builder only narrates them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainInput {
    pub confidence: ConfidenceLevel,
    pub probability: f32,
    pub risk: EnvironmentRisk,
    pub base_urgency: UrgencyLevel,
    pub final_urgency: UrgencyLevel,
    pub steps: Vec<DecisionStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationTrace {
    /// In application order
    pub factors: Vec<Factor>,
    pub summary: String,
}
