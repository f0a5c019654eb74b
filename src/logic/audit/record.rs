use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::logic::confidence::ConfidenceLevel;
use crate::logic::pipeline::UrgencyResult;
use crate::logic::sensor::SensorReading;
use crate::logic::urgency::EnvironmentRisk;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub recorded_at: DateTime<Utc>,

    // Provenance
    pub model_id: Uuid,
    pub feature_version: u8,
    pub layout_hash: u32,

    // Input
    pub reading: SensorReading,
    pub environment_risk: EnvironmentRisk,

    // Stage 1
    pub confidence_level: ConfidenceLevel,
    pub probability: f32,

    // Stage 2
    pub result: UrgencyResult,
}
