//! Sensor Input Validation
//!
//! Raw JSON reading (field nào cũng có thể thiếu / sai type) → SensorReading.
//! Core chỉ nhận SensorReading đã validate; mọi lỗi ở đây là ValidationError.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::logic::error::TriageError;
use super::types::{AuxMeasurements, Breathing, DebrisCover, HeatSignature, MotionLevel, SensorReading};

/// Untrusted reading as it arrives from the field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSensorReading {
    #[serde(default, alias = "human_detected")]
    pub presence: Option<Value>,
    #[serde(default, alias = "motion")]
    pub motion_level: Option<Value>,
    #[serde(default, alias = "heat_presence", alias = "heat")]
    pub heat_signature: Option<Value>,
    #[serde(default, alias = "breathing_detected")]
    pub breathing: Option<Value>,
    #[serde(default)]
    pub debris_cover: Option<Value>,
    #[serde(default)]
    pub signal_quality: Option<Value>,
}

impl RawSensorReading {
    pub fn from_json(json: &str) -> Result<Self, TriageError> {
        serde_json::from_str(json)
            .map_err(|e| TriageError::validation("reading", format!("malformed JSON: {}", e)))
    }
}

/// Validate every field and build the typed reading
pub fn validate(raw: &RawSensorReading) -> Result<SensorReading, TriageError> {
    let result = validate_inner(raw);

    match &result {
        Ok(_) => debug!("Sensor data validation passed"),
        Err(e) => warn!("Validation failed: {}", e),
    }

    result
}

fn validate_inner(raw: &RawSensorReading) -> Result<SensorReading, TriageError> {
    let missing: Vec<&str> = [
        ("presence", raw.presence.is_none()),
        ("motion_level", raw.motion_level.is_none()),
        ("heat_signature", raw.heat_signature.is_none()),
        ("breathing", raw.breathing.is_none()),
    ]
    .iter()
    .filter(|(_, absent)| *absent)
    .map(|(name, _)| *name)
    .collect();

    if !missing.is_empty() {
        return Err(TriageError::validation(
            missing.join(", "),
            "missing required field",
        ));
    }

    let presence = match &raw.presence {
        Some(Value::Bool(b)) => *b,
        _ => return Err(TriageError::validation("presence", "must be boolean")),
    };

    let motion: MotionLevel = parse_literal("motion_level", raw.motion_level.as_ref())?;
    let heat: HeatSignature = parse_literal("heat_signature", raw.heat_signature.as_ref())?;
    let breathing: Breathing = parse_literal("breathing", raw.breathing.as_ref())?;

    let mut aux = AuxMeasurements::default();

    if raw.debris_cover.is_some() {
        aux.debris_cover = parse_literal::<DebrisCover>("debris_cover", raw.debris_cover.as_ref())?;
    }

    if let Some(value) = &raw.signal_quality {
        let quality = value
            .as_f64()
            .ok_or_else(|| TriageError::validation("signal_quality", "must be a number"))?;
        if !(0.0..=1.0).contains(&quality) {
            return Err(TriageError::validation(
                "signal_quality",
                format!("must be within [0, 1], got {}", quality),
            ));
        }
        aux.signal_quality = quality as f32;
    }

    Ok(SensorReading {
        presence,
        motion,
        heat,
        breathing,
        aux,
    })
}

fn parse_literal<T>(field: &str, value: Option<&Value>) -> Result<T, TriageError>
where
    T: std::str::FromStr<Err = TriageError>,
{
    let literal = value
        .and_then(Value::as_str)
        .ok_or_else(|| TriageError::validation(field, "must be a string literal"))?;

    literal.parse::<T>().map_err(|_| {
        TriageError::validation(field, format!("unrecognized value {:?}", literal))
    })
}

// ============================================================================
// TESTS
// ============================================================================
