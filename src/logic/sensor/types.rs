//! Sensor Types
//!
//! Typed, already-validated sensor reading.
//! KHÔNG chứa logic - chỉ data structures.

use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::logic::error::{Stage, TriageError};

// ============================================================================
// MOTION
// ============================================================================

/// Motion level reported by the motion sensor (ordered)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MotionLevel {
    None,
    Low,
    Medium,
    High,
}

impl MotionLevel {
    pub const ALL: [MotionLevel; 4] = [
        MotionLevel::None,
        MotionLevel::Low,
        MotionLevel::Medium,
        MotionLevel::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MotionLevel::None => "NONE",
            MotionLevel::Low => "LOW",
            MotionLevel::Medium => "MEDIUM",
            MotionLevel::High => "HIGH",
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            MotionLevel::None => 0,
            MotionLevel::Low => 1,
            MotionLevel::Medium => 2,
            MotionLevel::High => 3,
        }
    }
}

impl FromStr for MotionLevel {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(MotionLevel::None),
            "LOW" => Ok(MotionLevel::Low),
            "MEDIUM" => Ok(MotionLevel::Medium),
            "HIGH" => Ok(MotionLevel::High),
            _ => Err(TriageError::InvalidEnumValue {
                stage: Stage::Validation,
                field: "motion_level",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for MotionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// HEAT SIGNATURE
// ============================================================================

/// Thermal signature level (ordered, HIGH is the strongest body-heat evidence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeatSignature {
    None,
    Low,
    Normal,
    High,
}

impl HeatSignature {
    pub const ALL: [HeatSignature; 4] = [
        HeatSignature::None,
        HeatSignature::Low,
        HeatSignature::Normal,
        HeatSignature::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeatSignature::None => "NONE",
            HeatSignature::Low => "LOW",
            HeatSignature::Normal => "NORMAL",
            HeatSignature::High => "HIGH",
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            HeatSignature::None => 0,
            HeatSignature::Low => 1,
            HeatSignature::Normal => 2,
            HeatSignature::High => 3,
        }
    }
}

impl FromStr for HeatSignature {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(HeatSignature::None),
            "LOW" => Ok(HeatSignature::Low),
            "NORMAL" => Ok(HeatSignature::Normal),
            "HIGH" => Ok(HeatSignature::High),
            _ => Err(TriageError::InvalidEnumValue {
                stage: Stage::Validation,
                field: "heat_signature",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for HeatSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// BREATHING
// ============================================================================

/// Breathing indicator, ordered by evidence of a viable person: NO < UNKNOWN < YES
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Breathing {
    No,
    Unknown,
    Yes,
}

impl Breathing {
    pub const ALL: [Breathing; 3] = [Breathing::No, Breathing::Unknown, Breathing::Yes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Breathing::No => "NO",
            Breathing::Unknown => "UNKNOWN",
            Breathing::Yes => "YES",
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            Breathing::No => 0,
            Breathing::Unknown => 1,
            Breathing::Yes => 2,
        }
    }
}

impl FromStr for Breathing {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NO" => Ok(Breathing::No),
            "UNKNOWN" => Ok(Breathing::Unknown),
            "YES" => Ok(Breathing::Yes),
            _ => Err(TriageError::InvalidEnumValue {
                stage: Stage::Validation,
                field: "breathing",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Breathing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// AUXILIARY MEASUREMENTS
// ============================================================================

/// How much structure covers the sensed location
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebrisCover {
    Open,
    Partial,
    Buried,
}

impl DebrisCover {
    pub const ALL: [DebrisCover; 3] = [DebrisCover::Open, DebrisCover::Partial, DebrisCover::Buried];

    pub fn as_str(&self) -> &'static str {
        match self {
            DebrisCover::Open => "OPEN",
            DebrisCover::Partial => "PARTIAL",
            DebrisCover::Buried => "BURIED",
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            DebrisCover::Open => 0,
            DebrisCover::Partial => 1,
            DebrisCover::Buried => 2,
        }
    }
}

impl FromStr for DebrisCover {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(DebrisCover::Open),
            "PARTIAL" => Ok(DebrisCover::Partial),
            "BURIED" => Ok(DebrisCover::Buried),
            _ => Err(TriageError::InvalidEnumValue {
                stage: Stage::Validation,
                field: "debris_cover",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for DebrisCover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Auxiliary physiological/structural measurements mirrored from the training schema
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuxMeasurements {
    /// Structural cover over the location
    pub debris_cover: DebrisCover,
    /// Sensor link quality (0.0 - 1.0)
    pub signal_quality: f32,
}

impl Default for AuxMeasurements {
    fn default() -> Self {
        Self {
            debris_cover: DebrisCover::Open,
            signal_quality: 0.9,
        }
    }
}

// ============================================================================
// SENSOR READING
// ============================================================================

/// Validated sensor reading about a possible survivor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub presence: bool,
    pub motion: MotionLevel,
    pub heat: HeatSignature,
    pub breathing: Breathing,
    #[serde(default)]
    pub aux: AuxMeasurements,
}

impl SensorReading {
    pub fn new(presence: bool, motion: MotionLevel, heat: HeatSignature, breathing: Breathing) -> Self {
        Self {
            presence,
            motion,
            heat,
            breathing,
            aux: AuxMeasurements::default(),
        }
    }

    pub fn with_debris(mut self, debris_cover: DebrisCover) -> Self {
        self.aux.debris_cover = debris_cover;
        self
    }

    pub fn with_signal_quality(mut self, signal_quality: f32) -> Self {
        self.aux.signal_quality = signal_quality;
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================
