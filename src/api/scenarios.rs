//! Built-in field scenarios
//!
//! Các tình huống hiện trường chuẩn dùng cho `sar-triage scenarios`: mỗi scenario
//! có reading, risk và urgency kỳ vọng.

use serde::{Deserialize, Serialize};
use crate::logic::sensor::{Breathing, DebrisCover, HeatSignature, MotionLevel, SensorReading};
use crate::logic::urgency::{EnvironmentRisk, UrgencyLevel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub reading: SensorReading,
    pub risk: EnvironmentRisk,
    pub expected: UrgencyLevel,
}

impl Scenario {
    fn new(name: &str, reading: SensorReading, risk: EnvironmentRisk, expected: UrgencyLevel) -> Self {
        Self {
            name: name.to_string(),
            reading,
            risk,
            expected,
        }
    }
}

pub fn field_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "Responsive victim, stable site",
            SensorReading::new(true, MotionLevel::High, HeatSignature::Normal, Breathing::Yes),
            EnvironmentRisk::Low,
            UrgencyLevel::Moderate,
        ),
        Scenario::new(
            "Trapped and unresponsive",
            SensorReading::new(true, MotionLevel::None, HeatSignature::High, Breathing::No),
            EnvironmentRisk::Low,
            UrgencyLevel::Critical,
        ),
        Scenario::new(
            "Trapped, breathing unclear, collapsing structure",
            SensorReading::new(true, MotionLevel::None, HeatSignature::High, Breathing::Unknown),
            EnvironmentRisk::High,
            UrgencyLevel::Critical,
        ),
        Scenario::new(
            "Moderate injury with high hazard",
            SensorReading::new(true, MotionLevel::High, HeatSignature::Normal, Breathing::Yes),
            EnvironmentRisk::High,
            UrgencyLevel::High,
        ),
        Scenario::new(
            "Faint signs under partial debris",
            SensorReading::new(true, MotionLevel::Medium, HeatSignature::Normal, Breathing::Unknown)
                .with_debris(DebrisCover::Partial)
                .with_signal_quality(0.6),
            EnvironmentRisk::Medium,
            UrgencyLevel::High,
        ),
        Scenario::new(
            "False alarm near gas leak",
            SensorReading::new(false, MotionLevel::None, HeatSignature::None, Breathing::No),
            EnvironmentRisk::High,
            UrgencyLevel::None,
        ),
    ]
}
