// Sensor Input Module
//
// Typed SensorReading + validation cho input thô từ hiện trường.

pub mod types;
pub mod validate;

pub use types::{AuxMeasurements, Breathing, DebrisCover, HeatSignature, MotionLevel, SensorReading};
pub use validate::{validate, RawSensorReading};
