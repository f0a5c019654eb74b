//! Tests for the decision audit log

use chrono::Utc;
use tempfile::tempdir;
use uuid::Uuid;
use crate::logic::confidence::ConfidenceLevel;
use crate::logic::pipeline::UrgencyResult;
use crate::logic::sensor::{Breathing, HeatSignature, MotionLevel, SensorReading};
use crate::logic::urgency::{EnvironmentRisk, UrgencyLevel};
use super::{AuditRecord, AuditWriter};

fn record(probability: f32) -> AuditRecord {
    AuditRecord {
        recorded_at: Utc::now(),
        model_id: Uuid::new_v4(),
        feature_version: 1,
        layout_hash: 0xdead_beef,
        reading: SensorReading::new(true, MotionLevel::Low, HeatSignature::Normal, Breathing::Yes),
        environment_risk: EnvironmentRisk::Medium,
        confidence_level: ConfidenceLevel::Moderate,
        probability,
        result: UrgencyResult {
            urgency_level: UrgencyLevel::High,
            base_urgency: UrgencyLevel::Moderate,
            confidence_level: ConfidenceLevel::Moderate,
            probability,
            environment_risk: EnvironmentRisk::Medium,
            factors: vec![],
            explanation: "MEDIUM environmental risk escalates urgency from MODERATE to HIGH.".to_string(),
        },
    }
}

#[test]
fn test_append_then_read_back() {
    let dir = tempdir().unwrap();
    let writer = AuditWriter::from_path(dir.path().to_path_buf()).unwrap();

    let first = record(0.5);
    let second = record(0.6);
    writer.append(&first).unwrap();
    writer.append(&second).unwrap();

    let records = writer.read_all().unwrap();
    assert_eq!(records, vec![first, second]);

    let (files, _size_mb, latest) = writer.get_stats().unwrap();
    assert_eq!(files, 1);
    assert!(latest.starts_with("audit-") && latest.ends_with(".jsonl"));
}

#[test]
fn test_rotates_when_file_is_full() {
    let dir = tempdir().unwrap();
    // every record exceeds the limit, so each append after the first rotates
    let writer = AuditWriter::with_max_size(dir.path().to_path_buf(), 64).unwrap();

    for i in 0..3 {
        writer.append(&record(0.1 * i as f32)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    let (files, _, _) = writer.get_stats().unwrap();
    assert!(files >= 2);
    assert_eq!(writer.read_all().unwrap().len(), 3);
}

#[test]
fn test_reopens_existing_log() {
    let dir = tempdir().unwrap();
    {
        let writer = AuditWriter::from_path(dir.path().to_path_buf()).unwrap();
        writer.append(&record(0.3)).unwrap();
    }

    let writer = AuditWriter::from_path(dir.path().to_path_buf()).unwrap();
    writer.append(&record(0.4)).unwrap();

    assert_eq!(writer.get_stats().unwrap().0, 1);
    assert_eq!(writer.read_all().unwrap().len(), 2);
}
