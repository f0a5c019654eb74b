//! Commands - API cho CLI
//!
//! Mỗi subcommand của `sar-triage` gọi đúng một hàm ở đây. Hàm trả về struct
//! serializable; binary chỉ lo in kết quả.

use std::path::Path;
use log::info;
use serde::{Deserialize, Serialize};
use crate::constants;
use crate::logic::config::TriageConfig;
use crate::logic::dataset::{load_csv, synthesize, write_csv, DatasetSummary};
use crate::logic::error::{Stage, TriageError, TriageResult};
use crate::logic::explain::ExplanationRenderer;
use crate::logic::features::LayoutInfo;
use crate::logic::model::{cross_validate, EvaluationReport, ModelStatus};
use crate::logic::pipeline::{Assessment, TriageEngine};
use crate::logic::sensor::{validate, RawSensorReading};
use crate::logic::urgency::{EnvironmentRisk, UrgencyLevel};
use super::engine_status::{AuditStatus, DatasetStatus, EngineStatus};
use super::scenarios::field_scenarios;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Outcome of one built-in field scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub risk: EnvironmentRisk,
    pub expected: UrgencyLevel,
    pub assessment: Assessment,
}

impl ScenarioOutcome {
    pub fn matches(&self) -> bool {
        self.assessment.result.urgency_level == self.expected
    }
}

// ============================================================================
// DATASET & MODEL COMMANDS
// ============================================================================

/// Write the synthesized training dataset
pub fn write_dataset(out: &Path, rows_per_cell: usize) -> TriageResult<DatasetSummary> {
    let set = synthesize(rows_per_cell)?;
    write_csv(out, &set)?;

    let summary = DatasetSummary::from(&set);
    info!(
        "Dataset written to {} ({} rows, {} positive)",
        out.display(),
        summary.rows,
        summary.positives
    );
    Ok(summary)
}

/// Retrain from the configured dataset and persist
pub fn train_model(engine: &TriageEngine) -> TriageResult<ModelStatus> {
    engine.registry().retrain()?;
    Ok(engine.registry().status())
}

/// k-fold cross-validation on the configured dataset
pub fn evaluate_model(config: &TriageConfig, folds: usize) -> TriageResult<EvaluationReport> {
    let data = load_csv(&config.dataset_path)?;
    cross_validate(&data, &config.forest, folds)
}

// ============================================================================
// TRIAGE COMMANDS
// ============================================================================

/// Validate a JSON reading from disk, then fuse and decide
pub fn assess_file(
    engine: &TriageEngine,
    input: &Path,
    risk: EnvironmentRisk,
    renderer: &dyn ExplanationRenderer,
) -> TriageResult<Assessment> {
    let json = std::fs::read_to_string(input).map_err(|e| TriageError::io(Stage::Validation, e))?;
    let raw = RawSensorReading::from_json(&json)?;
    let reading = validate(&raw)?;
    engine.assess_with(&reading, risk, renderer)
}

/// Run every built-in field scenario
pub fn run_scenarios(engine: &TriageEngine) -> TriageResult<Vec<ScenarioOutcome>> {
    field_scenarios()
        .into_iter()
        .map(|scenario| {
            let assessment = engine.assess(&scenario.reading, scenario.risk)?;
            Ok(ScenarioOutcome {
                name: scenario.name,
                risk: scenario.risk,
                expected: scenario.expected,
                assessment,
            })
        })
        .collect()
}

pub fn decision_table(engine: &TriageEngine) -> String {
    engine.table().render()
}

// ============================================================================
// STATUS
// ============================================================================

pub fn engine_info(config: &TriageConfig, engine: &TriageEngine) -> TriageResult<EngineStatus> {
    let audit = match engine.audit() {
        Some(writer) => {
            let (total_files, total_size_mb, current_file) = writer.get_stats()?;
            AuditStatus {
                enabled: true,
                directory: Some(writer.base_dir().display().to_string()),
                total_files,
                total_size_mb,
                current_file,
            }
        }
        None => AuditStatus::disabled(),
    };

    let t = &config.thresholds;
    Ok(EngineStatus {
        app_version: constants::APP_VERSION.to_string(),
        layout: LayoutInfo::current(),
        model: engine.registry().status(),
        dataset: DatasetStatus {
            path: config.dataset_path.display().to_string(),
            exists: config.dataset_path.exists(),
        },
        audit,
        thresholds: [t.low, t.moderate, t.high, t.critical],
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::DEFAULT_ROWS_PER_CELL;
    use crate::logic::explain::{JsonRenderer, TextRenderer};
    use crate::logic::model::ForestConfig;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> TriageConfig {
        TriageConfig {
            model_path: dir.join("victim_model.json"),
            dataset_path: dir.join("training.csv"),
            audit_dir: Some(dir.join("audit")),
            forest: ForestConfig { n_trees: 6, ..ForestConfig::default() },
            ..TriageConfig::default()
        }
    }

    #[test]
    fn test_dataset_train_assess_flow() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());

        let summary = write_dataset(&config.dataset_path, DEFAULT_ROWS_PER_CELL).unwrap();
        assert_eq!(summary.rows, summary.positives + summary.negatives);

        let engine = TriageEngine::new(&config).unwrap();
        let status = train_model(&engine).unwrap();
        assert!(status.loaded && status.artifact_exists);

        let input = dir.path().join("reading.json");
        std::fs::write(
            &input,
            r#"{"presence": true, "motion": "NONE", "heat": "HIGH", "breathing": "UNKNOWN"}"#,
        )
        .unwrap();

        let assessment = assess_file(&engine, &input, EnvironmentRisk::Medium, &TextRenderer).unwrap();
        assert_eq!(assessment.result.urgency_level, UrgencyLevel::Critical);

        let structured = assess_file(&engine, &input, EnvironmentRisk::Medium, &JsonRenderer).unwrap();
        assert_eq!(structured.result.urgency_level, UrgencyLevel::Critical);
        let factors: serde_json::Value = serde_json::from_str(&structured.result.explanation).unwrap();
        assert_eq!(factors.as_array().unwrap().len(), structured.result.factors.len());

        let info = engine_info(&config, &engine).unwrap();
        assert!(info.dataset.exists);
        assert_eq!(info.audit.total_files, 1);
        assert_eq!(engine.audit().unwrap().read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_field_scenarios_match_expectations() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        write_dataset(&config.dataset_path, DEFAULT_ROWS_PER_CELL).unwrap();

        let engine = TriageEngine::new(&config).unwrap();
        let outcomes = run_scenarios(&engine).unwrap();

        assert_eq!(outcomes.len(), field_scenarios().len());
        for outcome in &outcomes {
            assert!(outcome.matches(), "{}: got {}", outcome.name, outcome.assessment.result.urgency_level);
        }
    }

    #[test]
    fn test_assess_rejects_malformed_reading() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let engine = TriageEngine::new(&config).unwrap();

        let input = dir.path().join("reading.json");
        std::fs::write(&input, r#"{"presence": true, "motion": "FAST"}"#).unwrap();

        let err = assess_file(&engine, &input, EnvironmentRisk::Low, &TextRenderer).unwrap_err();
        assert_eq!(err.stage(), Stage::Validation);
    }

    #[test]
    fn test_decision_table_renders_every_risk() {
        let dir = tempdir().unwrap();
        let engine = TriageEngine::new(&config_in(dir.path())).unwrap();
        let table = decision_table(&engine);
        for risk in EnvironmentRisk::ALL {
            assert!(table.contains(risk.as_str()));
        }
    }
}
