//! Triage Pipeline - hai entry point của core
//!
//! Stage 1: `fuse_signals`   reading → encode → infer → synthesize → VictimState
//! Stage 2: `assign_urgency` VictimState × EnvironmentRisk → decide → explain → UrgencyResult
//!
//! Engine toàn cục được khởi tạo một lần (config từ env). Model được lấy một lần
//! mỗi request qua `ModelRegistry` và giữ nguyên tới hết request.

use std::sync::Arc;
use chrono::Utc;
use log::{debug, error, info};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::logic::audit::{AuditRecord, AuditWriter};
use crate::logic::confidence::{synthesize_with_thresholds, ConfidenceLevel, ConfidenceThresholds};
use crate::logic::config::TriageConfig;
use crate::logic::error::{TriageError, TriageResult};
use crate::logic::explain::{explain_with, ExplainInput, ExplanationRenderer, Factor, TextRenderer};
use crate::logic::features::{encode, FeatureVector};
use crate::logic::model::{ClassifierModel, ModelRegistry};
use crate::logic::sensor::{Breathing, HeatSignature, MotionLevel, SensorReading};
use crate::logic::urgency::{DecisionTable, EnvironmentRisk, UrgencyLevel};

// ============================================================================
// VICTIM STATE (stage 1 output)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Responsiveness {
    Responsive,
    WeakResponse,
    Unresponsive,
    Unknown,
}

impl Responsiveness {
    pub fn from_reading(reading: &SensorReading) -> Self {
        if !reading.presence {
            return Responsiveness::Unknown;
        }
        match reading.motion {
            MotionLevel::High | MotionLevel::Medium => Responsiveness::Responsive,
            MotionLevel::Low => Responsiveness::WeakResponse,
            MotionLevel::None => Responsiveness::Unresponsive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Responsiveness::Responsive => "RESPONSIVE",
            Responsiveness::WeakResponse => "WEAK_RESPONSE",
            Responsiveness::Unresponsive => "UNRESPONSIVE",
            Responsiveness::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VitalSigns {
    Stable,
    Uncertain,
    Weak,
    Unknown,
}

impl VitalSigns {
    pub fn from_reading(reading: &SensorReading) -> Self {
        if !reading.presence {
            return VitalSigns::Unknown;
        }
        let warm = reading.heat >= HeatSignature::Normal;
        match (warm, reading.breathing) {
            (true, Breathing::Yes) => VitalSigns::Stable,
            (true, _) => VitalSigns::Uncertain,
            (false, _) => VitalSigns::Weak,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VitalSigns::Stable => "STABLE",
            VitalSigns::Uncertain => "UNCERTAIN",
            VitalSigns::Weak => "WEAK",
            VitalSigns::Unknown => "UNKNOWN",
        }
    }
}

/// Fused view of one reading. Narrative fields never feed the urgency decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VictimState {
    pub confidence_level: ConfidenceLevel,
    pub probability: f32,
    pub features: FeatureVector,
    pub model_id: Uuid,

    pub presence_confirmed: bool,
    pub responsiveness: Responsiveness,
    pub vital_signs: VitalSigns,
    pub observations: Vec<String>,
}

fn observations(reading: &SensorReading) -> Vec<String> {
    let mut notes = Vec::new();

    if !reading.presence {
        notes.push("No human presence detected".to_string());
        return notes;
    }
    notes.push("Human presence detected".to_string());

    notes.push(match reading.motion {
        MotionLevel::High => "Strong movement detected",
        MotionLevel::Medium => "Moderate movement detected",
        MotionLevel::Low => "Faint movement detected",
        MotionLevel::None => "No movement detected",
    }.to_string());

    notes.push(match reading.heat {
        HeatSignature::High => "Elevated heat signature",
        HeatSignature::Normal => "Normal body heat signature",
        HeatSignature::Low => "Low heat signature",
        HeatSignature::None => "No heat signature",
    }.to_string());

    notes.push(match reading.breathing {
        Breathing::Yes => "Breathing detected",
        Breathing::Unknown => "Breathing could not be confirmed",
        Breathing::No => "No breathing detected",
    }.to_string());

    notes
}

// ============================================================================
// URGENCY RESULT (stage 2 output)
// ============================================================================

/// The unit of record an operator acts on. Contains no timestamps or ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyResult {
    pub urgency_level: UrgencyLevel,
    pub base_urgency: UrgencyLevel,
    pub confidence_level: ConfidenceLevel,
    pub probability: f32,
    pub environment_risk: EnvironmentRisk,
    pub factors: Vec<Factor>,
    pub explanation: String,
}

/// Both stages for one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub state: VictimState,
    pub result: UrgencyResult,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct TriageEngine {
    registry: ModelRegistry,
    thresholds: ConfidenceThresholds,
    table: DecisionTable,
    audit: Option<AuditWriter>,
}

impl TriageEngine {
    pub fn new(config: &TriageConfig) -> TriageResult<Self> {
        config.validate()?;

        let registry = ModelRegistry::new(
            config.model_path.clone(),
            config.dataset_path.clone(),
            config.forest.clone(),
        );
        let table = DecisionTable::from_policy(&config.policy)?;
        let audit = match &config.audit_dir {
            Some(dir) => Some(AuditWriter::from_path(dir.clone())?),
            None => None,
        };

        info!(
            "Triage engine ready (model: {}, audit: {})",
            config.model_path.display(),
            config
                .audit_dir
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "disabled".to_string())
        );

        Ok(Self {
            registry,
            thresholds: config.thresholds.clone(),
            table,
            audit,
        })
    }

    /// Engine with an already trained model installed
    pub fn with_model(config: &TriageConfig, model: ClassifierModel) -> TriageResult<Self> {
        let engine = Self::new(config)?;
        engine.registry.install(model);
        Ok(engine)
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn table(&self) -> &DecisionTable {
        &self.table
    }

    pub fn audit(&self) -> Option<&AuditWriter> {
        self.audit.as_ref()
    }

    /// Stage 1
    pub fn fuse_signals(&self, reading: &SensorReading) -> TriageResult<VictimState> {
        let model = self.registry.get_or_load()?;
        self.fuse_with(&model, reading)
    }

    /// Stage 2
    pub fn assign_urgency(
        &self,
        state: &VictimState,
        risk: EnvironmentRisk,
    ) -> TriageResult<UrgencyResult> {
        self.assign_urgency_with(state, risk, &TextRenderer)
    }

    /// Stage 2 with a chosen explanation renderer
    pub fn assign_urgency_with(
        &self,
        state: &VictimState,
        risk: EnvironmentRisk,
        renderer: &dyn ExplanationRenderer,
    ) -> TriageResult<UrgencyResult> {
        let decision = self.table.lookup(state.confidence_level, risk)?;

        let trace = explain_with(&ExplainInput {
            confidence: state.confidence_level,
            probability: state.probability,
            risk,
            base_urgency: decision.base_urgency,
            final_urgency: decision.urgency,
            steps: decision.steps.clone(),
        }, renderer);

        debug!(
            "Urgency {} (confidence {}, risk {})",
            decision.urgency, state.confidence_level, risk
        );

        Ok(UrgencyResult {
            urgency_level: decision.urgency,
            base_urgency: decision.base_urgency,
            confidence_level: state.confidence_level,
            probability: state.probability,
            environment_risk: risk,
            factors: trace.factors,
            explanation: trace.summary,
        })
    }

    /// Both stages against one model snapshot, then audit
    pub fn assess(&self, reading: &SensorReading, risk: EnvironmentRisk) -> TriageResult<Assessment> {
        self.assess_with(reading, risk, &TextRenderer)
    }

    pub fn assess_with(
        &self,
        reading: &SensorReading,
        risk: EnvironmentRisk,
        renderer: &dyn ExplanationRenderer,
    ) -> TriageResult<Assessment> {
        let model = self.registry.get_or_load()?;
        let state = self.fuse_with(&model, reading)?;
        let result = self.assign_urgency_with(&state, risk, renderer)?;

        if let Some(writer) = &self.audit {
            let record = AuditRecord {
                recorded_at: Utc::now(),
                model_id: model.model_id,
                feature_version: model.feature_version,
                layout_hash: model.layout_hash,
                reading: *reading,
                environment_risk: risk,
                confidence_level: state.confidence_level,
                probability: state.probability,
                result: result.clone(),
            };
            // Decision stands even if the log write fails
            if let Err(e) = writer.append(&record) {
                error!("Failed to append audit record: {}", e);
            }
        }

        Ok(Assessment { state, result })
    }

    fn fuse_with(&self, model: &Arc<ClassifierModel>, reading: &SensorReading) -> TriageResult<VictimState> {
        let features = encode(reading)?;
        let output = model.infer(&features)?;
        let (confidence_level, probability) = synthesize_with_thresholds(&output, &self.thresholds)?;

        debug!("Fused reading -> {} (p={:.3})", confidence_level, probability);

        Ok(VictimState {
            confidence_level,
            probability,
            features,
            model_id: output.model_id,
            presence_confirmed: reading.presence,
            responsiveness: Responsiveness::from_reading(reading),
            vital_signs: VitalSigns::from_reading(reading),
            observations: observations(reading),
        })
    }
}

// ============================================================================
// GLOBAL ENGINE
// ============================================================================

static ENGINE: OnceCell<TriageEngine> = OnceCell::new();

/// Process-wide engine, configured from the environment on first use
pub fn engine() -> TriageResult<&'static TriageEngine> {
    ENGINE.get_or_try_init(engine_from_env)
}

fn engine_from_env() -> TriageResult<TriageEngine> {
    let config = TriageConfig::from_env()?;
    TriageEngine::new(&config)
}

fn report(e: TriageError) -> TriageError {
    if e.is_fatal() {
        error!("[{}] {}", e.stage(), e);
    }
    e
}

/// Stage 1 against the process-wide engine
pub fn fuse_signals(reading: &SensorReading) -> TriageResult<VictimState> {
    engine()
        .and_then(|engine| engine.fuse_signals(reading))
        .map_err(report)
}

/// Stage 2 against the process-wide engine
pub fn assign_urgency(state: &VictimState, risk: EnvironmentRisk) -> TriageResult<UrgencyResult> {
    engine()
        .and_then(|engine| engine.assign_urgency(state, risk))
        .map_err(report)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::logic::config::ENV_LOCK;
    use crate::logic::dataset::{synthesize, write_csv};
    use crate::logic::error::Stage;
    use tempfile::tempdir;

    const ENV_VARS: [&str; 6] = [
        constants::ENV_MODEL_PATH,
        constants::ENV_DATASET_PATH,
        constants::ENV_AUDIT_DIR,
        constants::ENV_FOREST_TREES,
        constants::ENV_FOREST_SEED,
        constants::ENV_SENSITIVITY,
    ];

    fn clear_env() {
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_responsiveness_from_motion() {
        let base = SensorReading::new(true, MotionLevel::None, HeatSignature::Normal, Breathing::Yes);
        assert_eq!(Responsiveness::from_reading(&base), Responsiveness::Unresponsive);
        assert_eq!(
            Responsiveness::from_reading(&SensorReading { motion: MotionLevel::Low, ..base }),
            Responsiveness::WeakResponse
        );
        assert_eq!(
            Responsiveness::from_reading(&SensorReading { motion: MotionLevel::Medium, ..base }),
            Responsiveness::Responsive
        );
        assert_eq!(
            Responsiveness::from_reading(&SensorReading { presence: false, ..base }),
            Responsiveness::Unknown
        );
    }

    #[test]
    fn test_vital_signs_from_heat_and_breathing() {
        let warm = SensorReading::new(true, MotionLevel::Low, HeatSignature::High, Breathing::Yes);
        assert_eq!(VitalSigns::from_reading(&warm), VitalSigns::Stable);
        assert_eq!(
            VitalSigns::from_reading(&SensorReading { breathing: Breathing::Unknown, ..warm }),
            VitalSigns::Uncertain
        );
        assert_eq!(
            VitalSigns::from_reading(&SensorReading { heat: HeatSignature::Low, ..warm }),
            VitalSigns::Weak
        );
    }

    #[test]
    fn test_observations_follow_signal_order() {
        let reading = SensorReading::new(true, MotionLevel::None, HeatSignature::High, Breathing::No);
        assert_eq!(
            observations(&reading),
            vec![
                "Human presence detected".to_string(),
                "No movement detected".to_string(),
                "Elevated heat signature".to_string(),
                "No breathing detected".to_string(),
            ]
        );
    }

    #[test]
    fn test_global_engine_from_env() {
        let _env = ENV_LOCK.lock();
        clear_env();

        let dir = tempdir().unwrap();
        let dataset = dir.path().join("training.csv");
        write_csv(&dataset, &synthesize(2).unwrap()).unwrap();
        std::env::set_var(constants::ENV_MODEL_PATH, dir.path().join("model.json"));
        std::env::set_var(constants::ENV_DATASET_PATH, &dataset);
        std::env::set_var(constants::ENV_FOREST_TREES, "4");

        let empty = SensorReading::new(false, MotionLevel::None, HeatSignature::Low, Breathing::No);
        let state = fuse_signals(&empty);
        let result = state
            .as_ref()
            .ok()
            .map(|s| assign_urgency(s, EnvironmentRisk::High));
        let first = engine();
        let second = engine();
        clear_env();

        let state = state.unwrap();
        assert_eq!(state.confidence_level, ConfidenceLevel::None);
        let result = result.unwrap().unwrap();
        assert_eq!(result.urgency_level, UrgencyLevel::None);

        let engine = first.unwrap();
        assert!(std::ptr::eq(engine, second.unwrap()));
        assert!(engine.registry().is_loaded());
        assert_eq!(engine.fuse_signals(&empty).unwrap(), state);
        assert_eq!(engine.assign_urgency(&state, EnvironmentRisk::High).unwrap(), result);
    }

    #[test]
    fn test_bad_env_override_is_config_error() {
        let _env = ENV_LOCK.lock();
        clear_env();

        std::env::set_var(constants::ENV_FOREST_TREES, "-3");
        let result = engine_from_env();
        clear_env();

        let err = result.err().unwrap();
        assert!(matches!(err, TriageError::Config(_)));
        assert_eq!(err.stage(), Stage::Config);
    }

    #[test]
    fn test_json_renderer_explanation() {
        let dir = tempdir().unwrap();
        let config = TriageConfig {
            model_path: dir.path().join("model.json"),
            dataset_path: dir.path().join("training.csv"),
            audit_dir: None,
            ..TriageConfig::default()
        };
        let model = ClassifierModel::train(
            &synthesize(1).unwrap(),
            &crate::logic::model::ForestConfig { n_trees: 3, ..Default::default() },
        )
        .unwrap();
        let engine = TriageEngine::with_model(&config, model).unwrap();

        let reading = SensorReading::new(true, MotionLevel::High, HeatSignature::Normal, Breathing::Yes);
        let assessment = engine
            .assess_with(&reading, EnvironmentRisk::High, &crate::logic::explain::JsonRenderer)
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&assessment.result.explanation).unwrap();
        assert_eq!(json.as_array().unwrap().len(), assessment.result.factors.len());
        assert_eq!(json[0]["kind"], "confidence_basis");
    }
}
