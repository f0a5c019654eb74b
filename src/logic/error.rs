//! Triage Errors
//!
//! Error taxonomy cho toàn bộ pipeline: encode → infer → synthesize → decide → explain.
//! Mỗi lỗi biết nó thuộc stage nào và có tự phục hồi được hay không.
//!
//! ## Propagation
//! - `ModelLoad` là lỗi duy nhất được xử lý tại chỗ (fallback: retrain).
//! - Mọi lỗi khác đi thẳng lên caller, không bao giờ bị thay bằng default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// STAGE
// ============================================================================

/// Pipeline stage where an error originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Validation,
    Encoding,
    ModelLoad,
    Training,
    Inference,
    Synthesis,
    Decision,
    Explanation,
    Config,
    Audit,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::Encoding => "encoding",
            Stage::ModelLoad => "model-load",
            Stage::Training => "training",
            Stage::Inference => "inference",
            Stage::Synthesis => "confidence-synthesis",
            Stage::Decision => "urgency-decision",
            Stage::Explanation => "explanation",
            Stage::Config => "config",
            Stage::Audit => "audit",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ERROR
// ============================================================================

pub type TriageResult<T> = Result<T, TriageError>;

#[derive(Debug, Error)]
pub enum TriageError {
    /// Malformed or out-of-domain input (upstream validation failed)
    #[error("[validation] invalid sensor reading: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A reading slipped past validation and cannot be encoded
    #[error("[encoding] cannot encode {field}: {reason}")]
    Encoding { field: &'static str, reason: String },

    /// Persisted model missing/corrupt/stale - recovered by retraining
    #[error("[model-load] cannot load model from {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    /// Feature schema drift between encoder and model/dataset - fatal
    #[error("[{stage}] feature schema mismatch ({context}): expected {expected}, got {actual}")]
    ModelSchemaMismatch {
        stage: Stage,
        context: String,
        expected: String,
        actual: String,
    },

    /// Unrecognized enum value or decision table miss - fatal, code/config defect
    #[error("[{stage}] invalid value {value:?} for {field}")]
    InvalidEnumValue {
        stage: Stage,
        field: &'static str,
        value: String,
    },

    /// Classifier produced a distribution that breaks its invariants
    #[error("[inference] invalid classifier output: {0}")]
    InvalidOutput(String),

    /// Training fallback could not produce a model
    #[error("[training] {0}")]
    Training(String),

    /// Invalid thresholds, policy or forest parameters
    #[error("[config] {0}")]
    Config(String),

    #[error("[{stage}] I/O error: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },
}

impl TriageError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TriageError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn io(stage: Stage, source: std::io::Error) -> Self {
        TriageError::Io { stage, source }
    }

    /// Stage that failed
    pub fn stage(&self) -> Stage {
        match self {
            TriageError::Validation { .. } => Stage::Validation,
            TriageError::Encoding { .. } => Stage::Encoding,
            TriageError::ModelLoad { .. } => Stage::ModelLoad,
            TriageError::ModelSchemaMismatch { stage, .. } => *stage,
            TriageError::InvalidEnumValue { stage, .. } => *stage,
            TriageError::InvalidOutput(_) => Stage::Inference,
            TriageError::Training(_) => Stage::Training,
            TriageError::Config(_) => Stage::Config,
            TriageError::Io { stage, .. } => *stage,
        }
    }

    /// Only a missing/corrupt persisted model is handled locally
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TriageError::ModelLoad { .. })
    }

    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_model_load_is_recoverable() {
        let load = TriageError::ModelLoad {
            path: "model.json".to_string(),
            reason: "not found".to_string(),
        };
        assert!(load.is_recoverable());

        let mismatch = TriageError::ModelSchemaMismatch {
            stage: Stage::Inference,
            context: "vector".to_string(),
            expected: "v1".to_string(),
            actual: "v2".to_string(),
        };
        assert!(mismatch.is_fatal());
        assert!(TriageError::validation("motion_level", "missing").is_fatal());
    }

    #[test]
    fn test_message_names_stage() {
        let err = TriageError::InvalidEnumValue {
            stage: Stage::Decision,
            field: "confidence_level",
            value: "EXTREME".to_string(),
        };
        assert_eq!(err.stage(), Stage::Decision);
        assert!(err.to_string().starts_with("[urgency-decision]"));
    }
}
