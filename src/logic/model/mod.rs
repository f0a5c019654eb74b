//! Model Module - Victim-Presence Classifier
//!
//! Forest training, inference, artifact storage, guarded load-or-train.
//! Chỉ `registry` được phép làm việc chậm (load / train); inference luôn rẻ.

pub mod forest;
pub mod inference;
pub mod store;
pub mod registry;
pub mod monotonic;
pub mod evaluate;

// Re-export common types
pub use forest::{DecisionTree, ForestConfig, Node, RandomForest};
pub use inference::{ClassifierModel, ClassifierOutput, PROBABILITY_TOLERANCE};
pub use store::{load_model, save_model, ModelArtifact, ARTIFACT_FORMAT_VERSION};
pub use registry::{ModelRegistry, ModelStatus};
pub use monotonic::{audit_monotonicity, MonotonicityReport, MonotonicityViolation};
pub use evaluate::{cross_validate, EvaluationReport, DEFAULT_FOLDS};
