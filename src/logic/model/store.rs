//! Model Artifact Storage
//!
//! JSON envelope có version + schema tag + SHA-256 checksum của forest.
//! Ghi atomic: file tạm rồi rename, để process khác không bao giờ đọc nửa file.

use std::fs;
use std::path::Path;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use crate::logic::error::{Stage, TriageError};
use crate::logic::features::is_layout_compatible;
use super::forest::RandomForest;
use super::inference::ClassifierModel;

/// Envelope format version
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    /// SHA-256 (hex) of the serialized forest
    pub checksum: String,
    pub forest: RandomForest,
}

fn forest_checksum(forest: &RandomForest) -> Result<String, TriageError> {
    let bytes = serde_json::to_vec(forest)
        .map_err(|e| TriageError::Training(format!("cannot serialize forest: {}", e)))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

impl ModelArtifact {
    pub fn from_model(model: &ClassifierModel) -> Result<Self, TriageError> {
        Ok(Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            feature_version: model.feature_version,
            layout_hash: model.layout_hash,
            model_id: model.model_id,
            trained_at: model.trained_at,
            training_rows: model.training_rows,
            checksum: forest_checksum(&model.forest)?,
            forest: model.forest.clone(),
        })
    }

    pub fn into_model(self) -> ClassifierModel {
        ClassifierModel {
            model_id: self.model_id,
            trained_at: self.trained_at,
            training_rows: self.training_rows,
            feature_version: self.feature_version,
            layout_hash: self.layout_hash,
            forest: self.forest,
        }
    }
}

/// Persist a model atomically
pub fn save_model(model: &ClassifierModel, path: &Path) -> Result<(), TriageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| TriageError::io(Stage::Training, e))?;
        }
    }

    let artifact = ModelArtifact::from_model(model)?;
    let json = serde_json::to_vec_pretty(&artifact)
        .map_err(|e| TriageError::Training(format!("cannot serialize model: {}", e)))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| TriageError::io(Stage::Training, e))?;
    fs::rename(&tmp, path).map_err(|e| TriageError::io(Stage::Training, e))?;

    info!("Model {} saved to {}", model.model_id, path.display());
    Ok(())
}

/// Load and verify a persisted model
///
/// Missing / corrupt / stale ⇒ `ModelLoad` (caller retrains).
/// Forest referencing features outside the layout ⇒ `ModelSchemaMismatch` (fatal).
pub fn load_model(path: &Path) -> Result<ClassifierModel, TriageError> {
    let source = path.display().to_string();
    let load_err = |reason: String| TriageError::ModelLoad {
        path: source.clone(),
        reason,
    };

    if !path.exists() {
        return Err(load_err("file not found".to_string()));
    }

    let data = fs::read(path).map_err(|e| load_err(format!("unreadable: {}", e)))?;
    let artifact: ModelArtifact = serde_json::from_slice(&data)
        .map_err(|e| load_err(format!("corrupt payload: {}", e)))?;

    if artifact.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(load_err(format!(
            "unsupported artifact format v{} (expected v{})",
            artifact.format_version, ARTIFACT_FORMAT_VERSION
        )));
    }

    if !is_layout_compatible(artifact.feature_version, artifact.layout_hash) {
        warn!(
            "Model artifact {} trained for feature schema v{} ({:08x}), retraining",
            source, artifact.feature_version, artifact.layout_hash
        );
        return Err(load_err(format!(
            "stale feature schema v{} (hash: {:08x})",
            artifact.feature_version, artifact.layout_hash
        )));
    }

    let actual = forest_checksum(&artifact.forest).map_err(|e| load_err(e.to_string()))?;
    if actual != artifact.checksum {
        return Err(load_err("checksum mismatch".to_string()));
    }

    artifact.forest.check_structure(&source)?;

    info!("Model {} loaded from {}", artifact.model_id, source);
    Ok(artifact.into_model())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::synthesize;
    use crate::logic::model::forest::{ForestConfig, Node};
    use tempfile::tempdir;

    fn model() -> ClassifierModel {
        let config = ForestConfig { n_trees: 3, ..ForestConfig::default() };
        ClassifierModel::train(&synthesize(2).unwrap(), &config).unwrap()
    }

    #[test]
    fn test_save_then_load_same_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models").join("victim_model.json");

        let original = model();
        save_model(&original, &path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_missing_file_is_recoverable() {
        let dir = tempdir().unwrap();
        let err = load_model(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_corrupt_payload_is_recoverable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"\x00\x01 definitely not json").unwrap();
        assert!(load_model(&path).unwrap_err().is_recoverable());
    }

    #[test]
    fn test_tampered_forest_fails_checksum() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_model(&model(), &path).unwrap();

        let mut artifact: ModelArtifact = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        artifact.forest.trees[0].nodes[0] = Node::Leaf { positives: 1, total: 1 };
        fs::write(&path, serde_json::to_vec(&artifact).unwrap()).unwrap();

        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, TriageError::ModelLoad { ref reason, .. } if reason.contains("checksum")));
    }

    #[test]
    fn test_stale_schema_tag_is_recoverable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_model(&model(), &path).unwrap();

        let mut artifact: ModelArtifact = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        artifact.feature_version += 1;
        fs::write(&path, serde_json::to_vec(&artifact).unwrap()).unwrap();

        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, TriageError::ModelLoad { .. }));
    }

    #[test]
    fn test_foreign_feature_index_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");

        let mut bad = model();
        bad.forest.trees[0].nodes = vec![
            Node::Split { feature: 42, threshold: 0.5, left: 1, right: 2 },
            Node::Leaf { positives: 0, total: 1 },
            Node::Leaf { positives: 1, total: 1 },
        ];
        save_model(&bad, &path).unwrap();

        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, TriageError::ModelSchemaMismatch { .. }));
        assert!(err.is_fatal());
    }
}
