//! Triage Configuration
//!
//! Defaults → JSON file (optional) → environment variables.
//! `validate()` chạy trước khi engine được tạo; config sai là lỗi fatal.

use std::path::{Path, PathBuf};
use log::info;
use serde::{Deserialize, Serialize};
use crate::constants;
use crate::logic::confidence::ConfidenceThresholds;
use crate::logic::error::{Stage, TriageError};
use crate::logic::model::ForestConfig;
use crate::logic::urgency::UrgencyPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
    /// None = decisions are not audited
    pub audit_dir: Option<PathBuf>,
    pub forest: ForestConfig,
    pub thresholds: ConfidenceThresholds,
    pub policy: UrgencyPolicy,
}

impl Default for TriageConfig {
    fn default() -> Self {
        let data_dir = constants::get_data_dir();
        Self {
            model_path: data_dir.join(constants::DEFAULT_MODEL_FILE),
            dataset_path: data_dir.join(constants::DEFAULT_DATASET_FILE),
            audit_dir: None,
            forest: ForestConfig::default(),
            thresholds: ConfidenceThresholds::default(),
            policy: UrgencyPolicy::default(),
        }
    }
}

impl TriageConfig {
    /// Defaults with environment overrides
    pub fn from_env() -> Result<Self, TriageError> {
        Self::default().with_env_overrides()
    }

    /// JSON file, then environment overrides
    pub fn load(path: &Path) -> Result<Self, TriageError> {
        let data = std::fs::read(path).map_err(|e| TriageError::io(Stage::Config, e))?;
        let config: TriageConfig = serde_json::from_slice(&data)
            .map_err(|e| TriageError::Config(format!("{}: {}", path.display(), e)))?;

        info!("Configuration loaded from {}", path.display());
        config.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, TriageError> {
        if std::env::var(constants::ENV_MODEL_PATH).is_ok() {
            self.model_path = constants::get_model_path();
        }
        if std::env::var(constants::ENV_DATASET_PATH).is_ok() {
            self.dataset_path = constants::get_dataset_path();
        }
        if let Some(dir) = constants::get_audit_dir() {
            self.audit_dir = Some(dir);
        }
        if let Some(name) = constants::get_sensitivity() {
            self.thresholds = ConfidenceThresholds::preset(&name)?;
            info!("Confidence thresholds: {} sensitivity preset", name);
        }
        if let Some(raw) = constants::get_env_number(constants::ENV_FOREST_TREES) {
            self.forest.n_trees = parse_number(constants::ENV_FOREST_TREES, &raw)?;
        }
        if let Some(raw) = constants::get_env_number(constants::ENV_FOREST_SEED) {
            self.forest.seed = parse_number(constants::ENV_FOREST_SEED, &raw)?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), TriageError> {
        self.forest.validate()?;
        self.thresholds.validate()?;
        self.policy.validate()?;
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, TriageError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| TriageError::Config(format!("{} must be a non-negative integer, got {:?}", name, raw)))
}

/// Serializes tests that read or write process environment variables
#[cfg(test)]
pub(crate) static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
