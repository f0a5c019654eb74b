//! Model Registry - guarded load-or-train
//!
//! `load_lock` bao quanh toàn bộ load/train: caller đầu tiên làm việc nặng,
//! các caller đồng thời chờ rồi dùng chung `Arc` đã cache. Không ai retrain song song.
//! Model cache nằm sau `RwLock` riêng, chỉ bị write-lock lúc swap, nên `status()`
//! và `is_loaded()` không phải chờ training.
//!
//! Request đang giữ một `Arc<ClassifierModel>` dùng model đó tới hết request,
//! kể cả khi `retrain()` thay model giữa chừng.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::logic::dataset::load_csv;
use crate::logic::error::TriageError;
use super::forest::ForestConfig;
use super::inference::ClassifierModel;
use super::monotonic::audit_monotonicity;
use super::store::{load_model, save_model};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub loaded: bool,
    pub model_id: Option<Uuid>,
    pub trained_at: Option<DateTime<Utc>>,
    pub training_rows: Option<usize>,
    pub model_path: String,
    pub dataset_path: String,
    pub artifact_exists: bool,
}

pub struct ModelRegistry {
    model_path: PathBuf,
    dataset_path: PathBuf,
    forest: ForestConfig,
    cached: RwLock<Option<Arc<ClassifierModel>>>,
    load_lock: Mutex<()>,
}

impl ModelRegistry {
    pub fn new(model_path: PathBuf, dataset_path: PathBuf, forest: ForestConfig) -> Self {
        Self {
            model_path,
            dataset_path,
            forest,
            cached: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Shared model, loading or training it on first use
    pub fn get_or_load(&self) -> Result<Arc<ClassifierModel>, TriageError> {
        if let Some(model) = self.cached.read().as_ref() {
            return Ok(Arc::clone(model));
        }

        let _loading = self.load_lock.lock();
        // another caller may have finished while we waited
        if let Some(model) = self.cached.read().as_ref() {
            return Ok(Arc::clone(model));
        }

        let model = Arc::new(self.load_or_train()?);
        *self.cached.write() = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Load persisted model; on a recoverable failure train a fresh one and persist it
    pub fn load_or_train(&self) -> Result<ClassifierModel, TriageError> {
        match load_model(&self.model_path) {
            Ok(model) => Ok(model),
            Err(e) if e.is_recoverable() => {
                warn!("{} - falling back to training from {}", e, self.dataset_path.display());
                self.train_and_persist()
            }
            Err(e) => {
                error!("{}", e);
                Err(e)
            }
        }
    }

    /// Force a retrain and swap the cached model
    pub fn retrain(&self) -> Result<Arc<ClassifierModel>, TriageError> {
        let _loading = self.load_lock.lock();
        let model = Arc::new(self.train_and_persist()?);
        *self.cached.write() = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Install an already-trained model (tests, warm start)
    pub fn install(&self, model: ClassifierModel) -> Arc<ClassifierModel> {
        let model = Arc::new(model);
        *self.cached.write() = Some(Arc::clone(&model));
        model
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.read().is_some()
    }

    pub fn status(&self) -> ModelStatus {
        let guard = self.cached.read();
        let model = guard.as_ref();

        ModelStatus {
            loaded: model.is_some(),
            model_id: model.map(|m| m.model_id),
            trained_at: model.map(|m| m.trained_at),
            training_rows: model.map(|m| m.training_rows),
            model_path: self.model_path.display().to_string(),
            dataset_path: self.dataset_path.display().to_string(),
            artifact_exists: self.model_path.exists(),
        }
    }

    fn train_and_persist(&self) -> Result<ClassifierModel, TriageError> {
        info!("Starting model training from {}", self.dataset_path.display());

        let data = load_csv(&self.dataset_path).map_err(|e| {
            error!("{}", e);
            e
        })?;
        let model = ClassifierModel::train(&data, &self.forest)?;

        let report = audit_monotonicity(&model);
        info!(
            "Monotonicity audit: {} pairs, {} violations",
            report.pairs_checked,
            report.violations.len()
        );

        save_model(&model, &self.model_path)?;
        info!("Model {} trained with {} samples", model.model_id, model.training_rows);
        Ok(model)
    }
}

// ============================================================================
// TESTS
// ============================================================================
