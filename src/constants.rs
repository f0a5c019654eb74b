//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment variables override the defaults; see `TriageConfig::from_env`.

use std::path::PathBuf;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "SAR Triage";

/// Directory name under the platform data dir
pub const DATA_DIR_NAME: &str = "sar-triage";

/// Default model artifact file name
pub const DEFAULT_MODEL_FILE: &str = "victim_model.json";

/// Default training dataset file name
pub const DEFAULT_DATASET_FILE: &str = "sensor_training_data.csv";

// ============================================
// Environment variable names
// ============================================

pub const ENV_MODEL_PATH: &str = "SAR_MODEL_PATH";
pub const ENV_DATASET_PATH: &str = "SAR_DATASET_PATH";
pub const ENV_AUDIT_DIR: &str = "SAR_AUDIT_DIR";
pub const ENV_FOREST_TREES: &str = "SAR_FOREST_TREES";
pub const ENV_FOREST_SEED: &str = "SAR_FOREST_SEED";
pub const ENV_SENSITIVITY: &str = "SAR_SENSITIVITY";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Base data directory (platform local data dir, or the working dir)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

/// Get model artifact path from environment or use default
pub fn get_model_path() -> PathBuf {
    std::env::var(ENV_MODEL_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| get_data_dir().join(DEFAULT_MODEL_FILE))
}

/// Get training dataset path from environment or use default
pub fn get_dataset_path() -> PathBuf {
    std::env::var(ENV_DATASET_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| get_data_dir().join(DEFAULT_DATASET_FILE))
}

/// Audit log directory; unset = audit disabled
pub fn get_audit_dir() -> Option<PathBuf> {
    std::env::var(ENV_AUDIT_DIR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Confidence threshold preset name (standard / high / low), if set
pub fn get_sensitivity() -> Option<String> {
    std::env::var(ENV_SENSITIVITY)
        .ok()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

/// Raw value of a numeric override, if set
pub fn get_env_number(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}
