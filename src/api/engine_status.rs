use serde::{Serialize, Deserialize};
use crate::logic::features::LayoutInfo;
use crate::logic::model::ModelStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub app_version: String,
    pub layout: LayoutInfo,

    pub model: ModelStatus,
    pub dataset: DatasetStatus,
    pub audit: AuditStatus,
    pub thresholds: [f32; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStatus {
    pub path: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStatus {
    pub enabled: bool,
    pub directory: Option<String>,
    pub total_files: usize,
    pub total_size_mb: f32,
    pub current_file: String,
}

impl AuditStatus {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            directory: None,
            total_files: 0,
            total_size_mb: 0.0,
            current_file: "None".to_string(),
        }
    }
}
