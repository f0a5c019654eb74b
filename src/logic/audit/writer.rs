use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use chrono::Utc;
use parking_lot::Mutex;
use crate::logic::error::{Stage, TriageError};
use super::record::AuditRecord;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10 MB

/// Append-only JSONL decision log with size-based rotation
pub struct AuditWriter {
    file: Mutex<Option<File>>,
    base_dir: PathBuf,
    max_file_size: u64,
}

impl AuditWriter {
    pub fn from_path(base_dir: PathBuf) -> Result<Self, TriageError> {
        Self::with_max_size(base_dir, DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_size(base_dir: PathBuf, max_file_size: u64) -> Result<Self, TriageError> {
        fs::create_dir_all(&base_dir).map_err(|e| TriageError::io(Stage::Audit, e))?;

        Ok(Self {
            file: Mutex::new(None),
            base_dir,
            max_file_size,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Append one record, rotating when the current file is full
    pub fn append(&self, record: &AuditRecord) -> Result<(), TriageError> {
        let mut file_guard = self.file.lock();

        if file_guard.is_none() {
            let file = match self.find_latest_log_file()? {
                Some(path) => {
                    let f = open_append(&path)?;
                    if file_len(&f)? < self.max_file_size {
                        f
                    } else {
                        self.create_new_file()?
                    }
                }
                None => self.create_new_file()?,
            };
            *file_guard = Some(file);
        }

        let should_rotate = match file_guard.as_ref() {
            Some(f) => file_len(f)? >= self.max_file_size,
            None => false,
        };
        if should_rotate {
            *file_guard = Some(self.create_new_file()?);
        }

        if let Some(file) = file_guard.as_mut() {
            let json = serde_json::to_string(record).map_err(|e| {
                TriageError::io(Stage::Audit, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })?;
            writeln!(file, "{}", json).map_err(|e| TriageError::io(Stage::Audit, e))?;
        }

        Ok(())
    }

    /// (file count, total size in MB, latest file name)
    pub fn get_stats(&self) -> Result<(usize, f32, String), TriageError> {
        let files = self.log_files()?;
        let size: u64 = files
            .iter()
            .filter_map(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .sum();

        let latest = files
            .last()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("None")
            .to_string();

        Ok((files.len(), size as f32 / 1024.0 / 1024.0, latest))
    }

    /// Read every record back, oldest file first
    pub fn read_all(&self) -> Result<Vec<AuditRecord>, TriageError> {
        let mut records = Vec::new();
        for path in self.log_files()? {
            let content = fs::read_to_string(&path).map_err(|e| TriageError::io(Stage::Audit, e))?;
            for line in content.lines().filter(|l| !l.trim().is_empty()) {
                let record = serde_json::from_str(line).map_err(|e| {
                    TriageError::io(Stage::Audit, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                })?;
                records.push(record);
            }
        }
        Ok(records)
    }

    fn create_new_file(&self) -> Result<File, TriageError> {
        // timestamp format: YYYY-MM-DD-HHMMSS-nanos
        let filename = format!("audit-{}.jsonl", Utc::now().format("%Y-%m-%d-%H%M%S-%f"));
        open_append(&self.base_dir.join(filename))
    }

    fn log_files(&self) -> Result<Vec<PathBuf>, TriageError> {
        let mut entries = fs::read_dir(&self.base_dir)
            .map_err(|e| TriageError::io(Stage::Audit, e))?
            .filter_map(|res| res.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map_or(false, |ext| ext == "jsonl"))
            .collect::<Vec<_>>();

        // Sort by filename (timestamp ensures order)
        entries.sort();
        Ok(entries)
    }

    fn find_latest_log_file(&self) -> Result<Option<PathBuf>, TriageError> {
        Ok(self.log_files()?.pop())
    }
}

fn open_append(path: &Path) -> Result<File, TriageError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TriageError::io(Stage::Audit, e))
}

fn file_len(file: &File) -> Result<u64, TriageError> {
    Ok(file.metadata().map_err(|e| TriageError::io(Stage::Audit, e))?.len())
}
