//! CSV Training Data I/O
//!
//! Header bắt buộc: FEATURE_LAYOUT + `label`. Header lệch là schema drift (fatal),
//! file thiếu / rỗng là TrainingError.

use std::path::Path;
use log::info;
use ndarray::Array2;
use crate::logic::error::{Stage, TriageError};
use crate::logic::features::{validate_header, vector::check_code, FEATURE_COUNT, FEATURE_LAYOUT, LABEL_COLUMN};
use super::record::TrainingSet;

/// Load the labeled training CSV
pub fn load_csv(path: &Path) -> Result<TrainingSet, TriageError> {
    if !path.exists() {
        return Err(TriageError::Training(format!(
            "dataset not found at {} (generate one with `sar-triage dataset --out <path>`)",
            path.display()
        )));
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| TriageError::Training(format!("cannot open {}: {}", path.display(), e)))?;

    let headers = reader
        .headers()
        .map_err(|e| TriageError::Training(format!("cannot read header: {}", e)))?
        .clone();
    let header: Vec<&str> = headers.iter().map(str::trim).collect();
    validate_header(&header)?;

    let mut values: Vec<f32> = Vec::new();
    let mut labels: Vec<u8> = Vec::new();

    for (line, result) in reader.records().enumerate() {
        // header is line 1
        let row_no = line + 2;
        let record = result
            .map_err(|e| TriageError::Training(format!("row {}: {}", row_no, e)))?;

        for index in 0..FEATURE_COUNT {
            let value = parse_cell(&record, index, row_no)?;
            check_code(index, value)
                .map_err(|e| TriageError::Training(format!("row {}: {}", row_no, e)))?;
            values.push(value);
        }

        let label = record
            .get(FEATURE_COUNT)
            .and_then(|s| s.trim().parse::<u8>().ok())
            .filter(|l| *l <= 1)
            .ok_or_else(|| {
                TriageError::Training(format!("row {}: {} must be 0 or 1", row_no, LABEL_COLUMN))
            })?;
        labels.push(label);
    }

    if labels.is_empty() {
        return Err(TriageError::Training(format!(
            "dataset {} has no rows",
            path.display()
        )));
    }

    let features = Array2::from_shape_vec((labels.len(), FEATURE_COUNT), values)
        .map_err(|e| TriageError::Training(format!("feature matrix shape: {}", e)))?;

    info!("Loaded {} training samples from {}", labels.len(), path.display());

    TrainingSet::new(features, labels)
}

fn parse_cell(record: &csv::StringRecord, index: usize, row_no: usize) -> Result<f32, TriageError> {
    record
        .get(index)
        .and_then(|s| s.trim().parse::<f32>().ok())
        .ok_or_else(|| {
            TriageError::Training(format!(
                "row {}: {} is not a number",
                row_no, FEATURE_LAYOUT[index]
            ))
        })
}

/// Write a training set as CSV (creates parent directories)
pub fn write_csv(path: &Path, set: &TrainingSet) -> Result<(), TriageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| TriageError::io(Stage::Training, e))?;
        }
    }

    let to_training = |e: csv::Error| TriageError::Training(format!("write {}: {}", path.display(), e));

    let mut wtr = csv::Writer::from_path(path).map_err(to_training)?;

    let mut header: Vec<&str> = FEATURE_LAYOUT.to_vec();
    header.push(LABEL_COLUMN);
    wtr.write_record(&header).map_err(to_training)?;

    for (row, label) in set.features.outer_iter().zip(set.labels.iter()) {
        let mut fields: Vec<String> = row.iter().map(|v| format!("{}", *v as u8)).collect();
        fields.push(label.to_string());
        wtr.write_record(&fields).map_err(to_training)?;
    }

    wtr.flush().map_err(|e| TriageError::io(Stage::Training, e))?;

    info!("Wrote {} training rows to {}", set.len(), path.display());
    Ok(())
}
