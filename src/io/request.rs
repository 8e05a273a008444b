//! Read/write scoring request JSON files.
//!
//! A request file is one JSON object mapping feature names to values, e.g.
//! `{"disbursed_amount": 100000, "Employment.Type": "Salaried", ...}`.
//! `ldr template` writes the form defaults in this layout.

use std::fs::File;
use std::path::Path;

use crate::domain::ScoringRequest;
use crate::error::{AppError, EXIT_CONFIG, EXIT_RUNTIME};

/// Read a request JSON file.
///
/// File and JSON syntax problems are usage errors; a well-formed file whose
/// values have unsupported types is rejected as a schema mismatch.
pub fn read_request_json(path: &Path) -> Result<ScoringRequest, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to open request JSON '{}': {e}", path.display())))?;
    let value: serde_json::Value = serde_json::from_reader(file)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Invalid request JSON: {e}")))?;
    Ok(ScoringRequest::from_json(&value)?)
}

/// Write a request JSON file.
pub fn write_request_json(path: &Path, request: &ScoringRequest) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to create '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &request.to_json())
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to write request JSON: {e}")))?;
    Ok(())
}
