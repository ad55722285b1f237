use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::types::*;
use super::writer::HistoryError;

/// Read and parse a change log
pub fn read_change_log(path: &Path) -> Result<ChangeLog, HistoryError> {
    if !path.is_file() {
        return Err(HistoryError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)
        .map_err(|e| HistoryError::ReadError(format!("Cannot open file: {}", e)))?;

    let reader = BufReader::new(file);
    let log: ChangeLog = serde_json::from_reader(reader)
        .map_err(|e| HistoryError::ReadError(format!("Invalid JSON: {}", e)))?;

    Ok(log)
}
