use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::types::*;

/// Error types for change log operations
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Failed to write change log: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to serialize change log: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Backup file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read change log: {0}")]
    ReadError(String),
}

/// Persist a change log inside `backup_dir`, creating the directory if needed.
///
/// Returns the path of the written file.
pub fn write_change_log(log: &ChangeLog, backup_dir: &Path) -> Result<PathBuf, HistoryError> {
    fs::create_dir_all(backup_dir)?;

    let file_path = backup_dir.join(log.generate_filename());

    if !file_path.exists() {
        return write_to_path(log, &file_path);
    }

    warn!("Change log already exists: {:?}", file_path);

    // Same second as an earlier run: add a counter
    let stem = log.generate_filename().trim_end_matches(".json").to_string();
    let mut counter = 1;
    loop {
        let unique_path = backup_dir.join(format!("{}-{}.json", stem, counter));
        if !unique_path.exists() {
            return write_to_path(log, &unique_path);
        }
        counter += 1;
    }
}

fn write_to_path(log: &ChangeLog, path: &Path) -> Result<PathBuf, HistoryError> {
    // Write to temporary file first
    let temp_path = path.with_extension("json.tmp");

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, log)?;
        writer.flush()?;
    }

    // Atomic rename
    fs::rename(&temp_path, path)?;

    info!("Change log written to: {:?}", path);

    Ok(path.to_path_buf())
}
