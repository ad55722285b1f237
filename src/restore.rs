use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::history::{read_change_log, ChangeLog, HistoryError, RenameRecord};
use crate::progress::Progress;
use crate::rename::{rename_path, OperationError};

#[derive(Debug, Clone, Copy, Default)]
pub struct RestoreOptions {
    pub dry_run: bool,
}

/// A single rename to undo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOperation {
    /// Path the item currently has (the recorded `new`)
    pub current_path: PathBuf,
    /// Path it is moved back to (the recorded `old`)
    pub restore_path: PathBuf,
}

#[derive(Debug)]
pub struct RestoreFailure {
    pub operation: RestoreOperation,
    pub error: OperationError,
}

/// Result of a restore run
#[derive(Debug)]
pub struct RestoreResult {
    pub log_path: PathBuf,
    pub dry_run: bool,
    /// Renames undone (or, in a dry run, that would be undone)
    pub restored: Vec<RestoreOperation>,
    /// Records whose renamed path no longer exists
    pub missing: usize,
    pub failures: Vec<RestoreFailure>,
    /// Deleted paths listed in the log; these cannot be brought back
    pub unrecoverable_deletions: usize,
    /// Records whose original name was not valid UTF-8 when it was logged
    pub lossy_names: usize,
}

impl RestoreResult {
    pub fn restored_count(&self) -> usize {
        self.restored.len()
    }
}

/// Undo every rename recorded in a change log.
///
/// Folder renames are undone first, deepest last-renamed first, so that the file
/// paths recorded under the original folder names exist again; file renames follow
/// in reverse order. Records whose renamed path is gone are skipped silently, and a
/// failing item never stops the remaining ones.
pub fn restore_from_log(
    log_path: &Path,
    options: &RestoreOptions,
    progress: &mut Progress,
) -> Result<RestoreResult, HistoryError> {
    info!("Loading change log from: {:?}", log_path);

    let log = read_change_log(log_path)?;

    info!(
        files = log.files.len(),
        folders = log.folders.len(),
        deleted = log.deleted.len(),
        created = %log.created,
        "Change log loaded"
    );

    if log.is_empty() {
        progress.warn("The backup records no changes; nothing to restore");
    }

    Ok(restore_log(&log, log_path, options, progress))
}

fn restore_log(
    log: &ChangeLog,
    log_path: &Path,
    options: &RestoreOptions,
    progress: &mut Progress,
) -> RestoreResult {
    let records = restore_order(log);
    let total = records.len();

    progress.restore_start(total, &log.created.format("%Y-%m-%dT%H:%M:%S").to_string());

    let mut result = RestoreResult {
        log_path: log_path.to_path_buf(),
        dry_run: options.dry_run,
        restored: Vec::new(),
        missing: 0,
        failures: Vec::new(),
        unrecoverable_deletions: log.deleted.len(),
        lossy_names: 0,
    };

    // Dry run only: folders that would have been moved back, as (old, new)
    let mut pending_folders: Vec<(PathBuf, PathBuf)> = Vec::new();

    for (i, record) in records.into_iter().enumerate() {
        let operation = RestoreOperation {
            current_path: PathBuf::from(&record.new),
            restore_path: PathBuf::from(&record.old),
        };

        if record.old.contains(char::REPLACEMENT_CHARACTER) {
            warn!(path = %record.old, "Recorded name was not valid UTF-8");
            progress.warn(&format!(
                "{} was recorded from an undecodable name; it is restored with U+FFFD in place of the original bytes",
                record.old
            ));
            result.lossy_names += 1;
        }

        let on_disk = on_disk_path(&operation.current_path, &pending_folders);
        if !on_disk.exists() {
            debug!(path = ?operation.current_path, "Renamed path missing, skipping");
            result.missing += 1;
            continue;
        }

        progress.restore_progress(i + 1, total, &operation.current_path, &operation.restore_path);

        if options.dry_run {
            let target = on_disk_path(&operation.restore_path, &pending_folders);
            if target.exists() {
                let error = OperationError::DestinationExists(operation.restore_path.clone());
                result.failures.push(RestoreFailure { operation, error });
                continue;
            }

            if on_disk.is_dir() {
                pending_folders.push((
                    operation.restore_path.clone(),
                    operation.current_path.clone(),
                ));
            }
            result.restored.push(operation);
            continue;
        }

        info!("Restoring: {} -> {}", record.new, record.old);

        match rename_path(&operation.current_path, &operation.restore_path) {
            Ok(()) => result.restored.push(operation),
            Err(error) => {
                warn!(path = ?operation.current_path, error = %error, "Restore failed");
                progress.warn(&format!(
                    "Restore failed for {}: {}",
                    operation.current_path.display(),
                    error
                ));
                result.failures.push(RestoreFailure { operation, error });
            }
        }
    }

    if result.unrecoverable_deletions > 0 {
        info!(
            count = result.unrecoverable_deletions,
            "Deleted paths in the log cannot be restored"
        );
    }

    info!(
        restored = result.restored_count(),
        missing = result.missing,
        failed = result.failures.len(),
        dry_run = options.dry_run,
        "Restore finished"
    );

    result
}

/// Where a recorded path sits on disk once the folders a dry run would already
/// have moved back are taken into account. The latest folder is unwound first.
fn on_disk_path(path: &Path, pending_folders: &[(PathBuf, PathBuf)]) -> PathBuf {
    let mut current = path.to_path_buf();
    for (old, new) in pending_folders.iter().rev() {
        if let Ok(rest) = current.strip_prefix(old) {
            current = new.join(rest);
        }
    }
    current
}

fn restore_order(log: &ChangeLog) -> Vec<&RenameRecord> {
    log.folders.iter().rev().chain(log.files.iter().rev()).collect()
}
