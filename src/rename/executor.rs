use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::history::ChangeLog;
use crate::progress::Progress;
use crate::scanner::{DirectoryListing, EntryKind, FsListing};

use super::types::{Operation, Plan};

/// Why a single operation could not be applied
#[derive(Error, Debug)]
pub enum OperationError {
    #[error("Source not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Directory could not be fully removed: {}", .0.display())]
    IncompleteDelete(PathBuf),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    /// Report operations without touching the filesystem
    pub preview: bool,
}

#[derive(Debug)]
pub struct Failure {
    pub operation: Operation,
    pub error: OperationError,
}

/// Outcome of running a plan
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub preview: bool,
    /// Operations applied (or, in preview, planned)
    pub completed: Vec<Operation>,
    pub failures: Vec<Failure>,
}

impl ExecutionReport {
    pub fn renamed(&self) -> usize {
        self.completed.iter().filter(|op| op.is_rename()).count()
    }

    pub fn deleted(&self) -> usize {
        self.completed.len() - self.renamed()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Run every operation of the plan in order.
///
/// In preview mode nothing is touched and every planned operation is recorded in
/// the log. Otherwise each operation is applied; a failure is reported and the
/// rest of the batch still runs, and only successful operations are recorded.
pub fn execute_plan(
    plan: &Plan,
    options: &ExecuteOptions,
    log: &mut ChangeLog,
    progress: &mut Progress,
) -> ExecutionReport {
    let total = plan.len();
    let mut report = ExecutionReport {
        preview: options.preview,
        ..Default::default()
    };

    info!(total, preview = options.preview, "Executing plan");

    let mut current_season: Option<&Path> = None;

    for (i, op) in plan.operations.iter().enumerate() {
        if let Operation::RenameFile { from, .. } = op {
            let folder = from.parent();
            if folder != current_season {
                current_season = folder;
                if let Some(folder) = folder {
                    if let Some(season) = plan.season_of(folder) {
                        progress.season_start(folder, season);
                    }
                }
            }
        }

        if options.preview {
            progress.preview_operation(i + 1, total, op);
            log.record(op);
            report.completed.push(op.clone());
            continue;
        }

        match apply_operation(op) {
            Ok(()) => {
                debug!(operation = ?op, "Applied");
                if op.source().to_str().is_none() {
                    warn!(path = ?op.source(), "Original name is not valid UTF-8");
                    progress.warn(&format!(
                        "{} is not valid UTF-8; the backup stores it lossily and a restore cannot reproduce it exactly",
                        op.source().to_string_lossy()
                    ));
                }
                progress.operation_done(i + 1, total, op);
                log.record(op);
                report.completed.push(op.clone());
            }
            Err(error) => {
                warn!(operation = ?op, error = %error, "Operation failed");
                progress.operation_failed(op, &error);
                report.failures.push(Failure {
                    operation: op.clone(),
                    error,
                });
            }
        }
    }

    info!(
        completed = report.completed.len(),
        failed = report.failures.len(),
        "Plan executed"
    );

    report
}

/// Apply a single operation to the filesystem
pub fn apply_operation(op: &Operation) -> Result<(), OperationError> {
    match op {
        Operation::RenameFile { from, to } | Operation::RenameFolder { from, to } => {
            rename_path(from, to)
        }
        Operation::Delete { path, kind } => delete_path(path, *kind),
    }
}

fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Rename without ever replacing an existing destination
pub fn rename_path(from: &Path, to: &Path) -> Result<(), OperationError> {
    if !path_exists(from) {
        return Err(OperationError::SourceMissing(from.to_path_buf()));
    }

    if path_exists(to) {
        return Err(OperationError::DestinationExists(to.to_path_buf()));
    }

    fs::rename(from, to).map_err(|e| map_io_error(e, from))
}

fn delete_path(path: &Path, kind: EntryKind) -> Result<(), OperationError> {
    if !path_exists(path) {
        return Err(OperationError::SourceMissing(path.to_path_buf()));
    }

    match kind {
        EntryKind::File => fs::remove_file(path).map_err(|e| map_io_error(e, path)),
        EntryKind::Directory => {
            unlock_tree(path);

            // Errors are ignored here; what matters is whether the folder is gone
            if let Err(e) = fs::remove_dir_all(path) {
                debug!(path = ?path, error = %e, "Recursive removal failed, removing entry by entry");
                remove_tree_best_effort(path);
            }

            if path_exists(path) {
                Err(OperationError::IncompleteDelete(path.to_path_buf()))
            } else {
                Ok(())
            }
        }
    }
}

fn map_io_error(e: std::io::Error, path: &Path) -> OperationError {
    match e.kind() {
        ErrorKind::NotFound => OperationError::SourceMissing(path.to_path_buf()),
        ErrorKind::PermissionDenied => OperationError::PermissionDenied(path.to_path_buf()),
        _ => OperationError::Io(e),
    }
}

/// Clear read-only flags on a directory and everything below it
pub fn unlock_tree(path: &Path) {
    make_writable(path);

    let is_dir = fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return;
    }

    match FsListing.list(path) {
        Ok(entries) => {
            for entry in entries {
                if entry.is_dir() {
                    unlock_tree(&entry.path);
                } else {
                    make_writable(&entry.path);
                }
            }
        }
        Err(e) => debug!(path = ?path, error = %e, "Cannot list directory to unlock"),
    }
}

fn make_writable(path: &Path) {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return;
    };

    if metadata.file_type().is_symlink() {
        return;
    }

    if let Some(permissions) = writable_permissions(&metadata) {
        if let Err(e) = fs::set_permissions(path, permissions) {
            debug!(path = ?path, error = %e, "Could not clear read-only flag");
        }
    }
}

#[cfg(unix)]
fn writable_permissions(metadata: &fs::Metadata) -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = metadata.permissions();
    let mode = permissions.mode();
    let wanted = if metadata.is_dir() {
        mode | 0o700
    } else {
        mode | 0o600
    };

    if wanted == mode {
        return None;
    }

    permissions.set_mode(wanted);
    Some(permissions)
}

#[cfg(not(unix))]
fn writable_permissions(metadata: &fs::Metadata) -> Option<fs::Permissions> {
    let mut permissions = metadata.permissions();
    if !permissions.readonly() {
        return None;
    }

    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    Some(permissions)
}

fn remove_tree_best_effort(path: &Path) {
    if let Ok(entries) = FsListing.list(path) {
        for entry in entries {
            if entry.is_dir() {
                remove_tree_best_effort(&entry.path);
            } else {
                let _ = fs::remove_file(&entry.path);
            }
        }
    }

    let _ = fs::remove_dir(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::tests::{create_test_progress, output_of};
    use tempfile::tempdir;

    fn new_log(root: &Path) -> ChangeLog {
        ChangeLog::new(root)
    }

    #[test]
    fn test_preview_touches_nothing_but_records_plan() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.E001.mkv");
        fs::write(&source, "x").unwrap();

        let mut plan = Plan::new();
        plan.add_operation(Operation::rename_file(source.clone(), "Show-S01E001-.mp4"));
        plan.add_operation(Operation::delete(source.clone(), EntryKind::File));

        let mut log = new_log(dir.path());
        let (mut progress, buffer) = create_test_progress();
        let report = execute_plan(
            &plan,
            &ExecuteOptions { preview: true },
            &mut log,
            &mut progress,
        );

        assert!(source.exists());
        assert!(!dir.path().join("Show-S01E001-.mp4").exists());
        assert_eq!(report.completed.len(), 2);
        assert_eq!(log.files.len(), 1);
        assert_eq!(log.deleted.len(), 1);
        assert!(output_of(&buffer).contains("[TEST]"));
    }

    #[test]
    fn test_apply_renames_and_records() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.E001.mkv");
        fs::write(&source, "x").unwrap();

        let mut plan = Plan::new();
        plan.add_operation(Operation::rename_file(source.clone(), "Show-S01E001-.mp4"));

        let mut log = new_log(dir.path());
        let report = execute_plan(
            &plan,
            &ExecuteOptions::default(),
            &mut log,
            &mut Progress::silent(),
        );

        assert!(!source.exists());
        assert!(dir.path().join("Show-S01E001-.mp4").exists());
        assert_eq!(report.renamed(), 1);
        assert!(!report.has_failures());
        assert_eq!(log.files.len(), 1);
    }

    #[test]
    fn test_failure_does_not_abort_batch() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("b.E002.mkv");
        fs::write(&present, "x").unwrap();

        let mut plan = Plan::new();
        plan.add_operation(Operation::rename_file(dir.path().join("missing.mkv"), "X.mp4"));
        plan.add_operation(Operation::rename_file(present.clone(), "Show-S01E002-.mp4"));

        let mut log = new_log(dir.path());
        let report = execute_plan(
            &plan,
            &ExecuteOptions::default(),
            &mut log,
            &mut Progress::silent(),
        );

        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            OperationError::SourceMissing(_)
        ));
        assert_eq!(report.renamed(), 1);
        assert!(dir.path().join("Show-S01E002-.mp4").exists());
        assert_eq!(log.files.len(), 1);
    }

    #[test]
    fn test_collision_is_reported_not_overwritten() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("Show.E004.avi");
        let second = dir.path().join("Show.E004.mkv");
        fs::write(&first, "first").unwrap();
        fs::write(&second, "second").unwrap();

        let mut plan = Plan::new();
        plan.add_operation(Operation::rename_file(first.clone(), "Show-S01E004-.mp4"));
        plan.add_operation(Operation::rename_file(second.clone(), "Show-S01E004-.mp4"));

        let mut log = new_log(dir.path());
        let report = execute_plan(
            &plan,
            &ExecuteOptions::default(),
            &mut log,
            &mut Progress::silent(),
        );

        assert_eq!(report.renamed(), 1);
        assert!(matches!(
            report.failures[0].error,
            OperationError::DestinationExists(_)
        ));
        assert!(second.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("Show-S01E004-.mp4")).unwrap(),
            "first"
        );
    }

    #[test]
    fn test_delete_file() {
        let dir = tempdir().unwrap();
        let nfo = dir.path().join("tvshow.nfo");
        fs::write(&nfo, "<xml/>").unwrap();

        apply_operation(&Operation::delete(nfo.clone(), EntryKind::File)).unwrap();

        assert!(!nfo.exists());
    }

    #[test]
    fn test_delete_missing_path_fails() {
        let dir = tempdir().unwrap();
        let result = apply_operation(&Operation::delete(
            dir.path().join("gone.nfo"),
            EntryKind::File,
        ));
        assert!(matches!(result, Err(OperationError::SourceMissing(_))));
    }

    #[test]
    fn test_delete_read_only_directory_tree() {
        let dir = tempdir().unwrap();
        let trickplay = dir.path().join("Ep 1.trickplay");
        let inner = trickplay.join("320 - 10x10");
        fs::create_dir_all(&inner).unwrap();
        let tile = inner.join("0.jpg");
        fs::write(&tile, "jpg").unwrap();

        let mut permissions = fs::metadata(&tile).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&tile, permissions).unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&inner, fs::Permissions::from_mode(0o555)).unwrap();
        }

        apply_operation(&Operation::delete(trickplay.clone(), EntryKind::Directory)).unwrap();

        assert!(!trickplay.exists());
    }

    #[test]
    fn test_rename_folder() {
        let dir = tempdir().unwrap();
        let season = dir.path().join("S01E001-E012");
        fs::create_dir(&season).unwrap();

        apply_operation(&Operation::rename_folder(season.clone(), "Season 01 (E001-E012)")).unwrap();

        assert!(!season.exists());
        assert!(dir.path().join("Season 01 (E001-E012)").is_dir());
    }

    #[test]
    fn test_season_header_precedes_its_episodes() {
        let dir = tempdir().unwrap();
        let season = dir.path().join("S01E001-E012");
        fs::create_dir(&season).unwrap();
        fs::write(season.join("a.E001.mkv"), "1").unwrap();
        fs::write(season.join("a.E002.mkv"), "2").unwrap();

        let mut plan = Plan::new();
        plan.add_season(
            season.clone(),
            crate::parser::parse_season_folder("S01E001-E012").unwrap(),
        );
        plan.add_operation(Operation::rename_file(season.join("a.E001.mkv"), "Show-S01E001-.mp4"));
        plan.add_operation(Operation::rename_file(season.join("a.E002.mkv"), "Show-S01E002-.mp4"));

        let mut log = new_log(dir.path());
        let (mut progress, buffer) = create_test_progress();
        execute_plan(&plan, &ExecuteOptions { preview: true }, &mut log, &mut progress);

        let output = output_of(&buffer);
        let header = "S01E001-E012 -> Season 01 (Episodes 1-12)";
        assert_eq!(output.matches(header).count(), 1);
        assert!(output.find(header).unwrap() < output.find("a.E001.mkv").unwrap());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_undecodable_source_is_renamed_with_warning() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let source = dir.path().join(OsStr::from_bytes(b"Show.E004.Caf\xe9.mkv"));
        fs::write(&source, "4").unwrap();

        let mut plan = Plan::new();
        plan.add_operation(Operation::rename_file(source.clone(), "Show-S01E004-Caf\u{FFFD}.mp4"));

        let mut log = new_log(dir.path());
        let (mut progress, buffer) = create_test_progress();
        let report = execute_plan(&plan, &ExecuteOptions::default(), &mut log, &mut progress);

        assert_eq!(report.renamed(), 1);
        assert!(!source.exists());
        assert!(log.files[0].old.contains('\u{FFFD}'));
        assert!(output_of(&buffer).contains("restore cannot reproduce it exactly"));
    }
}
