//! Progress output for user-facing status updates.
//!
//! Every planned, applied, failed or restored item is reported here as it happens.
//! In verbose mode output is suppressed since tracing handles everything.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::parser::SeasonFolder;
use crate::rename::{Operation, OperationError};

/// Progress reporter for user-facing output
pub struct Progress {
    writer: Box<dyn Write>,
    /// When true, all output is suppressed (verbose mode uses tracing instead)
    silent: bool,
    /// When true, output is colorized
    colors_enabled: bool,
}

/// Check if we should use colors in output
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    io::stderr().is_terminal()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Short "from -> to" pieces for an operation
fn describe(op: &Operation) -> (&'static str, String, Option<String>) {
    match op {
        Operation::RenameFile { from, to } => ("File", display_name(from), Some(display_name(to))),
        Operation::RenameFolder { from, to } => {
            ("Folder", display_name(from), Some(display_name(to)))
        }
        Operation::Delete { path, .. } => ("Delete", path.display().to_string(), None),
    }
}

impl Progress {
    /// Create a progress reporter that respects UI mode
    /// When verbose=true, output is suppressed (tracing handles it)
    pub fn new_with_ui(verbose: bool, colors_enabled: bool) -> Self {
        if !colors_enabled {
            colored::control::set_override(false);
        }
        Self {
            writer: Box::new(io::stderr()),
            silent: verbose,
            colors_enabled,
        }
    }

    /// Create a progress reporter with a custom writer (for testing)
    pub fn with_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            silent: false,
            colors_enabled: false,
        }
    }

    /// Create a silent progress reporter
    pub fn silent() -> Self {
        Self {
            writer: Box::new(io::sink()),
            silent: true,
            colors_enabled: false,
        }
    }

    /// Report the start of planning
    pub fn scan_start(&mut self, root: &Path) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{}",
                format!("Scanning {}...", root.display()).dimmed()
            );
        } else {
            let _ = writeln!(self.writer, "Scanning {}...", root.display());
        }
    }

    /// Header shown before the episodes of one season folder
    pub fn season_start(&mut self, folder: &Path, season: &SeasonFolder) {
        if self.silent {
            return;
        }
        let folder = display_name(folder);
        let target = format!(
            "Season {:02} (Episodes {}-{})",
            season.season, season.start, season.end
        );
        let _ = writeln!(self.writer);
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {} {}", folder.bold(), "→".cyan(), target.bold());
        } else {
            let _ = writeln!(self.writer, "{} -> {}", folder, target);
        }
    }

    /// Report a planned operation in preview mode
    pub fn preview_operation(&mut self, current: usize, total: usize, op: &Operation) {
        if self.silent {
            return;
        }
        let (kind, from, to) = describe(op);
        let counter = format!("[{}/{}]", current, total);
        if self.colors_enabled {
            let tag = format!("[TEST] {}", kind);
            match to {
                Some(to) => {
                    let _ = writeln!(
                        self.writer,
                        "{} {} {} {} {}",
                        counter.cyan(),
                        tag.yellow(),
                        from.dimmed(),
                        "→".cyan(),
                        to
                    );
                }
                None => {
                    let _ = writeln!(self.writer, "{} {} {}", counter.cyan(), tag.yellow(), from);
                }
            }
        } else {
            match to {
                Some(to) => {
                    let _ = writeln!(
                        self.writer,
                        "{} [TEST] {}: {} -> {}",
                        counter, kind, from, to
                    );
                }
                None => {
                    let _ = writeln!(self.writer, "{} [TEST] Would delete: {}", counter, from);
                }
            }
        }
    }

    /// Report an operation that was applied successfully
    pub fn operation_done(&mut self, current: usize, total: usize, op: &Operation) {
        if self.silent {
            return;
        }
        let (kind, from, to) = describe(op);
        let counter = format!("[{}/{}]", current, total);
        if self.colors_enabled {
            match to {
                Some(to) => {
                    let _ = writeln!(
                        self.writer,
                        "{} {} {} {} {}",
                        counter.cyan(),
                        "✓".green(),
                        from.dimmed(),
                        "→".cyan(),
                        to
                    );
                }
                None => {
                    let _ = writeln!(
                        self.writer,
                        "{} {} {}",
                        counter.cyan(),
                        "✓ Deleted".green(),
                        from
                    );
                }
            }
        } else {
            match to {
                Some(to) => {
                    let _ = writeln!(self.writer, "{} [OK] {}: {} -> {}", counter, kind, from, to);
                }
                None => {
                    let _ = writeln!(self.writer, "{} [OK] Deleted: {}", counter, from);
                }
            }
        }
    }

    /// Report an operation that failed; the batch continues
    pub fn operation_failed(&mut self, op: &Operation, error: &OperationError) {
        let (kind, from, _) = describe(op);
        self.warn(&format!("{} failed for {}: {}", kind, from, error));
    }

    /// Report a trickplay file that was left alone
    pub fn trickplay_ignored(&mut self, path: &Path) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{}",
                format!("Ignored trickplay: {}", display_name(path)).dimmed()
            );
        } else {
            let _ = writeln!(self.writer, "[INFO] Ignored trickplay: {}", display_name(path));
        }
    }

    /// Report an error during operation (non-fatal)
    pub fn warn(&mut self, message: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "!".yellow().bold(), message.yellow());
        } else {
            let _ = writeln!(self.writer, "Warning: {}", message);
        }
    }

    /// Report change log written
    pub fn log_written(&mut self, path: &Path) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{}",
                format!("Backup saved to: {}", path.display()).dimmed()
            );
        } else {
            let _ = writeln!(self.writer, "Backup saved to: {}", path.display());
        }
    }

    /// Report starting a restore
    pub fn restore_start(&mut self, total: usize, created: &str) {
        if self.silent {
            return;
        }
        let _ = writeln!(self.writer);
        let message = format!(
            "Restoring {} renamed items from backup created on {}",
            total, created
        );
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{}", message.bold());
        } else {
            let _ = writeln!(self.writer, "{}", message);
        }
    }

    /// Report progress on a single restore
    pub fn restore_progress(&mut self, current: usize, total: usize, from: &Path, to: &Path) {
        if self.silent {
            return;
        }
        let from = display_name(from);
        let to = display_name(to);
        if self.colors_enabled {
            let counter = format!("[{}/{}]", current, total);
            let _ = writeln!(
                self.writer,
                "{} {} {} {}",
                counter.cyan(),
                from.dimmed(),
                "→".cyan(),
                to
            );
        } else {
            let _ = writeln!(self.writer, "[{}/{}] {} -> {}", current, total, from, to);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scanner::EntryKind;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    pub(crate) fn create_test_progress() -> (Progress, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = TestWriter(buffer.clone());
        let progress = Progress::with_writer(Box::new(writer));
        (progress, buffer)
    }

    pub(crate) fn output_of(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    struct TestWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_preview_operation() {
        let (mut progress, buffer) = create_test_progress();

        progress.preview_operation(
            1,
            2,
            &Operation::rename_file(PathBuf::from("/m/S1E1-E2/a.E001.mkv"), "Show-S01E001-.mp4"),
        );
        progress.preview_operation(
            2,
            2,
            &Operation::delete(PathBuf::from("/m/tvshow.nfo"), EntryKind::File),
        );

        let output = output_of(&buffer);
        assert!(output.contains("[1/2] [TEST] File: a.E001.mkv -> Show-S01E001-.mp4"));
        assert!(output.contains("[2/2] [TEST] Would delete: /m/tvshow.nfo"));
    }

    #[test]
    fn test_operation_done_and_failed() {
        let (mut progress, buffer) = create_test_progress();
        let op = Operation::rename_folder(PathBuf::from("/m/S1E1-E2"), "Season 01 (E1-E2)");

        progress.operation_done(1, 1, &op);
        progress.operation_failed(&op, &OperationError::SourceMissing(PathBuf::from("/m/S1E1-E2")));

        let output = output_of(&buffer);
        assert!(output.contains("[OK] Folder: S1E1-E2 -> Season 01 (E1-E2)"));
        assert!(output.contains("Warning: Folder failed for S1E1-E2"));
    }

    #[test]
    fn test_season_start() {
        let (mut progress, buffer) = create_test_progress();
        let season = crate::parser::parse_season_folder("S01E001-E012").unwrap();

        progress.season_start(Path::new("/m/S01E001-E012"), &season);

        assert!(output_of(&buffer).contains("S01E001-E012 -> Season 01 (Episodes 1-12)"));
    }

    #[test]
    fn test_silent_writes_nothing() {
        let mut progress = Progress::silent();
        progress.warn("ignored");
        progress.restore_progress(1, 1, Path::new("/m/a.mp4"), Path::new("/m/b.mkv"));
    }

    #[test]
    fn test_restore_output() {
        let (mut progress, buffer) = create_test_progress();

        progress.restore_start(2, "2026-01-15T10:30:45");
        progress.restore_progress(1, 2, Path::new("/m/new.mp4"), Path::new("/m/old.mkv"));

        let output = output_of(&buffer);
        assert!(output.contains("Restoring 2 renamed items"));
        assert!(output.contains("[1/2] new.mp4 -> old.mkv"));
        assert!(!output.contains("Restored"));
    }
}
