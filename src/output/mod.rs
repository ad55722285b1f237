use crate::rename::{ExecutionReport, Operation, Plan};
use crate::restore::RestoreResult;
use crate::validator::Collision;
use std::io::{self, Write};
use std::path::Path;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Display the planned changes of a preview run
pub fn display_preview(
    plan: &Plan,
    collisions: &[Collision],
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "========================================")?;
    writeln!(writer, "              PREVIEW")?;
    writeln!(writer, "========================================")?;
    writeln!(writer)?;
    writeln!(writer, "Operations: {}", plan.len())?;
    writeln!(writer)?;

    if plan.is_empty() {
        writeln!(writer, "Nothing to rename or delete.")?;
        return Ok(());
    }

    writeln!(writer, "Planned changes:")?;
    writeln!(writer)?;

    for (i, op) in plan.operations.iter().enumerate() {
        match op {
            Operation::RenameFile { from, to } => {
                writeln!(writer, "  {}. [file] {}", i + 1, from.display())?;
                writeln!(writer, "     To:   {}", file_name(to))?;
            }
            Operation::RenameFolder { from, to } => {
                writeln!(writer, "  {}. [folder] {}", i + 1, from.display())?;
                writeln!(writer, "     To:   {}", file_name(to))?;
            }
            Operation::Delete { path, .. } => {
                writeln!(writer, "  {}. [delete] {}", i + 1, path.display())?;
            }
        }
        writeln!(writer)?;
    }

    if !collisions.is_empty() {
        writeln!(writer, "[!] Name collisions (only the first rename of each will succeed):")?;
        for collision in collisions {
            write!(writer, "{}", collision.format_message())?;
        }
        writeln!(writer)?;
    }

    // Summary
    writeln!(writer, "----------------------------------------")?;
    writeln!(writer, "Summary:")?;
    writeln!(writer, "  {} files would be renamed", plan.file_renames())?;
    writeln!(writer, "  {} folders would be renamed", plan.folder_renames())?;
    writeln!(writer, "  {} items would be deleted", plan.deletions())?;
    writeln!(writer)?;
    writeln!(writer, "Run without --dry to apply these changes.")?;

    Ok(())
}

/// Display execution results (non-preview)
pub fn display_execution_result(
    report: &ExecutionReport,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "Done. {} items renamed, {} deleted.",
        report.renamed(),
        report.deleted()
    )?;

    if report.has_failures() {
        writeln!(writer, "  {} operations failed:", report.failures.len())?;
        for failure in &report.failures {
            writeln!(
                writer,
                "  - {}: {}",
                failure.operation.source().display(),
                failure.error
            )?;
        }
    }

    Ok(())
}

/// Display the outcome of a restore
pub fn display_restore_result(result: &RestoreResult, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;

    if result.dry_run {
        writeln!(
            writer,
            "Would restore {} items from {}.",
            result.restored_count(),
            result.log_path.display()
        )?;
    } else {
        writeln!(writer, "Restored {} items.", result.restored_count())?;
    }

    if result.missing > 0 {
        writeln!(
            writer,
            "  {} items skipped (renamed path no longer exists).",
            result.missing
        )?;
    }

    if !result.failures.is_empty() {
        writeln!(writer, "  {} items could not be restored:", result.failures.len())?;
        for failure in &result.failures {
            writeln!(
                writer,
                "  - {}: {}",
                failure.operation.current_path.display(),
                failure.error
            )?;
        }
    }

    if result.lossy_names > 0 {
        writeln!(
            writer,
            "  {} items had undecodable original names; they were restored with U+FFFD in place of the original bytes.",
            result.lossy_names
        )?;
    }

    if result.unrecoverable_deletions > 0 {
        writeln!(
            writer,
            "  {} deleted items are listed in the backup and cannot be restored.",
            result.unrecoverable_deletions
        )?;
    }

    Ok(())
}
