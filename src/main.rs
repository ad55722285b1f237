use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use tracing::{debug, error, info};

use jellynamer::cli::Args;
use jellynamer::config::Config;
use jellynamer::error::AppError;
use jellynamer::history::{write_change_log, ChangeLog};
use jellynamer::logging;
use jellynamer::output::{display_execution_result, display_preview, display_restore_result};
use jellynamer::progress::{should_use_colors, Progress};
use jellynamer::prompt::{Choice, Prompter};
use jellynamer::rename::{build_plan, execute_plan, ExecuteOptions, SkipReason};
use jellynamer::restore::{restore_from_log, RestoreOptions};
use jellynamer::scanner::FsListing;
use jellynamer::validator::find_collisions;

fn main() {
    let args = Args::parse();

    logging::init(args.verbose);

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("\nError: {}", e.detailed_message());
        std::process::exit(e.exit_code().into());
    }
}

fn display_error(e: io::Error) -> AppError {
    AppError::Other(format!("Failed to display output: {}", e))
}

fn run(args: Args) -> Result<(), AppError> {
    let mut progress = Progress::new_with_ui(args.verbose > 0, should_use_colors());

    if let Some(log_path) = &args.restore {
        info!("Restore mode: {:?}", log_path);
        return restore(log_path, args.dry, &mut progress);
    }

    let config = if args.interactive {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        match prompter.run()? {
            Choice::Rename(config) => config,
            Choice::Restore(log_path) => return restore(&log_path, false, &mut progress),
        }
    } else {
        Config::from_args(&args)?
    };

    rename(&config, &mut progress)
}

fn restore(log_path: &Path, dry_run: bool, progress: &mut Progress) -> Result<(), AppError> {
    let result = restore_from_log(log_path, &RestoreOptions { dry_run }, progress)?;

    display_restore_result(&result, &mut io::stdout()).map_err(display_error)
}

fn rename(config: &Config, progress: &mut Progress) -> Result<(), AppError> {
    // Step 1: Plan
    progress.scan_start(&config.root_dir);
    let plan = build_plan(&FsListing, config)?;

    info!(
        operations = plan.len(),
        skipped = plan.skipped.len(),
        "Plan built"
    );

    for skipped in &plan.skipped {
        if skipped.reason == SkipReason::Trickplay {
            if config.show_trickplay {
                progress.trickplay_ignored(&skipped.path);
            }
        } else {
            debug!(path = ?skipped.path, reason = %skipped.reason.description(), "Skipped");
        }
    }

    // Step 2: Warn about renames that would land on the same name
    let collisions = find_collisions(&plan);
    for collision in &collisions {
        progress.warn(&format!(
            "{} items would be renamed to {}",
            collision.sources.len(),
            collision.destination.display()
        ));
    }

    // Step 3: Apply or preview
    let mut log = ChangeLog::new(&config.root_dir);
    let options = ExecuteOptions {
        preview: config.preview,
    };
    let report = execute_plan(&plan, &options, &mut log, progress);

    let mut stdout = io::stdout();
    if config.preview {
        display_preview(&plan, &collisions, &mut stdout).map_err(display_error)?;
    } else {
        display_execution_result(&report, &mut stdout).map_err(display_error)?;
    }
    stdout.flush().map_err(display_error)?;

    // Step 4: Persist the change log
    if config.should_write_log() {
        if log.is_empty() {
            debug!("No changes recorded, writing an empty backup");
        }
        let log_path = write_change_log(&log, &config.backup_dir)?;
        info!(
            renames = log.rename_count(),
            deleted = log.deleted.len(),
            "Change log written to {:?}",
            log_path
        );
        progress.log_written(&log_path);
    }

    Ok(())
}
