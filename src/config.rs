//! Run configuration.
//!
//! A [`Config`] is built once (from the command line or the interactive prompt),
//! validated, and then passed by reference to planning and execution.

use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::error::AppError;

/// Sidecar cleanup switches, applied to the whole tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupOptions {
    pub delete_nfo: bool,
    pub delete_jpg: bool,
    pub delete_trickplay_folders: bool,
}

impl CleanupOptions {
    pub fn any(&self) -> bool {
        self.delete_nfo || self.delete_jpg || self.delete_trickplay_folders
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub show_name: String,
    pub root_dir: PathBuf,
    pub backup_dir: PathBuf,
    /// Report the plan without touching the filesystem
    pub preview: bool,
    /// Persist the change log even in preview mode
    pub log_in_preview: bool,
    pub delete_trickplay: bool,
    pub show_trickplay: bool,
    pub rename_folders: bool,
    pub cleanup: CleanupOptions,
}

impl Config {
    /// Create a config with every flag off and the backup directory set to the root
    pub fn new(show_name: impl Into<String>, root_dir: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        Self {
            show_name: show_name.into(),
            backup_dir: root_dir.clone(),
            root_dir,
            preview: false,
            log_in_preview: false,
            delete_trickplay: false,
            show_trickplay: false,
            rename_folders: false,
            cleanup: CleanupOptions::default(),
        }
    }

    /// Build a validated config from command line arguments
    pub fn from_args(args: &Args) -> Result<Self, AppError> {
        let root_dir = args
            .root_dir
            .clone()
            .ok_or_else(|| AppError::InvalidInput("no media directory given".to_string()))?;

        let show_name = args.show.clone().unwrap_or_default();

        let mut config = Config::new(show_name.trim(), root_dir);
        if let Some(backup_dir) = &args.backup_dir {
            config.backup_dir = backup_dir.clone();
        }
        config.preview = args.dry;
        config.log_in_preview = args.log_in_preview;
        config.delete_trickplay = args.delete_trickplay;
        config.show_trickplay = args.show_trickplay;
        config.rename_folders = args.rename_folders;
        config.cleanup = CleanupOptions {
            delete_nfo: args.delete_nfo,
            delete_jpg: args.delete_jpg,
            delete_trickplay_folders: args.delete_trickplay_folders,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the required inputs before anything touches the filesystem
    pub fn validate(&self) -> Result<(), AppError> {
        if self.show_name.trim().is_empty() {
            return Err(AppError::MissingShowName);
        }

        validate_root(&self.root_dir)
    }

    /// Whether the change log should be written at the end of the run
    pub fn should_write_log(&self) -> bool {
        !self.preview || self.log_in_preview
    }
}

pub fn validate_root(root: &Path) -> Result<(), AppError> {
    if !root.exists() {
        return Err(AppError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    if !root.is_dir() {
        return Err(AppError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    Ok(())
}
