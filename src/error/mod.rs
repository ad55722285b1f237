mod codes;

pub use codes::ExitCode;

use crate::history::HistoryError;
use crate::prompt::PromptError;
use crate::scanner::ScannerError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Media directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("No show name given")]
    MissingShowName,

    #[error("Change log error: {message}")]
    LogError {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::DirectoryNotFound { .. } => ExitCode::DirectoryNotFound,
            AppError::NotADirectory { .. } => ExitCode::DirectoryNotFound,
            AppError::PermissionDenied { .. } => ExitCode::PermissionError,
            AppError::MissingShowName => ExitCode::MissingShowName,
            AppError::LogError { .. } => ExitCode::LogError,
            AppError::InvalidInput(_) => ExitCode::InvalidArguments,
            AppError::Other(_) => ExitCode::GeneralError,
        }
    }

    pub fn detailed_message(&self) -> String {
        match self {
            AppError::DirectoryNotFound { path } => {
                format!(
                    "The specified directory does not exist:\n  {}\n\n\
                     Please verify the path and try again.",
                    path.display()
                )
            }

            AppError::NotADirectory { path } => {
                format!(
                    "The specified path is not a directory:\n  {}\n\n\
                     Please provide a valid directory path.",
                    path.display()
                )
            }

            AppError::PermissionDenied { path } => {
                format!(
                    "Permission denied when accessing:\n  {}\n\n\
                     Please check file permissions or run with appropriate privileges.",
                    path.display()
                )
            }

            AppError::MissingShowName => String::from(
                "No show name was entered. Aborting.\n\n\
                 Pass the show name with --show <NAME> (e.g. --show OnePiece).",
            ),

            AppError::LogError { path, message } => {
                let path_info = path
                    .as_ref()
                    .map(|p| format!("File: {}\n", p.display()))
                    .unwrap_or_default();

                format!(
                    "Change log error:\n  {}\n{}\n\
                     Ensure the backup file exists and is valid JSON.",
                    message, path_info
                )
            }

            AppError::InvalidInput(message) => format!("Invalid input: {}", message),

            AppError::Other(message) => message.clone(),
        }
    }
}

impl From<ScannerError> for AppError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::PathNotFound(path) => AppError::DirectoryNotFound { path },
            ScannerError::NotADirectory(path) => AppError::NotADirectory { path },
            ScannerError::PermissionDenied(path) => AppError::PermissionDenied { path },
            ScannerError::IoError(e) => AppError::Other(format!("I/O error: {}", e)),
        }
    }
}

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        let path = match &err {
            HistoryError::NotFound(path) => Some(path.clone()),
            _ => None,
        };

        AppError::LogError {
            path,
            message: err.to_string(),
        }
    }
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::MissingShowName => AppError::MissingShowName,
            PromptError::InvalidMode(mode) => {
                AppError::InvalidInput(format!("unknown mode '{}', expected 1 or 2", mode))
            }
            PromptError::Io(e) => AppError::Other(format!("Failed to read input: {}", e)),
        }
    }
}
