//! Interactive front-end.
//!
//! Asks for the run mode, show name, paths and every flag, then hands back a
//! validated [`Config`] or the change log to restore from. Input and output are
//! generic so the whole dialogue can be driven from tests.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::config::{validate_root, CleanupOptions, Config};
use crate::error::AppError;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("No show name entered")]
    MissingShowName,

    #[error("Invalid mode selection: {0}")]
    InvalidMode(String),

    #[error("Failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Rename(Config),
    Restore(PathBuf),
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a prompt and read one trimmed line; end of input reads as empty
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn ask_path(&mut self, prompt: &str) -> Result<String, PromptError> {
        let answer = self.ask(prompt)?;
        // Paths pasted from a file manager often come quoted
        Ok(answer.trim_matches('"').trim().to_string())
    }

    /// Tri-state yes/no: `1`, `0`, or empty for the default. Anything else
    /// falls back to the default with a warning.
    pub fn ask_bool(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError> {
        let default_str = if default { "1" } else { "0" };
        let answer = self.ask(&format!(
            "{} (1=True, 0=False, Enter={}): ",
            prompt, default_str
        ))?;

        match answer.as_str() {
            "" => Ok(default),
            "1" => Ok(true),
            "0" => Ok(false),
            _ => {
                writeln!(self.output, "[WARN] Invalid input, using default.")?;
                Ok(default)
            }
        }
    }

    /// Run the whole dialogue
    pub fn run(&mut self) -> Result<Choice, AppError> {
        writeln!(self.output, "Select mode:").map_err(PromptError::from)?;
        writeln!(self.output, "1 = Rename / modify files and folders").map_err(PromptError::from)?;
        writeln!(self.output, "2 = Restore from a backup JSON").map_err(PromptError::from)?;

        let mode = self.ask("> ")?;
        debug!(mode = %mode, "Mode selected");

        match mode.as_str() {
            "1" => Ok(Choice::Rename(self.ask_rename_config()?)),
            "2" => {
                let log_path = self.ask_path("Enter path to backup JSON file: ")?;
                Ok(Choice::Restore(PathBuf::from(log_path)))
            }
            other => Err(PromptError::InvalidMode(other.to_string()).into()),
        }
    }

    fn ask_rename_config(&mut self) -> Result<Config, AppError> {
        let show_name = self.ask("Enter the show name (e.g., OnePiece, Naruto, etc.): ")?;
        if show_name.is_empty() {
            return Err(PromptError::MissingShowName.into());
        }

        let root_dir = PathBuf::from(self.ask_path("Enter your media folder path: ")?);
        validate_root(&root_dir)?;

        let mut config = Config::new(show_name, root_dir);

        let backup_dir =
            self.ask_path("Enter backup folder path (Enter for same as media folder): ")?;
        if !backup_dir.is_empty() {
            config.backup_dir = PathBuf::from(backup_dir);
        }

        config.log_in_preview =
            self.ask_bool("Create backup file before changes (also in preview)?", true)?;
        config.preview = self.ask_bool("Enable preview only (dry run)?", true)?;
        config.delete_trickplay = self.ask_bool("Delete trickplay files?", false)?;
        config.show_trickplay = self.ask_bool("Show trickplay files in console?", false)?;
        config.rename_folders = self.ask_bool("Rename season folders?", false)?;
        config.cleanup = CleanupOptions {
            delete_nfo: self.ask_bool("Delete .nfo files?", false)?,
            delete_jpg: self.ask_bool("Delete .jpg or -thumb.jpg files?", false)?,
            delete_trickplay_folders: self.ask_bool("Delete .trickplay folders?", false)?,
        };

        self.print_summary(&config).map_err(PromptError::from)?;

        Ok(config)
    }

    fn print_summary(&mut self, config: &Config) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Configuration Summary:")?;
        writeln!(self.output, "  Show Name:                {}", config.show_name)?;
        writeln!(self.output, "  Root Folder:              {}", config.root_dir.display())?;
        writeln!(self.output, "  Backup Folder:            {}", config.backup_dir.display())?;
        writeln!(self.output, "  Preview:                  {}", config.preview)?;
        writeln!(self.output, "  Backup in preview:        {}", config.log_in_preview)?;
        writeln!(self.output, "  Delete trickplay files:   {}", config.delete_trickplay)?;
        writeln!(self.output, "  Show trickplay files:     {}", config.show_trickplay)?;
        writeln!(self.output, "  Rename folders:           {}", config.rename_folders)?;
        writeln!(self.output, "  Delete .nfo:              {}", config.cleanup.delete_nfo)?;
        writeln!(self.output, "  Delete .jpg:              {}", config.cleanup.delete_jpg)?;
        writeln!(
            self.output,
            "  Delete .trickplay folders: {}",
            config.cleanup.delete_trickplay_folders
        )?;
        writeln!(self.output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn run_dialogue(input: &str) -> (Result<Choice, AppError>, String) {
        let mut output = Vec::new();
        let result = Prompter::new(Cursor::new(input.to_string()), &mut output).run();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_ask_bool_tri_state() {
        let input = "1\n0\n\n\nmaybe\n";
        let mut output = Vec::new();
        let mut prompter = Prompter::new(Cursor::new(input), &mut output);

        assert!(prompter.ask_bool("a?", false).unwrap());
        assert!(!prompter.ask_bool("b?", true).unwrap());
        assert!(prompter.ask_bool("c?", true).unwrap());
        assert!(!prompter.ask_bool("d?", false).unwrap());
        assert!(prompter.ask_bool("e?", true).unwrap());

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("a? (1=True, 0=False, Enter=0): "));
        assert!(text.contains("[WARN] Invalid input, using default."));
    }

    #[test]
    fn test_rename_dialogue_with_defaults() {
        let dir = tempdir().unwrap();
        let input = format!("1\nSomeShow\n\"{}\"\n\n\n\n\n\n\n\n\n\n", dir.path().display());

        let (result, output) = run_dialogue(&input);

        let Choice::Rename(config) = result.unwrap() else {
            panic!("Expected rename choice");
        };
        assert_eq!(config.show_name, "SomeShow");
        assert_eq!(config.root_dir, dir.path());
        assert_eq!(config.backup_dir, dir.path());
        assert!(config.preview);
        assert!(config.log_in_preview);
        assert!(!config.rename_folders);
        assert!(!config.cleanup.any());
        assert!(output.contains("Configuration Summary"));
    }

    #[test]
    fn test_rename_dialogue_with_flags() {
        let dir = tempdir().unwrap();
        let input = format!(
            "1\nSomeShow\n{}\n/backups\n0\n0\n1\n1\n1\n1\n0\n1\n",
            dir.path().display()
        );

        let (result, _) = run_dialogue(&input);

        let Choice::Rename(config) = result.unwrap() else {
            panic!("Expected rename choice");
        };
        assert_eq!(config.backup_dir, PathBuf::from("/backups"));
        assert!(!config.log_in_preview);
        assert!(!config.preview);
        assert!(config.delete_trickplay);
        assert!(config.show_trickplay);
        assert!(config.rename_folders);
        assert!(config.cleanup.delete_nfo);
        assert!(!config.cleanup.delete_jpg);
        assert!(config.cleanup.delete_trickplay_folders);
    }

    #[test]
    fn test_restore_dialogue() {
        let (result, _) = run_dialogue("2\n/backups/jellynamer-backup.json\n");
        assert_eq!(
            result.unwrap(),
            Choice::Restore(PathBuf::from("/backups/jellynamer-backup.json"))
        );
    }

    #[test]
    fn test_empty_show_name_aborts() {
        let (result, _) = run_dialogue("1\n\n");
        assert!(matches!(result, Err(AppError::MissingShowName)));
    }

    #[test]
    fn test_missing_root_aborts() {
        let (result, _) = run_dialogue("1\nSomeShow\n/nonexistent/media\n");
        assert!(matches!(result, Err(AppError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_invalid_mode() {
        let (result, _) = run_dialogue("3\n");
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
