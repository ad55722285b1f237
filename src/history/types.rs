use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::rename::Operation;

/// Filename prefix shared by every change log
pub const LOG_PREFIX: &str = "jellynamer-backup";

/// Record of one run: every rename and deletion, in execution order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLog {
    /// Local time the run started, second precision
    pub created: NaiveDateTime,

    /// Media directory the run operated on
    pub root: String,

    #[serde(default)]
    pub files: Vec<RenameRecord>,

    #[serde(default)]
    pub folders: Vec<RenameRecord>,

    #[serde(default)]
    pub deleted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRecord {
    pub old: String,
    pub new: String,
}

impl RenameRecord {
    pub fn new(old: &Path, new: &Path) -> Self {
        Self {
            old: old.to_string_lossy().to_string(),
            new: new.to_string_lossy().to_string(),
        }
    }
}

impl ChangeLog {
    /// Start an empty log stamped with the current local time
    pub fn new(root: &Path) -> Self {
        let now = Local::now().naive_local();
        Self::with_timestamp(root, now.with_nanosecond(0).unwrap_or(now))
    }

    pub fn with_timestamp(root: &Path, created: NaiveDateTime) -> Self {
        Self {
            created,
            root: root.to_string_lossy().to_string(),
            files: Vec::new(),
            folders: Vec::new(),
            deleted: Vec::new(),
        }
    }

    /// Append an operation to the matching section
    pub fn record(&mut self, op: &Operation) {
        match op {
            Operation::RenameFile { from, to } => self.files.push(RenameRecord::new(from, to)),
            Operation::RenameFolder { from, to } => {
                self.folders.push(RenameRecord::new(from, to))
            }
            Operation::Delete { path, .. } => {
                self.deleted.push(path.to_string_lossy().to_string())
            }
        }
    }

    pub fn rename_count(&self) -> usize {
        self.files.len() + self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rename_count() == 0 && self.deleted.is_empty()
    }

    /// Generate the filename for this log
    pub fn generate_filename(&self) -> String {
        let timestamp = self.created.format("%Y-%m-%d_%H-%M-%S");
        format!("{}-{}.json", LOG_PREFIX, timestamp)
    }
}
