use std::path::{Path, PathBuf};

use crate::parser::SeasonFolder;
use crate::scanner::EntryKind;

/// A single planned filesystem mutation. Pure data until executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    RenameFile { from: PathBuf, to: PathBuf },
    RenameFolder { from: PathBuf, to: PathBuf },
    Delete { path: PathBuf, kind: EntryKind },
}

impl Operation {
    pub fn rename_file(from: PathBuf, new_name: &str) -> Self {
        let to = sibling(&from, new_name);
        Operation::RenameFile { from, to }
    }

    pub fn rename_folder(from: PathBuf, new_name: &str) -> Self {
        let to = sibling(&from, new_name);
        Operation::RenameFolder { from, to }
    }

    pub fn delete(path: PathBuf, kind: EntryKind) -> Self {
        Operation::Delete { path, kind }
    }

    /// Path the operation acts on
    pub fn source(&self) -> &Path {
        match self {
            Operation::RenameFile { from, .. } | Operation::RenameFolder { from, .. } => from,
            Operation::Delete { path, .. } => path,
        }
    }

    /// Path the operation produces, if it produces one
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Operation::RenameFile { to, .. } | Operation::RenameFolder { to, .. } => Some(to),
            Operation::Delete { .. } => None,
        }
    }

    pub fn is_rename(&self) -> bool {
        !matches!(self, Operation::Delete { .. })
    }
}

fn sibling(path: &Path, new_name: &str) -> PathBuf {
    path.parent()
        .map(|p| p.join(new_name))
        .unwrap_or_else(|| PathBuf::from(new_name))
}

/// Why a file inside a season folder was left alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Trickplay,
    NotVideo,
    NoEpisodeNumber,
    OutOfRange { episode: u32, start: u32, end: u32 },
    AlreadyNamed,
}

impl SkipReason {
    pub fn description(&self) -> String {
        match self {
            SkipReason::Trickplay => "trickplay file".to_string(),
            SkipReason::NotVideo => "not a video file".to_string(),
            SkipReason::NoEpisodeNumber => "no episode number".to_string(),
            SkipReason::OutOfRange {
                episode,
                start,
                end,
            } => format!("episode {} outside {}-{}", episode, start, end),
            SkipReason::AlreadyNamed => "already named".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// A season folder whose episodes were considered, in walk order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonGroup {
    pub path: PathBuf,
    pub season: SeasonFolder,
}

/// Ordered list of operations for one run, plus the files that were passed over
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub operations: Vec<Operation>,
    pub skipped: Vec<Skipped>,
    pub seasons: Vec<SeasonGroup>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_operation(&mut self, op: Operation) {
        self.operations.push(op);
    }

    pub fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        self.skipped.push(Skipped { path, reason });
    }

    pub fn add_season(&mut self, path: PathBuf, season: SeasonFolder) {
        self.seasons.push(SeasonGroup { path, season });
    }

    /// Season details for a folder seen during planning
    pub fn season_of(&self, folder: &Path) -> Option<&SeasonFolder> {
        self.seasons
            .iter()
            .find(|group| group.path == folder)
            .map(|group| &group.season)
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn file_renames(&self) -> usize {
        self.count(|op| matches!(op, Operation::RenameFile { .. }))
    }

    pub fn folder_renames(&self) -> usize {
        self.count(|op| matches!(op, Operation::RenameFolder { .. }))
    }

    pub fn deletions(&self) -> usize {
        self.count(|op| matches!(op, Operation::Delete { .. }))
    }

    pub fn trickplay_skips(&self) -> impl Iterator<Item = &Skipped> {
        self.skipped
            .iter()
            .filter(|s| s.reason == SkipReason::Trickplay)
    }

    fn count(&self, pred: impl Fn(&Operation) -> bool) -> usize {
        self.operations.iter().filter(|op| pred(op)).count()
    }
}
