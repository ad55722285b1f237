use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to read directory: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Display name; undecodable bytes are replaced with U+FFFD
    pub name: String,
    /// Real on-disk path, untouched by the lossy name conversion
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn new(name: String, path: PathBuf, kind: EntryKind) -> Self {
        Self { name, path, kind }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Source of directory listings. Planning only ever sees the tree through this trait.
pub trait DirectoryListing {
    /// List the direct children of `dir`
    fn list(&self, dir: &Path) -> Result<Vec<DirectoryEntry>, ScannerError>;
}

/// Lists the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsListing;

impl DirectoryListing for FsListing {
    fn list(&self, dir: &Path) -> Result<Vec<DirectoryEntry>, ScannerError> {
        if !dir.exists() {
            return Err(ScannerError::PathNotFound(dir.to_path_buf()));
        }

        if !dir.is_dir() {
            return Err(ScannerError::NotADirectory(dir.to_path_buf()));
        }

        let read_dir = fs::read_dir(dir).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                ScannerError::PermissionDenied(dir.to_path_buf())
            } else {
                ScannerError::IoError(e)
            }
        })?;

        let mut entries = Vec::new();

        for entry in read_dir {
            let entry = entry?;
            let path = entry.path();

            trace!(entry = ?path, "Examining entry");

            // Symlinks are not followed
            let kind = if entry.file_type()?.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            let name = entry.file_name().to_string_lossy().to_string();
            entries.push(DirectoryEntry::new(name, path, kind));
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(entries)
    }
}

/// In-memory directory tree, used to exercise planning without touching the disk
#[derive(Debug, Clone)]
pub struct MemoryTree {
    root: PathBuf,
    children: BTreeMap<PathBuf, Vec<DirectoryEntry>>,
}

impl MemoryTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut children = BTreeMap::new();
        children.insert(root.clone(), Vec::new());
        Self { root, children }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Add a directory (and any missing parents), relative to the root
    pub fn dir(mut self, relative: &str) -> Self {
        let path = self.root.join(relative);
        self.ensure_dir(&path);
        self
    }

    /// Add a file (and any missing parent directories), relative to the root
    pub fn file(mut self, relative: &str) -> Self {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            let parent = parent.to_path_buf();
            self.ensure_dir(&parent);
            self.insert_child(&parent, path, EntryKind::File);
        }
        self
    }

    fn ensure_dir(&mut self, path: &Path) {
        if self.children.contains_key(path) {
            return;
        }

        self.children.insert(path.to_path_buf(), Vec::new());

        if let Some(parent) = path.parent() {
            let parent = parent.to_path_buf();
            self.ensure_dir(&parent);
            self.insert_child(&parent, path.to_path_buf(), EntryKind::Directory);
        }
    }

    fn insert_child(&mut self, parent: &Path, path: PathBuf, kind: EntryKind) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if let Some(entries) = self.children.get_mut(parent) {
            if entries.iter().any(|e| e.path == path) {
                return;
            }
            entries.push(DirectoryEntry::new(name, path, kind));
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }
    }
}

impl DirectoryListing for MemoryTree {
    fn list(&self, dir: &Path) -> Result<Vec<DirectoryEntry>, ScannerError> {
        match self.children.get(dir) {
            Some(entries) => Ok(entries.clone()),
            None => Err(ScannerError::PathNotFound(dir.to_path_buf())),
        }
    }
}

/// One directory visited by [`walk`], with its direct children split by kind
#[derive(Debug, Clone)]
pub struct WalkedDir {
    pub path: PathBuf,
    /// Directory's own name (empty for a bare root such as `/`)
    pub name: String,
    pub dirs: Vec<DirectoryEntry>,
    pub files: Vec<DirectoryEntry>,
}

/// Walk the tree below `root` top-down (pre-order, children sorted by name).
///
/// The root itself must be listable. Unreadable subdirectories are logged and skipped.
pub fn walk(listing: &impl DirectoryListing, root: &Path) -> Result<Vec<WalkedDir>, ScannerError> {
    debug!(path = ?root, "Walking directory tree");

    let root_entries = listing.list(root)?;
    let mut walked = Vec::new();
    let mut stack = vec![(root.to_path_buf(), root_entries)];

    while let Some((path, entries)) = stack.pop() {
        let (dirs, files): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| e.is_dir());

        // Push in reverse so the smallest name is visited first
        for dir in dirs.iter().rev() {
            match listing.list(&dir.path) {
                Ok(children) => stack.push((dir.path.clone(), children)),
                Err(e) => warn!(path = ?dir.path, error = %e, "Skipping unreadable directory"),
            }
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        walked.push(WalkedDir {
            path,
            name,
            dirs,
            files,
        });
    }

    debug!(count = walked.len(), "Walk complete");

    Ok(walked)
}
