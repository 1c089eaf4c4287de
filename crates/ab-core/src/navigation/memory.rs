//! In-memory filesystem for tests and embedding

use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;
use std::io;
use std::path::{Path, PathBuf};

use super::FileSystem;
use crate::filter::{DirectoryEntry, SnapshotItem};

/// A filesystem held entirely in memory
///
/// Directories keep their entries in insertion order, which stands in for the
/// enumeration order of a real filesystem.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    directories: RwLock<AHashMap<PathBuf, Vec<SnapshotItem>>>,
    unreadable: RwLock<AHashSet<PathBuf>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory, linking it into its parent if the parent exists
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut dirs = self.directories.write();
        if dirs.contains_key(path) {
            return;
        }
        dirs.insert(path.to_path_buf(), Vec::new());

        if let (Some(parent), Some(name)) = (path.parent(), file_name(path)) {
            if let Some(listing) = dirs.get_mut(parent) {
                listing.push(Ok(DirectoryEntry::directory(name)));
            }
        }
    }

    /// Add a file to an existing directory
    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let (Some(parent), Some(name)) = (path.parent(), file_name(path)) {
            self.add_entry(parent, Ok(DirectoryEntry::file(name)));
        }
    }

    /// Append a raw snapshot item to an existing directory
    pub fn add_entry(&self, dir: impl AsRef<Path>, item: SnapshotItem) {
        if let Some(listing) = self.directories.write().get_mut(dir.as_ref()) {
            listing.push(item);
        }
    }

    /// Remove a directory, as if deleted behind the browser's back
    pub fn remove_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut dirs = self.directories.write();
        dirs.retain(|dir, _| !dir.starts_with(path));

        if let (Some(parent), Some(name)) = (path.parent(), file_name(path)) {
            if let Some(listing) = dirs.get_mut(parent) {
                listing.retain(|item| !matches!(item, Ok(entry) if entry.name == name));
            }
        }
    }

    /// Make listing `path` fail while it still exists
    pub fn set_unreadable(&self, path: impl AsRef<Path>) {
        self.unreadable.write().insert(path.as_ref().to_path_buf());
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<SnapshotItem>> {
        if self.unreadable.read().contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "unreadable"));
        }

        self.directories
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such directory"))
    }

    fn directory_exists(&self, path: &Path) -> bool {
        self.directories.read().contains_key(path)
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
