//! The real filesystem

use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;

use ab_core::{DirectoryEntry, EntryFault, FileAttributes, FileSystem, SnapshotItem};

/// [`FileSystem`] over `std::fs`
///
/// Entries come back in the order the OS enumerates them. An entry whose
/// metadata cannot be read becomes an [`EntryFault`] instead of failing the
/// whole listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<SnapshotItem>> {
        let mut items = Vec::new();
        for dirent in fs::read_dir(path)? {
            let item = match dirent {
                Ok(dirent) => describe(&dirent),
                Err(e) => Err(EntryFault::new("<unreadable>", e.to_string())),
            };
            items.push(item);
        }

        trace!(path = %path.display(), count = items.len(), "Enumerated directory");
        Ok(items)
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

fn describe(dirent: &fs::DirEntry) -> SnapshotItem {
    // Names are kept as `String`; a lossy name would point at nothing
    let name = dirent
        .file_name()
        .into_string()
        .map_err(|raw| EntryFault::new(raw.to_string_lossy(), "name is not valid UTF-8"))?;
    let metadata = dirent
        .metadata()
        .map_err(|e| EntryFault::new(name.as_str(), e.to_string()))?;

    // Symlinks are shown as whatever they point at
    let is_directory = if metadata.file_type().is_symlink() {
        dirent.path().is_dir()
    } else {
        metadata.is_dir()
    };

    let mut attributes = platform_attributes(&metadata);
    if name.starts_with('.') {
        attributes.insert(FileAttributes::HIDDEN);
    }
    if metadata.permissions().readonly() {
        attributes.insert(FileAttributes::READ_ONLY);
    }

    let entry = if is_directory {
        attributes.insert(FileAttributes::DIRECTORY);
        DirectoryEntry::directory(name)
    } else {
        DirectoryEntry::file(name)
    };
    Ok(entry.with_attributes(attributes))
}

#[cfg(windows)]
fn platform_attributes(metadata: &fs::Metadata) -> FileAttributes {
    use std::os::windows::fs::MetadataExt;
    FileAttributes::from_bits(metadata.file_attributes())
}

#[cfg(not(windows))]
fn platform_attributes(_metadata: &fs::Metadata) -> FileAttributes {
    FileAttributes::empty()
}
