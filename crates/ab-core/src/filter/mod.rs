//! Directory entry filtering
//!
//! Reduces a raw directory snapshot to the entries a browser should display.

use serde::{Deserialize, Serialize};
use std::path::Path;

mod attributes;
mod compute;
mod state;
mod type_filter;

pub use attributes::FileAttributes;
pub use compute::EntryFilter;
pub use state::{normalize_extension, FilterState};
pub use type_filter::{TypeFilter, ALL_FILES_FILTER_TEXT, FOLDERS_FILTER_TEXT};

use crate::error::EntryFault;

/// One item of a raw directory snapshot
///
/// Entries whose metadata could not be read are kept as faults so the filter
/// can report and skip them individually.
pub type SnapshotItem = Result<DirectoryEntry, EntryFault>;

/// A raw directory entry as reported by the filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Entry name, without any directory component
    pub name: String,
    /// Whether this entry is a directory
    pub is_directory: bool,
    /// Attribute flags (hidden, system, ...)
    pub attributes: FileAttributes,
    /// Lowercase extension without the leading dot, empty for directories
    pub extension: String,
}

impl DirectoryEntry {
    /// Create a file entry, deriving the extension from the name
    pub fn file(name: impl Into<String>) -> Self {
        let name = name.into();
        let extension = extension_of(&name);
        Self {
            name,
            is_directory: false,
            attributes: FileAttributes::empty(),
            extension,
        }
    }

    /// Create a directory entry
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
            attributes: FileAttributes::empty(),
            extension: String::new(),
        }
    }

    /// Replace the attribute flags
    pub fn with_attributes(mut self, attributes: FileAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Lowercase extension of a file name, without the dot
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}
