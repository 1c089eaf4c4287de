use std::path::Path;

mod controller;
mod history;
mod memory;
mod path;
mod subscriber;

pub use controller::{NavigationController, PathChange};
pub use history::PathHistory;
pub use memory::MemoryFileSystem;
pub use path::BrowsePath;
pub use subscriber::BrowserSubscriber;

use crate::filter::{DirectoryEntry, SnapshotItem};

/// Filesystem collaborator used by the navigation layer
pub trait FileSystem: Send + Sync {
    /// Enumerate a directory. Order is whatever the filesystem reports.
    fn list_directory(&self, path: &Path) -> std::io::Result<Vec<SnapshotItem>>;

    /// Whether `path` denotes an existing directory
    fn directory_exists(&self, path: &Path) -> bool;
}

/// Context passed to subscribers after each browser state change
#[derive(Debug, Clone)]
pub struct BrowserContext {
    pub current: Option<BrowsePath>,
    pub entries: Vec<DirectoryEntry>,
    pub selected: Option<usize>,
    pub search: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}
