//! Browser-style back/forward history

use std::path::Path;

use super::{BrowsePath, FileSystem};
use crate::error::NavigationError;

/// The sequence of visited directories and a cursor into it
///
/// Only [`PathHistory::navigate`] changes the sequence; back and forward
/// move the cursor.
#[derive(Debug, Clone, Default)]
pub struct PathHistory {
    paths: Vec<BrowsePath>,
    index: Option<usize>,
}

impl PathHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` as the current directory
    ///
    /// Entries after the cursor are discarded before the new path is
    /// appended. Navigating to the path already under the cursor is a no-op
    /// and returns `false`.
    pub fn navigate(&mut self, path: BrowsePath) -> bool {
        if self.current() == Some(&path) {
            return false;
        }

        let keep = self.index.map_or(0, |index| index + 1);
        self.paths.truncate(keep);
        self.paths.push(path);
        self.index = Some(self.paths.len() - 1);
        true
    }

    /// Resolve `raw` and record it. History is unchanged on failure.
    pub fn navigate_to(&mut self, raw: impl AsRef<Path>, fs: &dyn FileSystem) -> Result<bool, NavigationError> {
        let path = BrowsePath::resolve(raw, fs)?;
        Ok(self.navigate(path))
    }

    /// Step the cursor back
    pub fn back(&mut self) -> Option<&BrowsePath> {
        match self.index {
            Some(index) if index > 0 => {
                self.index = Some(index - 1);
                self.paths.get(index - 1)
            }
            _ => None,
        }
    }

    /// Step the cursor forward
    pub fn forward(&mut self) -> Option<&BrowsePath> {
        match self.index {
            Some(index) if index + 1 < self.paths.len() => {
                self.index = Some(index + 1);
                self.paths.get(index + 1)
            }
            _ => None,
        }
    }

    /// The path `back` would move to, without moving
    pub fn peek_back(&self) -> Option<&BrowsePath> {
        self.index
            .filter(|&index| index > 0)
            .and_then(|index| self.paths.get(index - 1))
    }

    /// The path `forward` would move to, without moving
    pub fn peek_forward(&self) -> Option<&BrowsePath> {
        self.index.and_then(|index| self.paths.get(index + 1))
    }

    pub fn current(&self) -> Option<&BrowsePath> {
        self.index.and_then(|index| self.paths.get(index))
    }

    /// Cursor position, `None` while empty
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn paths(&self) -> &[BrowsePath] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.peek_back().is_some()
    }

    pub fn can_go_forward(&self) -> bool {
        self.peek_forward().is_some()
    }
}
