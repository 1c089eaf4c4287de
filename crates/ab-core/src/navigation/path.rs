//! Validated directory paths

use std::fmt;
use std::path::{Path, PathBuf};

use super::FileSystem;
use crate::error::NavigationError;

/// A normalized path that denoted an existing directory when it was resolved
///
/// The only public constructor is [`BrowsePath::resolve`], so history and
/// controller state can never hold a path that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrowsePath(PathBuf);

impl BrowsePath {
    /// Normalize raw user input
    ///
    /// Surrounding whitespace is trimmed and one trailing separator is
    /// stripped unless the path is a filesystem root. Returns `None` for
    /// empty input. Paths that are not UTF-8 are kept as given.
    pub fn normalize(raw: impl AsRef<Path>) -> Option<PathBuf> {
        let raw = raw.as_ref();
        let Some(text) = raw.to_str() else {
            // Not UTF-8, so never empty or padded input typed by a user
            return Some(raw.to_path_buf());
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let has_parent = Path::new(trimmed).parent().is_some();
        let stripped = match trimmed.chars().last() {
            Some('/') | Some('\\') if has_parent && trimmed.len() > 1 => {
                &trimmed[..trimmed.len() - 1]
            }
            _ => trimmed,
        };

        Some(PathBuf::from(stripped))
    }

    /// Normalize `raw` and check that it is an existing directory
    pub fn resolve(raw: impl AsRef<Path>, fs: &dyn FileSystem) -> Result<Self, NavigationError> {
        let raw = raw.as_ref();
        let path = Self::normalize(raw)
            .ok_or_else(|| NavigationError::InvalidPath(raw.display().to_string()))?;

        if !fs.directory_exists(&path) {
            return Err(NavigationError::NotADirectory(path));
        }

        Ok(Self(path))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Parent directory, if this is not a root
    pub fn parent(&self) -> Option<&Path> {
        self.0.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Full path of an entry inside this directory
    pub fn join(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for BrowsePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl PartialEq<Path> for BrowsePath {
    fn eq(&self, other: &Path) -> bool {
        self.0.as_path() == other
    }
}

impl fmt::Display for BrowsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
