use ahash::AHashSet;

use super::FileAttributes;

/// Filter settings applied to a directory snapshot
///
/// A value type: the controller replaces its current state with a new one
/// instead of mutating flags in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Extensions never shown (lowercase, no dot)
    pub excluded_extensions: AHashSet<String>,
    /// Show entries carrying the hidden attribute
    pub include_hidden: bool,
    /// Extensions of the active type filter; `None` shows every file type
    pub active_type_extensions: Option<AHashSet<String>>,
    /// Case-insensitive name substring; empty matches everything
    pub search_substring: String,
    /// Only directories are listed
    pub folder_only_mode: bool,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes that exclude an entry. System entries are always ignored.
    pub fn ignored_attributes(&self) -> FileAttributes {
        if self.include_hidden {
            FileAttributes::SYSTEM
        } else {
            FileAttributes::SYSTEM | FileAttributes::HIDDEN
        }
    }

    pub fn with_excluded_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_extensions = collect_extensions(extensions);
        self
    }

    pub fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn with_active_type_extensions<I, S>(mut self, extensions: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.active_type_extensions = extensions.map(collect_extensions);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search_substring = search.into();
        self
    }

    pub fn with_folder_only_mode(mut self, folder_only_mode: bool) -> Self {
        self.folder_only_mode = folder_only_mode;
        self
    }
}

/// Normalize a user-supplied extension: trimmed, lowercase, no leading dot
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

fn collect_extensions<I, S>(extensions: I) -> AHashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| normalize_extension(ext.as_ref()))
        .filter(|ext| !ext.is_empty())
        .collect()
}
