use std::fmt;

use super::normalize_extension;

/// Display text of the implicit filter that shows every file
pub const ALL_FILES_FILTER_TEXT: &str = "All Files (.*)";
/// Display text of the implicit filter while picking folders
pub const FOLDERS_FILTER_TEXT: &str = "Folders";

/// A named file type filter, e.g. "Archives (bsa, wld)"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilter {
    pub name: Option<String>,
    /// Accepted extensions in declaration order; `None` accepts all files
    pub extensions: Option<Vec<String>>,
    pub default_extension: Option<String>,
}

impl TypeFilter {
    /// A filter that accepts every file type
    pub fn all(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            extensions: None,
            default_extension: None,
        }
    }

    /// A filter for a single extension
    pub fn single(name: impl Into<String>, extension: &str) -> Self {
        Self::many(name, [extension])
    }

    /// A filter for several extensions; the first one is the default
    pub fn many<I, S>(name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            if !ext.is_empty() && !list.contains(&ext) {
                list.push(ext);
            }
        }

        let default_extension = list.first().cloned();
        Self {
            name: Some(name.into()),
            extensions: if list.is_empty() { None } else { Some(list) },
            default_extension,
        }
    }

    /// Whether this filter restricts file types at all
    pub fn is_all_files(&self) -> bool {
        self.extensions.is_none()
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            f.write_str(name)?;
        }

        if let Some(extensions) = &self.extensions {
            if self.name.is_some() {
                f.write_str(" (")?;
            }
            f.write_str(&extensions.join(", "))?;
            if self.name.is_some() {
                f.write_str(")")?;
            }
        }

        Ok(())
    }
}
