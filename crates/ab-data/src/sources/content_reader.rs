//! Index of the archives in a validated arena2 folder

use ahash::AHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::DataError;

/// Resource reader built once the readiness gate opens
///
/// Archives are looked up by name regardless of case.
#[derive(Debug)]
pub struct ContentReader {
    root: PathBuf,
    archives: AHashMap<String, PathBuf>,
}

impl ContentReader {
    /// Index every regular file directly inside `root`
    pub fn open(root: impl AsRef<Path>) -> Result<Self, DataError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(DataError::NotADirectory(root.to_path_buf()));
        }

        let mut archives = AHashMap::new();
        for dirent in fs::read_dir(root)? {
            let dirent = dirent?;
            if dirent.file_type()?.is_file() {
                let name = dirent.file_name().to_string_lossy().to_uppercase();
                archives.insert(name, dirent.path());
            }
        }

        info!(root = %root.display(), archives = archives.len(), "Content reader ready");
        Ok(Self {
            root: root.to_path_buf(),
            archives,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Uppercase archive names, sorted
    pub fn archive_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.archives.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_archive(&self, name: &str) -> bool {
        self.archives.contains_key(&name.to_uppercase())
    }

    pub fn archive_path(&self, name: &str) -> Option<&Path> {
        self.archives.get(&name.to_uppercase()).map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexes_files_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Maps.bsa"), b"").unwrap();
        fs::write(dir.path().join("TEXTURE.000"), b"").unwrap();
        fs::create_dir(dir.path().join("SAVE0")).unwrap();

        let reader = ContentReader::open(dir.path()).unwrap();
        assert_eq!(reader.archive_names(), vec!["MAPS.BSA", "TEXTURE.000"]);
        assert!(reader.has_archive("maps.BSA"));
        assert_eq!(reader.archive_path("maps.bsa"), Some(dir.path().join("Maps.bsa").as_path()));
        assert!(!reader.has_archive("SAVE0"));
    }

    #[test]
    fn test_open_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ContentReader::open(dir.path().join("nope")),
            Err(DataError::NotADirectory(_))
        ));
    }
}
