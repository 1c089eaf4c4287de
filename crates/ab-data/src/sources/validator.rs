//! Arena2 folder validation

use ahash::AHashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use ab_core::{RootValidator, ValidationReport};

/// Archives that must be present in an arena2 folder
pub const REQUIRED_ARCHIVES: [&str; 5] = [
    "ARCH3D.BSA",
    "BLOCKS.BSA",
    "MAPS.BSA",
    "MONSTER.BSA",
    "WOODS.WLD",
];

/// Decides whether a folder looks like the game's arena2 data folder
///
/// Names are compared case-insensitively. The check only looks at file
/// names, never at archive contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arena2Validator;

impl RootValidator for Arena2Validator {
    fn validate(&self, root: &Path) -> ValidationReport {
        if !root.is_dir() {
            return ValidationReport::invalid(vec![format!(
                "{} is not a directory",
                root.display()
            )]);
        }

        let names: AHashSet<String> = match fs::read_dir(root) {
            Ok(read_dir) => read_dir
                .filter_map(Result::ok)
                .map(|dirent| dirent.file_name().to_string_lossy().to_uppercase())
                .collect(),
            Err(e) => {
                return ValidationReport::invalid(vec![format!(
                    "cannot read {}: {}",
                    root.display(),
                    e
                )])
            }
        };

        let mut details: Vec<String> = REQUIRED_ARCHIVES
            .into_iter()
            .filter(|archive| !names.contains(*archive))
            .map(|archive| format!("missing {archive}"))
            .collect();
        if !names.iter().any(|name| is_texture_archive(name)) {
            details.push("missing TEXTURE.nnn archives".to_string());
        }

        debug!(root = %root.display(), missing = details.len(), "Validated arena2 folder");
        if details.is_empty() {
            ValidationReport::valid()
        } else {
            ValidationReport::invalid(details)
        }
    }
}

/// `TEXTURE.` followed by three digits
fn is_texture_archive(upper_name: &str) -> bool {
    upper_name
        .strip_prefix("TEXTURE.")
        .is_some_and(|suffix| suffix.len() == 3 && suffix.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_archive_names() {
        assert!(is_texture_archive("TEXTURE.000"));
        assert!(is_texture_archive("TEXTURE.511"));
        assert!(!is_texture_archive("TEXTURE.BSA"));
        assert!(!is_texture_archive("TEXTURE.1000"));
        assert!(!is_texture_archive("XTEXTURE.000"));
    }

    #[test]
    fn test_reports_every_missing_item() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("maps.bsa"), b"").unwrap();

        let report = Arena2Validator.validate(dir.path());
        assert!(!report.appears_valid);
        assert_eq!(
            report.details,
            vec![
                "missing ARCH3D.BSA",
                "missing BLOCKS.BSA",
                "missing MONSTER.BSA",
                "missing WOODS.WLD",
                "missing TEXTURE.nnn archives",
            ]
        );
    }

    #[test]
    fn test_complete_folder_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        for archive in REQUIRED_ARCHIVES {
            fs::write(dir.path().join(archive.to_lowercase()), b"").unwrap();
        }
        fs::write(dir.path().join("texture.042"), b"").unwrap();

        let report = Arena2Validator.validate(dir.path());
        assert!(report.appears_valid, "{:?}", report.details);
        assert!(report.details.is_empty());
    }

    #[test]
    fn test_file_is_not_a_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("MAPS.BSA");
        fs::write(&file, b"").unwrap();

        assert!(!Arena2Validator.validate(&file).appears_valid);
    }
}
