//! The entry filter pipeline

use tracing::warn;

use super::{DirectoryEntry, FilterState, SnapshotItem};

/// Pure reduction of a directory snapshot to its displayable entries
pub struct EntryFilter;

impl EntryFilter {
    /// Compute the valid entries of `snapshot` under `state`
    ///
    /// Output keeps snapshot order. Entries that could not be inspected are
    /// logged and skipped; they never abort the computation.
    pub fn compute(snapshot: &[SnapshotItem], state: &FilterState) -> Vec<DirectoryEntry> {
        let search = state.search_substring.to_lowercase();

        snapshot
            .iter()
            .filter_map(|item| match item {
                Ok(entry) => Some(entry),
                Err(fault) => {
                    warn!(entry = %fault.name, reason = %fault.reason, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| Self::accepts_lowered(entry, state, &search))
            .cloned()
            .collect()
    }

    fn accepts_lowered(entry: &DirectoryEntry, state: &FilterState, search: &str) -> bool {
        if state.folder_only_mode && !entry.is_directory {
            return false;
        }

        if entry.attributes.intersects(state.ignored_attributes()) {
            return false;
        }

        if !entry.is_directory {
            let extension = entry.extension.to_lowercase();

            if state.excluded_extensions.contains(&extension) {
                return false;
            }

            if let Some(active) = &state.active_type_extensions {
                if !active.contains(&extension) {
                    return false;
                }
            }
        }

        search.is_empty() || entry.name.to_lowercase().contains(search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntryFault;
    use crate::filter::FileAttributes;

    fn snapshot() -> Vec<SnapshotItem> {
        vec![Ok(DirectoryEntry::file("a.txt")), Ok(DirectoryEntry::directory("sub"))]
    }

    fn names(entries: &[DirectoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_excluded_extension() {
        let state = FilterState::new().with_excluded_extensions(["txt"]);
        let result = EntryFilter::compute(&snapshot(), &state);
        assert_eq!(names(&result), vec!["sub"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let state = FilterState::new().with_search("ub");
        let result = EntryFilter::compute(&snapshot(), &state);
        assert_eq!(names(&result), vec!["sub"]);

        let state = FilterState::new().with_search("A.T");
        let result = EntryFilter::compute(&snapshot(), &state);
        assert_eq!(names(&result), vec!["a.txt"]);
    }

    #[test]
    fn test_folder_only_mode_drops_files() {
        let state = FilterState::new().with_folder_only_mode(true);
        let result = EntryFilter::compute(&snapshot(), &state);
        assert_eq!(names(&result), vec!["sub"]);
    }

    #[test]
    fn test_hidden_and_system_attributes() {
        let snapshot = vec![
            Ok(DirectoryEntry::file("shown.bsa")),
            Ok(DirectoryEntry::file(".hidden").with_attributes(FileAttributes::HIDDEN)),
            Ok(DirectoryEntry::directory("pagefile").with_attributes(FileAttributes::SYSTEM)),
        ];

        let result = EntryFilter::compute(&snapshot, &FilterState::new());
        assert_eq!(names(&result), vec!["shown.bsa"]);

        let state = FilterState::new().with_include_hidden(true);
        let result = EntryFilter::compute(&snapshot, &state);
        assert_eq!(names(&result), vec!["shown.bsa", ".hidden"]);
    }

    #[test]
    fn test_active_type_filter_exempts_directories() {
        let snapshot = vec![
            Ok(DirectoryEntry::file("MAPS.BSA")),
            Ok(DirectoryEntry::file("notes.txt")),
            Ok(DirectoryEntry::directory("arena2")),
        ];
        let state = FilterState::new().with_active_type_extensions(Some(["bsa"]));

        let result = EntryFilter::compute(&snapshot, &state);
        assert_eq!(names(&result), vec!["MAPS.BSA", "arena2"]);
    }

    #[test]
    fn test_faulty_entry_is_skipped() {
        let snapshot = vec![
            Ok(DirectoryEntry::file("first.txt")),
            Err(EntryFault::new("locked", "permission denied")),
            Ok(DirectoryEntry::file("last.txt")),
        ];

        let result = EntryFilter::compute(&snapshot, &FilterState::new());
        assert_eq!(names(&result), vec!["first.txt", "last.txt"]);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let state = FilterState::new()
            .with_excluded_extensions(["meta"])
            .with_search("a");
        let snapshot = vec![
            Ok(DirectoryEntry::file("alpha.meta")),
            Ok(DirectoryEntry::file("alpha.bsa")),
            Ok(DirectoryEntry::directory("data")),
            Ok(DirectoryEntry::file("zeta.wld")),
        ];

        let first = EntryFilter::compute(&snapshot, &state);
        let second = EntryFilter::compute(&snapshot, &state);
        assert_eq!(first, second);
        assert_eq!(names(&first), vec!["alpha.bsa", "data", "zeta.wld"]);
    }
}
