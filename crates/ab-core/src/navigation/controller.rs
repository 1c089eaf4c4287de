//! Navigation controller implementation

use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{BrowsePath, BrowserContext, BrowserSubscriber, FileSystem, PathHistory};
use crate::error::NavigationError;
use crate::filter::{
    DirectoryEntry, EntryFilter, FilterState, SnapshotItem, TypeFilter, ALL_FILES_FILTER_TEXT,
    FOLDERS_FILTER_TEXT,
};
use crate::readiness::OwnedInstance;
use crate::VERSION;

/// Outcome of a successful `set_path`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathChange {
    /// A different directory was entered and listed
    Changed,
    /// The path was already current; only the filter ran again
    Refreshed,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Back,
    Forward,
}

/// Browser state stored internally
#[derive(Debug)]
struct BrowserState {
    history: PathHistory,
    current: Option<BrowsePath>,
    snapshot: Vec<SnapshotItem>,
    filter: FilterState,
    filters: Vec<TypeFilter>,
    active_filter: usize,
    show_all_files_filter: bool,
    valid_entries: Vec<DirectoryEntry>,
    selected: Option<usize>,
}

/// Owns the current directory, its filtered listing and the selection
///
/// Every mutation goes through a method here; subscribers are told about
/// each change once the state lock has been released.
pub struct NavigationController {
    id: Uuid,
    fs: Arc<dyn FileSystem>,
    default_path: Option<PathBuf>,
    state: RwLock<BrowserState>,
    subscribers: RwLock<Vec<Weak<dyn BrowserSubscriber>>>,
}

impl NavigationController {
    /// Create a controller with no current path
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        let state = BrowserState {
            history: PathHistory::new(),
            current: None,
            snapshot: Vec::new(),
            filter: FilterState::default(),
            filters: vec![TypeFilter::all(ALL_FILES_FILTER_TEXT)],
            active_filter: 0,
            show_all_files_filter: true,
            valid_entries: Vec::new(),
            selected: None,
        };

        Self {
            id: Uuid::new_v4(),
            fs,
            default_path: None,
            state: RwLock::new(state),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Start from the given filter settings
    pub fn with_filter_state(self, filter: FilterState) -> Self {
        self.state.write().filter = filter;
        self
    }

    /// Directory used by `open` when nothing better is available
    pub fn with_default_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_path = Some(path.into());
        self
    }

    /// Whether `set_filters` prepends the implicit all-files filter
    pub fn with_all_files_filter(self, show: bool) -> Self {
        self.state.write().show_all_files_filter = show;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Navigate to `raw`
    ///
    /// A path equal to the current one only re-runs the filter. Otherwise the
    /// path is validated, recorded in history, listed and filtered; search and
    /// selection are cleared. An invalid path leaves all state untouched.
    pub fn set_path(&self, raw: impl AsRef<Path>) -> Result<PathChange, NavigationError> {
        let raw = raw.as_ref();
        let normalized = BrowsePath::normalize(raw)
            .ok_or_else(|| NavigationError::InvalidPath(raw.display().to_string()))?;

        let mut state = self.state.write();

        if state.current.as_ref().is_some_and(|current| *current == *normalized) {
            Self::recompute(&mut state);
            drop(state);
            self.notify_subscribers();
            return Ok(PathChange::Refreshed);
        }

        let path = match BrowsePath::resolve(raw, self.fs.as_ref()) {
            Ok(path) => path,
            Err(e) => {
                warn!(path = %raw.display(), error = %e, "Rejected path");
                return Err(e);
            }
        };

        state.history.navigate(path.clone());
        let listed = self.enter(&mut state, path);

        drop(state);
        self.notify_subscribers();
        listed.map(|_| PathChange::Changed)
    }

    /// Replace the search substring. Returns whether it changed.
    pub fn set_search(&self, text: &str) -> bool {
        self.update_filter(|filter| filter.with_search(text))
    }

    /// Select the entry at `position` of the valid entries
    ///
    /// Any previous selection is cleared first; an out-of-range position
    /// leaves nothing selected.
    pub fn select_at(&self, position: usize) -> Option<DirectoryEntry> {
        let mut state = self.state.write();
        state.selected = None;

        let entry = state.valid_entries.get(position).cloned();
        if entry.is_some() {
            state.selected = Some(position);
        }

        drop(state);
        self.notify_subscribers();
        entry
    }

    /// Move back in history and show that directory
    ///
    /// Returns `Ok(None)` when there is nothing to go back to.
    pub fn go_back(&self) -> Result<Option<BrowsePath>, NavigationError> {
        self.replay(Direction::Back)
    }

    /// Move forward in history and show that directory
    pub fn go_forward(&self) -> Result<Option<BrowsePath>, NavigationError> {
        self.replay(Direction::Forward)
    }

    /// Navigate to the parent of the current directory
    pub fn go_up(&self) -> Result<Option<BrowsePath>, NavigationError> {
        let parent = self
            .state
            .read()
            .current
            .as_ref()
            .and_then(|current| current.parent().map(Path::to_path_buf));

        let Some(parent) = parent else {
            return Ok(None);
        };

        self.set_path(&parent)?;
        Ok(self.current())
    }

    /// Re-list the current directory, e.g. after the application regains focus
    pub fn reload(&self) -> Result<(), NavigationError> {
        let mut state = self.state.write();
        let Some(path) = state.current.clone() else {
            return Ok(());
        };

        state.selected = None;
        let listed = self.fetch_snapshot(&mut state, &path);
        Self::recompute(&mut state);

        drop(state);
        self.notify_subscribers();
        listed
    }

    /// Show the browser at an initial directory
    ///
    /// Selection and search are reset and the directory is listed even if it
    /// is already current.
    pub fn open(&self, initial: Option<&Path>) -> Result<BrowsePath, NavigationError> {
        let target = self.resolve_initial_path(initial)?;

        let mut state = self.state.write();
        state.history.navigate(target.clone());
        let listed = self.enter(&mut state, target.clone());

        drop(state);
        self.notify_subscribers();
        listed.map(|_| target)
    }

    /// Pick the directory `open` starts in
    ///
    /// The requested path wins if it exists, then the current path, then the
    /// configured default path.
    pub fn resolve_initial_path(&self, requested: Option<&Path>) -> Result<BrowsePath, NavigationError> {
        if let Some(raw) = requested {
            match BrowsePath::resolve(raw, self.fs.as_ref()) {
                Ok(path) => return Ok(path),
                Err(e) => debug!(path = %raw.display(), error = %e, "Requested initial path unusable"),
            }
        }

        if let Some(current) = self.current() {
            return Ok(current);
        }

        match &self.default_path {
            Some(default) => BrowsePath::resolve(default, self.fs.as_ref()),
            None => Err(NavigationError::InvalidPath("no initial path available".to_string())),
        }
    }

    /// Replace the type filters
    ///
    /// The all-files filter is prepended when enabled (or when no filters are
    /// given) unless one is already present. The first filter becomes active.
    pub fn set_filters(&self, filters: Vec<TypeFilter>) {
        let mut state = self.state.write();

        let mut list = Vec::with_capacity(filters.len() + 1);
        let has_all_files = filters.iter().any(TypeFilter::is_all_files);
        if !has_all_files && (state.show_all_files_filter || filters.is_empty()) {
            list.push(TypeFilter::all(ALL_FILES_FILTER_TEXT));
        }
        list.extend(filters);

        state.filters = list;
        state.active_filter = 0;
        Self::apply_active_filter(&mut state);
        Self::recompute(&mut state);

        drop(state);
        self.notify_subscribers();
    }

    /// Activate the type filter at `index`. Ignored while picking folders.
    pub fn set_active_filter(&self, index: usize) -> bool {
        let mut state = self.state.write();
        if state.filter.folder_only_mode
            || index >= state.filters.len()
            || index == state.active_filter
        {
            return false;
        }

        state.active_filter = index;
        Self::apply_active_filter(&mut state);
        Self::recompute(&mut state);

        drop(state);
        self.notify_subscribers();
        true
    }

    pub fn set_show_hidden(&self, show: bool) -> bool {
        self.update_filter(|filter| filter.with_include_hidden(show))
    }

    pub fn set_excluded_extensions<I, S>(&self, extensions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.update_filter(|filter| filter.with_excluded_extensions(extensions))
    }

    /// Switch between picking files and picking folders
    pub fn set_folder_select_mode(&self, enabled: bool) -> bool {
        let mut state = self.state.write();
        if state.filter.folder_only_mode == enabled {
            return false;
        }

        state.filter = std::mem::take(&mut state.filter).with_folder_only_mode(enabled);
        if enabled {
            state.active_filter = 0;
            Self::apply_active_filter(&mut state);
        }
        Self::recompute(&mut state);

        drop(state);
        self.notify_subscribers();
        true
    }

    /// Display labels of the type filters
    pub fn filter_labels(&self) -> Vec<String> {
        let state = self.state.read();
        state
            .filters
            .iter()
            .enumerate()
            .map(|(i, filter)| {
                if i == 0 && state.filter.folder_only_mode {
                    FOLDERS_FILTER_TEXT.to_string()
                } else {
                    filter.to_string()
                }
            })
            .collect()
    }

    pub fn current(&self) -> Option<BrowsePath> {
        self.state.read().current.clone()
    }

    pub fn valid_entries(&self) -> Vec<DirectoryEntry> {
        self.state.read().valid_entries.clone()
    }

    pub fn selected_position(&self) -> Option<usize> {
        self.state.read().selected
    }

    pub fn selected_entry(&self) -> Option<DirectoryEntry> {
        let state = self.state.read();
        state.selected.and_then(|i| state.valid_entries.get(i).cloned())
    }

    /// Full path of the selected entry
    pub fn selected_path(&self) -> Option<PathBuf> {
        let state = self.state.read();
        let entry = state.selected.and_then(|i| state.valid_entries.get(i))?;
        state.current.as_ref().map(|dir| dir.join(&entry.name))
    }

    pub fn search(&self) -> String {
        self.state.read().filter.search_substring.clone()
    }

    pub fn filter_state(&self) -> FilterState {
        self.state.read().filter.clone()
    }

    pub fn active_filter(&self) -> usize {
        self.state.read().active_filter
    }

    pub fn history(&self) -> PathHistory {
        self.state.read().history.clone()
    }

    pub fn can_go_back(&self) -> bool {
        self.state.read().history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.state.read().history.can_go_forward()
    }

    pub fn can_go_up(&self) -> bool {
        self.state
            .read()
            .current
            .as_ref()
            .is_some_and(|current| current.parent().is_some())
    }

    /// Get current browser context
    pub fn context(&self) -> BrowserContext {
        let state = self.state.read();
        BrowserContext {
            current: state.current.clone(),
            entries: state.valid_entries.clone(),
            selected: state.selected,
            search: state.filter.search_substring.clone(),
            can_go_back: state.history.can_go_back(),
            can_go_forward: state.history.can_go_forward(),
        }
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn BrowserSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    fn replay(&self, direction: Direction) -> Result<Option<BrowsePath>, NavigationError> {
        let mut state = self.state.write();

        let target = match direction {
            Direction::Back => state.history.peek_back().cloned(),
            Direction::Forward => state.history.peek_forward().cloned(),
        };
        let Some(target) = target else {
            debug!(?direction, "History boundary reached");
            return Ok(None);
        };

        // History replay must not truncate, so the cursor moves here instead
        // of going through `PathHistory::navigate`.
        if !self.fs.directory_exists(target.as_path()) {
            warn!(path = %target, "History entry no longer exists");
            return Err(NavigationError::NotADirectory(target.into_path_buf()));
        }
        match direction {
            Direction::Back => state.history.back(),
            Direction::Forward => state.history.forward(),
        };

        let listed = self.enter(&mut state, target.clone());

        drop(state);
        self.notify_subscribers();
        listed.map(|_| Some(target))
    }

    fn enter(&self, state: &mut BrowserState, path: BrowsePath) -> Result<(), NavigationError> {
        info!(path = %path, version = VERSION, "Entering directory");

        state.filter = std::mem::take(&mut state.filter).with_search(String::new());
        state.selected = None;
        let listed = self.fetch_snapshot(state, &path);
        state.current = Some(path);
        Self::recompute(state);
        listed
    }

    fn fetch_snapshot(&self, state: &mut BrowserState, path: &BrowsePath) -> Result<(), NavigationError> {
        match self.fs.list_directory(path.as_path()) {
            Ok(items) => {
                debug!(path = %path, count = items.len(), "Listed directory");
                state.snapshot = items;
                Ok(())
            }
            Err(source) => {
                error!(path = %path, error = %source, "Failed to list directory");
                state.snapshot = Vec::new();
                Err(NavigationError::Listing {
                    path: path.as_path().to_path_buf(),
                    source,
                })
            }
        }
    }

    fn update_filter(&self, update: impl FnOnce(FilterState) -> FilterState) -> bool {
        let mut state = self.state.write();
        let next = update(state.filter.clone());
        if next == state.filter {
            return false;
        }

        state.filter = next;
        Self::recompute(&mut state);

        drop(state);
        self.notify_subscribers();
        true
    }

    fn apply_active_filter(state: &mut BrowserState) {
        let extensions = state
            .filters
            .get(state.active_filter)
            .and_then(|filter| filter.extensions.clone());
        state.filter = std::mem::take(&mut state.filter).with_active_type_extensions(extensions);
    }

    /// Rebuild the valid entries from scratch. Selection never survives.
    fn recompute(state: &mut BrowserState) {
        state.valid_entries = EntryFilter::compute(&state.snapshot, &state.filter);
        state.selected = None;
    }

    /// Notify all subscribers of a browser change
    ///
    /// No lock is held during the callbacks, so subscribers may call back
    /// into the controller.
    fn notify_subscribers(&self) {
        let context = self.context();

        let live: Vec<Arc<dyn BrowserSubscriber>> = {
            let mut subscribers = self.subscribers.write();

            // Remove any dead weak references
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for subscriber in live {
            subscriber.on_browser_change(&context);
        }
    }
}

impl OwnedInstance for NavigationController {
    fn instance_id(&self) -> Uuid {
        self.id
    }
}
