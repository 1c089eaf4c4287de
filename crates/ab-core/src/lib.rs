//! Core functionality for the arena asset browser
//!
//! This crate provides the navigation-and-readiness subsystem: a browser-style
//! path history, the directory entry filter, the navigation controller that
//! ties them together, and the readiness gate that guards first use of the
//! resource reader.

pub mod error;
pub mod filter;
pub mod navigation;
pub mod readiness;

/// Version tag attached to diagnostic messages
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use error::{EntryFault, NavigationError, ReadinessError};
pub use filter::{
    DirectoryEntry, EntryFilter, FileAttributes, FilterState, SnapshotItem, TypeFilter,
};
pub use navigation::{
    BrowsePath, BrowserContext, BrowserSubscriber, FileSystem, MemoryFileSystem,
    NavigationController, PathChange, PathHistory,
};
pub use readiness::{
    EnvironmentMode, GateState, OwnedInstance, OwnerRegistry, ReaderFactory, ReadinessGate,
    ReadyInfo, RootValidator, ValidationReport,
};
