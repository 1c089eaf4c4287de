//! Error types for navigation and readiness

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while navigating between directories
#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not an existing directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to list {}: {source}", path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the readiness gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("No root path configured")]
    NoRootConfigured,

    #[error("Root {} failed validation: {}", root.display(), details.join("; "))]
    ValidationFailed {
        root: PathBuf,
        details: Vec<String>,
    },

    #[error("Could not construct resource reader for {}: {reason}", root.display())]
    ReaderConstruction {
        root: PathBuf,
        reason: String,
    },
}

/// A single directory entry that could not be inspected
///
/// Faults are carried inside a directory snapshot and skipped by the filter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot inspect entry '{name}': {reason}")]
pub struct EntryFault {
    pub name: String,
    pub reason: String,
}

impl EntryFault {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
