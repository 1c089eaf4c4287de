//! Readiness gate for the resource reader
//!
//! A [`ReadinessGate`] stays closed until an external [`RootValidator`]
//! accepts the configured root directory. Only then is the resource reader
//! built through a [`ReaderFactory`]; afterwards `ensure_ready` is a cheap
//! check that is safe to call on every tick.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod gate;
mod owner;

pub use gate::ReadinessGate;
pub use owner::{OwnedInstance, OwnerRegistry};

/// Boxed error returned by reader factories
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Where the gate is running
///
/// Editor sessions may fall back to a developer root when nothing else is
/// configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    Editor,
    #[default]
    Runtime,
}

/// Lifecycle of a readiness gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unconfigured,
    Validating,
    Ready,
    Failed,
}

/// Verdict of a root validation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub appears_valid: bool,
    /// Human-readable reasons, usually the missing pieces
    pub details: Vec<String>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            appears_valid: true,
            details: Vec::new(),
        }
    }

    pub fn invalid(details: Vec<String>) -> Self {
        Self {
            appears_valid: false,
            details,
        }
    }
}

/// When and where the gate last became ready
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyInfo {
    pub root: PathBuf,
    pub validated_at: chrono::DateTime<chrono::Utc>,
}

/// Checks whether a root directory looks usable
pub trait RootValidator: Send + Sync {
    fn validate(&self, root: &Path) -> ValidationReport;
}

impl<F> RootValidator for F
where
    F: Fn(&Path) -> ValidationReport + Send + Sync,
{
    fn validate(&self, root: &Path) -> ValidationReport {
        self(root)
    }
}

/// Builds the resource reader once a root has validated
pub trait ReaderFactory<R>: Send + Sync {
    fn construct(&self, root: &Path) -> Result<R, BoxError>;
}

impl<R, F> ReaderFactory<R> for F
where
    F: Fn(&Path) -> Result<R, BoxError> + Send + Sync,
{
    fn construct(&self, root: &Path) -> Result<R, BoxError> {
        self(root)
    }
}
