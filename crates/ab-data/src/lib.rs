//! Filesystem sources and configuration for the arena asset browser

pub mod config;
pub mod sources;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use ab_core::readiness::BoxError;
use ab_core::{NavigationController, OwnerRegistry, ReadinessGate};

// Re-exports
pub use config::{default_browse_path, BrowserConfig, ConfigError, TypeFilterConfig};
pub use sources::{Arena2Validator, ContentReader, LocalFileSystem, REQUIRED_ARCHIVES};

/// Errors that can occur while reading game content
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Single-owner handles for the subsystems an entry point builds
///
/// Created once by the entry point and passed to the builders below.
#[derive(Default)]
pub struct Owners {
    pub controllers: OwnerRegistry<NavigationController>,
    pub gates: OwnerRegistry<ReadinessGate<ContentReader>>,
}

/// Build a controller over the local filesystem from `config`
///
/// Filters are applied but no directory is opened yet. If `owners` already
/// holds a live controller, that one is returned and the new one is dropped.
pub fn build_controller(
    config: &BrowserConfig,
    owners: &OwnerRegistry<NavigationController>,
) -> Arc<NavigationController> {
    let default_path = config
        .initial_path
        .clone()
        .unwrap_or_else(default_browse_path);

    let controller = NavigationController::new(Arc::new(LocalFileSystem::new()))
        .with_filter_state(config.filter_state())
        .with_default_path(default_path)
        .with_all_files_filter(config.show_all_files_filter);
    controller.set_filters(config.type_filters());
    owners.claim(Arc::new(controller))
}

/// Build a readiness gate guarding a [`ContentReader`]
///
/// Same ownership rule as [`build_controller`].
pub fn build_gate(
    config: &BrowserConfig,
    owners: &OwnerRegistry<ReadinessGate<ContentReader>>,
) -> Arc<ReadinessGate<ContentReader>> {
    let gate = ReadinessGate::new(config.environment, Arena2Validator, |root: &Path| {
        ContentReader::open(root).map_err(|e| Box::new(e) as BoxError)
    });

    if let Some(root) = &config.root_path {
        gate.set_root(root.clone());
    }
    gate.set_developer_root(config.developer_root());
    owners.claim(Arc::new(gate))
}
