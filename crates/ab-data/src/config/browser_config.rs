//! Persisted browser settings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use ab_core::{EnvironmentMode, FilterState, TypeFilter};

/// Errors reading or writing a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A named extension filter as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFilterConfig {
    pub name: String,
    pub extensions: Vec<String>,
}

/// Configuration for the browser and the readiness gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Directory the browser opens in
    pub initial_path: Option<PathBuf>,

    /// The arena2 folder guarded by the readiness gate
    pub root_path: Option<PathBuf>,

    /// Extensions never listed
    pub excluded_extensions: Vec<String>,

    pub show_hidden: bool,

    /// Pick folders instead of files
    pub folder_select_mode: bool,

    pub type_filters: Vec<TypeFilterConfig>,

    /// Offer "All Files" ahead of the configured type filters
    pub show_all_files_filter: bool,

    pub environment: EnvironmentMode,

    /// Text file holding a fallback arena2 path for editor sessions
    pub developer_root_file: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            initial_path: None,
            root_path: None,
            excluded_extensions: Vec::new(),
            show_hidden: false,
            folder_select_mode: false,
            type_filters: Vec::new(),
            show_all_files_filter: true,
            environment: EnvironmentMode::default(),
            developer_root_file: None,
        }
    }
}

impl BrowserConfig {
    /// Default config file location
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("arena-browse").join("config.json"))
    }

    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the default location, falling back to defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_config_path() else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_error)
    }

    /// Initial filter settings for the controller
    pub fn filter_state(&self) -> FilterState {
        FilterState::new()
            .with_excluded_extensions(&self.excluded_extensions)
            .with_include_hidden(self.show_hidden)
            .with_folder_only_mode(self.folder_select_mode)
    }

    /// Configured type filters, without the implicit all-files entry
    pub fn type_filters(&self) -> Vec<TypeFilter> {
        self.type_filters
            .iter()
            .map(|filter| TypeFilter::many(filter.name.clone(), &filter.extensions))
            .collect()
    }

    /// Read the developer root file, if configured
    ///
    /// The file holds a single path; surrounding whitespace is ignored.
    pub fn developer_root(&self) -> Option<PathBuf> {
        let file = self.developer_root_file.as_ref()?;
        match fs::read_to_string(file) {
            Ok(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
            }
            Err(e) => {
                debug!(path = %file.display(), error = %e, "No developer root");
                None
            }
        }
    }
}

/// Directory to browse when nothing is configured
///
/// The user's documents folder, else the home folder, else the working
/// directory.
pub fn default_browse_path() -> PathBuf {
    dirs::document_dir()
        .filter(|dir| dir.is_dir())
        .or_else(dirs::home_dir)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
