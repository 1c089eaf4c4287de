//! Command-line entry point for the arena asset browser

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ab_core::{EnvironmentMode, TypeFilter, VERSION};
use ab_data::{build_controller, build_gate, BrowserConfig, Owners};

mod session;

use session::Session;

/// Browse directories and check arena2 game data folders
#[derive(Parser, Debug)]
#[command(name = "arena-browse")]
#[command(about = "Browse directories and check arena2 game data folders", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "ab_core=trace" (overrides RUST_LOG)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the filtered entries of a directory
    List {
        path: PathBuf,

        /// Only show entries whose name contains this text
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        show_hidden: bool,

        /// Extension to hide (repeatable)
        #[arg(long = "exclude", value_name = "EXT")]
        exclude: Vec<String>,

        /// Only list directories
        #[arg(long)]
        folders: bool,

        /// Only list files with this extension (repeatable)
        #[arg(long = "filter", value_name = "EXT")]
        filter: Vec<String>,
    },

    /// Check whether a folder holds usable arena2 data
    Validate { root: PathBuf },

    /// Browse interactively, reading commands from stdin
    Browse {
        path: Option<PathBuf>,

        /// Run as an editor session (enables the developer root)
        #[arg(long)]
        editor: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config = match &cli.config {
        Some(path) => BrowserConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BrowserConfig::load_or_default(),
    };

    info!(version = VERSION, "Starting arena-browse");
    let owners = Owners::default();

    match cli.command {
        Commands::List {
            path,
            search,
            show_hidden,
            exclude,
            folders,
            filter,
        } => {
            let mut config = config;
            config.show_hidden |= show_hidden;
            config.folder_select_mode |= folders;
            config.excluded_extensions.extend(exclude);
            list(&config, &owners, &path, search.as_deref(), &filter)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { root } => validate(&config, &owners, root),
        Commands::Browse { path, editor } => {
            let mut config = config;
            if editor {
                config.environment = EnvironmentMode::Editor;
            }
            browse(&config, &owners, path.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn list(
    config: &BrowserConfig,
    owners: &Owners,
    path: &Path,
    search: Option<&str>,
    extensions: &[String],
) -> Result<()> {
    let controller = build_controller(config, &owners.controllers);

    if !extensions.is_empty() {
        controller.set_filters(vec![TypeFilter::many("Requested", extensions)]);
        let last = controller.filter_labels().len().saturating_sub(1);
        controller.set_active_filter(last);
    }

    controller
        .set_path(path)
        .with_context(|| format!("Cannot list {}", path.display()))?;
    if let Some(search) = search {
        controller.set_search(search);
    }

    for entry in controller.valid_entries() {
        let suffix = if entry.is_directory { "/" } else { "" };
        println!("{}{suffix}", entry.name);
    }
    Ok(())
}

fn validate(config: &BrowserConfig, owners: &Owners, root: PathBuf) -> Result<ExitCode> {
    let gate = build_gate(config, &owners.gates);
    gate.set_root(root.clone());

    match gate.ensure_ready() {
        Ok(reader) => {
            println!(
                "{} is a valid arena2 folder ({} archives)",
                root.display(),
                reader.archive_names().len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn browse(config: &BrowserConfig, owners: &Owners, path: Option<&Path>) -> Result<()> {
    let controller = build_controller(config, &owners.controllers);
    let gate = build_gate(config, &owners.gates);

    if let Err(e) = controller.open(path) {
        warn!(error = %e, "Could not open initial directory");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(&controller, &gate, stdout.lock()).run(stdin.lock())
}
