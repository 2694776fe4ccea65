//! Stamp CLI - Command-line interface for Stamp
//!
//! Checks and polls a single file for modification, the same way an
//! application would use `stamp-watcher` from its own tick loop.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::WatchOptions;
use config::WatchConfig;

#[derive(Parser)]
#[command(name = "stamp")]
#[command(author = "Stamp Contributors")]
#[command(version)]
#[command(about = "Polling file modification watcher", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to .stamp/config.json if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config into a directory
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Check whether a file can be watched
    Check {
        /// File to check
        file: PathBuf,

        /// Don't fail if the file can't be stat'ed
        #[arg(long)]
        ignore_errors: bool,
    },

    /// Poll a file and report every modification
    Watch {
        /// File to watch
        file: PathBuf,

        /// Poll interval in milliseconds
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Keep watching when the file disappears
        #[arg(long)]
        ignore_errors: bool,

        /// Don't report changes while the file is empty
        #[arg(long)]
        ignore_empty: bool,

        /// Exit after this many changes
        #[arg(short = 'n', long)]
        max_changes: Option<usize>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<WatchConfig, config::ConfigError> {
    match path {
        Some(path) => WatchConfig::load(path),
        None => {
            let cwd = std::env::current_dir().map_err(|source| config::ConfigError::Io {
                path: PathBuf::from("."),
                source,
            })?;
            WatchConfig::discover(&cwd)
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Check {
            file,
            ignore_errors,
        } => {
            let mut config = load_config(cli.config.as_ref())?;
            config.ignore_errors |= ignore_errors;
            commands::check(&file, &config)
        }
        Commands::Watch {
            file,
            interval_ms,
            ignore_errors,
            ignore_empty,
            max_changes,
        } => {
            let mut config = load_config(cli.config.as_ref())?;
            if let Some(ms) = interval_ms {
                config.poll_interval_ms = ms;
            }
            config.ignore_errors |= ignore_errors;
            config.ignore_change_if_empty |= ignore_empty;
            config.validate()?;

            let options = WatchOptions {
                config,
                max_changes,
            };
            let outcome = commands::watch(&file, &options)?;
            tracing::debug!("Watch ended with {} change(s)", outcome.changes());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
