//! errstk-lint CLI tool.
//!
//! Usage:
//! ```bash
//! errstk-lint check [OPTIONS] [PATHS]...
//! errstk-lint explain
//! errstk-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Checks that error-returning functions defer an errstk.Wrap annotation
#[derive(Parser)]
#[command(name = "errstk-lint")]
#[command(author, version, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check exported compilation units
    Check {
        /// JSON unit files, or directories searched for *.json
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Comma-separated exclude patterns (single-flag form)
        #[arg(long, value_name = "PATTERNS")]
        exclude_list: Option<String>,

        /// Fail immediately when a unit file cannot be loaded
        #[arg(long)]
        strict: bool,
    },

    /// Print what the checker enforces and how to suppress it
    Explain,

    /// Initialize a configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-diagnostic compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so `--format json` stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            paths,
            format,
            exclude,
            exclude_list,
            strict,
        } => commands::check::run(
            &paths,
            format,
            exclude,
            exclude_list.as_deref(),
            cli.config.as_deref(),
            strict,
        ),
        Commands::Explain => {
            commands::explain::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
