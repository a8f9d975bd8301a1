//! Check command implementation.

use anyhow::{Context, Result};
use errstk_lint_core::{parse_exclude_list, CheckResult, Checker, CompilationUnit, Config};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::OutputFormat;

/// Default configuration file looked up in the working directory.
const CONFIG_FILE: &str = "errstk-lint.toml";

/// Runs the check command.
pub fn run(
    paths: &[PathBuf],
    format: OutputFormat,
    exclude: Vec<String>,
    exclude_list: Option<&str>,
    config_path: Option<&Path>,
    strict: bool,
) -> Result<()> {
    let config = load_config(config_path)?;

    let mut builder = Checker::builder().config(config).excludes(exclude);
    if let Some(raw) = exclude_list {
        builder = builder.excludes(parse_exclude_list(raw));
    }
    let checker = builder.build();

    let unit_files = collect_unit_files(paths)?;
    tracing::info!("checking {} unit file(s)", unit_files.len());

    let mut result = CheckResult::new();
    for unit_file in &unit_files {
        match load_unit(unit_file) {
            Ok(unit) => result.extend(checker.check(&unit)),
            Err(e) if strict => return Err(e),
            Err(e) => tracing::warn!("skipping {}: {e:#}", unit_file.display()),
        }
    }

    super::output::print(&result, format)?;

    // Exit with error code if anything was reported
    if !result.is_clean() {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => {
            let default = Path::new(CONFIG_FILE);
            if default.exists() {
                tracing::info!("using config: {CONFIG_FILE}");
                Config::from_file(default)
                    .with_context(|| format!("failed to load config: {CONFIG_FILE}"))
            } else {
                Ok(Config::default())
            }
        }
    }
}

/// Expands path arguments into concrete unit files. Directories are walked
/// recursively for `*.json`; file arguments are taken as-is.
fn collect_unit_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry =
                    entry.with_context(|| format!("failed to walk {}", path.display()))?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "json")
                {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn load_unit(path: &Path) -> Result<CompilationUnit> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to decode {}", path.display()))
}
