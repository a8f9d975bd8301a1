//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# errstk-lint configuration

# Glob patterns for files to exclude from checking.
# Patterns match the full exported path or its final segment; `**` matches
# any number of directories.
exclude = [
    "**/*.pb.go",
    "**/*.yo.go",
    "**/mock_*.go",
]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("errstk-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created errstk-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit errstk-lint.toml to adjust exclude patterns");
    println!("  2. Run: errstk-lint check <units>");

    Ok(())
}
