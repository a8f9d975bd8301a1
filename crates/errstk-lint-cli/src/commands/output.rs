//! Shared output formatting for check results.

use anyhow::Result;
use errstk_lint_core::CheckResult;

use crate::OutputFormat;

/// Print check results in the specified format.
pub fn print(result: &CheckResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &CheckResult) {
    for diagnostic in &result.diagnostics {
        println!(
            "{}:{}:{}",
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.location.column,
        );
        println!("  \x1b[31merror\x1b[0m: {}", diagnostic.message);
        println!();
    }

    let summary_color = if result.is_clean() {
        "\x1b[32m"
    } else {
        "\x1b[31m"
    };

    println!(
        "{}Found {} violation(s) in {} file(s)\x1b[0m",
        summary_color,
        result.diagnostics.len(),
        result.files_checked
    );
}

fn print_json(result: &CheckResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &CheckResult) {
    for diagnostic in &result.diagnostics {
        println!("{diagnostic}");
    }
}
