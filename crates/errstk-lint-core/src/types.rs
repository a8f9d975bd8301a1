//! Diagnostic types produced by the checker.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source location of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path as reported by the exporter.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// A rule violation found during a check.
///
/// Immutable once emitted; the checker never retracts a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Name of the checker that produced this diagnostic.
    pub checker: String,
    /// Position of the violating declaration.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic for this checker.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            checker: crate::checker::CHECKER_NAME.to_string(),
            location,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.message
        )
    }
}

/// Result of checking one or more compilation units.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CheckResult {
    /// All diagnostics, in traversal order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of non-excluded files visited.
    pub files_checked: usize,
}

impl CheckResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no diagnostics were emitted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Prints diagnostics and a summary line to stdout.
    pub fn print_report(&self) {
        for diagnostic in &self.diagnostics {
            println!("{diagnostic}");
        }

        println!(
            "\nFound {} violation(s) in {} file(s)",
            self.diagnostics.len(),
            self.files_checked
        );
    }

    /// Adds diagnostics from another result.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_diagnostic() -> Diagnostic {
        Diagnostic::new(
            Location::new("pkg/store.go", 42, 1),
            "function Load returns error but missing defer errstk.Wrap(&err)",
        )
    }

    #[test]
    fn display_is_path_line_column_message() {
        let d = make_diagnostic();
        assert_eq!(
            d.to_string(),
            "pkg/store.go:42:1: function Load returns error but missing defer errstk.Wrap(&err)"
        );
    }

    #[test]
    fn diagnostic_carries_checker_name() {
        assert_eq!(make_diagnostic().checker, crate::checker::CHECKER_NAME);
    }

    #[test]
    fn empty_result_is_clean() {
        let result = CheckResult::new();
        assert!(result.is_clean());
        assert_eq!(result.files_checked, 0);
    }

    #[test]
    fn extend_merges_counts_and_diagnostics() {
        let mut a = CheckResult::new();
        a.files_checked = 2;
        a.diagnostics.push(make_diagnostic());

        let mut b = CheckResult::new();
        b.files_checked = 3;
        b.diagnostics.push(make_diagnostic());

        a.extend(b);
        assert_eq!(a.files_checked, 5);
        assert_eq!(a.diagnostics.len(), 2);
        assert!(!a.is_clean());
    }
}
