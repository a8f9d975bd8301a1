//! Explain command implementation.

use errstk_lint_core::DOC;

/// Prints the rule documentation.
pub fn run() {
    println!("{DOC}");
}
