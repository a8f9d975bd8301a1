//! Inline suppression directives.
//!
//! Two comment families exempt code from the checker:
//!
//! ```text
//! //nolint                        every checker
//! //nolint:errstklint,unused      the listed checkers
//! //lint:ignore errstklint why    one checker, next declaration
//! //lint:file-ignore errstklint why   one checker, whole file
//! ```
//!
//! A directive placed before the package clause, and `file-ignore`
//! anywhere, suppress the whole file; otherwise the directive covers the
//! first declaration that starts after it.

use crate::tree::{Comment, Decl, Pos, SourceFile};
use serde::{Deserialize, Serialize};

/// The list token that stands for every checker.
const WILDCARD: &str = "all";

/// An inclusive range of suppressed lines in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressedRange {
    /// First suppressed line.
    pub start: usize,
    /// Last suppressed line.
    pub end: usize,
}

impl SuppressedRange {
    /// Returns true if `line` falls inside the range.
    #[must_use]
    pub fn contains_line(self, line: usize) -> bool {
        line >= self.start && line <= self.end
    }
}

/// A recognized suppression directive.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Directive {
    /// `nolint`, with an optional comma-separated checker list.
    Nolint { checkers: Option<String> },
    /// `lint:ignore` / `lint:file-ignore`, naming one checker.
    LintIgnore { file_scope: bool, checker: String },
}

/// Computes the suppressed line ranges of a file for `checker_name`.
///
/// Ranges may overlap; membership is what matters. A file with no comments,
/// no declarations, or no package clause degrades to fewer (or no) ranges,
/// never to an error.
#[must_use]
pub fn suppressed_ranges(file: &SourceFile, checker_name: &str) -> Vec<SuppressedRange> {
    let index = DeclIndex::new(&file.decls);
    let mut ranges = Vec::new();

    for comment in &file.comments {
        let Some(directive) = parse_directive(&comment.text) else {
            continue;
        };
        match directive {
            Directive::Nolint { checkers } => {
                if nolint_applies(checkers.as_deref(), checker_name) {
                    ranges.push(range_for(comment, file, &index));
                }
            }
            Directive::LintIgnore {
                file_scope,
                checker,
            } => {
                if checker == checker_name {
                    if file_scope {
                        ranges.push(whole_file(file));
                    } else {
                        ranges.push(range_for(comment, file, &index));
                    }
                }
            }
        }
    }

    ranges
}

fn whole_file(file: &SourceFile) -> SuppressedRange {
    SuppressedRange {
        start: file.first_line,
        end: file.last_line,
    }
}

/// Range for a declaration-scoped directive: the whole file when the
/// comment precedes the package clause, otherwise the first declaration
/// after the comment, otherwise just the comment line (a directive with
/// nothing to attach to is a no-op).
fn range_for(comment: &Comment, file: &SourceFile, index: &DeclIndex) -> SuppressedRange {
    if let Some(package_pos) = file.package_pos {
        if comment.pos.line < package_pos.line {
            return whole_file(file);
        }
    }
    match index.first_after(comment.pos) {
        Some((start, end)) => SuppressedRange { start, end },
        None => SuppressedRange {
            start: comment.pos.line,
            end: comment.pos.line,
        },
    }
}

/// Declarations sorted by start position, for binary-search association.
struct DeclIndex {
    spans: Vec<(Pos, usize)>,
}

impl DeclIndex {
    fn new(decls: &[Decl]) -> Self {
        let mut spans: Vec<(Pos, usize)> =
            decls.iter().map(|decl| (decl.pos, decl.end_line)).collect();
        spans.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        Self { spans }
    }

    /// First declaration starting strictly after `pos`, as
    /// `(start line, end line)`.
    fn first_after(&self, pos: Pos) -> Option<(usize, usize)> {
        let idx = self.spans.partition_point(|(start, _)| *start <= pos);
        self.spans.get(idx).map(|(start, end)| (start.line, *end))
    }
}

/// Parses one comment into a directive, if it is one.
///
/// The line-comment marker and surrounding whitespace are stripped first;
/// block comments never carry directives.
fn parse_directive(raw: &str) -> Option<Directive> {
    let text = raw.strip_prefix("//").unwrap_or(raw).trim();
    parse_nolint(text).or_else(|| parse_lint_ignore(text))
}

/// `nolint`, optionally `:a,b,c`. The list, when present, must be a
/// non-empty run of word characters and commas, followed by whitespace or
/// the end of the comment.
fn parse_nolint(text: &str) -> Option<Directive> {
    let rest = text.strip_prefix("nolint")?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        return Some(Directive::Nolint { checkers: None });
    }

    let list = rest.strip_prefix(':')?;
    let end = list
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == ','))
        .unwrap_or(list.len());
    if end == 0 {
        return None;
    }
    let after = &list[end..];
    if !(after.is_empty() || after.starts_with(char::is_whitespace)) {
        return None;
    }

    Some(Directive::Nolint {
        checkers: Some(list[..end].to_string()),
    })
}

/// `lint:ignore <checker> [reason]` / `lint:file-ignore <checker> [reason]`.
fn parse_lint_ignore(text: &str) -> Option<Directive> {
    let rest = text.strip_prefix("lint:")?;
    let (file_scope, rest) = if let Some(r) = rest.strip_prefix("file-ignore") {
        (true, r)
    } else if let Some(r) = rest.strip_prefix("ignore") {
        (false, r)
    } else {
        return None;
    };

    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let checker = rest.split_whitespace().next()?;

    Some(Directive::LintIgnore {
        file_scope,
        checker: checker.to_string(),
    })
}

/// A `nolint` list applies when absent, empty, the wildcard, or containing
/// the checker name (entries trimmed, exact and case-sensitive).
fn nolint_applies(checkers: Option<&str>, checker_name: &str) -> bool {
    match checkers {
        None => true,
        Some(list) if list.is_empty() || list == WILDCARD => true,
        Some(list) => list.split(',').any(|entry| entry.trim() == checker_name),
    }
}
