//! File exclusion by glob patterns, with recursive-wildcard support.
//!
//! Two matching tiers: conventional single-level globs through
//! [`glob::Pattern`], and an anchored fragment walk for patterns containing
//! the `**` token. The walk keeps segment and suffix boundaries exact at the
//! tail, so a file named `usernotification.go` never matches a
//! `**/*.yo.go`-style pattern by partial-token collision.

use glob::{MatchOptions, Pattern};
use std::path::Path;
use tracing::debug;

/// The recursive-wildcard token.
const DOUBLE_STAR: &str = "**";

fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        // `*` and `?` never cross a path separator.
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// Returns true if `path` matches any pattern in `patterns`.
///
/// An empty pattern list excludes nothing. A pattern that does not compile
/// as a glob is a non-match; a single bad pattern never aborts the run.
#[must_use]
pub fn should_exclude(path: &Path, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path = normalize(&path.to_string_lossy());
    patterns.iter().any(|pattern| {
        let matched = matches_normalized(&path, &normalize(pattern));
        if matched {
            debug!(pattern = %pattern, path = %path, "path excluded by pattern");
        }
        matched
    })
}

/// Matches one path against one glob pattern.
///
/// Separators are normalized to `/` on both sides before comparison.
#[must_use]
pub fn matches_pattern(path: &str, pattern: &str) -> bool {
    matches_normalized(&normalize(path), &normalize(pattern))
}

fn normalize(s: &str) -> String {
    s.replace('\\', "/")
}

fn matches_normalized(path: &str, pattern: &str) -> bool {
    if pattern.contains(DOUBLE_STAR) {
        return match_double_star(path, pattern);
    }
    match_single_level(path, pattern)
}

/// Single-level glob tier: the pattern against the full path, then against
/// the final path segment.
fn match_single_level(path: &str, pattern: &str) -> bool {
    let Ok(compiled) = Pattern::new(pattern) else {
        return false;
    };
    let options = match_options();
    compiled.matches_with(path, options) || compiled.matches_with(base_name(path), options)
}

/// Recursive-wildcard tier: an anchored fragment walk.
///
/// The pattern is split on `**` into fragments, each trimmed of path
/// separators. A non-empty first fragment anchors by prefix or by first
/// occurrence; middle fragments by ordered substring search past the
/// cursor; the last fragment must match the final path segment as a
/// single-level glob or be a literal suffix of the whole path. A pattern
/// that decomposes to only empty fragments matches nothing.
fn match_double_star(path: &str, pattern: &str) -> bool {
    let fragments: Vec<&str> = pattern
        .split(DOUBLE_STAR)
        .map(|fragment| fragment.trim_matches('/'))
        .collect();
    if fragments.iter().all(|fragment| fragment.is_empty()) {
        return false;
    }
    let Some((&tail, anchors)) = fragments.split_last() else {
        return false;
    };

    let mut cursor = 0;
    for (i, &fragment) in anchors.iter().enumerate() {
        if fragment.is_empty() {
            continue;
        }
        if i == 0 && path.starts_with(fragment) {
            cursor = fragment.len();
            continue;
        }
        let Some(idx) = path[cursor..].find(fragment) else {
            return false;
        };
        cursor += idx + fragment.len();
    }

    match_tail(path, tail)
}

/// Tail rule of the fragment walk: glob against the final segment, or
/// literal suffix of the full path. The empty tail is an empty suffix, so
/// `dir/**` covers everything under a matching prefix.
fn match_tail(path: &str, fragment: &str) -> bool {
    if let Ok(compiled) = Pattern::new(fragment) {
        if compiled.matches_with(base_name(path), match_options()) {
            return true;
        }
    }
    path.ends_with(fragment)
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
