//! # errstk-lint-core
//!
//! Engine for the `errstklint` checker: verifies that every function whose
//! return signature includes the built-in `error` type contains
//! `defer errstk.Wrap(&err)` as a direct statement of its body, so failure
//! values pick up a captured call stack before the function returns.
//!
//! The engine consumes an already-parsed, type-resolved declaration tree
//! ([`CompilationUnit`]); parsing and type resolution belong to a front-end
//! exporter. Files can be exempted with glob patterns ([`Config`]), and
//! individual declarations or whole files with inline `nolint` /
//! `lint:ignore` comment directives.
//!
//! ## Example
//!
//! ```
//! use errstk_lint_core::{Checker, CompilationUnit};
//!
//! let checker = Checker::builder().exclude("**/*.pb.go").build();
//! let result = checker.check(&CompilationUnit::default());
//! assert!(result.is_clean());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod checker;
mod config;
mod exclude;
mod suppress;
mod tree;
mod types;

pub use checker::{
    Checker, CheckerBuilder, CHECKER_NAME, DOC, FALLBACK_SUBJECT, WRAP_MEMBER, WRAP_QUALIFIER,
};
pub use config::{parse_exclude_list, Config, ConfigError};
pub use exclude::{matches_pattern, should_exclude};
pub use suppress::{suppressed_ranges, SuppressedRange};
pub use tree::{
    Arg, CallExpr, Callee, Comment, CompilationUnit, Decl, DeclKind, FuncDecl, Pos, ReturnSlot,
    SourceFile, Stmt, TypeKind, TypeRef,
};
pub use types::{CheckResult, Diagnostic, Location};
