//! The deferred-Wrap rule engine.

use crate::config::Config;
use crate::tree::{Arg, CallExpr, Callee, CompilationUnit, FuncDecl, Stmt};
use crate::types::{CheckResult, Diagnostic, Location};
use crate::{exclude, suppress};

use tracing::{debug, info};

/// Registered checker name, matched exactly by suppression directives.
pub const CHECKER_NAME: &str = "errstklint";

/// Member name of the canonical annotation call.
pub const WRAP_MEMBER: &str = "Wrap";

/// Conventional import name of the stack-capture library. Used in
/// diagnostic messages only; matching never requires it.
pub const WRAP_QUALIFIER: &str = "errstk";

/// Subject variable name assumed for unnamed error return slots.
pub const FALLBACK_SUBJECT: &str = "err";

/// User-facing documentation for the rule, printed by `errstk-lint explain`.
pub const DOC: &str = r"checks that functions returning errors have defer errstk.Wrap(&err)

Functions whose return signature includes the built-in error type must
contain a deferred call to errstk.Wrap(&err) at the top level of the
function body. The call attaches a captured stack trace to the error
value before the function returns; without it, failures carry no
location information.

Example of correct usage:

    func GetUser(id string) (user *User, err error) {
        defer errstk.Wrap(&err)
        // function implementation
    }

Reported functions:
- return error (or multiple values including error)
- have no deferred errstk.Wrap call naming the error variable

The import qualifier is matched by name only, so aliased imports of the
stack-capture library are accepted.

Excluding specific functions:

  // Function-level exclusion
  //nolint:errstklint
  func HelperFunc() (err error) { ... }

  // Alternative format
  //lint:ignore errstklint reason for exclusion
  func HelperFunc() (err error) { ... }

  // File-level exclusion (before the package clause)
  //nolint:errstklint
  package mypackage

  // Alternative file-level format
  //lint:file-ignore errstklint reason for exclusion
  package mypackage

Whole files can be excluded with glob patterns, either from the config
file or with --exclude (e.g. 'generated/*.go', '**/mock_*.go').
";

/// Builder for configuring a [`Checker`].
#[derive(Debug, Default)]
pub struct CheckerBuilder {
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl CheckerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration; its exclude patterns are merged in.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the checker.
    #[must_use]
    pub fn build(self) -> Checker {
        let mut exclude_patterns = self.exclude_patterns;
        if let Some(config) = self.config {
            exclude_patterns.extend(config.exclude);
        }
        Checker { exclude_patterns }
    }
}

/// The rule engine.
///
/// Configuration is fixed at build time; the checker holds no mutable
/// state across declarations, so one instance can serve any number of
/// runs, including concurrent runs over disjoint units.
#[derive(Debug, Default)]
pub struct Checker {
    exclude_patterns: Vec<String>,
}

impl Checker {
    /// Creates a checker with no exclusion patterns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new builder for configuring a checker.
    #[must_use]
    pub fn builder() -> CheckerBuilder {
        CheckerBuilder::new()
    }

    /// Returns the exclusion patterns in effect.
    #[must_use]
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Checks every function declaration in the unit.
    ///
    /// Diagnostics come out in traversal order: files in unit order,
    /// declarations in source order within each file.
    #[must_use]
    pub fn check(&self, unit: &CompilationUnit) -> CheckResult {
        let mut result = CheckResult::new();

        for file in &unit.files {
            if exclude::should_exclude(&file.path, &self.exclude_patterns) {
                continue;
            }
            result.files_checked += 1;

            // Suppression ranges are computed once per file.
            let ranges = suppress::suppressed_ranges(file, CHECKER_NAME);

            for decl in &file.decls {
                let Some(func) = decl.as_func() else { continue };
                // Interface methods and external stubs have no body.
                let Some(body) = func.body.as_deref() else {
                    continue;
                };
                if ranges.iter().any(|r| r.contains_line(decl.pos.line)) {
                    debug!(function = %func.name, line = decl.pos.line, "suppressed by directive");
                    continue;
                }
                let Some(subject) = subject_var(func) else {
                    continue;
                };
                if !has_deferred_wrap(body, subject) {
                    result.diagnostics.push(Diagnostic::new(
                        Location::new(file.path.clone(), decl.pos.line, decl.pos.column),
                        format!(
                            "function {} returns error but missing defer {WRAP_QUALIFIER}.{WRAP_MEMBER}(&{subject})",
                            func.name
                        ),
                    ));
                }
            }
        }

        info!(
            files = result.files_checked,
            diagnostics = result.diagnostics.len(),
            "check complete"
        );

        result
    }
}

/// The subject variable name of a function's error return, if any.
///
/// Named slots use the declared name. An unnamed error slot falls back to
/// the conventional `err`: without a declared name the true variable cannot
/// be verified, so the deferred call is assumed to follow the convention.
fn subject_var(func: &FuncDecl) -> Option<&str> {
    func.returns
        .iter()
        .find(|slot| slot.ty.is_error_interface())
        .map(|slot| slot.name.as_deref().unwrap_or(FALLBACK_SUBJECT))
}

/// Scans the direct body statements for a satisfying deferred call. Defers
/// inside nested blocks are deliberately not inspected.
fn has_deferred_wrap(body: &[Stmt], subject: &str) -> bool {
    body.iter().any(|stmt| match stmt {
        Stmt::Defer(call) => is_wrap_call(call, subject),
        Stmt::Other => false,
    })
}

/// True for `<qualifier>.Wrap(&subject)`.
///
/// The qualifier is not checked against a fixed import name, so aliased
/// imports stay valid, at the cost of accepting a same-named Wrap from an
/// unrelated package.
fn is_wrap_call(call: &CallExpr, subject: &str) -> bool {
    let Callee::Selector { member, .. } = &call.callee else {
        return false;
    };
    if member != WRAP_MEMBER {
        return false;
    }
    matches!(call.args.first(), Some(Arg::AddrOf(name)) if name == subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Decl, Pos, ReturnSlot, SourceFile, TypeKind, TypeRef};

    fn opaque(text: &str) -> TypeRef {
        TypeRef::Opaque(text.to_string())
    }

    #[test]
    fn subject_var_prefers_declared_name() {
        let func = FuncDecl::new("f").with_returns(vec![
            ReturnSlot::unnamed(opaque("*User")),
            ReturnSlot::named("cause", TypeRef::error_interface()),
        ]);
        assert_eq!(subject_var(&func), Some("cause"));
    }

    #[test]
    fn subject_var_falls_back_for_unnamed_slot() {
        let func = FuncDecl::new("f")
            .with_returns(vec![ReturnSlot::unnamed(TypeRef::error_interface())]);
        assert_eq!(subject_var(&func), Some(FALLBACK_SUBJECT));
    }

    #[test]
    fn subject_var_uses_first_error_slot() {
        let func = FuncDecl::new("f").with_returns(vec![
            ReturnSlot::named("first", TypeRef::error_interface()),
            ReturnSlot::named("second", TypeRef::error_interface()),
        ]);
        assert_eq!(subject_var(&func), Some("first"));
    }

    #[test]
    fn subject_var_none_without_error_slot() {
        assert_eq!(subject_var(&FuncDecl::new("f")), None);

        let func = FuncDecl::new("f").with_returns(vec![
            ReturnSlot::unnamed(opaque("int")),
            ReturnSlot::named("err", TypeRef::Named {
                package: Some("mypkg".to_string()),
                name: "error".to_string(),
                kind: TypeKind::Interface,
                parameterized: false,
            }),
        ]);
        assert_eq!(subject_var(&func), None);
    }

    fn addr_of(name: &str) -> Arg {
        Arg::AddrOf(name.to_string())
    }

    #[test]
    fn wrap_call_matching_shapes() {
        let good = CallExpr::selector("errstk", "Wrap", vec![addr_of("err")]);
        assert!(is_wrap_call(&good, "err"));

        // Aliased qualifiers are accepted by design.
        let aliased = CallExpr::selector("stk", "Wrap", vec![addr_of("err")]);
        assert!(is_wrap_call(&aliased, "err"));

        let wrong_member = CallExpr::selector("errstk", "Wrapf", vec![addr_of("err")]);
        assert!(!is_wrap_call(&wrong_member, "err"));

        let wrong_subject = CallExpr::selector("errstk", "Wrap", vec![addr_of("other")]);
        assert!(!is_wrap_call(&wrong_subject, "err"));

        let not_addr_of = CallExpr::selector("errstk", "Wrap", vec![Arg::Other]);
        assert!(!is_wrap_call(&not_addr_of, "err"));

        let no_args = CallExpr::selector("errstk", "Wrap", vec![]);
        assert!(!is_wrap_call(&no_args, "err"));

        let bare_call = CallExpr::other(vec![addr_of("err")]);
        assert!(!is_wrap_call(&bare_call, "err"));
    }

    #[test]
    fn deferred_wrap_found_anywhere_in_direct_body() {
        let body = vec![
            Stmt::Other,
            Stmt::Defer(CallExpr::selector("errstk", "Wrap", vec![addr_of("err")])),
        ];
        assert!(has_deferred_wrap(&body, "err"));
        assert!(!has_deferred_wrap(&[Stmt::Other], "err"));
        assert!(!has_deferred_wrap(&[], "err"));
    }

    fn violating_file(path: &str) -> SourceFile {
        SourceFile::new(path, 10)
            .with_package_pos(Pos::new(1, 1))
            .with_decls(vec![Decl::func(
                Pos::new(3, 1),
                6,
                FuncDecl::new("Bad")
                    .with_returns(vec![ReturnSlot::named("err", TypeRef::error_interface())])
                    .with_body(vec![Stmt::Other]),
            )])
    }

    #[test]
    fn builder_merges_config_patterns() {
        let config = Config {
            exclude: vec!["**/*.pb.go".to_string()],
        };
        let checker = Checker::builder()
            .exclude("**/mock_*.go")
            .config(config)
            .build();
        assert_eq!(
            checker.exclude_patterns(),
            ["**/mock_*.go".to_string(), "**/*.pb.go".to_string()]
        );
    }

    #[test]
    fn excluded_files_are_not_counted_or_checked() {
        let unit = CompilationUnit::new(vec![
            violating_file("gen/user.pb.go"),
            violating_file("pkg/store.go"),
        ]);
        let checker = Checker::builder().exclude("**/*.pb.go").build();
        let result = checker.check(&unit);

        assert_eq!(result.files_checked, 1);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].location.file.as_os_str(), "pkg/store.go");
    }

    #[test]
    fn diagnostic_message_names_function_and_subject() {
        let unit = CompilationUnit::new(vec![violating_file("pkg/store.go")]);
        let result = Checker::new().check(&unit);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].message,
            "function Bad returns error but missing defer errstk.Wrap(&err)"
        );
        assert_eq!(result.diagnostics[0].location.line, 3);
        assert_eq!(result.diagnostics[0].location.column, 1);
    }
}
