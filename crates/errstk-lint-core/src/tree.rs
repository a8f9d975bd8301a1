//! In-memory declaration tree consumed by the checker.
//!
//! The tree is produced by a front-end exporter that has already parsed and
//! type-resolved the source; the checker never sees source text. Only the
//! attributes the rule needs are carried: declaration positions, resolved
//! return types, the direct statements of function bodies, and the comment
//! set. All types derive `serde` so units can travel as JSON between the
//! exporter and the checker.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A source position, 1-indexed, ordered by line then column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Pos {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Pos {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A parsed, type-resolved collection of source files checked in one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Files in the unit, in parse order.
    pub files: Vec<SourceFile>,
}

impl CompilationUnit {
    /// Creates a unit from its files.
    #[must_use]
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self { files }
    }
}

/// One source file: its declarations plus the comment set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path as reported by the exporter.
    pub path: PathBuf,
    /// First line of the file (normally 1).
    #[serde(default = "default_first_line")]
    pub first_line: usize,
    /// Last line of the file.
    pub last_line: usize,
    /// Position of the package clause token, when the file has one.
    #[serde(default)]
    pub package_pos: Option<Pos>,
    /// Top-level declarations in source order.
    #[serde(default)]
    pub decls: Vec<Decl>,
    /// All comments, with positions.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

fn default_first_line() -> usize {
    1
}

impl SourceFile {
    /// Creates a file with no declarations or comments.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, last_line: usize) -> Self {
        Self {
            path: path.into(),
            first_line: default_first_line(),
            last_line,
            package_pos: None,
            decls: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Sets the position of the package clause.
    #[must_use]
    pub fn with_package_pos(mut self, pos: Pos) -> Self {
        self.package_pos = Some(pos);
        self
    }

    /// Sets the declarations.
    #[must_use]
    pub fn with_decls(mut self, decls: Vec<Decl>) -> Self {
        self.decls = decls;
        self
    }

    /// Sets the comments.
    #[must_use]
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }
}

/// A comment with its position. `text` is the raw comment text including
/// the comment marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Position of the comment's first character.
    pub pos: Pos,
    /// Raw comment text, marker included.
    pub text: String,
}

impl Comment {
    /// Creates a new comment.
    #[must_use]
    pub fn new(pos: Pos, text: impl Into<String>) -> Self {
        Self {
            pos,
            text: text.into(),
        }
    }
}

/// A top-level declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decl {
    /// Start position; also the anchor for diagnostics.
    pub pos: Pos,
    /// Last line of the declaration.
    pub end_line: usize,
    /// What kind of declaration this is.
    pub kind: DeclKind,
}

impl Decl {
    /// Creates a function declaration.
    #[must_use]
    pub fn func(pos: Pos, end_line: usize, func: FuncDecl) -> Self {
        Self {
            pos,
            end_line,
            kind: DeclKind::Func(func),
        }
    }

    /// Creates a general (import/const/var/type) declaration.
    #[must_use]
    pub fn gen(pos: Pos, end_line: usize) -> Self {
        Self {
            pos,
            end_line,
            kind: DeclKind::Gen,
        }
    }

    /// Returns the function payload when this is a function declaration.
    #[must_use]
    pub fn as_func(&self) -> Option<&FuncDecl> {
        match &self.kind {
            DeclKind::Func(func) => Some(func),
            DeclKind::Gen => None,
        }
    }
}

/// Declaration kinds distinguished by the checker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// A function or method definition.
    Func(FuncDecl),
    /// Any other top-level declaration (import, const, var, type). Carried
    /// only so suppression directives can attach to it.
    Gen,
}

/// A function or method definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncDecl {
    /// Declared name.
    pub name: String,
    /// Return slots in signature order.
    #[serde(default)]
    pub returns: Vec<ReturnSlot>,
    /// Direct top-level statements of the body; `None` for bodiless
    /// declarations (interface methods, external stubs).
    #[serde(default)]
    pub body: Option<Vec<Stmt>>,
}

impl FuncDecl {
    /// Creates a bodiless function with no return values.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            returns: Vec::new(),
            body: None,
        }
    }

    /// Sets the return slots.
    #[must_use]
    pub fn with_returns(mut self, returns: Vec<ReturnSlot>) -> Self {
        self.returns = returns;
        self
    }

    /// Sets the body statements.
    #[must_use]
    pub fn with_body(mut self, body: Vec<Stmt>) -> Self {
        self.body = Some(body);
        self
    }
}

/// One return value of a function signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnSlot {
    /// Declared name, when the return list is named.
    #[serde(default)]
    pub name: Option<String>,
    /// Resolved type of the slot.
    pub ty: TypeRef,
}

impl ReturnSlot {
    /// Creates a named return slot.
    #[must_use]
    pub fn named(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }

    /// Creates an unnamed return slot.
    #[must_use]
    pub fn unnamed(ty: TypeRef) -> Self {
        Self { name: None, ty }
    }
}

/// A resolved type reference.
///
/// Only named types are modeled structurally; everything else is opaque
/// display text. That is all the rule needs: failure-indicating slots are
/// identified by the shape of the named type, never by matching type
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// A resolved named type.
    Named {
        /// Defining package path; `None` for predeclared (universe-scope)
        /// names.
        package: Option<String>,
        /// Type name.
        name: String,
        /// Underlying kind of the named type.
        kind: TypeKind,
        /// Whether the type carries type arguments.
        #[serde(default)]
        parameterized: bool,
    },
    /// Any other type, carried as display text only.
    Opaque(String),
}

/// Underlying kind of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// An interface type.
    Interface,
    /// A struct type.
    Struct,
    /// A basic (predeclared scalar or string) type.
    Basic,
    /// Anything else.
    Other,
}

impl TypeRef {
    /// The predeclared `error` interface type.
    #[must_use]
    pub fn error_interface() -> Self {
        Self::Named {
            package: None,
            name: "error".to_string(),
            kind: TypeKind::Interface,
            parameterized: false,
        }
    }

    /// True for the predeclared `error` interface: an unparameterized
    /// interface named `error` with no defining package. A user-defined
    /// type named `error` inside some package never counts.
    #[must_use]
    pub fn is_error_interface(&self) -> bool {
        matches!(
            self,
            Self::Named {
                package: None,
                name,
                kind: TypeKind::Interface,
                parameterized: false,
            } if name == "error"
        )
    }
}

/// A direct top-level statement of a function body.
///
/// Only deferred calls are decomposed; everything else is opaque. Defers
/// nested inside inner blocks are not part of the tree, matching the rule's
/// structural-presence contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    /// A `defer` statement and its call expression.
    Defer(CallExpr),
    /// Any other statement.
    Other,
}

/// A call expression, decomposed to what cleanup-call matching needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallExpr {
    /// The callee shape.
    pub callee: Callee,
    /// Call arguments, in order.
    #[serde(default)]
    pub args: Vec<Arg>,
}

impl CallExpr {
    /// Creates a `qualifier.Member(args...)` call.
    #[must_use]
    pub fn selector(
        qualifier: impl Into<String>,
        member: impl Into<String>,
        args: Vec<Arg>,
    ) -> Self {
        Self {
            callee: Callee::Selector {
                qualifier: qualifier.into(),
                member: member.into(),
            },
            args,
        }
    }

    /// Creates a call with an unrecognized callee shape.
    #[must_use]
    pub fn other(args: Vec<Arg>) -> Self {
        Self {
            callee: Callee::Other,
            args,
        }
    }
}

/// The callee of a call expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Callee {
    /// `qualifier.Member` where the qualifier is a plain identifier (a
    /// package name or alias).
    Selector {
        /// The qualifier identifier.
        qualifier: String,
        /// The selected member name.
        member: String,
    },
    /// Any other callee shape (plain identifier, method value, literal).
    Other,
}

/// A call argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arg {
    /// `&ident` — the address of a plain identifier.
    AddrOf(String),
    /// Any other argument shape.
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_interface_is_structural() {
        assert!(TypeRef::error_interface().is_error_interface());

        // Same name, but defined in a package.
        let shadowed = TypeRef::Named {
            package: Some("mypkg".to_string()),
            name: "error".to_string(),
            kind: TypeKind::Interface,
            parameterized: false,
        };
        assert!(!shadowed.is_error_interface());

        // Right shape, wrong name.
        let stringer = TypeRef::Named {
            package: None,
            name: "Stringer".to_string(),
            kind: TypeKind::Interface,
            parameterized: false,
        };
        assert!(!stringer.is_error_interface());

        // Not an interface.
        let basic = TypeRef::Named {
            package: None,
            name: "error".to_string(),
            kind: TypeKind::Basic,
            parameterized: false,
        };
        assert!(!basic.is_error_interface());

        // Parameterized.
        let generic = TypeRef::Named {
            package: None,
            name: "error".to_string(),
            kind: TypeKind::Interface,
            parameterized: true,
        };
        assert!(!generic.is_error_interface());

        assert!(!TypeRef::Opaque("error".to_string()).is_error_interface());
    }

    #[test]
    fn pos_orders_by_line_then_column() {
        assert!(Pos::new(3, 1) < Pos::new(4, 1));
        assert!(Pos::new(3, 1) < Pos::new(3, 9));
        assert!(Pos::new(3, 9) < Pos::new(4, 1));
        assert_eq!(Pos::new(2, 2), Pos::new(2, 2));
    }

    #[test]
    fn unit_round_trips_through_json() {
        let file = SourceFile::new("pkg/a.go", 12)
            .with_package_pos(Pos::new(1, 1))
            .with_decls(vec![Decl::func(
                Pos::new(3, 1),
                7,
                FuncDecl::new("Load")
                    .with_returns(vec![ReturnSlot::named("err", TypeRef::error_interface())])
                    .with_body(vec![
                        Stmt::Defer(CallExpr::selector(
                            "errstk",
                            "Wrap",
                            vec![Arg::AddrOf("err".to_string())],
                        )),
                        Stmt::Other,
                    ]),
            )])
            .with_comments(vec![Comment::new(Pos::new(2, 1), "// loads things")]);
        let unit = CompilationUnit::new(vec![file]);

        let json = serde_json::to_string(&unit).expect("unit serializes");
        let back: CompilationUnit = serde_json::from_str(&json).expect("unit deserializes");

        assert_eq!(back.files.len(), 1);
        let func = back.files[0].decls[0].as_func().expect("func decl");
        assert_eq!(func.name, "Load");
        assert!(func.returns[0].ty.is_error_interface());
        assert!(matches!(
            func.body.as_deref(),
            Some([Stmt::Defer(_), Stmt::Other])
        ));
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"path":"a.go","last_line":5}"#;
        let file: SourceFile = serde_json::from_str(json).expect("minimal file decodes");
        assert_eq!(file.first_line, 1);
        assert!(file.package_pos.is_none());
        assert!(file.decls.is_empty());
        assert!(file.comments.is_empty());
    }
}
