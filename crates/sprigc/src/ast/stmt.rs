//! Sprig statement and declaration AST nodes

use super::{Expr, QualifiedName, Type};
use crate::common::Span;

/// A complete source file: top-level function declarations plus runnable
/// statements, both in source order. Function declarations are not runnable.
#[derive(Debug, Clone)]
pub struct Program {
    pub decls: Vec<FunctionDef>,
    pub runnables: Vec<Stmt>,
}

/// A function declaration, shared between `func` and `extern func`
///
/// Extern declarations have an empty body and synthesized positional
/// parameter names (`$0`, `$1`, ...): the host provides the implementation
/// and the declared signature is trusted.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: QualifiedName,
    pub params: Vec<Param>,
    pub ret: Type,
    pub body: Vec<Stmt>,
    pub is_extern: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

/// A variable declaration: `var x: Number = 1;`
///
/// `ty` is `None` when the annotation was omitted, in which case the parser
/// guarantees `init` is present and the declared type is inferred from it.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: QualifiedName,
    pub ty: Option<Type>,
    pub init: Option<Expr>,
    pub span: Span,
}

/// A Sprig statement
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone)]
pub enum StmtKind {
    Var(VarDecl),
    Return(Expr),
    Expr(Expr),
    /// Brace-delimited block; introduces a new scope
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        body: Box<Stmt>,
        else_body: Option<Box<Stmt>>,
    },
    When(WhenStmt),
    /// C-style three-clause loop
    For {
        init: VarDecl,
        cond: Expr,
        step: Box<Stmt>,
        body: Box<Stmt>,
    },
    /// Iterates an array expression
    ForEach {
        decl: VarDecl,
        iter: Expr,
        body: Box<Stmt>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    /// Extern function declaration; contributes a symbol, no code
    ExternFn(FunctionDef),
}

/// A `when` statement: dispatches on a scrutinee expression through ordered
/// branches, first match wins, at most one branch body executes.
#[derive(Debug, Clone)]
pub struct WhenStmt {
    pub scrutinee: Expr,
    pub branches: Vec<WhenBranch>,
    pub span: Span,
}

/// One branch of a `when` statement
#[derive(Debug, Clone)]
pub enum WhenBranch {
    /// `expr, expr -> stmt`: matches if the scrutinee equals any listed value
    Eq { exprs: Vec<Expr>, body: Box<Stmt> },
    /// `in expr -> stmt`: matches if the scrutinee is an element of the array
    In { expr: Expr, body: Box<Stmt> },
    /// `else -> stmt`: fallback
    Else { body: Box<Stmt> },
}

impl WhenBranch {
    pub fn body(&self) -> &Stmt {
        match self {
            WhenBranch::Eq { body, .. }
            | WhenBranch::In { body, .. }
            | WhenBranch::Else { body } => body,
        }
    }
}
