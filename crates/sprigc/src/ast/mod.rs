//! The typed abstract syntax tree
//!
//! The AST is the shared contract between the parser, the checker
//! framework, and the generator. It is built once by the parser and is
//! immutable afterwards; semantic analysis mutates only the symbol table.

mod expr;
mod stmt;
mod types;

pub use expr::{BinOp, CondOp, Expr, ExprKind, UnaryOp};
pub use stmt::{FunctionDef, Param, Program, Stmt, StmtKind, VarDecl, WhenBranch, WhenStmt};
pub use types::{JS_NAMESPACE, QualifiedName, Type};
