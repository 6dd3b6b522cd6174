//! Semantic analysis
//!
//! Scope and symbol management, expression type inference, and a set of
//! pluggable checkers driven over the AST in a single pass.

mod analyzer;
mod checker;
mod infer;
mod symbol;

pub use analyzer::Analyzer;
pub use checker::{ArityChecker, Checker, Ctx, NameChecker, ReturnChecker, TypeChecker};
pub use infer::expr_type;
pub use symbol::{Symbol, SymbolKind, SymbolTable};
