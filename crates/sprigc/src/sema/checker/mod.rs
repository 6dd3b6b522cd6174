//! Pluggable semantic checks
//!
//! Each checker implements one concern over the AST. The analyzer walks
//! the tree once and calls every checker at every node, children before
//! parents; a checker overrides only the hooks it cares about.

mod arity;
mod name;
mod ret;
mod types;

pub use arity::ArityChecker;
pub use name::NameChecker;
pub use ret::ReturnChecker;
pub use types::TypeChecker;

use crate::ast::{Expr, FunctionDef, Stmt, VarDecl, WhenBranch, WhenStmt};
use crate::common::CompileResult;

use super::symbol::SymbolTable;

/// Enclosing constructs at the point of a check
#[derive(Debug, Clone, Copy, Default)]
pub struct Ctx<'a> {
    /// Function whose body is being checked, if any
    pub func: Option<&'a FunctionDef>,
    /// `when` statement whose branches are being checked, if any
    pub when: Option<&'a WhenStmt>,
}

/// One semantic concern, checked over the whole program
///
/// All hooks default to passing, so a checker only implements the nodes
/// it actually inspects. Hooks run after the node's children have been
/// visited, against the symbol table as of that point in the program.
pub trait Checker {
    fn check_expr(&self, _expr: &Expr, _table: &SymbolTable, _ctx: Ctx<'_>) -> CompileResult<()> {
        Ok(())
    }

    fn check_stmt(&self, _stmt: &Stmt, _table: &SymbolTable, _ctx: Ctx<'_>) -> CompileResult<()> {
        Ok(())
    }

    fn check_var_decl(&self, _decl: &VarDecl, _table: &SymbolTable) -> CompileResult<()> {
        Ok(())
    }

    fn check_function(&self, _func: &FunctionDef, _table: &SymbolTable) -> CompileResult<()> {
        Ok(())
    }

    fn check_when_branch(
        &self,
        _branch: &WhenBranch,
        _table: &SymbolTable,
        _ctx: Ctx<'_>,
    ) -> CompileResult<()> {
        Ok(())
    }
}
