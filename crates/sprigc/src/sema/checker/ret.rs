//! Return placement checks

use crate::ast::{Stmt, StmtKind, WhenBranch};
use crate::common::{CompileError, CompileResult};

use super::super::symbol::SymbolTable;
use super::{Checker, Ctx};

/// Verifies that `return` only appears inside a function body and that
/// `when` branches only appear inside a `when` statement
pub struct ReturnChecker;

impl Checker for ReturnChecker {
    fn check_stmt(&self, stmt: &Stmt, _table: &SymbolTable, ctx: Ctx<'_>) -> CompileResult<()> {
        if matches!(stmt.kind, StmtKind::Return(_)) && ctx.func.is_none() {
            return Err(CompileError::semantic(
                "'return' outside of a function".to_string(),
                stmt.span,
            ));
        }
        Ok(())
    }

    fn check_when_branch(
        &self,
        branch: &WhenBranch,
        _table: &SymbolTable,
        ctx: Ctx<'_>,
    ) -> CompileResult<()> {
        if ctx.when.is_none() {
            return Err(CompileError::semantic(
                "branch outside of a 'when' statement".to_string(),
                branch.body().span,
            ));
        }
        Ok(())
    }
}
