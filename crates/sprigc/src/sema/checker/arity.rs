//! Call arity checks

use crate::ast::{Expr, ExprKind};
use crate::common::{CompileError, CompileResult};

use super::super::symbol::{SymbolKind, SymbolTable};
use super::{Checker, Ctx};

/// Verifies that every call passes exactly as many arguments as the callee
/// declares parameters. Host-interop calls are exempt.
pub struct ArityChecker;

impl Checker for ArityChecker {
    fn check_expr(&self, expr: &Expr, table: &SymbolTable, _ctx: Ctx<'_>) -> CompileResult<()> {
        let ExprKind::Call { name, args } = &expr.kind else {
            return Ok(());
        };
        if name.is_js_interop() {
            return Ok(());
        }
        let Some(symbol) = table.get(name) else {
            // Name resolution reports the missing symbol
            return Ok(());
        };
        let SymbolKind::Function { params } = &symbol.kind else {
            return Ok(());
        };
        if args.len() != params.len() {
            return Err(CompileError::semantic(
                format!(
                    "'{}' takes {} argument(s), but {} were given",
                    name,
                    params.len(),
                    args.len()
                ),
                expr.span,
            ));
        }
        Ok(())
    }
}
