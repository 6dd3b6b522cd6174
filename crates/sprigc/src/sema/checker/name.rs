//! Name resolution checks

use crate::ast::{Expr, ExprKind, FunctionDef, Type, VarDecl};
use crate::common::{CompileError, CompileResult, Span};

use super::super::symbol::{SymbolKind, SymbolTable};
use super::{Checker, Ctx};

/// Verifies that every name an expression or signature mentions resolves
/// to a live symbol of the right kind
pub struct NameChecker;

impl NameChecker {
    fn resolve_type(&self, ty: &Type, table: &SymbolTable, span: Span) -> CompileResult<()> {
        match table.get(&ty.name) {
            Some(symbol) if matches!(symbol.kind, SymbolKind::BuiltinType) => {}
            Some(_) => {
                return Err(CompileError::semantic(
                    format!("'{}' is not a type", ty.name),
                    span,
                ));
            }
            None => {
                return Err(CompileError::semantic(
                    format!("unknown type '{}'", ty.name),
                    span,
                ));
            }
        }
        for param in &ty.params {
            self.resolve_type(param, table, span)?;
        }
        Ok(())
    }
}

impl Checker for NameChecker {
    fn check_expr(&self, expr: &Expr, table: &SymbolTable, _ctx: Ctx<'_>) -> CompileResult<()> {
        match &expr.kind {
            ExprKind::Var(name) => {
                if table.get(name).is_none() {
                    return Err(CompileError::semantic(
                        format!("unknown variable '{}'", name),
                        expr.span,
                    ));
                }
            }
            ExprKind::Assign { name, .. } => match table.get(name) {
                Some(symbol) if matches!(symbol.kind, SymbolKind::Variable) => {}
                Some(_) => {
                    return Err(CompileError::semantic(
                        format!("'{}' is not assignable", name),
                        expr.span,
                    ));
                }
                None => {
                    return Err(CompileError::semantic(
                        format!("unknown variable '{}'", name),
                        expr.span,
                    ));
                }
            },
            ExprKind::Call { name, .. } if !name.is_js_interop() => match table.get(name) {
                Some(symbol) if matches!(symbol.kind, SymbolKind::Function { .. }) => {}
                Some(_) => {
                    return Err(CompileError::semantic(
                        format!("'{}' is not a function", name),
                        expr.span,
                    ));
                }
                None => {
                    return Err(CompileError::semantic(
                        format!("unknown function '{}'", name),
                        expr.span,
                    ));
                }
            },
            ExprKind::Array { elem_ty, .. } => {
                self.resolve_type(elem_ty, table, expr.span)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn check_var_decl(&self, decl: &VarDecl, table: &SymbolTable) -> CompileResult<()> {
        if let Some(ty) = &decl.ty {
            self.resolve_type(ty, table, decl.span)?;
        }
        Ok(())
    }

    fn check_function(&self, func: &FunctionDef, table: &SymbolTable) -> CompileResult<()> {
        for param in &func.params {
            self.resolve_type(&param.ty, table, func.span)?;
        }
        self.resolve_type(&func.ret, table, func.span)
    }
}
