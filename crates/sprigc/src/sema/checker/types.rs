//! Type compatibility checks

use crate::ast::{CondOp, Expr, ExprKind, Stmt, StmtKind, Type, UnaryOp, VarDecl, WhenBranch};
use crate::common::{CompileError, CompileResult, Span};

use super::super::infer::expr_type;
use super::super::symbol::{SymbolKind, SymbolTable};
use super::{Checker, Ctx};

/// Verifies structural type compatibility wherever two types meet: operands,
/// assignments, initializers, call arguments, conditions, and returns
pub struct TypeChecker;

impl TypeChecker {
    fn expect_type(
        &self,
        expr: &Expr,
        expected: &Type,
        table: &SymbolTable,
        what: &str,
    ) -> CompileResult<()> {
        let actual = expr_type(expr, table)?;
        if actual != *expected {
            return Err(CompileError::semantic(
                format!("{} has type '{}', expected '{}'", what, actual, expected),
                expr.span,
            ));
        }
        Ok(())
    }

    fn expect_boolean(&self, expr: &Expr, table: &SymbolTable) -> CompileResult<()> {
        self.expect_type(expr, &Type::boolean(), table, "condition")
    }

    fn array_element(&self, ty: &Type, span: Span) -> CompileResult<Type> {
        if ty.is_any() {
            return Ok(Type::any());
        }
        if ty.name.parts == ["Array"] {
            if let Some(element) = ty.element() {
                return Ok(element.clone());
            }
        }
        Err(CompileError::semantic(
            format!("expected an array type, found '{}'", ty),
            span,
        ))
    }
}

impl Checker for TypeChecker {
    fn check_expr(&self, expr: &Expr, table: &SymbolTable, _ctx: Ctx<'_>) -> CompileResult<()> {
        match &expr.kind {
            ExprKind::Binary { left, right, .. } => {
                let lty = expr_type(left, table)?;
                self.expect_type(right, &lty, table, "right operand")
            }
            ExprKind::Cond { op, left, right } => {
                if op.is_boolean_op() {
                    self.expect_type(left, &Type::boolean(), table, "left operand")?;
                    return self.expect_type(right, &Type::boolean(), table, "right operand");
                }
                if *op == CondOp::In {
                    let lty = expr_type(left, table)?;
                    let rty = expr_type(right, table)?;
                    let element = self.array_element(&rty, right.span)?;
                    if lty != element {
                        return Err(CompileError::semantic(
                            format!(
                                "cannot test a '{}' for membership in '{}'",
                                lty, rty
                            ),
                            expr.span,
                        ));
                    }
                    return Ok(());
                }
                let lty = expr_type(left, table)?;
                self.expect_type(right, &lty, table, "right operand")
            }
            ExprKind::Range { left, right } => {
                self.expect_type(left, &Type::number(), table, "range bound")?;
                self.expect_type(right, &Type::number(), table, "range bound")
            }
            ExprKind::Assign { name, value } => {
                let Some(symbol) = table.get(name) else {
                    // Name resolution reports the missing symbol
                    return Ok(());
                };
                let declared = symbol.ty.clone();
                self.expect_type(value, &declared, table, "assigned value")
            }
            ExprKind::Call { name, args } if !name.is_js_interop() => {
                let Some(symbol) = table.get(name) else {
                    return Ok(());
                };
                let SymbolKind::Function { params } = &symbol.kind else {
                    return Ok(());
                };
                for (arg, param) in args.iter().zip(params.clone()) {
                    self.expect_type(arg, &param, table, "argument")?;
                }
                Ok(())
            }
            ExprKind::Unary { op, operand } => {
                if *op == UnaryOp::Not {
                    return self.expect_type(operand, &Type::boolean(), table, "operand");
                }
                Ok(())
            }
            ExprKind::Array { elem_ty, elems } => {
                for elem in elems {
                    self.expect_type(elem, elem_ty, table, "array element")?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn check_stmt(&self, stmt: &Stmt, table: &SymbolTable, ctx: Ctx<'_>) -> CompileResult<()> {
        match &stmt.kind {
            StmtKind::If { cond, .. }
            | StmtKind::While { cond, .. }
            | StmtKind::For { cond, .. } => self.expect_boolean(cond, table),
            StmtKind::Return(value) => {
                let Some(func) = ctx.func else {
                    // Placement is reported separately
                    return Ok(());
                };
                self.expect_type(value, &func.ret, table, "returned value")
            }
            StmtKind::ForEach { decl, iter, .. } => {
                if decl.init.is_some() {
                    return Err(CompileError::semantic(
                        "a loop variable cannot have an initializer".to_string(),
                        decl.span,
                    ));
                }
                let iter_ty = expr_type(iter, table)?;
                let element = self.array_element(&iter_ty, iter.span)?;
                if let Some(ty) = &decl.ty {
                    if *ty != element {
                        return Err(CompileError::semantic(
                            format!(
                                "loop variable has type '{}' but the array holds '{}'",
                                ty, element
                            ),
                            decl.span,
                        ));
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn check_var_decl(&self, decl: &VarDecl, table: &SymbolTable) -> CompileResult<()> {
        if let (Some(ty), Some(init)) = (&decl.ty, &decl.init) {
            self.expect_type(init, ty, table, "initializer")?;
        }
        Ok(())
    }

    fn check_when_branch(
        &self,
        branch: &WhenBranch,
        table: &SymbolTable,
        ctx: Ctx<'_>,
    ) -> CompileResult<()> {
        let Some(when) = ctx.when else {
            return Ok(());
        };
        let scrutinee_ty = expr_type(&when.scrutinee, table)?;
        match branch {
            WhenBranch::Eq { exprs, .. } => {
                for expr in exprs {
                    self.expect_type(expr, &scrutinee_ty, table, "branch value")?;
                }
                Ok(())
            }
            WhenBranch::In { expr, .. } => {
                let ty = expr_type(expr, table)?;
                let element = self.array_element(&ty, expr.span)?;
                if scrutinee_ty != element {
                    return Err(CompileError::semantic(
                        format!(
                            "cannot test a '{}' for membership in '{}'",
                            scrutinee_ty, ty
                        ),
                        expr.span,
                    ));
                }
                Ok(())
            }
            WhenBranch::Else { .. } => Ok(()),
        }
    }
}
