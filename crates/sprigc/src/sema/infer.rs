//! Expression type inference
//!
//! A pure function of an expression and the current symbol table. Literals,
//! conditions, and ranges already carry a static type from construction;
//! everything else resolves through the table.

use crate::ast::{Expr, ExprKind, Type, UnaryOp};
use crate::common::{CompileError, CompileResult};

use super::symbol::{SymbolKind, SymbolTable};

/// Infer the type of an expression.
///
/// Fails when the expression involves an unresolvable name, a mistyped
/// call, or mismatched binary operands.
pub fn expr_type(expr: &Expr, table: &SymbolTable) -> CompileResult<Type> {
    if let Some(ty) = &expr.ty {
        return Ok(ty.clone());
    }

    match &expr.kind {
        ExprKind::Var(name) => match table.get(name) {
            Some(symbol) => Ok(symbol.ty.clone()),
            None => Err(CompileError::semantic(
                format!("unknown variable '{}'", name),
                expr.span,
            )),
        },
        ExprKind::Call { name, .. } => {
            // Host-interop calls are opaque to the type system
            if name.is_js_interop() {
                return Ok(Type::any());
            }
            match table.get(name) {
                Some(symbol) => match &symbol.kind {
                    SymbolKind::Function { .. } => Ok(symbol.ty.clone()),
                    _ => Err(CompileError::semantic(
                        format!("'{}' is not a function", name),
                        expr.span,
                    )),
                },
                None => Err(CompileError::semantic(
                    format!("unknown function '{}'", name),
                    expr.span,
                )),
            }
        }
        ExprKind::Binary { left, right, .. } => {
            let lty = expr_type(left, table)?;
            let rty = expr_type(right, table)?;
            if lty != rty {
                return Err(CompileError::semantic(
                    format!("operand types differ: '{}' vs '{}'", lty, rty),
                    expr.span,
                ));
            }
            Ok(lty)
        }
        ExprKind::Unary { op, operand } => match op {
            // Unary plus coerces its operand, so the result is numeric
            // regardless of the operand type
            UnaryOp::Plus => Ok(Type::number()),
            _ => expr_type(operand, table),
        },
        ExprKind::Assign { value, .. } => expr_type(value, table),
        _ => Err(CompileError::semantic(
            "cannot infer the type of this expression".to_string(),
            expr.span,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::QualifiedName;
    use crate::common::Span;
    use crate::sema::symbol::Symbol;

    fn expr(kind: ExprKind) -> Expr {
        Expr::new(kind, Span::default())
    }

    fn table_with_var(name: &str, ty: Type) -> SymbolTable {
        let mut table = SymbolTable::new();
        table
            .add(Symbol {
                name: QualifiedName::simple(name),
                kind: SymbolKind::Variable,
                ty,
                depth: 0,
            })
            .unwrap();
        table
    }

    #[test]
    fn test_literals_carry_static_types() {
        let table = SymbolTable::new();
        assert_eq!(expr_type(&expr(ExprKind::Number(1.0)), &table).unwrap(), Type::number());
        assert_eq!(expr_type(&expr(ExprKind::Bool(true)), &table).unwrap(), Type::boolean());
    }

    #[test]
    fn test_variable_resolves_through_table() {
        let table = table_with_var("x", Type::string());
        let e = expr(ExprKind::Var(QualifiedName::simple("x")));
        assert_eq!(expr_type(&e, &table).unwrap(), Type::string());
    }

    #[test]
    fn test_unknown_variable_is_an_error() {
        let table = SymbolTable::new();
        let e = expr(ExprKind::Var(QualifiedName::simple("nope")));
        assert!(expr_type(&e, &table).is_err());
    }

    #[test]
    fn test_js_interop_call_is_any() {
        let table = SymbolTable::new();
        let e = expr(ExprKind::Call {
            name: QualifiedName::new(vec!["js".into(), "parseInt".into()]),
            args: Vec::new(),
        });
        assert!(expr_type(&e, &table).unwrap().is_any());
    }

    #[test]
    fn test_binary_mismatch_is_an_error() {
        let table = SymbolTable::new();
        let e = expr(ExprKind::Binary {
            op: crate::ast::BinOp::Add,
            left: Box::new(expr(ExprKind::Number(1.0))),
            right: Box::new(expr(ExprKind::Str("a".into()))),
            compound: false,
        });
        assert!(expr_type(&e, &table).is_err());
    }

    #[test]
    fn test_unary_plus_is_numeric() {
        let table = table_with_var("s", Type::string());
        let e = expr(ExprKind::Unary {
            op: UnaryOp::Plus,
            operand: Box::new(expr(ExprKind::Var(QualifiedName::simple("s")))),
        });
        assert_eq!(expr_type(&e, &table).unwrap(), Type::number());
    }
}
