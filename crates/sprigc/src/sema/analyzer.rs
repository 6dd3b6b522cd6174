//! Semantic analyzer - single-pass AST walk over all checkers

use crate::ast::*;
use crate::common::{CompileError, CompileResult};

use super::checker::{ArityChecker, Checker, Ctx, NameChecker, ReturnChecker, TypeChecker};
use super::infer::expr_type;
use super::symbol::{Symbol, SymbolKind, SymbolTable};

/// Semantic analyzer
///
/// Walks the program once, maintaining the symbol table and the scope
/// depth, and runs every registered checker at every node. The first
/// failing check aborts the analysis.
pub struct Analyzer {
    table: SymbolTable,
    depth: usize,
    checkers: Vec<Box<dyn Checker>>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            depth: 0,
            checkers: vec![
                Box::new(NameChecker),
                Box::new(ReturnChecker),
                Box::new(TypeChecker),
                Box::new(ArityChecker),
            ],
        }
    }

    /// Verify a whole program
    ///
    /// Function signatures are hoisted first so that top-level code and
    /// other functions can call them regardless of declaration order.
    /// Bodies are then checked before any top-level statement, so a body
    /// cannot reference a global or extern declared in runnable code.
    pub fn verify(&mut self, program: &Program) -> CompileResult<()> {
        for func in &program.decls {
            self.declare_function(func)?;
        }
        for func in &program.decls {
            self.visit_function(func)?;
        }
        let ctx = Ctx::default();
        for stmt in &program.runnables {
            self.visit_stmt(stmt, ctx)?;
        }
        Ok(())
    }

    fn declare_function(&mut self, func: &FunctionDef) -> CompileResult<()> {
        let symbol = Symbol {
            name: func.name.clone(),
            kind: SymbolKind::Function {
                params: func.params.iter().map(|p| p.ty.clone()).collect(),
            },
            ty: func.ret.clone(),
            depth: self.depth,
        };
        self.table
            .add(symbol)
            .map_err(|e| CompileError::semantic(e, func.span))
    }

    fn visit_function(&mut self, func: &FunctionDef) -> CompileResult<()> {
        for checker in &self.checkers {
            checker.check_function(func, &self.table)?;
        }
        if func.is_extern {
            return Ok(());
        }

        let ctx = Ctx {
            func: Some(func),
            when: None,
        };
        self.scoped(|a| {
            for param in &func.params {
                let symbol = Symbol {
                    name: QualifiedName::simple(param.name.clone()),
                    kind: SymbolKind::Variable,
                    ty: param.ty.clone(),
                    depth: a.depth,
                };
                a.table
                    .add(symbol)
                    .map_err(|e| CompileError::semantic(e, func.span))?;
            }
            for stmt in &func.body {
                a.visit_stmt(stmt, ctx)?;
            }
            Ok(())
        })
    }

    fn visit_stmt(&mut self, stmt: &Stmt, ctx: Ctx<'_>) -> CompileResult<()> {
        match &stmt.kind {
            StmtKind::Var(decl) => self.visit_var_decl(decl, ctx)?,
            StmtKind::Return(value) => self.visit_expr(value, ctx)?,
            StmtKind::Expr(expr) => self.visit_expr(expr, ctx)?,
            StmtKind::Block(body) => self.scoped(|a| {
                for stmt in body {
                    a.visit_stmt(stmt, ctx)?;
                }
                Ok(())
            })?,
            StmtKind::If {
                cond,
                body,
                else_body,
            } => {
                self.visit_expr(cond, ctx)?;
                self.scoped(|a| a.visit_stmt(body, ctx))?;
                if let Some(else_body) = else_body {
                    self.scoped(|a| a.visit_stmt(else_body, ctx))?;
                }
            }
            StmtKind::When(when) => {
                self.visit_expr(&when.scrutinee, ctx)?;
                let ctx = Ctx {
                    when: Some(when),
                    ..ctx
                };
                for branch in &when.branches {
                    match branch {
                        WhenBranch::Eq { exprs, .. } => {
                            for expr in exprs {
                                self.visit_expr(expr, ctx)?;
                            }
                        }
                        WhenBranch::In { expr, .. } => self.visit_expr(expr, ctx)?,
                        WhenBranch::Else { .. } => {}
                    }
                    self.scoped(|a| a.visit_stmt(branch.body(), ctx))?;
                    for checker in &self.checkers {
                        checker.check_when_branch(branch, &self.table, ctx)?;
                    }
                }
            }
            // Loop statements run their own checks inside the loop scope,
            // while the loop variable is still live
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                return self.scoped(|a| {
                    a.visit_var_decl(init, ctx)?;
                    a.visit_expr(cond, ctx)?;
                    a.visit_stmt(step, ctx)?;
                    a.visit_stmt(body, ctx)?;
                    a.run_stmt_checks(stmt, ctx)
                });
            }
            StmtKind::ForEach { decl, iter, body } => {
                return self.scoped(|a| {
                    a.visit_expr(iter, ctx)?;
                    for checker in &a.checkers {
                        checker.check_var_decl(decl, &a.table)?;
                    }
                    // Loop variable type: the annotation if given, else the
                    // iterated element type. Any stands in when the iterated
                    // expression is broken; the foreach check below reports it.
                    let ty = match &decl.ty {
                        Some(ty) => ty.clone(),
                        None => expr_type(iter, &a.table)
                            .ok()
                            .and_then(|t| t.element().cloned())
                            .unwrap_or(Type::any()),
                    };
                    let symbol = Symbol {
                        name: decl.name.clone(),
                        kind: SymbolKind::Variable,
                        ty,
                        depth: a.depth,
                    };
                    a.table
                        .add(symbol)
                        .map_err(|e| CompileError::semantic(e, decl.span))?;
                    a.visit_stmt(body, ctx)?;
                    a.run_stmt_checks(stmt, ctx)
                });
            }
            StmtKind::While { cond, body } => {
                self.visit_expr(cond, ctx)?;
                self.scoped(|a| a.visit_stmt(body, ctx))?;
            }
            StmtKind::ExternFn(func) => {
                self.declare_function(func)?;
                for checker in &self.checkers {
                    checker.check_function(func, &self.table)?;
                }
            }
        }

        self.run_stmt_checks(stmt, ctx)
    }

    fn run_stmt_checks(&self, stmt: &Stmt, ctx: Ctx<'_>) -> CompileResult<()> {
        for checker in &self.checkers {
            checker.check_stmt(stmt, &self.table, ctx)?;
        }
        Ok(())
    }

    fn visit_var_decl(&mut self, decl: &VarDecl, ctx: Ctx<'_>) -> CompileResult<()> {
        // The initializer is checked before the name is declared, so a
        // declaration can never reference itself.
        if let Some(init) = &decl.init {
            self.visit_expr(init, ctx)?;
        }
        for checker in &self.checkers {
            checker.check_var_decl(decl, &self.table)?;
        }

        let ty = match (&decl.ty, &decl.init) {
            (Some(ty), _) => ty.clone(),
            (None, Some(init)) => expr_type(init, &self.table)?,
            (None, None) => {
                return Err(CompileError::semantic(
                    format!(
                        "variable '{}' needs a type annotation or an initializer",
                        decl.name
                    ),
                    decl.span,
                ));
            }
        };
        let symbol = Symbol {
            name: decl.name.clone(),
            kind: SymbolKind::Variable,
            ty,
            depth: self.depth,
        };
        self.table
            .add(symbol)
            .map_err(|e| CompileError::semantic(e, decl.span))
    }

    fn visit_expr(&mut self, expr: &Expr, ctx: Ctx<'_>) -> CompileResult<()> {
        match &expr.kind {
            ExprKind::Array { elems, .. } => {
                for elem in elems {
                    self.visit_expr(elem, ctx)?;
                }
            }
            ExprKind::Assign { value, .. } => self.visit_expr(value, ctx)?,
            // Host-interop call arguments are still walked even though the
            // call itself is unchecked
            ExprKind::Call { args, .. } => {
                for arg in args {
                    self.visit_expr(arg, ctx)?;
                }
            }
            ExprKind::Unary { operand, .. } => self.visit_expr(operand, ctx)?,
            ExprKind::Binary { left, right, .. }
            | ExprKind::Cond { left, right, .. }
            | ExprKind::Range { left, right } => {
                self.visit_expr(left, ctx)?;
                self.visit_expr(right, ctx)?;
            }
            _ => {}
        }

        for checker in &self.checkers {
            checker.check_expr(expr, &self.table, ctx)?;
        }
        Ok(())
    }

    /// Run `f` one scope level deeper, dropping that level's symbols on
    /// the way out even when `f` fails
    fn scoped<F>(&mut self, f: F) -> CompileResult<()>
    where
        F: FnOnce(&mut Self) -> CompileResult<()>,
    {
        self.depth += 1;
        let result = f(self);
        self.table.remove_out_of_scope(self.depth);
        self.depth -= 1;
        result
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn verify(source: &str) -> CompileResult<()> {
        let program = Parser::new(source).parse_program()?;
        Analyzer::new().verify(&program)
    }

    fn verify_err(source: &str) -> String {
        match verify(source) {
            Err(CompileError::Semantic { message, .. }) => message,
            other => panic!("expected a semantic error, got {:?}", other),
        }
    }

    #[test]
    fn test_block_scope_ends_at_brace() {
        verify("{ var x = 1; x = 2; }").unwrap();
        let msg = verify_err("{ var x = 1; } x = 2;");
        assert!(msg.contains("unknown variable 'x'"), "{}", msg);
    }

    #[test]
    fn test_no_shadowing() {
        let msg = verify_err("var x = 1; { var x = 2; }");
        assert!(msg.contains("already defined"), "{}", msg);
    }

    #[test]
    fn test_hoisting_allows_forward_and_mutual_calls() {
        verify("later(1);\n func later(n: Number): Void {}").unwrap();
        verify(
            "func even(n: Number): Boolean { return odd(n - 1); }\n\
             func odd(n: Number): Boolean { return even(n - 1); }",
        )
        .unwrap();
    }

    #[test]
    fn test_bodies_cannot_reference_top_level_variables() {
        // Only signatures are hoisted; bodies are checked before any
        // top-level statement runs, so globals are out of reach there
        let msg = verify_err("var total = 0;\n func bump(): Void { total = total + 1; }");
        assert!(msg.contains("unknown variable 'total'"), "{}", msg);
        let msg = verify_err("func f(): Void { x = 1; } var x = 0;");
        assert!(msg.contains("unknown variable 'x'"), "{}", msg);
    }

    #[test]
    fn test_arity_mismatch() {
        let msg = verify_err("func f(a: Number): Void {} f(1, 2);");
        assert!(msg.contains("takes 1 argument(s), but 2 were given"), "{}", msg);
    }

    #[test]
    fn test_argument_type_mismatch() {
        let msg = verify_err("func f(a: Number): Void {} f(\"one\");");
        assert!(msg.contains("expected 'Number'"), "{}", msg);
    }

    #[test]
    fn test_initializer_must_match_annotation() {
        verify("var x: Number = 1;").unwrap();
        let msg = verify_err("var x: Number = \"one\";");
        assert!(msg.contains("expected 'Number'"), "{}", msg);
    }

    #[test]
    fn test_js_interop_is_a_wildcard() {
        // Host calls type as Any, so they satisfy any annotation and any
        // operand position without being looked up
        verify("var x: Number = js.parseInt(\"7\");").unwrap();
        verify("var s: String = js.prompt();").unwrap();
        verify("var y = 1 + js.random();").unwrap();
    }

    #[test]
    fn test_assignment_type_and_kind() {
        verify("var x = 1; x = 2;").unwrap();
        let msg = verify_err("var x = 1; x = \"two\";");
        assert!(msg.contains("expected 'Number'"), "{}", msg);
        let msg = verify_err("func f(): Void {} f = 1;");
        assert!(msg.contains("not assignable"), "{}", msg);
    }

    #[test]
    fn test_return_placement() {
        let msg = verify_err("return 1;");
        assert!(msg.contains("outside of a function"), "{}", msg);
        verify("func f(): Number { return 1; }").unwrap();
    }

    #[test]
    fn test_return_type_must_match() {
        let msg = verify_err("func f(): Number { return \"one\"; }");
        assert!(msg.contains("expected 'Number'"), "{}", msg);
    }

    #[test]
    fn test_conditions_must_be_boolean() {
        verify("var b = true; if (b) {} while (b;) {}").unwrap();
        let msg = verify_err("if (1) {}");
        assert!(msg.contains("expected 'Boolean'"), "{}", msg);
    }

    #[test]
    fn test_comparison_types_as_boolean() {
        verify("var a = 1; var b = 2; if (a == b) {}").unwrap();
        verify("var x = 3; if (x in 1..5) {}").unwrap();
    }

    #[test]
    fn test_boolean_negation_needs_boolean_operand() {
        verify("var b = !true;").unwrap();
        verify("var a = false; var b = !a;").unwrap();
        let msg = verify_err("var b = !1;");
        assert!(msg.contains("expected 'Boolean'"), "{}", msg);
        let msg = verify_err("var b = !\"s\";");
        assert!(msg.contains("expected 'Boolean'"), "{}", msg);
    }

    #[test]
    fn test_membership_needs_matching_element() {
        let msg = verify_err("var s = \"a\"; if (s in 1..5) {}");
        assert!(msg.contains("membership"), "{}", msg);
    }

    #[test]
    fn test_foreach_element_types() {
        verify("foreach (var n: Number; 1..5;) { n = n + 1; }").unwrap();
        // Untyped loop variable takes the element type
        verify("foreach (var n; 1..5;) { var m: Number = n; }").unwrap();

        let msg = verify_err("foreach (var s: String; 1..5;) {}");
        assert!(msg.contains("the array holds 'Number'"), "{}", msg);

        let msg = verify_err("var x = 1; foreach (var n; x;) {}");
        assert!(msg.contains("expected an array type"), "{}", msg);

        let msg = verify_err("foreach (var n = 0; 1..5;) {}");
        assert!(msg.contains("cannot have an initializer"), "{}", msg);
    }

    #[test]
    fn test_array_literal_elements_checked() {
        verify("var xs: Array<Number> = [Number]{1, 2, 3};").unwrap();
        let msg = verify_err("var xs = [Number]{1, \"two\"};");
        assert!(msg.contains("expected 'Number'"), "{}", msg);
    }

    #[test]
    fn test_when_branch_types() {
        verify(
            "var x = 2;\n\
             when (x) { 1, 2 -> x = 0; in 5..9 -> x = 1; else -> x = 2; }",
        )
        .unwrap();
        let msg = verify_err("var x = 2; when (x) { \"a\" -> x = 0; }");
        assert!(msg.contains("expected 'Number'"), "{}", msg);
    }

    #[test]
    fn test_extern_registers_in_source_order() {
        verify("extern func abs(Number): Number; var a = abs(0 - 3);").unwrap();
        let msg = verify_err("var a = abs(3); extern func abs(Number): Number;");
        assert!(msg.contains("unknown function 'abs'"), "{}", msg);
    }

    #[test]
    fn test_function_parameters_are_scoped_to_the_body() {
        verify("func f(a: Number): Number { return a; }\n func g(a: String): String { return a; }")
            .unwrap();
        let msg = verify_err("func f(a: Number): Void {} a = 1;");
        assert!(msg.contains("unknown variable 'a'"), "{}", msg);
    }

    #[test]
    fn test_bare_var_decl_needs_type_or_initializer() {
        let msg = verify_err("var x;");
        assert!(msg.contains("type annotation or an initializer"), "{}", msg);
    }

    #[test]
    fn test_unknown_type_annotation() {
        let msg = verify_err("var x: Widget;");
        assert!(msg.contains("unknown type 'Widget'"), "{}", msg);
    }

    #[test]
    fn test_duplicate_function_names() {
        let msg = verify_err("func f(): Void {} func f(): Void {}");
        assert!(msg.contains("already defined"), "{}", msg);
    }
}
