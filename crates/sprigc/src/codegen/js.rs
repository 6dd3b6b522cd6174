//! JavaScript emission
//!
//! Turns a verified program into plain ES5-ish script text, one top-level
//! item per line, with no runtime header or footer. Compiler-introduced
//! temporaries are `$`-prefixed; `$` cannot start a source identifier, so
//! they can never collide with user names.

use crate::ast::*;

/// Emit a whole program: function declarations first, then top-level
/// statements in source order
pub fn emit(program: &Program) -> String {
    let mut out = String::new();
    for func in &program.decls {
        out.push_str(&emit_function(func));
        out.push('\n');
    }
    for stmt in &program.runnables {
        let text = emit_stmt(stmt);
        if !text.is_empty() {
            out.push_str(&text);
            out.push('\n');
        }
    }
    out
}

fn emit_function(func: &FunctionDef) -> String {
    let params: Vec<&str> = func.params.iter().map(|p| p.name.as_str()).collect();
    format!(
        "function {}({}){{{}}}",
        func.name,
        params.join(","),
        emit_body(&func.body)
    )
}

fn emit_body(body: &[Stmt]) -> String {
    body.iter().map(emit_stmt).collect()
}

fn emit_stmt(stmt: &Stmt) -> String {
    match &stmt.kind {
        StmtKind::Var(decl) => emit_var_decl(decl),
        StmtKind::Return(value) => format!("return {};", emit_expr(value)),
        StmtKind::Expr(expr) => format!("{};", emit_expr(expr)),
        StmtKind::Block(body) => format!("{{{}}}", emit_body(body)),
        StmtKind::If {
            cond,
            body,
            else_body,
        } => {
            let mut text = format!("if({}){}", emit_expr(cond), emit_stmt(body));
            if let Some(else_body) = else_body {
                text.push_str(&format!("else {}", emit_stmt(else_body)));
            }
            text
        }
        StmtKind::When(when) => emit_when(when),
        StmtKind::For {
            init,
            cond,
            step,
            body,
        } => format!(
            "for({}{};{}){}",
            emit_var_decl(init),
            emit_expr(cond),
            emit_for_step(step),
            emit_stmt(body)
        ),
        StmtKind::ForEach { decl, iter, body } => format!(
            "var $l={};for(var $i=0,{v}=$l[0];$i<$l.length;$i++,{v}=$l[$i]){}",
            emit_expr(iter),
            emit_stmt(body),
            v = decl.name
        ),
        StmtKind::While { cond, body } => {
            format!("while({}){}", emit_expr(cond), emit_stmt(body))
        }
        // Extern declarations bind a host global; nothing to emit
        StmtKind::ExternFn(_) => String::new(),
    }
}

fn emit_var_decl(decl: &VarDecl) -> String {
    match &decl.init {
        Some(init) => format!("var {}={};", decl.name, emit_expr(init)),
        None => format!("var {};", decl.name),
    }
}

/// The step slot of a JS `for` head takes an expression, not a statement
fn emit_for_step(step: &Stmt) -> String {
    match &step.kind {
        StmtKind::Expr(expr) => emit_expr(expr),
        _ => emit_stmt(step),
    }
}

/// Cache the scrutinee once, then test branches first-match-wins with
/// strict equality. An `else` branch heading the list short-circuits the
/// whole chain: its body runs unconditionally.
fn emit_when(when: &WhenStmt) -> String {
    let mut text = format!("var $e={};", emit_expr(&when.scrutinee));
    let mut first = true;
    for branch in &when.branches {
        match branch {
            WhenBranch::Eq { exprs, body } => {
                let cond: Vec<String> = exprs
                    .iter()
                    .map(|e| format!("$e==={}", emit_expr(e)))
                    .collect();
                let keyword = if first { "if" } else { "else if" };
                text.push_str(&format!("{}({}){}", keyword, cond.join("||"), emit_stmt(body)));
            }
            WhenBranch::In { expr, body } => {
                let keyword = if first { "if" } else { "else if" };
                text.push_str(&format!(
                    "{}(({}).includes($e)){}",
                    keyword,
                    emit_expr(expr),
                    emit_stmt(body)
                ));
            }
            WhenBranch::Else { body } => {
                if first {
                    text.push_str(&emit_stmt(body));
                } else {
                    text.push_str(&format!("else {}", emit_stmt(body)));
                }
                break;
            }
        }
        first = false;
    }
    text
}

fn emit_expr(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Number(value) => emit_number(*value),
        ExprKind::Str(value) => format!("\"{}\"", value),
        ExprKind::Bool(value) => value.to_string(),
        ExprKind::Array { elems, .. } => {
            let elems: Vec<String> = elems.iter().map(emit_expr).collect();
            format!("[{}]", elems.join(","))
        }
        ExprKind::Var(name) => name.to_string(),
        ExprKind::Assign { name, value } => format!("{}={}", name, emit_expr(value)),
        ExprKind::Call { name, args } => {
            let args: Vec<String> = args.iter().map(emit_expr).collect();
            let target = if name.is_js_interop() {
                // Strip the interop prefix and call the host global directly
                name.parts[1..].join(".")
            } else {
                name.to_string()
            };
            format!("{}({})", target, args.join(","))
        }
        ExprKind::Unary { op, operand } => {
            format!("{}({})", op.js_repr(), emit_expr(operand))
        }
        ExprKind::Binary {
            op,
            left,
            right,
            compound,
        } => {
            let l = emit_expr(left);
            let r = emit_expr(right);
            // No exponentiation operator in the target dialect
            if *op == BinOp::Pow {
                if *compound {
                    return format!("{l}=Math.pow({l},{r})");
                }
                return format!("Math.pow({l},{r})");
            }
            if *compound {
                format!("{}{}={}", l, op.js_repr(), r)
            } else {
                format!("({}){}({})", l, op.js_repr(), r)
            }
        }
        ExprKind::Cond { op, left, right } => {
            let l = emit_expr(left);
            let r = emit_expr(right);
            if *op == CondOp::In {
                return format!("({}).includes({})", r, l);
            }
            format!("({}){}({})", l, op.js_repr(), r)
        }
        // Materialize the range as a consecutive-integer array
        ExprKind::Range { left, right } => {
            let l = emit_expr(left);
            let r = emit_expr(right);
            format!(
                "[...new Array(({r})-({l})).keys()].map(function($x){{return $x+({l})}})"
            )
        }
    }
}

/// Integral values render without a fractional suffix
fn emit_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn emit_source(source: &str) -> String {
        let program = Parser::new(source).parse_program().unwrap();
        emit(&program)
    }

    #[test]
    fn test_functions_emit_before_runnables() {
        let js = emit_source("f();\nfunc f(): Void {}");
        assert_eq!(js, "function f(){}\nf();\n");
    }

    #[test]
    fn test_var_and_numbers() {
        assert_eq!(emit_source("var x = 3;"), "var x=3;\n");
        assert_eq!(emit_source("var x = 3.5;"), "var x=3.5;\n");
        assert_eq!(emit_source("var x: Number;"), "var x;\n");
    }

    #[test]
    fn test_compound_assignment_round_trip() {
        assert_eq!(emit_source("x += 1;"), "x+=1;\n");
        assert_eq!(emit_source("x <<= 2;"), "x<<=2;\n");
    }

    #[test]
    fn test_plain_binary_is_parenthesized() {
        assert_eq!(emit_source("x = a + b * c;"), "x=(a)+((b)*(c));\n");
    }

    #[test]
    fn test_exponent_uses_math_pow() {
        assert_eq!(emit_source("x = a ** b;"), "x=Math.pow(a,b);\n");
        assert_eq!(emit_source("a **= b;"), "a=Math.pow(a,b);\n");
    }

    #[test]
    fn test_membership_uses_includes() {
        assert_eq!(
            emit_source("b = x in xs;"),
            "b=(xs).includes(x);\n"
        );
    }

    #[test]
    fn test_range_materializes_an_array() {
        assert_eq!(
            emit_source("var r = 2..5;"),
            "var r=[...new Array((5)-(2)).keys()].map(function($x){return $x+(2)});\n"
        );
    }

    #[test]
    fn test_js_interop_strips_the_prefix() {
        assert_eq!(emit_source("js.console.log(1);"), "console.log(1);\n");
        assert_eq!(emit_source("js.alert(\"hi\");"), "alert(\"hi\");\n");
    }

    #[test]
    fn test_extern_emits_nothing() {
        assert_eq!(emit_source("extern func abs(Number): Number;"), "");
        assert_eq!(emit_source("extern func abs(Number): Number; x = abs(y);"), "x=abs(y);\n");
    }

    #[test]
    fn test_when_chain_order_and_strict_equality() {
        let js = emit_source("when (x) { 1, 2 -> a(); in xs -> b(); else -> c(); }");
        assert_eq!(
            js,
            "var $e=x;if($e===1||$e===2)a();else if((xs).includes($e))b();else c();\n"
        );
    }

    #[test]
    fn test_when_leading_else_is_unconditional() {
        let js = emit_source("when (x) { else -> c(); 1 -> a(); }");
        assert_eq!(js, "var $e=x;c();\n");
    }

    #[test]
    fn test_foreach_shape() {
        let js = emit_source("foreach (var n: Number; xs;) f(n);");
        assert_eq!(
            js,
            "var $l=xs;for(var $i=0,n=$l[0];$i<$l.length;$i++,n=$l[$i])f(n);\n"
        );
    }

    #[test]
    fn test_for_and_while() {
        let js = emit_source("for (var i = 0; i < 3; i += 1;) f(i);");
        assert_eq!(js, "for(var i=0;(i)<(3);i+=1)f(i);\n");
        assert_eq!(emit_source("while (b;) f();"), "while(b)f();\n");
    }

    #[test]
    fn test_if_else_and_blocks() {
        let js = emit_source("if (b) { f(); g(); } else h();");
        assert_eq!(js, "if(b){f();g();}else h();\n");
    }

    #[test]
    fn test_function_with_params_and_return() {
        let js = emit_source("func add(a: Number, b: Number): Number { return a + b; }");
        assert_eq!(js, "function add(a,b){return (a)+(b);}\n");
    }

    #[test]
    fn test_string_escapes_pass_through() {
        assert_eq!(emit_source("s = \"a\\nb\";"), "s=\"a\\nb\";\n");
    }

    #[test]
    fn test_array_literal() {
        assert_eq!(emit_source("var xs = [Number]{1, 2, 3};"), "var xs=[1,2,3];\n");
    }

    #[test]
    fn test_unary() {
        assert_eq!(emit_source("x = -y;"), "x=-(y);\n");
        assert_eq!(emit_source("b = !c;"), "b=!(c);\n");
    }
}
