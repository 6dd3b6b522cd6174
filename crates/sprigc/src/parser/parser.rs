//! Sprig recursive descent parser
//!
//! Statements and declarations are parsed by recursive descent; expressions
//! by precedence climbing over the operator table attached to the tokens.
//! Any unexpected token aborts parsing immediately; there is no recovery.

use crate::ast::*;
use crate::common::{CompileError, CompileResult, Span};
use crate::lexer::{Lexer, OperatorKind, TokenKind};

/// Sprig parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    /// Parse a complete source file
    pub fn parse_program(&mut self) -> CompileResult<Program> {
        let mut decls = Vec::new();
        let mut runnables = Vec::new();

        while !self.check(&TokenKind::Eof)? {
            if self.check(&TokenKind::Func)? {
                decls.push(self.parse_function()?);
            } else {
                // `var` and `extern` both fall through to statement
                // dispatch; declarations made by them run in source order.
                runnables.push(self.parse_statement()?);
            }
        }

        Ok(Program { decls, runnables })
    }

    // ==================== Declarations ====================

    fn parse_function(&mut self) -> CompileResult<FunctionDef> {
        let start = self.expect(TokenKind::Func)?.span;
        let name = QualifiedName::simple(self.expect_identifier()?);
        self.expect(TokenKind::LParen)?;

        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen)? {
            let pname = self.expect_identifier()?;
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            params.push(Param { name: pname, ty });

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        self.expect(TokenKind::Colon)?;
        let ret = self.parse_type()?;

        self.expect(TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace)? {
            body.push(self.parse_statement()?);
        }
        let end = self.expect(TokenKind::RBrace)?.span;

        Ok(FunctionDef {
            name,
            params,
            ret,
            body,
            is_extern: false,
            span: start.to(end),
        })
    }

    /// `extern func name(Type, Type): Type;`
    ///
    /// Extern signatures carry no parameter names; positional names
    /// `$0`, `$1`, ... are synthesized. `$` cannot start an identifier,
    /// so the names can never collide with user symbols.
    fn parse_extern(&mut self) -> CompileResult<FunctionDef> {
        let start = self.expect(TokenKind::Extern)?.span;
        self.expect(TokenKind::Func)?;
        let name = QualifiedName::simple(self.expect_identifier()?);
        self.expect(TokenKind::LParen)?;

        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen)? {
            let ty = self.parse_type()?;
            params.push(Param {
                name: format!("${}", params.len()),
                ty,
            });

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        self.expect(TokenKind::Colon)?;
        let ret = self.parse_type()?;
        let end = self.expect(TokenKind::Semi)?.span;

        Ok(FunctionDef {
            name,
            params,
            ret,
            body: Vec::new(),
            is_extern: true,
            span: start.to(end),
        })
    }

    // ==================== Statements ====================

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.lexer.peek()?.span;

        if self.check(&TokenKind::Var)? {
            let decl = self.parse_var_decl()?;
            let span = decl.span;
            return Ok(Stmt::new(StmtKind::Var(decl), span));
        }

        if self.match_token(&TokenKind::Return)? {
            let value = self.parse_expr()?;
            let end = self.expect(TokenKind::Semi)?.span;
            return Ok(Stmt::new(StmtKind::Return(value), start.to(end)));
        }

        if self.match_token(&TokenKind::If)? {
            return self.parse_if(start);
        }
        if self.match_token(&TokenKind::When)? {
            return self.parse_when(start);
        }
        if self.match_token(&TokenKind::For)? {
            return self.parse_for(start);
        }
        if self.match_token(&TokenKind::Foreach)? {
            return self.parse_foreach(start);
        }
        if self.match_token(&TokenKind::While)? {
            return self.parse_while(start);
        }

        if self.match_token(&TokenKind::LBrace)? {
            let mut body = Vec::new();
            while !self.check(&TokenKind::RBrace)? {
                body.push(self.parse_statement()?);
            }
            let end = self.expect(TokenKind::RBrace)?.span;
            return Ok(Stmt::new(StmtKind::Block(body), start.to(end)));
        }

        if self.check(&TokenKind::Extern)? {
            let func = self.parse_extern()?;
            let span = func.span;
            return Ok(Stmt::new(StmtKind::ExternFn(func), span));
        }

        let expr = self.parse_expr()?;
        let end = self.expect(TokenKind::Semi)?.span;
        Ok(Stmt::new(StmtKind::Expr(expr), start.to(end)))
    }

    /// `var name [: type] (';' | '=' expr ';')`
    fn parse_var_decl(&mut self) -> CompileResult<VarDecl> {
        let start = self.expect(TokenKind::Var)?.span;
        let name = QualifiedName::simple(self.expect_identifier()?);

        let ty = if self.match_token(&TokenKind::Colon)? {
            Some(self.parse_type()?)
        } else {
            None
        };

        // An untyped, uninitialized declaration parses fine; whether it is
        // allowed depends on context (foreach infers the loop variable's
        // type), so the analyzer rules on it.
        if self.check(&TokenKind::Semi)? {
            let end = self.expect(TokenKind::Semi)?.span;
            return Ok(VarDecl {
                name,
                ty,
                init: None,
                span: start.to(end),
            });
        }

        self.expect(TokenKind::Eq)?;
        let init = self.parse_expr()?;
        let end = self.expect(TokenKind::Semi)?.span;

        Ok(VarDecl {
            name,
            ty,
            init: Some(init),
            span: start.to(end),
        })
    }

    fn parse_if(&mut self, start: Span) -> CompileResult<Stmt> {
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        let mut end = body.span;

        let else_body = if self.match_token(&TokenKind::Else)? {
            let stmt = self.parse_statement()?;
            end = stmt.span;
            Some(Box::new(stmt))
        } else {
            None
        };

        Ok(Stmt::new(
            StmtKind::If { cond, body, else_body },
            start.to(end),
        ))
    }

    fn parse_when(&mut self, start: Span) -> CompileResult<Stmt> {
        self.expect(TokenKind::LParen)?;
        let scrutinee = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;

        let mut branches = Vec::new();
        while !self.check(&TokenKind::RBrace)? {
            branches.push(self.parse_when_branch()?);
        }
        let end = self.expect(TokenKind::RBrace)?.span;
        let span = start.to(end);

        Ok(Stmt::new(
            StmtKind::When(WhenStmt { scrutinee, branches, span }),
            span,
        ))
    }

    /// `expr [, expr]* -> stmt` | `in expr -> stmt` | `else -> stmt`
    fn parse_when_branch(&mut self) -> CompileResult<WhenBranch> {
        if self.match_token(&TokenKind::Else)? {
            self.expect(TokenKind::Arrow)?;
            let body = Box::new(self.parse_statement()?);
            return Ok(WhenBranch::Else { body });
        }

        if self.match_token(&TokenKind::In)? {
            let expr = self.parse_expr()?;
            self.expect(TokenKind::Arrow)?;
            let body = Box::new(self.parse_statement()?);
            return Ok(WhenBranch::In { expr, body });
        }

        let mut exprs = vec![self.parse_expr()?];
        while self.match_token(&TokenKind::Comma)? {
            exprs.push(self.parse_expr()?);
        }
        self.expect(TokenKind::Arrow)?;
        let body = Box::new(self.parse_statement()?);
        Ok(WhenBranch::Eq { exprs, body })
    }

    /// `for (varDecl expr ; stmt) stmt`
    fn parse_for(&mut self, start: Span) -> CompileResult<Stmt> {
        self.expect(TokenKind::LParen)?;
        let init = self.parse_var_decl()?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        let step = Box::new(self.parse_statement()?);
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        let span = start.to(body.span);
        Ok(Stmt::new(StmtKind::For { init, cond, step, body }, span))
    }

    /// `foreach (varDecl expr ;) stmt`
    fn parse_foreach(&mut self, start: Span) -> CompileResult<Stmt> {
        self.expect(TokenKind::LParen)?;
        let decl = self.parse_var_decl()?;
        let iter = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        let span = start.to(body.span);
        Ok(Stmt::new(StmtKind::ForEach { decl, iter, body }, span))
    }

    /// `while (expr ;) stmt`
    fn parse_while(&mut self, start: Span) -> CompileResult<Stmt> {
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        let span = start.to(body.span);
        Ok(Stmt::new(StmtKind::While { cond, body }, span))
    }

    // ==================== Expressions ====================

    pub fn parse_expr(&mut self) -> CompileResult<Expr> {
        self.parse_expr_min_prec(0)
    }

    fn parse_expr_min_prec(&mut self, min_prec: u8) -> CompileResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let Some(op) = self.lexer.peek()?.kind.operator() else {
                break;
            };
            if op.precedence < min_prec {
                break;
            }
            self.lexer.next_token()?;

            // Right-associative operators re-enter at their own precedence
            let next_min = if op.right_assoc {
                op.precedence
            } else {
                op.precedence + 1
            };
            let right = self.parse_expr_min_prec(next_min)?;
            let span = left.span.to(right.span);

            left = match op.kind {
                OperatorKind::Arith(bin) => Expr::new(
                    ExprKind::Binary {
                        op: bin,
                        left: Box::new(left),
                        right: Box::new(right),
                        compound: op.compound,
                    },
                    span,
                ),
                OperatorKind::Cond(cond) => Expr::new(
                    ExprKind::Cond {
                        op: cond,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    span,
                ),
                OperatorKind::Range => Expr::new(
                    ExprKind::Range {
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    span,
                ),
            };
        }

        Ok(left)
    }

    /// Unary prefix operators bind tighter than any binary operator
    fn parse_unary(&mut self) -> CompileResult<Expr> {
        let start = self.lexer.peek()?.span;

        let op = match &self.lexer.peek()?.kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };

        if let Some(op) = op {
            self.lexer.next_token()?;
            let operand = self.parse_unary()?;
            let span = start.to(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        self.parse_atom()
    }

    fn parse_atom(&mut self) -> CompileResult<Expr> {
        let token = self.lexer.next_token()?;
        let start = token.span;

        match token.kind {
            TokenKind::LParen => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Number(value) => Ok(Expr::new(ExprKind::Number(value), start)),
            TokenKind::Str(value) => Ok(Expr::new(ExprKind::Str(value), start)),
            TokenKind::True => Ok(Expr::new(ExprKind::Bool(true), start)),
            TokenKind::False => Ok(Expr::new(ExprKind::Bool(false), start)),
            TokenKind::LBracket => self.parse_array_literal(start),
            TokenKind::Identifier(first) => {
                let name = self.parse_qualified_name(first)?;
                self.parse_name_expr(name, start)
            }
            kind => Err(CompileError::parser(
                format!(
                    "expected a number, string, boolean, identifier, '[', or '(', found '{}'",
                    kind
                ),
                start,
            )),
        }
    }

    /// `[Type]{ expr [, expr]* [,] }`
    fn parse_array_literal(&mut self, start: Span) -> CompileResult<Expr> {
        let elem_ty = self.parse_type()?;
        self.expect(TokenKind::RBracket)?;
        self.expect(TokenKind::LBrace)?;

        let mut elems = Vec::new();
        while !self.check(&TokenKind::RBrace)? {
            elems.push(self.parse_expr()?);

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        let end = self.expect(TokenKind::RBrace)?.span;

        Ok(Expr::new(
            ExprKind::Array { elem_ty, elems },
            start.to(end),
        ))
    }

    /// An identifier atom: variable reference, assignment, or call,
    /// depending on what follows
    fn parse_name_expr(&mut self, name: QualifiedName, start: Span) -> CompileResult<Expr> {
        if self.match_token(&TokenKind::LParen)? {
            let mut args = Vec::new();
            while !self.check(&TokenKind::RParen)? {
                args.push(self.parse_expr()?);

                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
            let end = self.expect(TokenKind::RParen)?.span;
            return Ok(Expr::new(ExprKind::Call { name, args }, start.to(end)));
        }

        if self.match_token(&TokenKind::Eq)? {
            let value = self.parse_expr()?;
            let span = start.to(value.span);
            return Ok(Expr::new(
                ExprKind::Assign {
                    name,
                    value: Box::new(value),
                },
                span,
            ));
        }

        Ok(Expr::new(ExprKind::Var(name), start))
    }

    // ==================== Names and types ====================

    fn parse_qualified_name(&mut self, first: String) -> CompileResult<QualifiedName> {
        let mut parts = vec![first];
        while self.match_token(&TokenKind::Dot)? {
            parts.push(self.expect_identifier()?);
        }
        Ok(QualifiedName::new(parts))
    }

    /// `identifier [ '<' type [, type]* '>' ]`
    fn parse_type(&mut self) -> CompileResult<Type> {
        let first = self.expect_identifier()?;
        let name = self.parse_qualified_name(first)?;

        let mut params = Vec::new();
        if self.match_token(&TokenKind::Lt)? {
            params.push(self.parse_type()?);
            while self.match_token(&TokenKind::Comma)? {
                params.push(self.parse_type()?);
            }
            self.expect_close_angle()?;
        }

        Ok(Type::new(name, params))
    }

    /// Closing `>` of a generic type, possibly glued into `>>` or `>=`
    fn expect_close_angle(&mut self) -> CompileResult<()> {
        if self.match_token(&TokenKind::Gt)? {
            return Ok(());
        }
        if self.check(&TokenKind::Shr)? {
            return self.lexer.split_peeked(TokenKind::Gt);
        }
        if self.check(&TokenKind::GtEq)? {
            return self.lexer.split_peeked(TokenKind::Eq);
        }
        let token = self.lexer.next_token()?;
        Err(CompileError::parser(
            format!("expected '>', found '{}'", token.kind),
            token.span,
        ))
    }

    // ==================== Token helpers ====================

    fn expect_identifier(&mut self) -> CompileResult<String> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(name),
            kind => Err(CompileError::parser(
                format!("expected an identifier, found '{}'", kind),
                token.span,
            )),
        }
    }

    fn check(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        self.lexer.check(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        self.lexer.match_token(kind)
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<crate::lexer::Token> {
        self.lexer.expect(kind)
    }
}
