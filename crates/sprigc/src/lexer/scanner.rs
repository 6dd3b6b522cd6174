//! Sprig lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;

/// Lexer for Sprig source code
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    /// Buffer for peeked tokens
    peeked: Vec<Token>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            peeked: Vec::new(),
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> CompileResult<Token> {
        // Return from buffer first
        if !self.peeked.is_empty() {
            return Ok(self.peeked.remove(0));
        }

        self.scan_token()
    }

    /// Scan a new token from source
    fn scan_token(&mut self) -> CompileResult<Token> {
        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Ok(Token::new(kind, Span::new(span.start, span.end)))
            }
            Some(Err(())) => {
                let span = self.inner.span();
                Err(CompileError::lexer(
                    format!("unexpected character '{}'", self.inner.slice()),
                    Span::new(span.start, span.end),
                ))
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::new(len, len)))
            }
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> CompileResult<&Token> {
        if self.peeked.is_empty() {
            let token = self.scan_token()?;
            self.peeked.push(token);
        }
        Ok(&self.peeked[0])
    }

    /// Check if the next token matches the expected kind
    pub fn check(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        Ok(std::mem::discriminant(&self.peek()?.kind) == std::mem::discriminant(expected))
    }

    /// Consume the next token if it matches, return true if consumed
    pub fn match_token(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        if self.check(expected)? {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Expect a specific token kind, error if not found
    pub fn expect(&mut self, expected: TokenKind) -> CompileResult<Token> {
        let token = self.next_token()?;
        if std::mem::discriminant(&token.kind) == std::mem::discriminant(&expected) {
            Ok(token)
        } else {
            Err(CompileError::parser(
                format!("expected '{}', found '{}'", expected, token.kind),
                token.span,
            ))
        }
    }

    /// Consume one byte of the next token, leaving `rest` in its place.
    ///
    /// Lets the parser treat the first `>` of a `>>` or `>=` token as a
    /// generic-closing angle bracket in types like `Array<Array<Number>>`.
    pub fn split_peeked(&mut self, rest: TokenKind) -> CompileResult<()> {
        let token = self.next_token()?;
        let span = Span::new(token.span.start + 1, token.span.end);
        self.peeked.insert(0, Token::new(rest, span));
        Ok(())
    }

    /// Get the source being lexed
    pub fn source(&self) -> &'a str {
        self.inner.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            let eof = matches!(token.kind, TokenKind::Eof);
            out.push(token.kind);
            if eof {
                break;
            }
        }
        out
    }

    #[test]
    fn test_keywords() {
        let source = "var func return if else when for foreach while extern in";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Var));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Func));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Return));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::If));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Else));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::When));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::For));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Foreach));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::While));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Extern));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::In));
    }

    #[test]
    fn test_identifiers() {
        let source = "foo bar_baz _test test123";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "foo"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "bar_baz"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "_test"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "test123"
        ));
    }

    #[test]
    fn test_number_literals() {
        let mut lexer = Lexer::new("42 3.25 0");

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Number(n) if n == 42.0));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Number(n) if n == 3.25));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Number(n) if n == 0.0));
    }

    #[test]
    fn test_range_does_not_eat_number() {
        // "1..5" must lex as number, range operator, number
        assert_eq!(
            kinds("1..5"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::DotDot,
                TokenKind::Number(5.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literal_keeps_escapes() {
        let mut lexer = Lexer::new(r#""he\"llo\n""#);
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Str(s) if s == "he\\\"llo\\n"
        ));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+ += ** **= << <<= <= == != && || .. -> ="),
            vec![
                TokenKind::Plus,
                TokenKind::PlusEq,
                TokenKind::StarStar,
                TokenKind::StarStarEq,
                TokenKind::Shl,
                TokenKind::ShlEq,
                TokenKind::LtEq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::DotDot,
                TokenKind::Arrow,
                TokenKind::Eq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments() {
        let source = "var # the rest of this line vanishes\nx";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Var,
                TokenKind::Identifier("x".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("var @");
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, CompileError::Lexer { .. }));
    }

    #[test]
    fn test_compound_token_operator_flag() {
        let op = TokenKind::PlusEq.operator().unwrap();
        assert!(op.compound);
        let plain = TokenKind::Plus.operator().unwrap();
        assert!(!plain.compound);
        assert_eq!(op.precedence, plain.precedence);
    }

    #[test]
    fn test_exponent_is_right_associative() {
        let op = TokenKind::StarStar.operator().unwrap();
        assert!(op.right_assoc);
        assert!(!TokenKind::Star.operator().unwrap().right_assoc);
    }
}
