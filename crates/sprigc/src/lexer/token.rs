//! Sprig token definitions using logos

use crate::ast::{BinOp, CondOp};
use crate::common::Span;
use logos::Logos;
use std::fmt;

/// A Sprig token with its kind and source location
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

fn strip_quotes(slice: &str) -> String {
    slice[1..slice.len() - 1].to_string()
}

/// Sprig token kinds
///
/// `#` starts a comment running to end of line; whitespace and comments are
/// skipped by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    // Keywords
    #[token("var")]
    Var,
    #[token("func")]
    Func,
    #[token("extern")]
    Extern,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("when")]
    When,
    #[token("for")]
    For,
    #[token("foreach")]
    Foreach,
    #[token("while")]
    While,
    #[token("in")]
    In,

    // Boolean literals
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Number literal: integer or decimal fraction
    #[regex(r"[0-9]+(\.[0-9]+)?", priority = 3, callback = |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    // String literal; escape sequences are kept verbatim for the generator
    #[regex(r#""([^"\\]|\\.)*""#, callback = |lex| strip_quotes(lex.slice()))]
    Str(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", priority = 1, callback = |lex| lex.slice().to_string())]
    Identifier(String),

    // Multi-character operators (longer forms first)
    #[token("**=")]
    StarStarEq,
    #[token("**")]
    StarStar,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("->")]
    Arrow,
    #[token("..")]
    DotDot,

    // Single-character operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Punctuation
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,

    // Special
    Eof,
}

/// What a binary-operator token denotes in the expression grammar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorKind {
    /// Arithmetic/bitwise/shift/exponent operator
    Arith(BinOp),
    /// Comparison, boolean, or membership operator (result is Boolean)
    Cond(CondOp),
    /// Range operator `..`
    Range,
}

/// Binary-operator descriptor attached to a token: the operator itself, its
/// numeric precedence, associativity, and whether the token was the
/// compound-assignment form (`+=` rather than `+`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operator {
    pub kind: OperatorKind,
    pub precedence: u8,
    pub right_assoc: bool,
    pub compound: bool,
}

impl Operator {
    fn arith(op: BinOp, compound: bool) -> Self {
        Self {
            kind: OperatorKind::Arith(op),
            precedence: op.precedence(),
            right_assoc: matches!(op, BinOp::Pow),
            compound,
        }
    }

    fn cond(op: CondOp) -> Self {
        Self {
            kind: OperatorKind::Cond(op),
            precedence: op.precedence(),
            right_assoc: false,
            compound: false,
        }
    }
}

impl TokenKind {
    /// The binary-operator descriptor for this token, if it is one
    pub fn operator(&self) -> Option<Operator> {
        Some(match self {
            TokenKind::PipePipe => Operator::cond(CondOp::Or),
            TokenKind::AmpAmp => Operator::cond(CondOp::And),
            TokenKind::In => Operator::cond(CondOp::In),
            TokenKind::EqEq => Operator::cond(CondOp::Eq),
            TokenKind::NotEq => Operator::cond(CondOp::Ne),
            TokenKind::Lt => Operator::cond(CondOp::Lt),
            TokenKind::LtEq => Operator::cond(CondOp::Le),
            TokenKind::Gt => Operator::cond(CondOp::Gt),
            TokenKind::GtEq => Operator::cond(CondOp::Ge),

            TokenKind::DotDot => Operator {
                kind: OperatorKind::Range,
                precedence: 4,
                right_assoc: false,
                compound: false,
            },

            TokenKind::Shl => Operator::arith(BinOp::Shl, false),
            TokenKind::Shr => Operator::arith(BinOp::Shr, false),
            TokenKind::Pipe => Operator::arith(BinOp::BitOr, false),
            TokenKind::Caret => Operator::arith(BinOp::BitXor, false),
            TokenKind::Amp => Operator::arith(BinOp::BitAnd, false),
            TokenKind::Plus => Operator::arith(BinOp::Add, false),
            TokenKind::Minus => Operator::arith(BinOp::Sub, false),
            TokenKind::Star => Operator::arith(BinOp::Mul, false),
            TokenKind::Slash => Operator::arith(BinOp::Div, false),
            TokenKind::Percent => Operator::arith(BinOp::Rem, false),
            TokenKind::StarStar => Operator::arith(BinOp::Pow, false),

            TokenKind::ShlEq => Operator::arith(BinOp::Shl, true),
            TokenKind::ShrEq => Operator::arith(BinOp::Shr, true),
            TokenKind::PipeEq => Operator::arith(BinOp::BitOr, true),
            TokenKind::CaretEq => Operator::arith(BinOp::BitXor, true),
            TokenKind::AmpEq => Operator::arith(BinOp::BitAnd, true),
            TokenKind::PlusEq => Operator::arith(BinOp::Add, true),
            TokenKind::MinusEq => Operator::arith(BinOp::Sub, true),
            TokenKind::StarEq => Operator::arith(BinOp::Mul, true),
            TokenKind::SlashEq => Operator::arith(BinOp::Div, true),
            TokenKind::PercentEq => Operator::arith(BinOp::Rem, true),
            TokenKind::StarStarEq => Operator::arith(BinOp::Pow, true),

            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Var => write!(f, "var"),
            TokenKind::Func => write!(f, "func"),
            TokenKind::Extern => write!(f, "extern"),
            TokenKind::Return => write!(f, "return"),
            TokenKind::If => write!(f, "if"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::When => write!(f, "when"),
            TokenKind::For => write!(f, "for"),
            TokenKind::Foreach => write!(f, "foreach"),
            TokenKind::While => write!(f, "while"),
            TokenKind::In => write!(f, "in"),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),

            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Str(s) => write!(f, "\"{}\"", s),
            TokenKind::Identifier(s) => write!(f, "{}", s),

            TokenKind::StarStarEq => write!(f, "**="),
            TokenKind::StarStar => write!(f, "**"),
            TokenKind::ShlEq => write!(f, "<<="),
            TokenKind::ShrEq => write!(f, ">>="),
            TokenKind::Shl => write!(f, "<<"),
            TokenKind::Shr => write!(f, ">>"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::AmpAmp => write!(f, "&&"),
            TokenKind::PipePipe => write!(f, "||"),
            TokenKind::PlusEq => write!(f, "+="),
            TokenKind::MinusEq => write!(f, "-="),
            TokenKind::StarEq => write!(f, "*="),
            TokenKind::SlashEq => write!(f, "/="),
            TokenKind::PercentEq => write!(f, "%="),
            TokenKind::AmpEq => write!(f, "&="),
            TokenKind::PipeEq => write!(f, "|="),
            TokenKind::CaretEq => write!(f, "^="),
            TokenKind::Arrow => write!(f, "->"),
            TokenKind::DotDot => write!(f, ".."),

            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Amp => write!(f, "&"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::Tilde => write!(f, "~"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),

            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),

            TokenKind::Semi => write!(f, ";"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Dot => write!(f, "."),

            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}
