//! Lexical analysis: source text to tokens

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Operator, OperatorKind, Token, TokenKind};
