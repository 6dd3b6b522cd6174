//! Syntax analysis

mod parser;

pub use parser::Parser;
