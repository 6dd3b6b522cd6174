//! Sprig compiler
//!
//! Sprig is a small statically-typed scripting language that compiles to
//! plain JavaScript. The compiler runs as a single synchronous pipeline:
//!
//! - **Lexer** (`lexer/`): source text to tokens, via logos
//! - **Parser** (`parser/`): tokens to a typed AST
//! - **Semantic analysis** (`sema/`): symbol resolution, type checking,
//!   arity checking, return placement
//! - **Codegen** (`codegen/`): verified AST to JavaScript text
//! - **Common** (`common/`): shared infrastructure (errors, spans)
//!
//! The pipeline is fail-fast: the first error at any stage aborts the
//! whole compilation with a single diagnostic.

pub mod ast;
pub mod codegen;
pub mod common;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod sema;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, Span};
