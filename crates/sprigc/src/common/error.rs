//! Error types and diagnostic reporting

use super::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;

/// Compile error with source location
///
/// The three stage kinds are mutually exclusive within one run: the
/// pipeline stops at the first failure, so a run reports at most one of
/// them. `Io` covers file handling around the pipeline.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexical error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Syntax error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("Semantic error at {span:?}: {message}")]
    Semantic { message: String, span: Span },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn semantic(message: impl Into<String>, span: Span) -> Self {
        Self::Semantic {
            message: message.into(),
            span,
        }
    }

    /// Process exit status for this error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Lexer { .. } => 2,
            Self::Parser { .. } => 3,
            Self::Semantic { .. } => 4,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        let diagnostic = match error {
            CompileError::Lexer { message, span } => Diagnostic::error()
                .with_message("Lexical error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message),
                ]),

            CompileError::Parser { message, span } => Diagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message),
                ]),

            CompileError::Semantic { message, span } => Diagnostic::error()
                .with_message("Semantic error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message),
                ]),

            CompileError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {}", err))
            }
        };

        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
