use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::scanner::Token;

// ============= Lexical errors (with miette diagnostics) =============

#[derive(Error, Debug, Diagnostic)]
pub enum LexError {
    #[error("unexpected character '{character}' at {line}:{column}")]
    #[diagnostic(
        code(camlex::lex::unexpected_character),
        help("this character does not start any OCaml token")
    )]
    UnexpectedCharacter {
        character: String,
        line: usize,
        column: usize,
        #[label("here")]
        span: SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },
}

impl LexError {
    /// Build a diagnostic from an `Error` token.
    pub fn from_token(token: &Token<'_>) -> Self {
        Self::UnexpectedCharacter {
            character: token.lexeme.to_string(),
            line: token.line,
            column: token.column,
            span: token.span.into(),
            src: miette::NamedSource::new("input", String::new()),
        }
    }

    /// Attach source code for fancy miette diagnostics
    pub fn with_source_code(self, name: impl Into<String>, source: impl Into<String>) -> Self {
        match self {
            Self::UnexpectedCharacter {
                character,
                line,
                column,
                span,
                ..
            } => Self::UnexpectedCharacter {
                character,
                line,
                column,
                span,
                src: miette::NamedSource::new(name.into(), source.into()),
            },
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            Self::UnexpectedCharacter { span, .. } => *span,
        }
    }
}

// ============= Shell errors (simple, no miette) =============

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("failed to read input: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode tokens as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============= Tests =============
