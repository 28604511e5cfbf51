//! Human and machine readable renderings of a token stream.

use std::io::{self, Write};

use miette::{GraphicalReportHandler, GraphicalTheme, ThemeStyles};

use crate::error::{LexError, ShellError};
use crate::scanner::Token;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    styles: ThemeStyles,
    limit: Option<usize>,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            styles: ThemeStyles::ansi(),
            limit: None,
        }
    }

    /// Render at most `limit` tokens. The stream is not pulled past that.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    fn limited<'src>(
        &self,
        tokens: impl IntoIterator<Item = Token<'src>>,
    ) -> impl Iterator<Item = Token<'src>> {
        tokens.into_iter().take(self.limit.unwrap_or(usize::MAX))
    }

    /// One `line:column Kind → 'lexeme'` line per token. `Error` tokens are
    /// highlighted. Returns the number of tokens written.
    pub fn write_listing<'src, W: Write>(
        &self,
        out: &mut W,
        tokens: impl IntoIterator<Item = Token<'src>>,
    ) -> io::Result<usize> {
        let mut written = 0;
        for token in self.limited(tokens) {
            if self.color && token.is_error() {
                writeln!(out, "{}", self.styles.error.style(token))?;
            } else {
                writeln!(out, "{token}")?;
            }
            written += 1;
        }
        Ok(written)
    }

    /// Pretty-printed JSON array of tokens. Returns the number of tokens written.
    pub fn write_json<'src, W: Write>(
        &self,
        out: &mut W,
        tokens: impl IntoIterator<Item = Token<'src>>,
    ) -> Result<usize, ShellError> {
        let tokens: Vec<Token<'src>> = self.limited(tokens).collect();
        serde_json::to_writer_pretty(&mut *out, &tokens)?;
        writeln!(out)?;
        Ok(tokens.len())
    }

    /// A miette report for every `Error` token, with the offending source
    /// line. Returns the number of diagnostics written.
    pub fn write_diagnostics<'src, W: Write>(
        &self,
        out: &mut W,
        name: &str,
        source: &str,
        tokens: impl IntoIterator<Item = Token<'src>>,
    ) -> io::Result<usize> {
        let mut written = 0;
        for token in self.limited(tokens).filter(Token::is_error) {
            let report = LexError::from_token(&token).with_source_code(name, source);
            write!(out, "{}", self.render_diagnostic(&report))?;
            written += 1;
        }
        Ok(written)
    }

    pub fn render_diagnostic(&self, err: &LexError) -> String {
        let theme = if self.color {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        let mut rendered = String::new();
        if GraphicalReportHandler::new_themed(theme)
            .render_report(&mut rendered, err)
            .is_err()
        {
            // Fall back to the one-line message.
            rendered = format!("{err}\n");
        }
        rendered
    }
}
