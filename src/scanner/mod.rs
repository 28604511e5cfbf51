pub mod lexer;
pub mod position;
pub mod token;

use crate::error::LexError;
pub use lexer::Tokens;
pub use position::Position;
pub use token::{KEYWORDS, Span, Token, TokenKind, keyword_kind};

/// Lazily tokenize source code. Calling this again restarts from scratch.
pub fn tokenize(source: &str) -> Tokens<'_> {
    Tokens::new(source)
}

/// Scan source code into a list of tokens, failing if any character was
/// not recognized.
pub fn scan(source: &str) -> Result<Vec<Token<'_>>, Vec<LexError>> {
    lexer::scan_all(source)
}
