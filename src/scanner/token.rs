use std::fmt;

use serde::Serialize;

/// Lexical category of a token. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum TokenKind {
    Keyword,
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    Operator,
    Delimiter,
    Error,
    EndOfInput,
}

/// Reserved words, matched case-sensitively against identifier-shaped lexemes.
pub const KEYWORDS: [&str; 12] = [
    "let", "in", "match", "with", "fun", "type", "if", "then", "else", "rec", "module", "open",
];

/// Classify an identifier-shaped lexeme.
pub fn keyword_kind(ident: &str) -> Option<TokenKind> {
    KEYWORDS
        .contains(&ident)
        .then_some(TokenKind::Keyword)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::new(span.offset.into(), span.len)
    }
}

/// A classified fragment of source text.
///
/// `line` and `column` are 1-based and point at the first character of the
/// lexeme in the original source. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl Token<'_> {
    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} → '{}'",
            self.line, self.column, self.kind, self.lexeme
        )
    }
}
