use std::iter::FusedIterator;

use winnow::combinator::{alt, fail, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, none_of, one_of, take_until, take_while};

use crate::error::LexError;
use crate::scanner::position::Position;
use crate::scanner::token::{Span, Token, TokenKind, keyword_kind};

/// Outcome of matching one fragment at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fragment {
    /// Whitespace or a comment: consumed, no token.
    Skip,
    Lexeme(TokenKind),
}

fn whitespace(input: &mut &str) -> ModalResult<Fragment> {
    take_while(1.., |c: char| c.is_whitespace())
        .value(Fragment::Skip)
        .parse_next(input)
}

/// `(* ... *)`, closed by the nearest `*)`. Comments do not nest.
fn comment(input: &mut &str) -> ModalResult<Fragment> {
    ("(*", take_until(0.., "*)"), "*)")
        .value(Fragment::Skip)
        .parse_next(input)
}

/// A backslash escape (any character is accepted after `\`) or any
/// character other than the closing quote.
fn quoted_char<'i>(quote: char) -> impl Parser<&'i str, (), ErrMode<ContextError>> {
    alt((('\\', any).void(), none_of([quote, '\\']).void()))
}

fn string_literal(input: &mut &str) -> ModalResult<Fragment> {
    ('"', repeat(0.., quoted_char('"')).map(|()| ()), '"')
        .value(Fragment::Lexeme(TokenKind::StringLiteral))
        .parse_next(input)
}

fn char_literal(input: &mut &str) -> ModalResult<Fragment> {
    ('\'', quoted_char('\''), '\'')
        .value(Fragment::Lexeme(TokenKind::CharLiteral))
        .parse_next(input)
}

fn digits<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)
}

fn float_literal(input: &mut &str) -> ModalResult<Fragment> {
    (digits, '.', digits)
        .value(Fragment::Lexeme(TokenKind::FloatLiteral))
        .parse_next(input)
}

fn integer_literal(input: &mut &str) -> ModalResult<Fragment> {
    digits
        .value(Fragment::Lexeme(TokenKind::IntegerLiteral))
        .parse_next(input)
}

fn identifier_or_keyword(input: &mut &str) -> ModalResult<Fragment> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '\''
        }),
    )
        .take()
        .map(|ident: &str| Fragment::Lexeme(keyword_kind(ident).unwrap_or(TokenKind::Identifier)))
        .parse_next(input)
}

fn operator(input: &mut &str) -> ModalResult<Fragment> {
    alt((
        alt(("==", "->", ":=", "::", "<>", "&&", "||")).void(),
        one_of(['+', '-', '*', '/', '=', '<', '>']).void(),
    ))
    .value(Fragment::Lexeme(TokenKind::Operator))
    .parse_next(input)
}

fn delimiter(input: &mut &str) -> ModalResult<Fragment> {
    one_of(['(', ')', '[', ']', '{', '}', ';', '|', ','])
        .value(Fragment::Lexeme(TokenKind::Delimiter))
        .parse_next(input)
}

/// Categories in priority order. The first one that matches wins.
///
/// `comments` and `strings` switch off the comment and string categories
/// when their closing delimiter is already known to be missing.
fn fragment<'i>(
    comments: bool,
    strings: bool,
) -> impl Parser<&'i str, Fragment, ErrMode<ContextError>> {
    alt((
        whitespace,
        move |input: &mut &'i str| {
            if comments {
                comment(input)
            } else {
                fail(input)
            }
        },
        move |input: &mut &'i str| {
            if strings {
                string_literal(input)
            } else {
                fail(input)
            }
        },
        char_literal,
        float_literal,
        integer_literal,
        identifier_or_keyword,
        operator,
        delimiter,
    ))
}

/// Offsets from which a closing delimiter is known not to exist.
///
/// If no `*)` follows a comment opener at offset N, none follows any later
/// opener either. Likewise every `"` after an unclosed string opener lies
/// inside that string as an escaped character, so a string opened there
/// runs off the end the same way. Remembering the first failure keeps the
/// scan linear.
#[derive(Debug, Clone, Copy, Default)]
struct Unclosed {
    comment: Option<usize>,
    string: Option<usize>,
}

impl Unclosed {
    fn allows(from: Option<usize>, offset: usize) -> bool {
        from.is_none_or(|from| offset < from)
    }
}

/// Lazy token stream over a source string.
///
/// Each call to [`Iterator::next`] scans only as far as the next token. The
/// stream always ends with a single [`TokenKind::EndOfInput`] token positioned
/// just past the last consumed character. Cloning forks an independent cursor.
#[derive(Debug, Clone)]
pub struct Tokens<'src> {
    source: &'src str,
    cursor: Position,
    unclosed: Unclosed,
    finished: bool,
}

impl<'src> Tokens<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Position::new(),
            unclosed: Unclosed::default(),
            finished: false,
        }
    }

    /// Position of the next unconsumed character.
    pub fn position(&self) -> Position {
        self.cursor
    }

    /// Match one fragment at the cursor and step over it.
    ///
    /// Text that no category accepts (including an unterminated string,
    /// character literal or comment opener) falls back to a one-character
    /// `Error` fragment, so every call consumes at least one character. A
    /// failed search for a closing `*)` or `"` is remembered in `unclosed`.
    fn step(&mut self) -> (Fragment, &'src str, Position) {
        let offset = self.cursor.offset;
        let rest = &self.source[offset..];
        let comments = Unclosed::allows(self.unclosed.comment, offset);
        let strings = Unclosed::allows(self.unclosed.string, offset);

        let mut input = rest;
        let matched = match fragment(comments, strings).parse_next(&mut input) {
            Ok(matched) => matched,
            Err(_) => {
                let width = rest.chars().next().map_or(0, char::len_utf8);
                input = &rest[width..];
                Fragment::Lexeme(TokenKind::Error)
            }
        };

        if comments && rest.starts_with("(*") && matched != Fragment::Skip {
            self.unclosed.comment = Some(offset);
        }
        if strings
            && rest.starts_with('"')
            && matched != Fragment::Lexeme(TokenKind::StringLiteral)
        {
            self.unclosed.string = Some(offset);
        }

        let lexeme = &rest[..rest.len() - input.len()];
        let start = self.cursor;
        self.cursor.advance_over(lexeme);
        (matched, lexeme, start)
    }
}

fn token_at(kind: TokenKind, lexeme: &str, start: Position) -> Token<'_> {
    Token {
        kind,
        lexeme,
        line: start.line,
        column: start.column,
        span: Span::new(start.offset, lexeme.len()),
    }
}

impl<'src> Iterator for Tokens<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        if self.finished {
            return None;
        }

        while self.cursor.offset < self.source.len() {
            if let (Fragment::Lexeme(kind), lexeme, start) = self.step() {
                return Some(token_at(kind, lexeme, start));
            }
        }

        self.finished = true;
        let end = &self.source[self.source.len()..];
        Some(token_at(TokenKind::EndOfInput, end, self.cursor))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            // Every token consumes at least one byte, plus the sentinel.
            let remaining = self.source.len() - self.cursor.offset;
            (1, Some(remaining + 1))
        }
    }
}

impl FusedIterator for Tokens<'_> {}

/// Scan the whole source, returning the token list or one diagnostic per
/// unrecognized character.
pub fn scan_all(source: &str) -> Result<Vec<Token<'_>>, Vec<LexError>> {
    let tokens: Vec<Token<'_>> = Tokens::new(source).collect();
    let errors: Vec<LexError> = tokens
        .iter()
        .filter(|token| token.is_error())
        .map(|token| LexError::from_token(token).with_source_code("input", source))
        .collect();

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}
