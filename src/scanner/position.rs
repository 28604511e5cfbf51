/// Cursor into the source: byte offset of the next unconsumed character and
/// the 1-based line/column it sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn advance(&mut self, c: char) {
        self.offset += c.len_utf8();

        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Step over every character of `consumed`, which must start at `offset`.
    pub fn advance_over(&mut self, consumed: &str) {
        consumed.chars().for_each(|c| self.advance(c));
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}
