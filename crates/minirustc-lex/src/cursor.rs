//! Character cursor for traversing source code.
//!
//! Tracks byte position plus 1-based line/column so every token can record
//! where it started.

pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Current character, or `'\0'` past the end of the source.
    pub fn current(&self) -> char {
        self.peek(0)
    }

    /// Look ahead `n` characters without consuming anything.
    pub fn peek(&self, n: usize) -> char {
        self.source[self.position..].chars().nth(n).unwrap_or('\0')
    }

    /// Consume and return the current character, advancing line/column.
    pub fn advance(&mut self) -> char {
        let ch = self.current();
        if ch == '\0' {
            return ch;
        }
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    /// Consume the current character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.current() == expected {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_through_ascii() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.advance(), 'a');
        assert_eq!(cursor.advance(), 'b');
        assert_eq!(cursor.advance(), '\0');
    }

    #[test]
    fn newline_resets_column_and_bumps_line() {
        let mut cursor = Cursor::new("a\nb");
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (1, 2));
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
    }

    #[test]
    fn peek_does_not_consume() {
        let cursor = Cursor::new("xyz");
        assert_eq!(cursor.peek(0), 'x');
        assert_eq!(cursor.peek(1), 'y');
        assert_eq!(cursor.current(), 'x');
    }
}
