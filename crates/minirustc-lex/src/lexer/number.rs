//! Numeric literal scanning: digit runs, optionally `.` plus more digits.
//!
//! No exponents, no underscores, no sign — a leading `-` is unary minus
//! handled by the parser, not part of the literal.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

pub fn scan(cursor: &mut Cursor<'_>, line: u32, column: u32) -> Token {
    let mut lexeme = String::new();
    while cursor.current().is_ascii_digit() {
        lexeme.push(cursor.advance());
    }

    if cursor.current() == '.' && cursor.peek(1).is_ascii_digit() {
        lexeme.push(cursor.advance());
        while cursor.current().is_ascii_digit() {
            lexeme.push(cursor.advance());
        }
        return Token::new(TokenKind::Float, lexeme, line, column);
    }

    Token::new(TokenKind::Integer, lexeme, line, column)
}
