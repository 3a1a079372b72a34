//! The `Lexer` and its per-concern scanning helpers.

mod comment;
mod identifier;
mod number;
mod operator;
mod string;

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use minirustc_util::diagnostic::{DiagnosticKind, Handler};

/// Scans one source file into a stream of [`Token`]s, reporting lexical
/// errors to a [`Handler`] rather than failing the whole pass.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    handler: &'a Handler,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
        }
    }

    /// Produce the next token, including `Eof` once the source is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let line = self.cursor.line();
        let column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Token::new(TokenKind::Eof, "", line, column);
        }

        let ch = self.cursor.current();

        if identifier::starts_identifier(ch) {
            return identifier::scan(&mut self.cursor, line, column);
        }
        if ch.is_ascii_digit() {
            return number::scan(&mut self.cursor, line, column);
        }
        if ch == '"' {
            return string::scan(&mut self.cursor, self.handler, line, column);
        }
        if let Some(token) = operator::scan(&mut self.cursor, line, column) {
            return token;
        }

        tracing::debug!(%ch, line, column, "skipping unexpected character");
        self.handler
            .build(
                DiagnosticKind::LexicalError,
                format!("Unexpected character: '{ch}'"),
            )
            .at(line, column)
            .emit(self.handler);
        self.cursor.advance();
        self.next_token()
    }

    /// Skip whitespace and comments until real token content or EOF.
    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.current() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.advance();
                }
                '/' if self.cursor.peek(1) == '/' => comment::skip_line(&mut self.cursor),
                '/' if self.cursor.peek(1) == '*' => comment::skip_block(&mut self.cursor),
                _ => break,
            }
        }
    }
}
