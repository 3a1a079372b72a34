//! String literal scanning with the closed escape set `\n \t \r \\ \"`.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use minirustc_util::diagnostic::{DiagnosticKind, Handler};

pub fn scan(cursor: &mut Cursor<'_>, handler: &Handler, line: u32, column: u32) -> Token {
    cursor.advance(); // opening quote

    let mut value = String::new();
    loop {
        match cursor.current() {
            '"' => {
                cursor.advance();
                return Token::new(TokenKind::String, value, line, column);
            }
            '\0' => {
                handler
                    .build(DiagnosticKind::LexicalError, "Unterminated string literal")
                    .at(line, column)
                    .emit(handler);
                return Token::new(TokenKind::String, value, line, column);
            }
            '\\' => {
                cursor.advance();
                let escaped = cursor.advance();
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '"' => '"',
                    other => other,
                });
            }
            ch => {
                value.push(ch);
                cursor.advance();
            }
        }
    }
}
