//! Comment skipping: `//` to end of line, `/* ... */` non-nested.

use crate::cursor::Cursor;

pub fn skip_line(cursor: &mut Cursor<'_>) {
    while !cursor.is_at_end() && cursor.current() != '\n' {
        cursor.advance();
    }
}

/// Skip a block comment. An unterminated block comment simply runs to EOF —
/// the lexer has no separate diagnostic for it, unlike unterminated strings.
pub fn skip_block(cursor: &mut Cursor<'_>) {
    cursor.advance();
    cursor.advance();
    while !cursor.is_at_end() {
        if cursor.current() == '*' && cursor.peek(1) == '/' {
            cursor.advance();
            cursor.advance();
            return;
        }
        cursor.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comment_stops_before_newline() {
        let mut cursor = Cursor::new("// hi\nx");
        skip_line(&mut cursor);
        assert_eq!(cursor.current(), '\n');
    }

    #[test]
    fn block_comment_is_not_nested() {
        let mut cursor = Cursor::new("/* /* inner */ rest */");
        skip_block(&mut cursor);
        assert_eq!(cursor.current(), ' ');
    }
}
