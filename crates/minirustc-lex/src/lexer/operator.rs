//! Operator and punctuation scanning.
//!
//! Two-character operators are tried before their single-character
//! prefixes, and `&` followed by the keyword `mut` collapses into the
//! single `AmpMut` token rather than `Amp` + `Keyword`.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

pub fn scan(cursor: &mut Cursor<'_>, line: u32, column: u32) -> Option<Token> {
    let ch = cursor.current();

    macro_rules! two_char {
        ($second:expr, $kind:expr, $lexeme:expr) => {
            if cursor.peek(1) == $second {
                cursor.advance();
                cursor.advance();
                return Some(Token::new($kind, $lexeme, line, column));
            }
        };
    }

    match ch {
        '=' => {
            two_char!('=', TokenKind::Eq, "==");
            cursor.advance();
            Some(Token::new(TokenKind::Assign, "=", line, column))
        }
        '!' => {
            two_char!('=', TokenKind::Ne, "!=");
            cursor.advance();
            Some(Token::new(TokenKind::Not, "!", line, column))
        }
        '<' => {
            two_char!('=', TokenKind::Le, "<=");
            cursor.advance();
            Some(Token::new(TokenKind::Lt, "<", line, column))
        }
        '>' => {
            two_char!('=', TokenKind::Ge, ">=");
            cursor.advance();
            Some(Token::new(TokenKind::Gt, ">", line, column))
        }
        '&' => {
            if cursor.peek(1) == '&' {
                cursor.advance();
                cursor.advance();
                return Some(Token::new(TokenKind::And, "&&", line, column));
            }
            if starts_mut_keyword(cursor) {
                cursor.advance(); // '&'
                for _ in 0.."mut".len() {
                    cursor.advance();
                }
                return Some(Token::new(TokenKind::AmpMut, "&mut", line, column));
            }
            cursor.advance();
            Some(Token::new(TokenKind::Amp, "&", line, column))
        }
        '|' => {
            two_char!('|', TokenKind::Or, "||");
            // `|` alone is not in the closed token set; treat it like any
            // other unrecognized character so callers fall through to the
            // lexical-error path.
            None
        }
        '-' => {
            two_char!('>', TokenKind::Arrow, "->");
            cursor.advance();
            Some(Token::new(TokenKind::Minus, "-", line, column))
        }
        '+' => single(cursor, TokenKind::Plus, "+", line, column),
        '*' => single(cursor, TokenKind::Star, "*", line, column),
        '/' => single(cursor, TokenKind::Slash, "/", line, column),
        '%' => single(cursor, TokenKind::Percent, "%", line, column),
        '(' => single(cursor, TokenKind::LParen, "(", line, column),
        ')' => single(cursor, TokenKind::RParen, ")", line, column),
        '{' => single(cursor, TokenKind::LBrace, "{", line, column),
        '}' => single(cursor, TokenKind::RBrace, "}", line, column),
        '[' => single(cursor, TokenKind::LBracket, "[", line, column),
        ']' => single(cursor, TokenKind::RBracket, "]", line, column),
        ';' => single(cursor, TokenKind::Semi, ";", line, column),
        ':' => single(cursor, TokenKind::Colon, ":", line, column),
        ',' => single(cursor, TokenKind::Comma, ",", line, column),
        _ => None,
    }
}

fn single(cursor: &mut Cursor<'_>, kind: TokenKind, lexeme: &str, line: u32, column: u32) -> Option<Token> {
    cursor.advance();
    Some(Token::new(kind, lexeme, line, column))
}

/// Whether `&` at the cursor is immediately followed by the keyword `mut`
/// (not merely the identifier prefix `mut...`).
fn starts_mut_keyword(cursor: &Cursor<'_>) -> bool {
    let rest: String = (1..=3).map(|i| cursor.peek(i)).collect();
    if rest != "mut" {
        return false;
    }
    !cursor.peek(4).is_ascii_alphanumeric() && cursor.peek(4) != '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_one(source: &str) -> Token {
        let mut cursor = Cursor::new(source);
        scan(&mut cursor, 1, 1).expect("operator token")
    }

    #[test]
    fn two_char_operators_take_priority() {
        assert_eq!(scan_one("==").kind, TokenKind::Eq);
        assert_eq!(scan_one("!=").kind, TokenKind::Ne);
        assert_eq!(scan_one("<=").kind, TokenKind::Le);
        assert_eq!(scan_one(">=").kind, TokenKind::Ge);
        assert_eq!(scan_one("&&").kind, TokenKind::And);
        assert_eq!(scan_one("||").kind, TokenKind::Or);
        assert_eq!(scan_one("->").kind, TokenKind::Arrow);
    }

    #[test]
    fn single_char_prefixes_fall_back() {
        assert_eq!(scan_one("=x").kind, TokenKind::Assign);
        assert_eq!(scan_one("<x").kind, TokenKind::Lt);
        assert_eq!(scan_one("-x").kind, TokenKind::Minus);
    }

    #[test]
    fn amp_mut_is_a_single_token() {
        let token = scan_one("&mut x");
        assert_eq!(token.kind, TokenKind::AmpMut);
        assert_eq!(token.lexeme, "&mut");
    }

    #[test]
    fn amp_followed_by_mut_prefixed_ident_stays_plain_amp() {
        let token = scan_one("&mutable");
        assert_eq!(token.kind, TokenKind::Amp);
    }

    #[test]
    fn bare_amp_is_its_own_token() {
        assert_eq!(scan_one("&x").kind, TokenKind::Amp);
    }
}
