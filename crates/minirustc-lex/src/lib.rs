//! Lexical analysis: turns source text into an ordered token stream.
//!
//! The lexer never throws to the caller — lexical errors are recorded on a
//! [`minirustc_util::diagnostic::Handler`] and the offending character is
//! skipped, so a single bad byte never stops the rest of the file from being
//! tokenized.

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

use minirustc_util::diagnostic::{Diagnostic, Handler};

/// Tokenize `source` end to end, returning every token (including the
/// trailing `Eof`) plus whatever diagnostics the lexer produced.
///
/// # Examples
///
/// ```
/// use minirustc_lex::{tokenize, TokenKind};
///
/// let (tokens, diagnostics) = tokenize("let x = 1;");
/// assert!(diagnostics.is_empty());
/// assert_eq!(tokens.first().unwrap().kind, TokenKind::Keyword);
/// assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
/// ```
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    tracing::debug!(bytes = source.len(), "tokenizing source");
    let handler = Handler::new();
    let mut lexer = Lexer::new(source, &handler);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let is_eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    let diagnostics = handler.diagnostics();
    tracing::trace!(
        token_count = tokens.len(),
        diagnostic_count = diagnostics.len(),
        "tokenizing finished"
    );
    (tokens, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_empty_source_to_just_eof() {
        let (tokens, diags) = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert!(diags.is_empty());
    }

    #[test]
    fn reports_and_recovers_from_unknown_characters() {
        let (tokens, diags) = tokenize("let x = 1 @ 2;");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("Unexpected character"));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Integer));
    }
}
