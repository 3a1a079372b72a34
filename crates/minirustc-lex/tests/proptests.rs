use minirustc_lex::{tokenize, TokenKind};
use proptest::prelude::*;

proptest! {
    #[test]
    fn integer_literals_round_trip_their_digits(digits in "[0-9]{1,9}") {
        let (tokens, diags) = tokenize(&digits);
        prop_assert!(diags.is_empty());
        prop_assert_eq!(tokens[0].kind, TokenKind::Integer);
        prop_assert_eq!(&tokens[0].lexeme, &digits);
    }

    #[test]
    fn plain_identifiers_never_misclassify_as_keywords(name in "[a-z][a-z0-9_]{0,8}") {
        let reserved = [
            "fn", "let", "mut", "if", "else", "while", "for", "loop", "break",
            "continue", "return", "true", "false", "print", "i32", "f64", "bool", "str",
        ];
        prop_assume!(!reserved.contains(&name.as_str()));
        let (tokens, diags) = tokenize(&name);
        prop_assert!(diags.is_empty());
        prop_assert_eq!(tokens[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn tokenizing_never_panics_on_arbitrary_bytes(source in ".{0,64}") {
        let _ = tokenize(&source);
    }
}
