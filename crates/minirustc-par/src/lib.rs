//! Recursive-descent parser: token sequence in, `Program` (possibly
//! partial) and a diagnostic list out.

pub mod ast;
mod parser;

pub use ast::*;

use minirustc_lex::Token;
use minirustc_util::diagnostic::{Diagnostic, Handler};
use parser::Parser;

/// Parse `tokens` (as produced by `minirustc_lex::tokenize`) into a
/// `Program`. Parsing never panics on malformed input: a statement that
/// fails to parse is skipped via error recovery and its siblings are still
/// returned.
///
/// # Examples
///
/// ```
/// use minirustc_lex::tokenize;
/// use minirustc_par::parse;
///
/// let (tokens, _) = tokenize("fn main() { let x: i32 = 1; }");
/// let (program, diagnostics) = parse(&tokens);
/// assert!(diagnostics.is_empty());
/// assert_eq!(program.functions.len(), 1);
/// ```
pub fn parse(tokens: &[Token]) -> (Program, Vec<Diagnostic>) {
    tracing::debug!(token_count = tokens.len(), "parsing token stream");
    let handler = Handler::new();
    let mut parser = Parser::new(tokens, &handler);
    let program = parser.parse_program();
    let diagnostics = handler.diagnostics();
    tracing::trace!(
        function_count = program.functions.len(),
        diagnostic_count = diagnostics.len(),
        "parsing finished"
    );
    (program, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minirustc_lex::tokenize;

    fn parse_source(source: &str) -> (Program, Vec<Diagnostic>) {
        let (tokens, lex_diags) = tokenize(source);
        assert!(lex_diags.is_empty(), "unexpected lexical errors: {lex_diags:?}");
        parse(&tokens)
    }

    #[test]
    fn parses_a_function_with_a_variable_declaration() {
        let (program, diags) = parse_source("fn main() { let x: i32 = 1; }");
        assert!(diags.is_empty());
        assert_eq!(program.functions.len(), 1);
        let func = &program.functions[0];
        assert_eq!(func.name, "main");
        assert_eq!(func.body.statements.len(), 1);
    }

    #[test]
    fn parses_params_and_return_type() {
        let (program, diags) = parse_source("fn add(a: i32, b: i32) -> i32 { return a + b; }");
        assert!(diags.is_empty());
        let func = &program.functions[0];
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.return_type, Some(TypeName::I32));
    }

    #[test]
    fn assignment_is_right_associative_and_binary_ops_left_associative() {
        let (program, diags) =
            parse_source("fn main() { let mut x: i32 = 0; x = 1 - 2 - 3; }");
        assert!(diags.is_empty());
        let Stmt::Expr(Expr::Assignment { value, .. }) = &program.functions[0].body.statements[1] else {
            panic!("expected assignment statement");
        };
        let Expr::Binary { op, left, .. } = value.as_ref() else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Sub);
        assert!(matches!(left.as_ref(), Expr::Binary { op: BinaryOp::Sub, .. }));
    }

    #[test]
    fn if_and_while_are_statements_not_expressions() {
        let (program, diags) = parse_source(
            "fn main() { let mut x: i32 = 0; if x == 0 { x = 1; } while x == 1 { x = 2; } }",
        );
        assert!(diags.is_empty());
        assert_eq!(program.functions[0].body.statements.len(), 3);
    }

    #[test]
    fn unexpected_token_recovers_to_next_statement() {
        let (program, diags) = parse_source("fn main() { let x: i32 = ; let y: i32 = 2; }");
        assert!(!diags.is_empty());
        assert_eq!(program.functions.len(), 1);
        assert_eq!(program.functions[0].body.statements.len(), 1);
    }

    #[test]
    fn print_and_return_statements_parse() {
        let (program, diags) = parse_source("fn main() { print(1); return; }");
        assert!(diags.is_empty());
        assert!(matches!(program.functions[0].body.statements[0], Stmt::Print(_)));
        assert!(matches!(program.functions[0].body.statements[1], Stmt::Return(_)));
    }

    #[test]
    fn amp_mut_parses_as_a_single_unary_operator() {
        let (program, diags) = parse_source(
            "fn main() { let mut x: i32 = 1; let y = &mut x; }",
        );
        assert!(diags.is_empty());
        let Stmt::VariableDeclaration(decl) = &program.functions[0].body.statements[1] else {
            panic!("expected let");
        };
        let Some(Expr::Unary { op, .. }) = &decl.initializer else {
            panic!("expected unary expression");
        };
        assert_eq!(*op, UnaryOp::RefMut);
    }
}
