//! The compiler driver: the single entry point that strings the four
//! pipeline stages together behind the external operations embedders call
//! (`tokenize`, `parse`, `analyze`, `generateIr`, `compile`).
//!
//! One `Session`-like call that runs phases in order and aggregates
//! diagnostics, cut down to the four stages this language has. There is
//! no file I/O, no CLI, no target triple, no codegen/linking: embedders
//! pass in a source string and get back `{tokens, ast, symbolTable,
//! ownershipInfo, ir, diagnostics}`, nothing more.

use minirustc_ir::IrResult;
use minirustc_lex::Token;
use minirustc_par::Program;
use minirustc_sem::AnalysisResult;
use minirustc_util::diagnostic::Diagnostic;

/// Flags accepted by [`compile`]: whether to run the borrow-count ownership
/// pass, and whether the IR generator should fold constants / eliminate
/// dead code.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompileOptions {
    pub check_ownership: bool,
    pub optimize: bool,
}

/// The aggregate product of a full `compile` call: every stage's output,
/// plus the diagnostics accumulated up to (and including) the stage that
/// stopped the pipeline, if any.
///
/// Earlier stage products are always populated even when a later stage
/// never ran: the driver halts at the first stage whose diagnostics
/// include a non-warning entry, but still returns all products produced
/// so far.
#[derive(Debug, Default)]
pub struct CompileResult {
    pub tokens: Vec<Token>,
    pub ast: Option<Program>,
    pub analysis: Option<AnalysisResult>,
    pub ir: Option<IrResult>,
    pub diagnostics: Vec<Diagnostic>,
    pub success: bool,
}

/// Tokenize `source`. A thin re-export of [`minirustc_lex::tokenize`] kept
/// here so embedders can reach every pipeline operation through one crate.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    minirustc_lex::tokenize(source)
}

/// Parse a token sequence into a `Program`, matching `parse(tokens)`.
pub fn parse(tokens: &[Token]) -> (Program, Vec<Diagnostic>) {
    minirustc_par::parse(tokens)
}

/// Run semantic analysis, matching `analyze(ast, checkOwnership)`.
pub fn analyze(ast: &Program, check_ownership: bool) -> AnalysisResult {
    minirustc_sem::analyze(ast, check_ownership)
}

/// Lower to textual IR, matching `generateIr(ast, optimize)`.
pub fn generate_ir(ast: &Program, optimize: bool) -> IrResult {
    minirustc_ir::generate_ir(ast, optimize)
}

/// Run the full pipeline over `source`, short-circuiting at the first stage
/// that produces a fatal diagnostic.
///
/// Every compile call is independent: each stage constructs fresh
/// per-call state (counters, scopes, environments), so concurrent callers
/// may invoke `compile` from different threads as long as each call owns
/// its own `source`.
///
/// # Examples
///
/// ```
/// use minirustc_drv::{compile, CompileOptions};
///
/// let result = compile(
///     "fn main() { let x: i32 = 2 + 3 * 4; print(x); }",
///     CompileOptions { check_ownership: true, optimize: true },
/// );
/// assert!(result.success);
/// assert!(result.ir.unwrap().ir.contains("mul i32 3, 4"));
/// ```
pub fn compile(source: &str, options: CompileOptions) -> CompileResult {
    tracing::debug!(
        check_ownership = options.check_ownership,
        optimize = options.optimize,
        "compiling source"
    );

    let mut result = CompileResult::default();

    let (tokens, lex_errors) = tokenize(source);
    let lex_fatal = lex_errors.iter().any(Diagnostic::is_fatal);
    result.tokens = tokens;
    result.diagnostics.extend(lex_errors);
    if lex_fatal {
        result.success = false;
        return result;
    }

    let (ast, parse_errors) = parse(&result.tokens);
    let parse_fatal = parse_errors.iter().any(Diagnostic::is_fatal);
    result.diagnostics.extend(parse_errors);
    result.ast = Some(ast);
    if parse_fatal {
        result.success = false;
        return result;
    }

    let ast_ref = result.ast.as_ref().expect("ast set above");

    let analysis = analyze(ast_ref, options.check_ownership);
    let semantic_fatal = !analysis.success;
    result
        .diagnostics
        .extend(analysis.errors.iter().cloned());
    result
        .diagnostics
        .extend(analysis.warnings.iter().cloned());
    result.analysis = Some(analysis);
    if semantic_fatal {
        result.success = false;
        return result;
    }

    let ir = generate_ir(ast_ref, options.optimize);
    let ir_fatal = !ir.success;
    result.diagnostics.extend(ir.errors.iter().cloned());
    result.ir = Some(ir);
    result.success = !ir_fatal;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_pipeline_runs_every_stage_with_no_errors() {
        let result = compile(
            "fn main() { let x: i32 = 2 + 3 * 4; print(x); }",
            CompileOptions { check_ownership: true, optimize: true },
        );
        assert!(result.success);
        assert!(!result.tokens.is_empty());
        assert!(result.ast.is_some());
        assert!(result.analysis.as_ref().unwrap().success);
        assert!(result.ir.as_ref().unwrap().success);
        assert!(result.ir.unwrap().ir.contains("mul i32 3, 4"));
    }

    #[test]
    fn lexical_error_short_circuits_before_parsing() {
        let result = compile("fn main() { let x = 1 @ 2; }", CompileOptions::default());
        assert!(!result.success);
        assert!(result.ast.is_none());
        assert!(result.analysis.is_none());
        assert!(result.ir.is_none());
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.message.contains("Unexpected character")));
    }

    #[test]
    fn parse_error_short_circuits_before_semantic_analysis() {
        let result = compile("fn main() { let x: i32 = ; }", CompileOptions::default());
        assert!(!result.success);
        assert!(result.ast.is_some());
        assert!(result.analysis.is_none());
        assert!(result.ir.is_none());
    }

    #[test]
    fn semantic_error_short_circuits_before_ir_generation() {
        let result = compile(
            "fn main() { let x: i32 = 1; x = 2; }",
            CompileOptions::default(),
        );
        assert!(!result.success);
        assert!(result.analysis.is_some());
        assert!(result.ir.is_none());
        assert_eq!(
            result.diagnostics[result.diagnostics.len() - 1].message,
            "Cannot assign to immutable variable 'x'"
        );
    }

    #[test]
    fn warnings_alone_do_not_halt_the_pipeline() {
        let result = compile("fn main() { let x: i32 = 1; }", CompileOptions::default());
        assert!(result.success);
        assert!(result.ir.is_some());
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.message.contains("declared but never used")));
    }

    #[test]
    fn repeated_compiles_are_independent_and_deterministic() {
        let source = "fn main() { let x: i32 = 2 + 3 * 4; print(x); }";
        let options = CompileOptions { check_ownership: true, optimize: true };
        let a = compile(source, options);
        let b = compile(source, options);
        assert_eq!(a.ir.unwrap().ir, b.ir.unwrap().ir);
    }

    #[test]
    fn ownership_error_short_circuits_ir_generation() {
        let result = compile(
            "fn main() { let mut x: i32 = 1; let y = &x; let z = &mut x; }",
            CompileOptions { check_ownership: true, optimize: false },
        );
        assert!(!result.success);
        assert!(result.ir.is_none());
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.message.contains("is already borrowed")));
    }
}
