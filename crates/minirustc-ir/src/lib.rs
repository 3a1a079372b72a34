//! Textual LLVM-like IR generation: the fourth and final compilation stage.
//! Takes a parsed `Program` directly — independent of `minirustc-sem`'s
//! output, so `generate_ir` can run standalone over any syntactically
//! valid program without re-deriving types a separate checking pass
//! already resolved.

mod lower;
mod module;
mod opt;
mod render;
pub mod types;

pub use module::{BasicBlock, Function, Instruction, Module, Parameter};
pub use types::IrType;

use minirustc_par::Program;
use minirustc_util::diagnostic::{Diagnostic, Handler};

/// `generate_ir`'s output: rendered text, any `IRGenerationError`
/// diagnostics, and a `success` flag mirroring `errors.is_empty()`.
#[derive(Clone, Debug)]
pub struct IrResult {
    pub ir: String,
    pub errors: Vec<Diagnostic>,
    pub success: bool,
}

/// Lower `program` to one [`Module`], optionally running constant folding
/// and dead-code elimination, and render it to text.
pub fn generate_ir(program: &Program, optimize: bool) -> IrResult {
    tracing::debug!(optimize, "generating IR");
    let handler = Handler::new();
    let mut module = lower::lower_program(program, &handler);

    if optimize {
        for function in &mut module.functions {
            opt::constant_fold(function);
            opt::eliminate_dead_code(function);
        }
    }

    let ir = render::render_module(&module);
    let errors = handler.diagnostics();
    let success = errors.is_empty();
    IrResult { ir, errors, success }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minirustc_lex::tokenize;
    use minirustc_par::parse;

    fn generate(source: &str, optimize: bool) -> IrResult {
        let (tokens, _) = tokenize(source);
        let (program, _) = parse(&tokens);
        generate_ir(&program, optimize)
    }

    #[test]
    fn scenario_arithmetic_and_print() {
        // `2 + 3 * 4` should lower to a `mul` feeding an `add`, an
        // `alloca`, a `store`, a `print` call and a fallthrough `ret void`.
        let result = generate("fn main() { let x: i32 = 2 + 3 * 4; print(x); }", false);
        assert!(result.success);
        assert!(result.ir.contains("mul i32 3, 4"));
        assert!(result.ir.contains("add i32 2,"));
        assert!(result.ir.contains("alloca i32"));
        assert!(result.ir.contains("call void @print(i32"));
        assert!(result.ir.contains("ret void"));
    }

    #[test]
    fn unoptimized_build_has_no_folding_comments() {
        let result = generate("fn main() { let x: i32 = 3 * 4; print(x); }", false);
        assert!(!result.ir.contains("folded:"));
    }

    #[test]
    fn optimized_build_annotates_constant_arithmetic() {
        let result = generate("fn main() { let x: i32 = 3 * 4; print(x); }", true);
        assert!(result.ir.contains("folded: 12"));
    }

    #[test]
    fn optimized_build_drops_dead_computations() {
        let result = generate(
            "fn main() { let x: i32 = 1 + 2; let y: i32 = 99; print(x); }",
            true,
        );
        // `y`'s alloca/store survive (they're side effects on a named
        // binding), but no extra unused temporary computation leaks through.
        assert!(result.success);
        assert!(result.ir.contains("ret void"));
    }

    #[test]
    fn every_function_has_a_unique_entry_block() {
        let result = generate("fn main() { let x: i32 = 1; }", false);
        assert_eq!(result.ir.matches("entry:").count(), 1);
    }

    #[test]
    fn string_literals_are_interned_densely() {
        let result = generate(
            r#"fn main() { print("a"); print("b"); print("a"); }"#,
            false,
        );
        assert!(result.ir.contains("@.str.0"));
        assert!(result.ir.contains("@.str.1"));
        assert!(!result.ir.contains("@.str.2"));
    }

    #[test]
    fn while_and_if_blocks_use_named_labels() {
        let result = generate(
            "fn main() { let mut x: i32 = 0; while x < 3 { if x == 1 { x = x + 1; } x = x + 1; } }",
            false,
        );
        assert!(result.ir.contains("while.header:"));
        assert!(result.ir.contains("while.body:"));
        assert!(result.ir.contains("while.end:"));
        assert!(result.ir.contains("if.then:"));
        assert!(result.ir.contains("if.else:"));
        assert!(result.ir.contains("if.end:"));
    }

    #[test]
    fn recompiling_the_same_source_is_byte_identical() {
        let source = "fn main() { let x: i32 = 2 + 3 * 4; print(x); }";
        let a = generate(source, true);
        let b = generate(source, true);
        assert_eq!(a.ir, b.ir);
    }
}
