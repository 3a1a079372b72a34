//! Black-box pipeline tests exercising `compile` end to end, one per
//! documented scenario, plus the cross-stage invariants that only show up
//! once every stage has run.

use minirustc_drv::{compile, CompileOptions};

fn run(source: &str, check_ownership: bool, optimize: bool) -> minirustc_drv::CompileResult {
    compile(source, CompileOptions { check_ownership, optimize })
}

#[test]
fn scenario_constant_folding_and_print() {
    let result = run(
        "fn main() { let x: i32 = 2 + 3 * 4; print(x); }",
        false,
        true,
    );
    assert!(result.success, "{:?}", result.diagnostics);
    let ir = &result.ir.unwrap().ir;
    assert!(ir.contains("mul i32 3, 4"));
    assert!(ir.contains("add i32 2,"));
    assert!(ir.contains("alloca i32"));
    assert!(ir.contains("folded: 12"));
    assert!(ir.contains("call void @print(i32"));
    assert!(ir.contains("ret void"));
}

#[test]
fn scenario_assign_to_immutable_variable() {
    let result = run("fn main() { let x: i32 = 1; x = 2; }", false, false);
    assert!(!result.success);
    let fatal: Vec<_> = result.diagnostics.iter().filter(|d| d.is_fatal()).collect();
    assert_eq!(fatal.len(), 1);
    assert_eq!(fatal[0].message, "Cannot assign to immutable variable 'x'");
}

#[test]
fn scenario_double_borrow() {
    let result = run(
        "fn main() { let mut x: i32 = 1; let y = &x; let z = &mut x; }",
        true,
        false,
    );
    assert!(!result.success);
    let fatal: Vec<_> = result.diagnostics.iter().filter(|d| d.is_fatal()).collect();
    assert_eq!(fatal.len(), 1);
    assert_eq!(
        fatal[0].message,
        "Cannot create mutable borrow: 'x' is already borrowed"
    );
}

#[test]
fn scenario_if_condition_must_be_bool() {
    let result = run("fn main() { let mut x: i32 = 0; if x { } }", false, false);
    assert!(!result.success);
    let fatal: Vec<_> = result.diagnostics.iter().filter(|d| d.is_fatal()).collect();
    assert_eq!(fatal.len(), 1);
    assert_eq!(
        fatal[0].message,
        "If condition must be of type bool, found 'i32'"
    );
}

#[test]
fn scenario_let_type_mismatch() {
    let result = run("fn main() { let x: i32 = 1.0; }", false, false);
    assert!(!result.success);
    let fatal: Vec<_> = result.diagnostics.iter().filter(|d| d.is_fatal()).collect();
    assert_eq!(fatal.len(), 1);
    assert_eq!(
        fatal[0].message,
        "Type mismatch: expected 'i32', found 'f64'"
    );
}

#[test]
fn scenario_unused_variable_warning_does_not_block_ir() {
    let result = run("fn main() { let x: i32 = 1; }", false, false);
    assert!(result.success);
    assert!(result.ir.is_some());
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.message == "Variable 'x' is declared but never used"));
}

#[test]
fn every_token_has_a_one_based_position() {
    let result = run("fn main() {\n  let x: i32 = 1;\n}", false, false);
    for token in &result.tokens {
        assert!(token.line >= 1);
        assert!(token.column >= 1);
    }
}

#[test]
fn recompiling_the_same_source_yields_byte_identical_ir() {
    let source = "fn main() { let mut x: i32 = 0; while x < 3 { x = x + 1; } print(x); }";
    let options = CompileOptions { check_ownership: true, optimize: true };
    let a = compile(source, options);
    let b = compile(source, options);
    assert_eq!(a.ir.unwrap().ir, b.ir.unwrap().ir);
}

#[test]
fn unoptimized_build_never_drops_an_instruction() {
    let source = "fn main() { let x: i32 = 1 + 2; let y: i32 = 99; print(x); }";
    let unopt = run(source, false, false);
    let ir = unopt.ir.unwrap().ir;
    // every alloca/store pair for both bindings survives without optimization
    assert_eq!(ir.matches("alloca i32").count(), 2);
}

#[test]
fn optimized_build_drops_dead_temporaries_but_keeps_side_effects() {
    let source = "fn main() { let x: i32 = 1 + 2; let y: i32 = 99; print(x); }";
    let opt = run(source, false, true);
    let ir = opt.ir.unwrap().ir;
    // both bindings are named allocas (side effects), neither is pruned
    assert_eq!(ir.matches("alloca i32").count(), 2);
    assert!(ir.contains("ret void"));
}
