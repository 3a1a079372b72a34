//! Textual emission: the exact bytes the output format pins down for test
//! snapshots (preamble, string constants, `print` externs, one function
//! per definition, two-space indented instructions, colon-terminated
//! unindented labels).

use crate::module::Module;

/// Escape a string literal's content into the IR's `c"...\00"` form.
/// `\n -> \0A`, `\t -> \09`, everything else passes through verbatim
/// (source escapes were already resolved to real characters by the lexer).
fn escape_string_literal(literal: &str) -> String {
    let mut out = String::new();
    for ch in literal.chars() {
        match ch {
            '\n' => out.push_str("\\0A"),
            '\t' => out.push_str("\\09"),
            '"' => out.push_str("\\22"),
            '\\' => out.push_str("\\5C"),
            other => out.push(other),
        }
    }
    out
}

pub fn render_module(module: &Module) -> String {
    let mut out = String::from("; MiniRust Compiler - Generated LLVM IR\n");

    for (literal, id) in &module.strings {
        let array_len = literal.len() + 1;
        out.push_str(&format!(
            "@.str.{id} = private unnamed_addr constant [{array_len} x i8] c\"{}\\00\"\n",
            escape_string_literal(literal)
        ));
    }

    out.push_str("declare void @print(i32)\n");
    out.push_str("declare void @print(double)\n");
    out.push_str("declare void @print(i8*)\n");

    for function in &module.functions {
        out.push('\n');
        out.push_str(&function.render());
    }

    out
}
