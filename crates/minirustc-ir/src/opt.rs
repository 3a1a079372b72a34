//! Optional post-lowering passes: constant folding and dead-code
//! elimination. Both are deliberately conservative — they annotate or
//! prune, never rewrite operand text — so the textual contract in
//! render.rs stays the single source of truth for instruction shape.

use crate::module::Function;
use std::collections::HashSet;

/// For every `add`/`sub`/`mul` instruction whose first operand is a typed
/// integer literal (`"i32 3"`) and whose second operand is a bare integer
/// literal (`"4"`), attach a `"folded: N"` comment recording the constant
/// result. This never rewrites the instruction's operands — folding here is
/// pedagogy, not a rewrite pass a real optimizing backend would ship.
pub fn constant_fold(function: &mut Function) {
    for block in &mut function.blocks {
        for instr in &mut block.instructions {
            if !matches!(instr.opcode.as_str(), "add" | "sub" | "mul") {
                continue;
            }
            let [first, second] = instr.operands.as_slice() else {
                continue;
            };
            let Some((_ty, lhs)) = first.split_once(' ') else {
                continue;
            };
            let (Some(l), Some(r)) = (parse_i64(lhs), parse_i64(second)) else {
                continue;
            };
            let folded = match instr.opcode.as_str() {
                "add" => l.wrapping_add(r),
                "sub" => l.wrapping_sub(r),
                "mul" => l.wrapping_mul(r),
                _ => unreachable!(),
            };
            instr.comment = Some(format!("folded: {folded}"));
        }
    }
}

fn parse_i64(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Drop any instruction that defines a temporary (`result.is_some()`) never
/// referenced as an operand elsewhere in the function. Instructions with no
/// result (`store`, `call`, `br`, `ret`) are side-effecting and always kept.
pub fn eliminate_dead_code(function: &mut Function) {
    let mut used = HashSet::new();
    for block in &function.blocks {
        for instr in &block.instructions {
            for operand in &instr.operands {
                used.extend(referenced_temps(operand));
            }
        }
    }
    for block in &mut function.blocks {
        block
            .instructions
            .retain(|instr| match &instr.result {
                Some(result) => used.contains(result.as_str()),
                None => true,
            });
    }
}

/// Scan `text` for `%name`-shaped tokens (SSA temporaries and parameter
/// references alike — both are valid DCE "uses").
fn referenced_temps(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    for ch in text.chars() {
        if ch == '%' {
            if in_token {
                tokens.push(std::mem::take(&mut current));
            }
            in_token = true;
            current.push('%');
        } else if in_token && (ch.is_alphanumeric() || ch == '_') {
            current.push(ch);
        } else if in_token {
            tokens.push(std::mem::take(&mut current));
            in_token = false;
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}
