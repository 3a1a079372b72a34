//! IR entities: `Instruction`, `BasicBlock`, `Function`, `Module`.
//! Opcode/operands/result are plain strings, not a typed instruction set —
//! a deliberate divergence from a fuller MIR/LIR representation, made
//! because the textual-snapshot output contract needs direct control over
//! formatting that a typed instruction set would need an extra printing
//! pass to produce.

use crate::types::IrType;
use indexmap::IndexMap;

/// A single IR instruction: `{opcode, optional result name, operands,
/// optional type tag, optional comment}`.
#[derive(Clone, Debug)]
pub struct Instruction {
    pub opcode: String,
    pub result: Option<String>,
    pub operands: Vec<String>,
    pub ty: Option<String>,
    pub comment: Option<String>,
}

impl Instruction {
    pub fn new(opcode: impl Into<String>) -> Self {
        Self {
            opcode: opcode.into(),
            result: None,
            operands: Vec::new(),
            ty: None,
            comment: None,
        }
    }

    pub fn result(mut self, name: impl Into<String>) -> Self {
        self.result = Some(name.into());
        self
    }

    pub fn operand(mut self, operand: impl Into<String>) -> Self {
        self.operands.push(operand.into());
        self
    }

    pub fn ty(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Whether this instruction ends a basic block.
    pub fn is_terminator(&self) -> bool {
        matches!(self.opcode.as_str(), "br" | "br_cond" | "ret")
    }

    /// Renders this instruction's line. `operands` are already fully
    /// formatted (type tags and punctuation included where the textual
    /// form needs them, e.g. `"i32* %t0"`); `ty` is descriptive metadata
    /// for later passes (constant folding, DCE) rather than something the
    /// renderer re-derives text from.
    pub fn render(&self) -> String {
        let mut line = String::from("  ");
        if let Some(result) = &self.result {
            line.push_str(result);
            line.push_str(" = ");
        }
        line.push_str(&self.opcode);
        if !self.operands.is_empty() {
            line.push(' ');
            line.push_str(&self.operands.join(", "));
        }
        if let Some(comment) = &self.comment {
            line.push_str(" ; ");
            line.push_str(comment);
        }
        line
    }
}

/// A straight-line instruction sequence with one entry and one terminator.
/// `terminated` flips true on the first `br`/`br_cond`/`ret`; any later
/// append is silently dropped.
#[derive(Clone, Debug, Default)]
pub struct BasicBlock {
    pub name: String,
    pub instructions: Vec<Instruction>,
    pub terminated: bool,
}

impl BasicBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: Vec::new(),
            terminated: false,
        }
    }

    pub fn push(&mut self, instruction: Instruction) {
        if self.terminated {
            return;
        }
        self.terminated = instruction.is_terminator();
        self.instructions.push(instruction);
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}:\n", self.name);
        for instr in &self.instructions {
            out.push_str(&instr.render());
            out.push('\n');
        }
        out
    }
}

#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: String,
    pub ty: IrType,
}

/// One function per source function: `{name, return type, parameters,
/// ordered basic blocks, current block, fresh-block counter, fresh-temp
/// counter}`.
#[derive(Clone, Debug)]
pub struct Function {
    pub name: String,
    pub return_type: IrType,
    pub parameters: Vec<Parameter>,
    pub blocks: Vec<BasicBlock>,
    pub current_block: usize,
    temp_counter: u32,
    block_counter: u32,
    if_counter: u32,
    while_counter: u32,
}

impl Function {
    pub fn new(name: impl Into<String>, return_type: IrType, parameters: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters,
            blocks: Vec::new(),
            current_block: 0,
            temp_counter: 0,
            block_counter: 0,
            if_counter: 0,
            while_counter: 0,
        }
    }

    /// `%t0, %t1, ...` — unique within this function.
    pub fn fresh_temp(&mut self) -> String {
        let name = format!("%t{}", self.temp_counter);
        self.temp_counter += 1;
        name
    }

    /// `bb0, bb1, ...` — used only when a caller doesn't supply a named
    /// label (`entry`, `if.then`, `while.header`, ...).
    pub fn fresh_block_label(&mut self) -> String {
        let name = format!("bb{}", self.block_counter);
        self.block_counter += 1;
        name
    }

    /// Disambiguator for a run of `if` statements in one function: the
    /// first gets the bare label set (`if.then`/`if.else`/`if.end`), later
    /// ones a numeric suffix.
    pub fn next_if_id(&mut self) -> u32 {
        let id = self.if_counter;
        self.if_counter += 1;
        id
    }

    /// Same disambiguation scheme as [`Function::next_if_id`], for `while`.
    pub fn next_while_id(&mut self) -> u32 {
        let id = self.while_counter;
        self.while_counter += 1;
        id
    }

    /// Append a new block, returning its index, and make it current.
    pub fn new_block(&mut self, name: impl Into<String>) -> usize {
        self.blocks.push(BasicBlock::new(name));
        let index = self.blocks.len() - 1;
        self.current_block = index;
        index
    }

    pub fn current(&mut self) -> &mut BasicBlock {
        &mut self.blocks[self.current_block]
    }

    pub fn current_is_terminated(&self) -> bool {
        self.blocks[self.current_block].terminated
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.current().push(instruction);
    }

    /// Emit a defensive terminator on the current block if it fell off the
    /// end without one: `ret void`, or `ret <T> <default>` for a non-void
    /// return type.
    pub fn ensure_terminated(&mut self) {
        if self.current_is_terminated() {
            return;
        }
        let instr = if self.return_type == IrType::Void {
            Instruction::new("ret").operand("void")
        } else {
            Instruction::new("ret").operand(format!(
                "{} {}",
                self.return_type,
                self.return_type.default_value()
            ))
        };
        self.push(instr);
    }

    pub fn render(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| format!("{} %{}", p.ty, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        let mut out = format!("define {} @{}({}) {{\n", self.return_type, self.name, params);
        for block in &self.blocks {
            out.push_str(&block.render());
        }
        out.push_str("}\n");
        out
    }
}

/// `{functions, string-literal table (literal -> id), error list}`.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub functions: Vec<Function>,
    pub strings: IndexMap<String, u32>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `literal` by content, returning its dense `@.str.N` id.
    pub fn intern_string(&mut self, literal: &str) -> u32 {
        if let Some(&id) = self.strings.get(literal) {
            return id;
        }
        let id = self.strings.len() as u32;
        self.strings.insert(literal.to_string(), id);
        id
    }
}
