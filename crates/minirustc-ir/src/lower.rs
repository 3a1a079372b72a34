//! Statement/expression lowering: `Program` -> [`Module`].
//!
//! One function walking the tree with a mutable builder/environment,
//! emitting the hand-rolled textual instruction set directly rather than
//! building a typed MIR/LIR an external backend would later consume.

use crate::module::{Function, Instruction, Module, Parameter};
use crate::types::IrType;
use minirustc_par::*;
use minirustc_util::diagnostic::{DiagnosticKind, Handler};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VarKind {
    Alloca,
    Parameter,
}

#[derive(Clone, Debug)]
struct VarSlot {
    storage: String,
    ty: IrType,
    kind: VarKind,
}

/// A stack of name -> slot maps, mirroring `minirustc-sem`'s `ScopeTree`
/// nesting but scoped to one function's lowering — no cross-function
/// state; every compile builds fresh per-function environments.
#[derive(Default)]
struct Env {
    scopes: Vec<HashMap<String, VarSlot>>,
}

impl Env {
    fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    fn insert(&mut self, name: String, slot: VarSlot) {
        self.scopes
            .last_mut()
            .expect("env always has a base scope")
            .insert(name, slot);
    }

    fn resolve(&self, name: &str) -> Option<&VarSlot> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

/// Lower every function in `program` into its own [`Function`] inside a
/// fresh [`Module`], recording any `IRGenerationError`s on `handler`.
pub fn lower_program(program: &Program, handler: &Handler) -> Module {
    let mut module = Module::new();
    for func in &program.functions {
        tracing::trace!(name = %func.name, "lowering function to IR");
        let ir_func = lower_function(func, &mut module, handler);
        module.functions.push(ir_func);
    }
    module
}

fn lower_function(func: &FunctionDecl, module: &mut Module, handler: &Handler) -> Function {
    let return_type = func
        .return_type
        .map(IrType::from_type_name)
        .unwrap_or(IrType::Void);
    let parameters: Vec<Parameter> = func
        .params
        .iter()
        .map(|p| Parameter {
            name: p.name.clone(),
            ty: IrType::from_type_name(p.ty),
        })
        .collect();

    let mut ir_func = Function::new(&func.name, return_type, parameters.clone());
    ir_func.new_block("entry");

    let mut env = Env::new();
    for param in &parameters {
        env.insert(
            param.name.clone(),
            VarSlot {
                storage: param.name.clone(),
                ty: param.ty,
                kind: VarKind::Parameter,
            },
        );
    }

    lower_block(&func.body, &mut ir_func, &mut env, module, handler);
    ir_func.ensure_terminated();
    ir_func
}

/// Every `Block` opens a fresh lowering scope, matching `minirustc-sem`'s
/// scoping rule — independent of whether the caller also opened a new IR
/// basic block (it does at every `if`/`while` branch point, but not for a
/// function's own body, which lowers straight into `entry`).
fn lower_block(block: &Block, function: &mut Function, env: &mut Env, module: &mut Module, handler: &Handler) {
    env.enter_scope();
    for stmt in &block.statements {
        lower_stmt(stmt, function, env, module, handler);
    }
    env.exit_scope();
}

fn lower_stmt(stmt: &Stmt, function: &mut Function, env: &mut Env, module: &mut Module, handler: &Handler) {
    match stmt {
        Stmt::VariableDeclaration(decl) => lower_let(decl, function, env, module, handler),
        Stmt::If(if_stmt) => lower_if(if_stmt, function, env, module, handler),
        Stmt::While(while_stmt) => lower_while(while_stmt, function, env, module, handler),
        Stmt::Return(ret) => lower_return(ret, function, env, module, handler),
        Stmt::Print(print) => lower_print(print, function, env, module, handler),
        Stmt::Expr(expr) => {
            lower_expr(expr, function, env, module, handler);
        }
    }
}

fn lower_let(decl: &VariableDecl, function: &mut Function, env: &mut Env, module: &mut Module, handler: &Handler) {
    let declared_ty = decl.declared_type.map(IrType::from_type_name);
    let initializer = decl
        .initializer
        .as_ref()
        .map(|init| lower_expr(init, function, env, module, handler));

    let ty = declared_ty
        .or_else(|| initializer.as_ref().map(|(_, t)| *t))
        .unwrap_or(IrType::I32);

    let slot = function.fresh_temp();
    function.push(
        Instruction::new("alloca")
            .result(slot.clone())
            .operand(ty.to_string())
            .comment(decl.name.clone()),
    );

    let value_text = initializer
        .map(|(value, _)| value)
        .unwrap_or_else(|| ty.default_value().to_string());
    function.push(
        Instruction::new("store")
            .operand(format!("{ty} {value_text}"))
            .operand(format!("{ty}* {slot}")),
    );

    env.insert(
        decl.name.clone(),
        VarSlot {
            storage: slot,
            ty,
            kind: VarKind::Alloca,
        },
    );
}

fn lower_print(print: &PrintStatement, function: &mut Function, env: &mut Env, module: &mut Module, handler: &Handler) {
    let (value, ty) = lower_expr(&print.value, function, env, module, handler);
    function.push(
        Instruction::new("call")
            .operand(format!("void @print({ty} {value})"))
            .comment("print statement"),
    );
}

fn lower_return(ret: &ReturnStatement, function: &mut Function, env: &mut Env, module: &mut Module, handler: &Handler) {
    match &ret.value {
        Some(expr) => {
            let (value, ty) = lower_expr(expr, function, env, module, handler);
            function.push(Instruction::new("ret").operand(format!("{ty} {value}")));
        }
        None => {
            function.push(Instruction::new("ret").operand("void"));
        }
    }
}

/// `bb0, bb1, ...` when repeated, bare names (`if.then`, `while.header`, ...)
/// the first time a control construct of that kind appears in the function
/// — keeping block labels within one function unique.
fn labeled(base: &str, id: u32) -> String {
    if id == 0 {
        base.to_string()
    } else {
        format!("{base}{id}")
    }
}

fn lower_if(if_stmt: &IfStatement, function: &mut Function, env: &mut Env, module: &mut Module, handler: &Handler) {
    let (cond, _ty) = lower_expr(&if_stmt.condition, function, env, module, handler);
    let id = function.next_if_id();
    let then_label = labeled("if.then", id);
    let else_label = labeled("if.else", id);
    let end_label = labeled("if.end", id);

    function.push(
        Instruction::new("br")
            .operand(format!("i1 {cond}"))
            .operand(format!("label %{then_label}"))
            .operand(format!("label %{else_label}")),
    );

    function.new_block(then_label);
    lower_block(&if_stmt.then_block, function, env, module, handler);
    if !function.current_is_terminated() {
        function.push(Instruction::new("br").operand(format!("label %{end_label}")));
    }

    function.new_block(else_label);
    if let Some(else_block) = &if_stmt.else_block {
        lower_block(else_block, function, env, module, handler);
    }
    if !function.current_is_terminated() {
        function.push(Instruction::new("br").operand(format!("label %{end_label}")));
    }

    function.new_block(end_label);
}

fn lower_while(while_stmt: &WhileStatement, function: &mut Function, env: &mut Env, module: &mut Module, handler: &Handler) {
    let id = function.next_while_id();
    let header_label = labeled("while.header", id);
    let body_label = labeled("while.body", id);
    let end_label = labeled("while.end", id);

    function.push(Instruction::new("br").operand(format!("label %{header_label}")));

    function.new_block(header_label.clone());
    let (cond, _ty) = lower_expr(&while_stmt.condition, function, env, module, handler);
    function.push(
        Instruction::new("br")
            .operand(format!("i1 {cond}"))
            .operand(format!("label %{body_label}"))
            .operand(format!("label %{end_label}")),
    );

    function.new_block(body_label);
    lower_block(&while_stmt.body, function, env, module, handler);
    if !function.current_is_terminated() {
        function.push(Instruction::new("br").operand(format!("label %{header_label}")));
    }

    function.new_block(end_label);
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn lower_expr(expr: &Expr, function: &mut Function, env: &mut Env, module: &mut Module, handler: &Handler) -> (String, IrType) {
    match expr {
        Expr::IntegerLiteral { value, .. } => (value.to_string(), IrType::I32),
        Expr::FloatLiteral { value, .. } => (format_float(*value), IrType::F64),
        Expr::BooleanLiteral { value, .. } => ((if *value { "1" } else { "0" }).to_string(), IrType::Bool),
        Expr::StringLiteral { value, .. } => {
            let id = module.intern_string(value);
            (format!("@.str.{id}"), IrType::Str)
        }
        Expr::Identifier { name, line, column } => lower_identifier(name, *line, *column, function, env, handler),
        Expr::Binary { op, left, right, .. } => lower_binary(*op, left, right, function, env, module, handler),
        Expr::Unary { op, operand, line, column } => {
            lower_unary(*op, operand, *line, *column, function, env, module, handler)
        }
        Expr::Assignment { name, value, line, column } => {
            lower_assignment(name, value, *line, *column, function, env, module, handler)
        }
    }
}

fn lower_identifier(
    name: &str,
    line: u32,
    column: u32,
    function: &mut Function,
    env: &Env,
    handler: &Handler,
) -> (String, IrType) {
    match env.resolve(name) {
        Some(slot) => match slot.kind {
            VarKind::Parameter => (format!("%{}", slot.storage), slot.ty),
            VarKind::Alloca => {
                let ty = slot.ty;
                let storage = slot.storage.clone();
                let tmp = function.fresh_temp();
                function.push(
                    Instruction::new("load")
                        .result(tmp.clone())
                        .operand(ty.to_string())
                        .operand(format!("{ty}* {storage}")),
                );
                (tmp, ty)
            }
        },
        None => {
            handler
                .build(DiagnosticKind::IRGenerationError, format!("Undefined variable: '{name}'"))
                .at(line, column)
                .emit(handler);
            ("undef".to_string(), IrType::I32)
        }
    }
}

fn arithmetic_opcode(op: BinaryOp, ty: IrType) -> &'static str {
    match (op, ty.is_float()) {
        (BinaryOp::Add, false) => "add",
        (BinaryOp::Add, true) => "fadd",
        (BinaryOp::Sub, false) => "sub",
        (BinaryOp::Sub, true) => "fsub",
        (BinaryOp::Mul, false) => "mul",
        (BinaryOp::Mul, true) => "fmul",
        (BinaryOp::Div, false) => "sdiv",
        (BinaryOp::Div, true) => "fdiv",
        (BinaryOp::Mod, _) => "srem",
        _ => unreachable!("arithmetic_opcode called with a non-arithmetic operator"),
    }
}

fn compare_opcode(op: BinaryOp, ty: IrType) -> String {
    if ty.is_float() {
        let cond = match op {
            BinaryOp::Lt => "olt",
            BinaryOp::Le => "ole",
            BinaryOp::Gt => "ogt",
            BinaryOp::Ge => "oge",
            BinaryOp::Eq => "oeq",
            BinaryOp::Ne => "one",
            _ => unreachable!("compare_opcode called with a non-comparison operator"),
        };
        format!("fcmp {cond}")
    } else {
        let cond = match op {
            BinaryOp::Lt => "slt",
            BinaryOp::Le => "sle",
            BinaryOp::Gt => "sgt",
            BinaryOp::Ge => "sge",
            BinaryOp::Eq => "eq",
            BinaryOp::Ne => "ne",
            _ => unreachable!("compare_opcode called with a non-comparison operator"),
        };
        format!("icmp {cond}")
    }
}

fn lower_binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    function: &mut Function,
    env: &mut Env,
    module: &mut Module,
    handler: &Handler,
) -> (String, IrType) {
    let (lval, lty) = lower_expr(left, function, env, module, handler);
    let (rval, _rty) = lower_expr(right, function, env, module, handler);

    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            let opcode = arithmetic_opcode(op, lty);
            let tmp = function.fresh_temp();
            function.push(
                Instruction::new(opcode)
                    .result(tmp.clone())
                    .operand(format!("{lty} {lval}"))
                    .operand(rval),
            );
            (tmp, lty)
        }
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let opcode = compare_opcode(op, lty);
            let tmp = function.fresh_temp();
            function.push(
                Instruction::new(opcode)
                    .result(tmp.clone())
                    .operand(format!("{lty} {lval}"))
                    .operand(rval),
            );
            (tmp, IrType::Bool)
        }
        BinaryOp::And | BinaryOp::Or => {
            let opcode = if op == BinaryOp::And { "and" } else { "or" };
            let tmp = function.fresh_temp();
            function.push(
                Instruction::new(opcode)
                    .result(tmp.clone())
                    .operand(format!("i1 {lval}"))
                    .operand(rval),
            );
            (tmp, IrType::Bool)
        }
    }
}

fn lower_unary(
    op: UnaryOp,
    operand: &Expr,
    line: u32,
    column: u32,
    function: &mut Function,
    env: &mut Env,
    module: &mut Module,
    handler: &Handler,
) -> (String, IrType) {
    let _ = (line, column);
    match op {
        UnaryOp::Neg => {
            let (val, ty) = lower_expr(operand, function, env, module, handler);
            let opcode = if ty.is_float() { "fsub" } else { "sub" };
            let zero = if ty.is_float() { "0.0" } else { "0" };
            let tmp = function.fresh_temp();
            function.push(
                Instruction::new(opcode)
                    .result(tmp.clone())
                    .operand(format!("{ty} {zero}"))
                    .operand(val),
            );
            (tmp, ty)
        }
        UnaryOp::Not => {
            let (val, _ty) = lower_expr(operand, function, env, module, handler);
            let tmp = function.fresh_temp();
            function.push(
                Instruction::new("xor")
                    .result(tmp.clone())
                    .operand(format!("i1 {val}"))
                    .operand("1"),
            );
            (tmp, IrType::Bool)
        }
        // Simplification: no reference values materialize in IR —
        // `&x`/`&mut x` pass the operand's value through unchanged.
        UnaryOp::Ref | UnaryOp::RefMut => lower_expr(operand, function, env, module, handler),
    }
}

fn lower_assignment(
    name: &str,
    value: &Expr,
    line: u32,
    column: u32,
    function: &mut Function,
    env: &mut Env,
    module: &mut Module,
    handler: &Handler,
) -> (String, IrType) {
    let (val, val_ty) = lower_expr(value, function, env, module, handler);
    match env.resolve(name) {
        Some(slot) if slot.kind == VarKind::Alloca => {
            let ty = slot.ty;
            let storage = slot.storage.clone();
            function.push(
                Instruction::new("store")
                    .operand(format!("{ty} {val}"))
                    .operand(format!("{ty}* {storage}")),
            );
            (val, ty)
        }
        // A parameter target or an undeclared name can't reach codegen
        // through a semantically valid program (parameters are never
        // mutable, so `minirustc-sem` would already have rejected it); kept
        // as a graceful fallback for `generate_ir` called standalone.
        Some(slot) => (val, slot.ty),
        None => {
            handler
                .build(DiagnosticKind::IRGenerationError, format!("Undefined variable: '{name}'"))
                .at(line, column)
                .emit(handler);
            (val, val_ty)
        }
    }
}
