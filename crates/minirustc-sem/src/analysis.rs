//! The single-traversal checker: name resolution, type inference/checking,
//! and (when `check_ownership` is set) the borrow-count ownership pass.
//!
//! A struct holding a scope tree and a diagnostic handler, with one method
//! per AST node kind, over this language's closed statement/expression set
//! and exact diagnostic wording.

use crate::scope::{ScopeTree as RawScopeTree, Symbol};
use crate::types::Type;
use minirustc_par::*;
use minirustc_util::diagnostic::{DiagnosticKind, Handler};

pub struct Analyzer<'a> {
    scopes: RawScopeTree,
    handler: &'a Handler,
    check_ownership: bool,
    current_return_type: Option<Type>,
    ownership_trace: Vec<String>,
}

impl<'a> Analyzer<'a> {
    pub fn new(handler: &'a Handler, check_ownership: bool) -> Self {
        let mut scopes = RawScopeTree::new();
        let global = scopes.current();
        scopes.declare_in(global, Symbol::function("print", 0, 0));
        Self {
            scopes,
            handler,
            check_ownership,
            current_return_type: None,
            ownership_trace: Vec::new(),
        }
    }

    pub fn analyze_program(mut self, program: &Program) -> (RawScopeTree, Vec<String>) {
        tracing::debug!(functions = program.functions.len(), "semantic analysis starting");

        for func in &program.functions {
            let global = self.scopes.current();
            if self.scopes.is_defined_in(global, &func.name) {
                self.error(
                    DiagnosticKind::SemanticError,
                    format!("Function '{}' is already defined", func.name),
                    func.line,
                    func.column,
                );
            }
            self.scopes
                .declare_in(global, Symbol::function(&func.name, func.line, func.column));
        }

        for func in &program.functions {
            self.analyze_function(func);
        }

        self.check_unused_variables();
        (self.scopes, self.ownership_trace)
    }

    fn analyze_function(&mut self, func: &FunctionDecl) {
        tracing::trace!(name = %func.name, "entering function scope");
        self.scopes.enter_scope();
        self.current_return_type = func.return_type.map(Type::from);

        for param in &func.params {
            let scope = self.scopes.current();
            if self.scopes.is_defined_in(scope, &param.name) {
                self.error(
                    DiagnosticKind::SemanticError,
                    format!("Parameter '{}' is already defined in this scope", param.name),
                    param.line,
                    param.column,
                );
            }
            self.scopes.declare(Symbol::new(
                &param.name,
                Type::from(param.ty),
                false,
                param.line,
                param.column,
            ));
        }

        self.analyze_block(&func.body);

        if let Some(ret) = self.current_return_type {
            if ret != Type::Void && !always_returns(&func.body) {
                self.handler
                    .build(
                        DiagnosticKind::Warning,
                        format!(
                            "Function '{}' may not return a value on all paths",
                            func.name
                        ),
                    )
                    .at(func.line, func.column)
                    .emit(self.handler);
            }
        }

        self.current_return_type = None;
        self.scopes.exit_scope();
        tracing::trace!(name = %func.name, "exiting function scope");
    }

    /// A `Block` always opens its own nested scope, even as a function
    /// body — so a function's parameters and its body's locals live in two
    /// distinct (nested) scopes.
    fn analyze_block(&mut self, block: &Block) {
        self.scopes.enter_scope();
        for stmt in &block.statements {
            self.analyze_stmt(stmt);
        }
        self.scopes.exit_scope();
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VariableDeclaration(decl) => self.analyze_let(decl),
            Stmt::If(if_stmt) => self.analyze_if(if_stmt),
            Stmt::While(while_stmt) => self.analyze_while(while_stmt),
            Stmt::Return(ret) => self.analyze_return(ret),
            Stmt::Print(print) => {
                self.type_of(&print.value);
            }
            Stmt::Expr(expr) => {
                self.type_of(expr);
            }
        }
    }

    fn analyze_let(&mut self, decl: &VariableDecl) {
        let inferred = match (decl.declared_type, &decl.initializer) {
            (Some(declared), Some(init)) => {
                let declared = Type::from(declared);
                let init_ty = self.type_of(init);
                if init_ty != declared && init_ty != Type::Unknown {
                    self.error(
                        DiagnosticKind::TypeError,
                        format!("Type mismatch: expected '{declared}', found '{init_ty}'"),
                        decl.line,
                        decl.column,
                    );
                }
                declared
            }
            (None, Some(init)) => self.type_of(init),
            (Some(declared), None) => Type::from(declared),
            (None, None) => {
                self.error(
                    DiagnosticKind::TypeError,
                    format!("Cannot infer type for variable '{}'", decl.name),
                    decl.line,
                    decl.column,
                );
                Type::Unknown
            }
        };

        let scope = self.scopes.current();
        if self.scopes.is_defined_in(scope, &decl.name) {
            self.error(
                DiagnosticKind::SemanticError,
                format!("Variable '{}' is already defined in this scope", decl.name),
                decl.line,
                decl.column,
            );
        }
        self.scopes.declare(Symbol::new(
            &decl.name,
            inferred,
            decl.is_mutable,
            decl.line,
            decl.column,
        ));

        if self.check_ownership {
            self.ownership_trace.push(format!(
                "Variable '{}' takes ownership of its value",
                decl.name
            ));
        }
    }

    fn analyze_if(&mut self, if_stmt: &IfStatement) {
        let cond_ty = self.type_of(&if_stmt.condition);
        if cond_ty != Type::Bool && cond_ty != Type::Unknown {
            self.error(
                DiagnosticKind::TypeError,
                format!("If condition must be of type bool, found '{cond_ty}'"),
                if_stmt.condition.line(),
                if_stmt.condition.column(),
            );
        }
        self.analyze_block(&if_stmt.then_block);
        if let Some(else_block) = &if_stmt.else_block {
            self.analyze_block(else_block);
        }
    }

    fn analyze_while(&mut self, while_stmt: &WhileStatement) {
        let cond_ty = self.type_of(&while_stmt.condition);
        if cond_ty != Type::Bool && cond_ty != Type::Unknown {
            self.error(
                DiagnosticKind::TypeError,
                format!("While condition must be of type bool, found '{cond_ty}'"),
                while_stmt.condition.line(),
                while_stmt.condition.column(),
            );
        }
        self.analyze_block(&while_stmt.body);
    }

    fn analyze_return(&mut self, ret: &ReturnStatement) {
        let found = match &ret.value {
            Some(expr) => self.type_of(expr),
            None => Type::Void,
        };
        let expected = self.current_return_type.unwrap_or(Type::Void);
        if found != expected && found != Type::Unknown {
            self.error(
                DiagnosticKind::TypeError,
                format!("Type mismatch: expected '{expected}', found '{found}'"),
                ret.line,
                ret.column,
            );
        }
    }

    /// Type-check `expr`, returning its type. Reading an identifier marks
    /// its symbol used; this is the only place usage is recorded (an
    /// assignment's left-hand name is a write, not an `Identifier` read).
    fn type_of(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::IntegerLiteral { .. } => Type::I32,
            Expr::FloatLiteral { .. } => Type::F64,
            Expr::StringLiteral { .. } => Type::Str,
            Expr::BooleanLiteral { .. } => Type::Bool,
            Expr::Identifier { name, line, column } => match self.scopes.resolve(name) {
                Some(id) => {
                    self.scopes.symbol_mut(id).is_used = true;
                    self.scopes.symbol(id).ty
                }
                None => {
                    self.error(
                        DiagnosticKind::SemanticError,
                        format!("Undefined variable: '{name}'"),
                        *line,
                        *column,
                    );
                    Type::Unknown
                }
            },
            Expr::Binary { op, left, right, line, column } => {
                self.type_of_binary(*op, left, right, *line, *column)
            }
            Expr::Unary { op, operand, line, column } => {
                self.type_of_unary(*op, operand, *line, *column)
            }
            Expr::Assignment { name, value, line, column } => {
                let value_ty = self.type_of(value);
                let target = self.scopes.resolve(name);
                let Some(id) = target else {
                    self.error(
                        DiagnosticKind::SemanticError,
                        format!("Undefined variable: '{name}'"),
                        *line,
                        *column,
                    );
                    return Type::Unknown;
                };
                if !self.scopes.symbol(id).is_mutable {
                    self.error(
                        DiagnosticKind::OwnershipError,
                        format!("Cannot assign to immutable variable '{name}'"),
                        *line,
                        *column,
                    );
                }
                let target_ty = self.scopes.symbol(id).ty;
                if value_ty != target_ty && value_ty != Type::Unknown {
                    self.error(
                        DiagnosticKind::TypeError,
                        format!("Type mismatch: expected '{target_ty}', found '{value_ty}'"),
                        *line,
                        *column,
                    );
                }
                if self.check_ownership {
                    self.ownership_trace
                        .push(format!("Assignment transfers ownership to '{name}'"));
                }
                target_ty
            }
        }
    }

    fn type_of_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, line: u32, column: u32) -> Type {
        let lt = self.type_of(left);
        let rt = self.type_of(right);
        let mismatched = lt != rt && lt != Type::Unknown && rt != Type::Unknown;

        match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                if mismatched {
                    self.error(
                        DiagnosticKind::TypeError,
                        format!("Type mismatch: expected '{lt}', found '{rt}'"),
                        line,
                        column,
                    );
                }
                if lt != Type::Unknown { lt } else { rt }
            }
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                if mismatched {
                    self.error(
                        DiagnosticKind::TypeError,
                        format!("Type mismatch: expected '{lt}', found '{rt}'"),
                        line,
                        column,
                    );
                }
                Type::Bool
            }
            BinaryOp::And | BinaryOp::Or => {
                if lt != Type::Bool && lt != Type::Unknown {
                    self.error(
                        DiagnosticKind::TypeError,
                        format!("Type mismatch: expected 'bool', found '{lt}'"),
                        line,
                        column,
                    );
                }
                if rt != Type::Bool && rt != Type::Unknown {
                    self.error(
                        DiagnosticKind::TypeError,
                        format!("Type mismatch: expected 'bool', found '{rt}'"),
                        line,
                        column,
                    );
                }
                Type::Bool
            }
        }
    }

    fn type_of_unary(&mut self, op: UnaryOp, operand: &Expr, line: u32, column: u32) -> Type {
        match op {
            UnaryOp::Neg => {
                let ty = self.type_of(operand);
                if !ty.is_numeric() && ty != Type::Unknown {
                    self.error(
                        DiagnosticKind::TypeError,
                        format!("Type mismatch: expected 'i32' or 'f64', found '{ty}'"),
                        line,
                        column,
                    );
                }
                ty
            }
            UnaryOp::Not => {
                let ty = self.type_of(operand);
                if ty != Type::Bool && ty != Type::Unknown {
                    self.error(
                        DiagnosticKind::TypeError,
                        format!("Type mismatch: expected 'bool', found '{ty}'"),
                        line,
                        column,
                    );
                }
                Type::Bool
            }
            UnaryOp::RefMut => {
                // Always-on check, independent of `check_ownership`: a
                // `&mut x` in expression position where `x` isn't mutable
                // is rejected even when ownership checking is off.
                if let Expr::Identifier { name, .. } = operand {
                    if let Some(id) = self.scopes.resolve(name) {
                        if !self.scopes.symbol(id).is_mutable {
                            self.error(
                                DiagnosticKind::OwnershipError,
                                format!("Cannot create mutable borrow of immutable variable '{name}'"),
                                line,
                                column,
                            );
                        }
                    }
                }
                let ty = self.type_of(operand);
                if self.check_ownership {
                    self.borrow_mut(operand, line, column);
                }
                ty
            }
            UnaryOp::Ref => {
                let ty = self.type_of(operand);
                if self.check_ownership {
                    self.borrow_shared(operand, line, column);
                }
                ty
            }
        }
    }

    /// The monotonic borrow-count state machine. Counters are never
    /// released at scope exit — a deliberate simplification, documented
    /// as an open design decision in DESIGN.md.
    fn borrow_mut(&mut self, operand: &Expr, line: u32, column: u32) {
        let Expr::Identifier { name, .. } = operand else { return };
        let Some(id) = self.scopes.resolve(name) else { return };
        let symbol = self.scopes.symbol(id);
        if symbol.mutable_borrow_count > 0 {
            self.error(
                DiagnosticKind::OwnershipError,
                format!("Cannot create mutable borrow: '{name}' is already mutably borrowed"),
                line,
                column,
            );
            return;
        }
        if symbol.borrow_count > 0 {
            self.error(
                DiagnosticKind::OwnershipError,
                format!("Cannot create mutable borrow: '{name}' is already borrowed"),
                line,
                column,
            );
            return;
        }
        self.scopes.symbol_mut(id).mutable_borrow_count += 1;
        self.ownership_trace.push(format!("Mutable borrow of '{name}'"));
    }

    fn borrow_shared(&mut self, operand: &Expr, line: u32, column: u32) {
        let Expr::Identifier { name, .. } = operand else { return };
        let Some(id) = self.scopes.resolve(name) else { return };
        let symbol = self.scopes.symbol(id);
        if symbol.mutable_borrow_count > 0 {
            self.error(
                DiagnosticKind::OwnershipError,
                format!("Cannot create immutable borrow: '{name}' is already mutably borrowed"),
                line,
                column,
            );
            return;
        }
        self.scopes.symbol_mut(id).borrow_count += 1;
        self.ownership_trace.push(format!("Immutable borrow of '{name}'"));
    }

    /// Widened to every declared symbol across every scope, not only the
    /// ones surviving into the flattened global-scope snapshot.
    fn check_unused_variables(&self) {
        for symbol in self.scopes.symbols.as_slice().iter() {
            if symbol.is_function || symbol.is_used {
                continue;
            }
            self.handler
                .build(
                    DiagnosticKind::UnusedVariable,
                    format!("Variable '{}' is declared but never used", symbol.name),
                )
                .at(symbol.line, symbol.column)
                .emit(self.handler);
        }
    }

    fn error(&self, kind: DiagnosticKind, message: String, line: u32, column: u32) {
        self.handler.build(kind, message).at(line, column).emit(self.handler);
    }
}

/// Structural "does every path return" check backing the fallthrough
/// warning: a block always returns if its last statement is a `return`,
/// or an `if` whose both branches always return.
fn always_returns(block: &Block) -> bool {
    match block.statements.last() {
        Some(Stmt::Return(_)) => true,
        Some(Stmt::If(if_stmt)) => match &if_stmt.else_block {
            Some(else_block) => always_returns(&if_stmt.then_block) && always_returns(else_block),
            None => false,
        },
        _ => false,
    }
}
