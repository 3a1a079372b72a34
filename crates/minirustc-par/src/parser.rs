//! Recursive-descent parser: token cursor, statement grammar, and the
//! layered expression grammar (assignment down to primary).

use crate::ast::*;
use minirustc_lex::{Token, TokenKind};
use minirustc_util::diagnostic::{DiagnosticKind, Handler};

/// Statement keywords (plus a just-consumed `;`) the synchronizer stops at
/// after a parse error, so one bad statement doesn't poison the rest of the
/// file.
const SYNC_KEYWORDS: &[&str] = &["fn", "let", "if", "while", "return"];

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], handler: &'a Handler) -> Self {
        Self {
            tokens,
            pos: 0,
            handler,
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut functions = Vec::new();
        while !self.is_eof() {
            match self.parse_function() {
                Some(func) => functions.push(func),
                None => self.synchronize(),
            }
        }
        Program { functions }
    }

    // ---- token cursor ----------------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn is_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn check_keyword(&self, lexeme: &str) -> bool {
        self.current().kind == TokenKind::Keyword && self.current().lexeme == lexeme
    }

    fn match_keyword(&mut self, lexeme: &str) -> bool {
        if self.check_keyword(lexeme) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of `kind`, or record `Expected X, but got Y` and
    /// return `None`.
    fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_expected(what);
            None
        }
    }

    fn expect_keyword(&mut self, lexeme: &str) -> Option<Token> {
        if self.check_keyword(lexeme) {
            Some(self.advance())
        } else {
            self.error_expected(&format!("'{lexeme}'"));
            None
        }
    }

    fn error_expected(&self, what: &str) {
        let got = &self.current().lexeme;
        let got = if got.is_empty() { "EOF" } else { got.as_str() };
        self.handler
            .build(
                DiagnosticKind::ParseError,
                format!("Expected {what}, but got '{got}'"),
            )
            .at(self.current().line, self.current().column)
            .emit(self.handler);
    }

    fn error_unexpected(&self, what: &str) {
        self.handler
            .build(DiagnosticKind::ParseError, format!("Unexpected token: '{what}'"))
            .at(self.current().line, self.current().column)
            .emit(self.handler);
    }

    /// Advance until just after a `;` or positioned at one of `fn, let, if,
    /// while, return`.
    fn synchronize(&mut self) {
        tracing::debug!(pos = self.pos, "synchronizing after a parse error");
        while !self.is_eof() {
            if self.current().kind == TokenKind::Semi {
                self.advance();
                return;
            }
            if self.current().kind == TokenKind::Keyword
                && SYNC_KEYWORDS.contains(&self.current().lexeme.as_str())
            {
                return;
            }
            self.advance();
        }
    }

    // ---- declarations -------------------------------------------------

    fn parse_function(&mut self) -> Option<FunctionDecl> {
        let start = self.current().clone();
        if !self.check_keyword("fn") {
            self.error_expected("'fn'");
            return None;
        }
        self.advance();

        let name_tok = self.expect(TokenKind::Identifier, "function name")?;
        self.expect(TokenKind::LParen, "'('")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;

        let return_type = if self.match_kind(TokenKind::Arrow) {
            Some(self.parse_type_name()?)
        } else {
            None
        };

        let body = self.parse_block()?;

        Some(FunctionDecl {
            name: name_tok.lexeme,
            params,
            return_type,
            body,
            line: start.line,
            column: start.column,
        })
    }

    fn parse_param(&mut self) -> Option<Param> {
        let name_tok = self.expect(TokenKind::Identifier, "parameter name")?;
        self.expect(TokenKind::Colon, "':'")?;
        let ty = self.parse_type_name()?;
        Some(Param {
            name: name_tok.lexeme,
            ty,
            line: name_tok.line,
            column: name_tok.column,
        })
    }

    fn parse_type_name(&mut self) -> Option<TypeName> {
        if self.check(TokenKind::Type) {
            let tok = self.advance();
            TypeName::from_lexeme(&tok.lexeme)
        } else {
            self.error_expected("a type");
            None
        }
    }

    fn parse_block(&mut self) -> Option<Block> {
        let start = self.expect(TokenKind::LBrace, "'{'")?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_eof() {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Some(Block {
            statements,
            line: start.line,
            column: start.column,
        })
    }

    // ---- statements -----------------------------------------------------

    fn parse_statement(&mut self) -> Option<Stmt> {
        if self.check_keyword("let") {
            return self.parse_let().map(Stmt::VariableDeclaration);
        }
        if self.check_keyword("if") {
            return self.parse_if().map(Stmt::If);
        }
        if self.check_keyword("while") {
            return self.parse_while().map(Stmt::While);
        }
        if self.check_keyword("return") {
            return self.parse_return().map(Stmt::Return);
        }
        if self.check_keyword("print") {
            return self.parse_print().map(Stmt::Print);
        }
        self.parse_expr_statement()
    }

    fn parse_let(&mut self) -> Option<VariableDecl> {
        let start = self.advance(); // 'let'
        let is_mutable = self.match_keyword("mut");
        let name_tok = self.expect(TokenKind::Identifier, "variable name")?;

        let declared_type = if self.match_kind(TokenKind::Colon) {
            Some(self.parse_type_name()?)
        } else {
            None
        };

        let initializer = if self.match_kind(TokenKind::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        self.expect(TokenKind::Semi, "';'")?;

        Some(VariableDecl {
            name: name_tok.lexeme,
            is_mutable,
            declared_type,
            initializer,
            line: start.line,
            column: start.column,
        })
    }

    fn parse_if(&mut self) -> Option<IfStatement> {
        let start = self.advance(); // 'if'
        let condition = self.parse_expr()?;
        let then_block = self.parse_block()?;
        let else_block = if self.match_keyword("else") {
            Some(self.parse_block()?)
        } else {
            None
        };
        Some(IfStatement {
            condition,
            then_block,
            else_block,
            line: start.line,
            column: start.column,
        })
    }

    fn parse_while(&mut self) -> Option<WhileStatement> {
        let start = self.advance(); // 'while'
        let condition = self.parse_expr()?;
        let body = self.parse_block()?;
        Some(WhileStatement {
            condition,
            body,
            line: start.line,
            column: start.column,
        })
    }

    fn parse_return(&mut self) -> Option<ReturnStatement> {
        let start = self.advance(); // 'return'
        let value = if self.check(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semi, "';'")?;
        Some(ReturnStatement {
            value,
            line: start.line,
            column: start.column,
        })
    }

    fn parse_print(&mut self) -> Option<PrintStatement> {
        let start = self.advance(); // 'print'
        self.expect(TokenKind::LParen, "'('")?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::Semi, "';'")?;
        Some(PrintStatement {
            value,
            line: start.line,
            column: start.column,
        })
    }

    fn parse_expr_statement(&mut self) -> Option<Stmt> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semi, "';'")?;
        Some(Stmt::Expr(expr))
    }

    // ---- expressions (assignment -> ... -> primary) --------------------

    fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Option<Expr> {
        let expr = self.parse_or()?;
        if self.match_kind(TokenKind::Assign) {
            let value = self.parse_assignment()?;
            let (line, column) = (expr.line(), expr.column());
            let name = match expr {
                Expr::Identifier { name, .. } => name,
                other => {
                    self.error_unexpected("=");
                    return Some(other);
                }
            };
            return Some(Expr::Assignment {
                name,
                value: Box::new(value),
                line,
                column,
            });
        }
        Some(expr)
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while self.check(TokenKind::Or) {
            let op_tok = self.advance();
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right, &op_tok);
        }
        Some(left)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_equality()?;
        while self.check(TokenKind::And) {
            let op_tok = self.advance();
            let right = self.parse_equality()?;
            left = binary(BinaryOp::And, left, right, &op_tok);
        }
        Some(left)
    }

    fn parse_equality(&mut self) -> Option<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Eq => BinaryOp::Eq,
                TokenKind::Ne => BinaryOp::Ne,
                _ => break,
            };
            let op_tok = self.advance();
            let right = self.parse_comparison()?;
            left = binary(op, left, right, &op_tok);
        }
        Some(left)
    }

    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Ge => BinaryOp::Ge,
                _ => break,
            };
            let op_tok = self.advance();
            let right = self.parse_term()?;
            left = binary(op, left, right, &op_tok);
        }
        Some(left)
    }

    fn parse_term(&mut self) -> Option<Expr> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let op_tok = self.advance();
            let right = self.parse_factor()?;
            left = binary(op, left, right, &op_tok);
        }
        Some(left)
    }

    fn parse_factor(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            let op_tok = self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right, &op_tok);
        }
        Some(left)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        let op = match self.current().kind {
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::AmpMut => UnaryOp::RefMut,
            TokenKind::Amp => UnaryOp::Ref,
            _ => return self.parse_primary(),
        };
        let op_tok = self.advance();
        let operand = self.parse_unary()?;
        Some(Expr::Unary {
            op,
            operand: Box::new(operand),
            line: op_tok.line,
            column: op_tok.column,
        })
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::Integer => {
                self.advance();
                let value = tok.lexeme.parse().unwrap_or(0);
                Some(Expr::IntegerLiteral {
                    value,
                    line: tok.line,
                    column: tok.column,
                })
            }
            TokenKind::Float => {
                self.advance();
                let value = tok.lexeme.parse().unwrap_or(0.0);
                Some(Expr::FloatLiteral {
                    value,
                    line: tok.line,
                    column: tok.column,
                })
            }
            TokenKind::String => {
                self.advance();
                Some(Expr::StringLiteral {
                    value: tok.lexeme,
                    line: tok.line,
                    column: tok.column,
                })
            }
            TokenKind::Keyword if tok.lexeme == "true" || tok.lexeme == "false" => {
                self.advance();
                Some(Expr::BooleanLiteral {
                    value: tok.lexeme == "true",
                    line: tok.line,
                    column: tok.column,
                })
            }
            TokenKind::Identifier => {
                self.advance();
                Some(Expr::Identifier {
                    name: tok.lexeme,
                    line: tok.line,
                    column: tok.column,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Some(inner)
            }
            _ => {
                let lexeme = if tok.lexeme.is_empty() { "EOF".to_string() } else { tok.lexeme.clone() };
                self.error_unexpected(&lexeme);
                None
            }
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr, op_tok: &Token) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        line: op_tok.line,
        column: op_tok.column,
    }
}

