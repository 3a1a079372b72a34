//! Diagnostic module - the compiler's single error/warning bus.
//!
//! Every pipeline stage (lexer, parser, semantic analyzer, IR generator)
//! reports problems by appending [`Diagnostic`] values to a [`Handler`]
//! instead of returning `Result` or panicking. A stage failure short-circuits
//! the remaining stages, but the diagnostics and partial products already
//! produced are still handed back to the caller.
//!
//! # Examples
//!
//! ```
//! use minirustc_util::diagnostic::{Handler, DiagnosticKind};
//!
//! let handler = Handler::new();
//! handler.build(DiagnosticKind::TypeError, "Type mismatch: expected 'i32', found 'f64'")
//!     .at(3, 12)
//!     .emit(&handler);
//!
//! assert!(handler.has_fatal());
//! ```

mod builder;

pub use builder::{DiagnosticBuilder, SourceSnippet};

use std::cell::RefCell;
use std::fmt;

/// The closed set of diagnostic kinds every stage draws from.
///
/// `LexicalError, ParseError, SemanticError, TypeError, OwnershipError,
/// IRGenerationError` are fatal and halt the pipeline after the stage that
/// produced them; `UnusedVariable` and `Warning` are advisory and never stop
/// compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    LexicalError,
    ParseError,
    SemanticError,
    TypeError,
    OwnershipError,
    UnusedVariable,
    IRGenerationError,
    Warning,
}

impl DiagnosticKind {
    /// Whether a diagnostic of this kind halts the pipeline.
    ///
    /// # Examples
    ///
    /// ```
    /// use minirustc_util::diagnostic::DiagnosticKind;
    ///
    /// assert!(DiagnosticKind::TypeError.is_fatal());
    /// assert!(!DiagnosticKind::UnusedVariable.is_fatal());
    /// ```
    pub fn is_fatal(self) -> bool {
        !matches!(self, DiagnosticKind::UnusedVariable | DiagnosticKind::Warning)
    }

    /// A short icon used by the presentation layer, mirroring the kind.
    pub fn icon(self) -> &'static str {
        match self {
            DiagnosticKind::LexicalError => "lex",
            DiagnosticKind::ParseError => "parse",
            DiagnosticKind::SemanticError => "sem",
            DiagnosticKind::TypeError => "type",
            DiagnosticKind::OwnershipError => "borrow",
            DiagnosticKind::UnusedVariable => "unused",
            DiagnosticKind::IRGenerationError => "ir",
            DiagnosticKind::Warning => "warn",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::LexicalError => "LexicalError",
            DiagnosticKind::ParseError => "ParseError",
            DiagnosticKind::SemanticError => "SemanticError",
            DiagnosticKind::TypeError => "TypeError",
            DiagnosticKind::OwnershipError => "OwnershipError",
            DiagnosticKind::UnusedVariable => "UnusedVariable",
            DiagnosticKind::IRGenerationError => "IRGenerationError",
            DiagnosticKind::Warning => "Warning",
        };
        write!(f, "{name}")
    }
}

/// A structured compiler error or warning: `{kind, message, line, column,
/// optional suggestion}`.
///
/// # Examples
///
/// ```
/// use minirustc_util::diagnostic::{Diagnostic, DiagnosticKind};
///
/// let diag = Diagnostic::new(DiagnosticKind::TypeError, "Type mismatch", 3, 12);
/// assert_eq!(diag.kind, DiagnosticKind::TypeError);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column,
            suggestion: None,
        }
    }

    /// Attach a suggestion to this diagnostic, returning the modified value.
    ///
    /// # Examples
    ///
    /// ```
    /// use minirustc_util::diagnostic::{Diagnostic, DiagnosticKind};
    ///
    /// let diag = Diagnostic::new(DiagnosticKind::ParseError, "Expected ';'", 1, 5)
    ///     .with_suggestion("insert a semicolon");
    /// assert_eq!(diag.suggestion.as_deref(), Some("insert a semicolon"));
    /// ```
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Whether this diagnostic halts the pipeline.
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

/// Collects diagnostics produced by a single pipeline stage.
///
/// Every stage of a single `compile` call gets its own fresh `Handler`; none
/// of it is shared across compiles, so there is no global mutable state to
/// reset between calls.
///
/// # Examples
///
/// ```
/// use minirustc_util::diagnostic::{Handler, Diagnostic, DiagnosticKind};
///
/// let handler = Handler::new();
/// handler.emit(Diagnostic::new(DiagnosticKind::ParseError, "bad token", 1, 1));
/// assert!(handler.has_fatal());
/// ```
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Record a diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Start building a diagnostic to emit against this handler.
    pub fn build(&self, kind: DiagnosticKind, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(kind, message)
    }

    /// Whether any fatal diagnostic has been recorded.
    pub fn has_fatal(&self) -> bool {
        self.diagnostics.borrow().iter().any(Diagnostic::is_fatal)
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_kinds() {
        assert!(DiagnosticKind::LexicalError.is_fatal());
        assert!(DiagnosticKind::ParseError.is_fatal());
        assert!(DiagnosticKind::SemanticError.is_fatal());
        assert!(DiagnosticKind::TypeError.is_fatal());
        assert!(DiagnosticKind::OwnershipError.is_fatal());
        assert!(DiagnosticKind::IRGenerationError.is_fatal());
    }

    #[test]
    fn non_fatal_kinds() {
        assert!(!DiagnosticKind::UnusedVariable.is_fatal());
        assert!(!DiagnosticKind::Warning.is_fatal());
    }

    #[test]
    fn handler_tracks_fatal_state() {
        let handler = Handler::new();
        assert!(!handler.has_fatal());
        handler.emit(Diagnostic::new(DiagnosticKind::UnusedVariable, "unused 'x'", 1, 1));
        assert!(!handler.has_fatal());
        handler.emit(Diagnostic::new(DiagnosticKind::TypeError, "bad type", 2, 3));
        assert!(handler.has_fatal());
        assert_eq!(handler.diagnostics().len(), 2);
    }

    #[test]
    fn builder_round_trip() {
        let handler = Handler::new();
        handler
            .build(DiagnosticKind::OwnershipError, "Cannot assign to immutable variable 'x'")
            .at(4, 5)
            .suggest("mark 'x' as mut")
            .emit(&handler);

        let diags = handler.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 4);
        assert_eq!(diags[0].suggestion.as_deref(), Some("mark 'x' as mut"));
    }
}
