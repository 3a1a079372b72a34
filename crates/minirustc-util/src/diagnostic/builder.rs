//! Diagnostic construction and source-line presentation.

use super::{Diagnostic, DiagnosticKind, Handler};

/// A single source line rendered with a caret under the offending column.
///
/// # Examples
///
/// ```
/// use minirustc_util::diagnostic::SourceSnippet;
///
/// let snippet = SourceSnippet::new("let x = 42", 1, 5);
/// assert!(snippet.render().contains('^'));
/// ```
#[derive(Clone, Debug)]
pub struct SourceSnippet {
    pub line_text: String,
    pub line_number: u32,
    pub column: u32,
}

impl SourceSnippet {
    pub fn new(line_text: impl Into<String>, line_number: u32, column: u32) -> Self {
        Self {
            line_text: line_text.into(),
            line_number,
            column,
        }
    }

    /// Build a snippet by pulling the relevant line out of `source`.
    ///
    /// Returns `None` if `line_number` is out of range for `source`.
    pub fn from_source(source: &str, line_number: u32, column: u32) -> Option<Self> {
        let line_text = source.lines().nth(line_number.saturating_sub(1) as usize)?;
        Some(Self::new(line_text, line_number, column))
    }

    /// Render the line with a caret line underneath pointing at `column`.
    pub fn render(&self) -> String {
        let gutter_width = self.line_number.to_string().len().max(3);
        let caret_col = self.column.saturating_sub(1) as usize;
        format!(
            "{:>gw$} | {}\n{:>gw$} | {}^",
            self.line_number,
            self.line_text,
            "",
            " ".repeat(caret_col),
            gw = gutter_width
        )
    }
}

/// Known message fragments mapped to an actionable hint, mirroring how the
/// presentation layer keys suggestions off the diagnostic's wording rather
/// than its kind alone (two `TypeError`s can warrant different hints).
const SUGGESTION_HINTS: &[(&str, &str)] = &[
    ("Undefined variable", "check the spelling or declare the variable before use"),
    ("Type mismatch", "convert one side or change the declared type"),
    ("Cannot assign to immutable", "declare the variable with 'mut' to allow reassignment"),
    ("Unterminated string literal", "add a closing '\"' to the string"),
    ("Expected", "check for a missing token before this position"),
    ("Cannot create mutable borrow", "drop the existing borrow before creating a new one"),
    ("already borrowed", "drop the existing borrow before creating a new one"),
];

/// Look up a suggestion hint for a diagnostic message, if one is known.
///
/// # Examples
///
/// ```
/// use minirustc_util::diagnostic::suggest_for;
///
/// assert!(suggest_for("Undefined variable: 'x'").is_some());
/// assert!(suggest_for("something unrelated").is_none());
/// ```
pub fn suggest_for(message: &str) -> Option<&'static str> {
    SUGGESTION_HINTS
        .iter()
        .find(|(fragment, _)| message.contains(fragment))
        .map(|(_, hint)| *hint)
}

/// Fluent construction of a [`Diagnostic`], auto-filling a suggestion from
/// [`suggest_for`] when one isn't supplied explicitly.
///
/// # Examples
///
/// ```
/// use minirustc_util::diagnostic::{DiagnosticBuilder, DiagnosticKind};
///
/// let diag = DiagnosticBuilder::new(DiagnosticKind::TypeError, "Type mismatch: expected 'i32', found 'f64'")
///     .at(3, 12)
///     .build();
/// assert!(diag.suggestion.is_some());
/// ```
pub struct DiagnosticBuilder {
    kind: DiagnosticKind,
    message: String,
    line: u32,
    column: u32,
    suggestion: Option<String>,
}

impl DiagnosticBuilder {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: 0,
            column: 0,
            suggestion: None,
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        let suggestion = self
            .suggestion
            .or_else(|| suggest_for(&self.message).map(str::to_string));
        Diagnostic {
            kind: self.kind,
            message: self.message,
            line: self.line,
            column: self.column,
            suggestion,
        }
    }

    pub fn emit(self, handler: &Handler) {
        handler.emit(self.build());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_renders_caret_under_column() {
        let snippet = SourceSnippet::new("let x = 1;", 1, 5);
        let rendered = snippet.render();
        let caret_line = rendered.lines().nth(1).unwrap();
        assert_eq!(caret_line.chars().filter(|c| *c == '^').count(), 1);
    }

    #[test]
    fn suggestion_hints_match_known_fragments() {
        assert!(suggest_for("Undefined variable: 'x'").is_some());
        assert!(suggest_for("Type mismatch: expected 'i32', found 'f64'").is_some());
        assert!(suggest_for("Cannot assign to immutable variable 'x'").is_some());
        assert!(suggest_for("something else entirely").is_none());
    }

    #[test]
    fn builder_auto_fills_suggestion() {
        let diag = DiagnosticBuilder::new(DiagnosticKind::LexicalError, "Unterminated string literal")
            .at(2, 1)
            .build();
        assert!(diag.suggestion.is_some());
    }

    #[test]
    fn explicit_suggestion_wins_over_auto_fill() {
        let diag = DiagnosticBuilder::new(DiagnosticKind::TypeError, "Type mismatch: expected 'i32', found 'f64'")
            .suggest("custom hint")
            .build();
        assert_eq!(diag.suggestion.as_deref(), Some("custom hint"));
    }
}
