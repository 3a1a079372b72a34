//! Core utilities shared by every stage of the compiler: source spans,
//! string interning, typed index vectors, the diagnostic bus, and the
//! internal error types that back `thiserror`-derived `Result`s for true
//! invariant violations (as opposed to user-facing compile errors, which
//! travel as [`diagnostic::Diagnostic`] values, never as `Err`).

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticKind, Handler};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::{Symbol, SymbolInterner};
