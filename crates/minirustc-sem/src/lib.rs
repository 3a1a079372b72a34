//! Semantic analysis: name resolution, type inference/checking, and (when
//! requested) scope-based borrow-count analysis, in one traversal.
//!
//! Structured as a scope arena plus a per-node-kind checker, over this
//! language's closed statement/expression set, with exact diagnostic
//! wording. There is no HIR or unification machinery here — this language
//! has no generics, traits, or ADTs to infer over.

mod analysis;
pub mod scope;
pub mod types;

pub use scope::{Scope, ScopeId, ScopeTree, Symbol, SymbolId};
pub use types::Type;

use analysis::Analyzer;
use indexmap::IndexMap;
use minirustc_par::Program;
use minirustc_util::diagnostic::{Diagnostic, Handler};

/// The flattened symbol table: a union of every name ever declared, with
/// global-scope entries (functions, `print`) taking precedence over
/// same-named locals on collision.
#[derive(Debug, Default)]
pub struct SymbolTable {
    pub entries: IndexMap<String, Symbol>,
}

impl SymbolTable {
    fn build(scopes: &ScopeTree) -> Self {
        let mut entries = IndexMap::new();
        for (scope_id, scope) in scopes.scopes.iter_enumerated() {
            for (name, &symbol_id) in &scope.bindings {
                let is_global = scope_id == scopes.global;
                let symbol = scopes.symbol(symbol_id).clone();
                match entries.get(name) {
                    Some(_) if !is_global => {}
                    _ => {
                        entries.insert(name.clone(), symbol);
                    }
                }
            }
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `analyze`'s aggregate product: `{symbolTable, errors, warnings,
/// ownershipInfo, success}`.
#[derive(Debug)]
pub struct AnalysisResult {
    pub symbol_table: SymbolTable,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub ownership_info: Vec<String>,
    pub success: bool,
}

/// Run semantic analysis over `program`. `check_ownership` toggles the
/// borrow-count ownership pass and its human-readable trace; the
/// always-on immutable-`&mut`-borrow check and every type-checking rule
/// run regardless.
///
/// # Examples
///
/// ```
/// use minirustc_lex::tokenize;
/// use minirustc_par::parse;
/// use minirustc_sem::analyze;
///
/// let (tokens, _) = tokenize("fn main() { let x: i32 = 1; print(x); }");
/// let (program, _) = parse(&tokens);
/// let result = analyze(&program, false);
/// assert!(result.success);
/// ```
pub fn analyze(program: &Program, check_ownership: bool) -> AnalysisResult {
    tracing::debug!(check_ownership, "running semantic analysis");
    let handler = Handler::new();
    let analyzer = Analyzer::new(&handler, check_ownership);
    let (scopes, ownership_info) = analyzer.analyze_program(program);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for diagnostic in handler.diagnostics() {
        if diagnostic.is_fatal() {
            errors.push(diagnostic);
        } else {
            warnings.push(diagnostic);
        }
    }

    AnalysisResult {
        symbol_table: SymbolTable::build(&scopes),
        success: errors.is_empty(),
        errors,
        warnings,
        ownership_info,
    }
}
