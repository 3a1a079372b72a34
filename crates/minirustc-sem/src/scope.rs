//! Scoped symbol table: a parent-pointer arena of name -> symbol maps.
//!
//! Shaped after a `{Rib, RibId, ScopeTree}` arena-of-ribs design, renamed
//! to this crate's own glossary (`Scope`/`ScopeId`) and narrowed to this
//! language's flat (non-module, non-loop-labelled) scope kinds.

use crate::types::Type;
use indexmap::IndexMap;
use minirustc_util::index_vec::{Idx, IndexVec};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl Idx for ScopeId {
    fn from_usize(idx: usize) -> Self {
        ScopeId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

impl Idx for SymbolId {
    fn from_usize(idx: usize) -> Self {
        SymbolId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// `{name, type, isMutable, line, column, isUsed, borrowCount,
/// mutableBorrowCount}`.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub is_mutable: bool,
    pub line: u32,
    pub column: u32,
    pub is_used: bool,
    pub borrow_count: u32,
    pub mutable_borrow_count: u32,
    /// Functions (and the builtin `print`) never fall under the
    /// `UnusedVariable` pass, which is a variable-only concept.
    pub is_function: bool,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: Type, is_mutable: bool, line: u32, column: u32) -> Self {
        Self {
            name: name.into(),
            ty,
            is_mutable,
            line,
            column,
            is_used: false,
            borrow_count: 0,
            mutable_borrow_count: 0,
            is_function: false,
        }
    }

    pub fn function(name: impl Into<String>, line: u32, column: u32) -> Self {
        let mut symbol = Self::new(name, Type::Function, false, line, column);
        symbol.is_function = true;
        symbol.is_used = true;
        symbol
    }
}

/// A single scope: a name -> symbol map plus a parent pointer. `IndexMap`
/// keeps declaration order so the flattened global symbol table and the
/// unused-variable pass report symbols in a deterministic order.
#[derive(Debug, Default)]
pub struct Scope {
    pub bindings: IndexMap<String, SymbolId>,
    pub parent: Option<ScopeId>,
}

/// The scope tree for one analysis: an arena of scopes plus an arena of
/// every symbol ever declared (scopes only ever gain bindings; a "pop"
/// just stops a scope being reachable for lookup, it doesn't forget its
/// symbols — that's what lets the widened `UnusedVariable` pass see
/// locals whose scope already closed).
pub struct ScopeTree {
    pub scopes: IndexVec<ScopeId, Scope>,
    pub symbols: IndexVec<SymbolId, Symbol>,
    pub global: ScopeId,
    current: ScopeId,
}

impl ScopeTree {
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let global = scopes.push(Scope::default());
        Self {
            scopes,
            symbols: IndexVec::new(),
            global,
            current: global,
        }
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Push a new scope nested under the current one, making it current.
    pub fn enter_scope(&mut self) -> ScopeId {
        let scope = Scope {
            bindings: IndexMap::new(),
            parent: Some(self.current),
        };
        let id = self.scopes.push(scope);
        self.current = id;
        id
    }

    /// Pop back to the entered scope's parent. The scope's bindings stay in
    /// the arena; only lookups through `current` stop seeing them.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    /// Whether `name` is already bound directly in `scope` (not walking
    /// parents) — the duplicate-definition check is same-scope only.
    pub fn is_defined_in(&self, scope: ScopeId, name: &str) -> bool {
        self.scopes[scope].bindings.contains_key(name)
    }

    /// Declare `symbol` in `scope`, returning its id.
    pub fn declare_in(&mut self, scope: ScopeId, symbol: Symbol) -> SymbolId {
        let name = symbol.name.clone();
        let id = self.symbols.push(symbol);
        self.scopes[scope].bindings.insert(name, id);
        id
    }

    pub fn declare(&mut self, symbol: Symbol) -> SymbolId {
        self.declare_in(self.current, symbol)
    }

    /// Resolve `name` by walking from `scope` up through parents.
    pub fn resolve_from(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            if let Some(&sym) = self.scopes[id].bindings.get(name) {
                return Some(sym);
            }
            cursor = self.scopes[id].parent;
        }
        None
    }

    pub fn resolve(&self, name: &str) -> Option<SymbolId> {
        self.resolve_from(self.current, name)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id]
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_parent_scopes() {
        let mut tree = ScopeTree::new();
        let outer = tree.declare(Symbol::new("x", Type::I32, false, 1, 1));
        tree.enter_scope();
        assert_eq!(tree.resolve("x"), Some(outer));
    }

    #[test]
    fn exiting_a_scope_hides_its_bindings_from_lookup() {
        let mut tree = ScopeTree::new();
        tree.enter_scope();
        tree.declare(Symbol::new("y", Type::I32, false, 1, 1));
        assert!(tree.resolve("y").is_some());
        tree.exit_scope();
        assert!(tree.resolve("y").is_none());
    }

    #[test]
    fn popped_scope_symbols_remain_in_the_arena() {
        let mut tree = ScopeTree::new();
        let child = tree.enter_scope();
        tree.declare(Symbol::new("y", Type::I32, false, 1, 1));
        tree.exit_scope();
        assert_eq!(tree.scopes[child].bindings.len(), 1);
        assert_eq!(tree.symbols.len(), 1);
    }

    #[test]
    fn same_scope_redefinition_is_detectable() {
        let mut tree = ScopeTree::new();
        let scope = tree.current();
        tree.declare(Symbol::new("x", Type::I32, false, 1, 1));
        assert!(tree.is_defined_in(scope, "x"));
    }

    #[test]
    fn shadowing_in_a_nested_scope_is_not_a_same_scope_redefinition() {
        let mut tree = ScopeTree::new();
        let outer = tree.current();
        tree.declare(Symbol::new("x", Type::I32, false, 1, 1));
        tree.enter_scope();
        assert!(!tree.is_defined_in(tree.current(), "x"));
        assert!(tree.is_defined_in(outer, "x"));
    }
}
