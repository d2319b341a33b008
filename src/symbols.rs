//! Scoped symbol table
//!
//! - [`Symbol`]: one declared name (variable, array or function)
//! - [`SymbolTable`]: the active scope chain, innermost scope last
//!
//! # Scoping
//!
//! Names are unique within one scope.  A nested scope may shadow a name from
//! any enclosing scope; lookups walk from the innermost scope outward and
//! return the first match.

use crate::parser::ast::ExprType;
use rustc_hash::FxHashMap;

/// What a function symbol records about its function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub return_type: ExprType,
    pub param_types: Vec<ExprType>,
    pub param_names: Vec<String>,
    /// Entry label of the function's code; calls name this label.  The
    /// `Function` statement owns the body itself.
    pub body_label: String,
    /// Name bound by the body's trailing `return`, known once the body is parsed.
    pub ret: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable,
    Function(FunctionSignature),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub type_name: ExprType,
    /// First array bound; `None` when the name is not an array.
    pub val_x: Option<u32>,
    /// Second bound of a `[x:y]` declaration.
    pub val_y: Option<u32>,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn variable(name: impl Into<String>, type_name: ExprType) -> Self {
        Symbol {
            name: name.into(),
            type_name,
            val_x: None,
            val_y: None,
            kind: SymbolKind::Variable,
        }
    }

    pub fn array(
        name: impl Into<String>,
        type_name: ExprType,
        val_x: u32,
        val_y: Option<u32>,
    ) -> Self {
        Symbol {
            val_x: Some(val_x),
            val_y,
            ..Symbol::variable(name, type_name)
        }
    }

    pub fn function(name: impl Into<String>, signature: FunctionSignature) -> Self {
        Symbol {
            name: name.into(),
            type_name: signature.return_type,
            val_x: None,
            val_y: None,
            kind: SymbolKind::Function(signature),
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function(_))
    }

    pub fn is_array(&self) -> bool {
        self.val_x.is_some()
    }

    pub fn signature(&self) -> Option<&FunctionSignature> {
        match &self.kind {
            SymbolKind::Function(signature) => Some(signature),
            SymbolKind::Variable => None,
        }
    }

    pub fn signature_mut(&mut self) -> Option<&mut FunctionSignature> {
        match &mut self.kind {
            SymbolKind::Function(signature) => Some(signature),
            SymbolKind::Variable => None,
        }
    }
}

/// Stack of scopes; the last one is the active scope.
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<FxHashMap<String, Symbol>>,
}

impl SymbolTable {
    /// An empty table with no active scope.
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Enter a new scope enclosed by the current one.
    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
        log::debug!("entered scope {}", self.scopes.len());
    }

    /// Leave the current scope; the enclosing scope becomes active again.
    pub fn pop_scope(&mut self) {
        if self.scopes.pop().is_some() {
            log::debug!("left scope {}", self.scopes.len() + 1);
        }
    }

    /// Number of active scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Add `symbol` to the innermost scope. Returns false, leaving the table
    /// untouched, when that scope already holds `name` or no scope is active.
    pub fn insert(&mut self, name: &str, symbol: Symbol) -> bool {
        let depth = self.scopes.len();
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.contains_key(name) {
            return false;
        }
        log::debug!("declared '{}' ({}) in scope {}", name, symbol.type_name, depth);
        scope.insert(name.to_string(), symbol);
        true
    }

    /// Innermost declaration of `name`, if any.
    pub fn find(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name))
    }
}
