//! Scope tracking for tree traversals.
//!
//! `ScopeStack` maintains the set of variables in scope at every point of
//! a traversal. Bindings keep their insertion order so that passes which
//! enumerate the visible environment (free-variable capture in particular)
//! see variables in declaration order.
//!
//! `FreshNameSource` names compiler-generated symbols so they are unique
//! within their enclosing namespace.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::ast::QualName;

/// A single scope containing variable bindings, in insertion order.
#[derive(Debug, Clone)]
pub struct Scope<T> {
    bindings: IndexMap<String, T>,
}

impl<T: Clone> Default for Scope<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Scope<T> {
    pub fn new() -> Self {
        Scope {
            bindings: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, name: String, value: T) {
        self.bindings.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.bindings.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.bindings.iter()
    }
}

/// A stack-based scope manager that tracks nested scopes
#[derive(Debug, Clone)]
pub struct ScopeStack<T> {
    scopes: Vec<Scope<T>>,
}

impl<T: Clone> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ScopeStack<T> {
    /// Create a new scope stack with a global scope
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![Scope::new()],
        }
    }

    /// Push a new scope onto the stack
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pop the current scope from the stack.
    /// Returns None if trying to pop the global scope.
    pub fn pop_scope(&mut self) -> Option<Scope<T>> {
        if self.scopes.len() > 1 { self.scopes.pop() } else { None }
    }

    /// Insert a binding in the current (innermost) scope
    pub fn insert(&mut self, name: String, value: T) {
        if let Some(current_scope) = self.scopes.last_mut() {
            current_scope.insert(name, value);
        }
    }

    /// Look up a binding, searching from innermost to outermost scope.
    pub fn lookup(&self, name: &str) -> Option<&T> {
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.get(name) {
                return Some(value);
            }
        }
        None
    }

    /// Check if a name is defined in any scope
    pub fn is_defined(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains_key(name))
    }

    /// Get the current scope depth (0 = global scope)
    pub fn depth(&self) -> usize {
        self.scopes.len().saturating_sub(1)
    }

    /// All visible bindings in declaration order (outermost scope first,
    /// insertion order within each scope). Shadowed names appear once, at
    /// their first declaration position, with the innermost value.
    pub fn flattened_bindings(&self) -> Vec<(String, T)> {
        let mut flat: IndexMap<String, T> = IndexMap::new();
        for scope in &self.scopes {
            for (name, value) in scope.iter() {
                // Overwriting keeps the original position in an IndexMap.
                flat.insert(name.clone(), value.clone());
            }
        }
        flat.into_iter().collect()
    }
}

/// Names fresh symbols unique within their enclosing namespace.
///
/// Each enclosing callable gets its own monotonically increasing counter,
/// keyed by a hash of the callable's fully-qualified name; candidates are
/// checked against the namespace's symbol table and the counter advances
/// past collisions.
#[derive(Debug, Clone, Default)]
pub struct FreshNameSource {
    counters: HashMap<u64, u32>,
}

impl FreshNameSource {
    pub fn new() -> Self {
        FreshNameSource::default()
    }

    /// Generate a name of the form `__{parent}_{prefix}_{n}__` that is not
    /// already taken according to `is_taken`.
    pub fn fresh(
        &mut self,
        parent: &QualName,
        prefix: &str,
        mut is_taken: impl FnMut(&str) -> bool,
    ) -> String {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        parent.to_dotted().hash(&mut hasher);
        let key = hasher.finish();

        let counter = self.counters.entry(key).or_insert(0);
        loop {
            let candidate = format!("__{}_{}_{}__", parent.name, prefix, *counter);
            *counter += 1;
            if !is_taken(&candidate) {
                return candidate;
            }
        }
    }
}
