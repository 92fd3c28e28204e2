//! Read-only callable lookup shared by the inference passes.
//!
//! The manager is built once from the compiled program plus any
//! referenced-library callables the host supplies, and is consumed
//! read-only by the capability solver.

use indexmap::IndexMap;

use crate::ast::{Attribute, Callable, Program, QualName, Specialization};
use crate::capabilities::RuntimeCapability;

/// Outcome of a callable lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookupResult<'a> {
    Found(&'a Callable),
    NotFound,
    /// More than one declaration carries the same fully-qualified name
    Ambiguous,
}

#[derive(Debug, Clone, Default)]
pub struct NamespaceManager {
    callables: IndexMap<String, Vec<Callable>>,
}

impl NamespaceManager {
    pub fn new() -> Self {
        NamespaceManager::default()
    }

    /// Build a manager over all callables declared in a program.
    pub fn from_program(program: &Program) -> Self {
        let mut manager = NamespaceManager::new();
        for ns in &program.namespaces {
            for callable in ns.callables() {
                manager.add(callable.clone());
            }
        }
        manager
    }

    /// Register callables loaded from referenced libraries.
    pub fn with_references(mut self, references: Vec<Callable>) -> Self {
        for callable in references {
            self.add(callable);
        }
        self
    }

    fn add(&mut self, callable: Callable) {
        self.callables
            .entry(callable.name.to_dotted())
            .or_default()
            .push(callable);
    }

    pub fn try_get_callable(&self, name: &QualName) -> LookupResult {
        match self.callables.get(&name.to_dotted()) {
            None => LookupResult::NotFound,
            Some(decls) if decls.len() == 1 => LookupResult::Found(&decls[0]),
            Some(_) => LookupResult::Ambiguous,
        }
    }

    /// Specializations of a referenced-library callable, for analysis of
    /// imported implementations. Empty for unknown or source callables.
    pub fn imported_specializations(&self, name: &QualName) -> &[Specialization] {
        match self.try_get_callable(name) {
            LookupResult::Found(c) if !c.is_source_declared() => &c.specializations,
            _ => &[],
        }
    }

    /// All registered callables, in registration order.
    pub fn callables(&self) -> impl Iterator<Item = &Callable> {
        self.callables.values().flatten()
    }
}

/// Read an explicitly declared capability requirement off an attribute
/// list, if any.
pub fn required_capability(attributes: &[Attribute]) -> Option<RuntimeCapability> {
    attributes.iter().find_map(|a| a.as_required_capability())
}

/// Map every callable declared in the program by its fully-qualified name.
/// Later declarations with a duplicate name are dropped; lookup through the
/// manager reports those as ambiguous.
pub fn global_callable_resolutions(program: &Program) -> IndexMap<QualName, &Callable> {
    let mut resolutions = IndexMap::new();
    for ns in &program.namespaces {
        for callable in ns.callables() {
            resolutions.entry(callable.name.clone()).or_insert(callable);
        }
    }
    resolutions
}
