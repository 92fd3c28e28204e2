//! Capability solver: combines per-callable source capabilities across
//! the call graph.
//!
//! Cycles are handled by a pre-pass: every strongly connected component
//! containing a source-declared callable is seeded with the join of its
//! members' source capabilities. The dependent walk over the remaining
//! structure is then well-founded, and memoisation makes it linear in the
//! size of the graph.
//!
//! The solver's cache lives for a single inference run and is not safe to
//! share across threads without external synchronisation.

use std::collections::HashMap;

use indexmap::IndexSet;
use log::debug;

use crate::ast::{
    Attribute, Callable, NamespaceElement, Program, QualName,
};
use crate::call_graph::{self, CallGraph};
use crate::diags::Diagnostic;
use crate::namespace_manager::{self, LookupResult, NamespaceManager};

use super::{join_all, RuntimeCapability};

pub struct CapabilitySolver<'a> {
    manager: &'a NamespaceManager,
    graph: &'a CallGraph,
    /// Initial capability of cycle members after the pre-pass
    cycle_seeds: HashMap<QualName, RuntimeCapability>,
    /// Memoised source capabilities
    source_caps: HashMap<QualName, RuntimeCapability>,
    /// Memoised final capabilities
    cache: HashMap<QualName, RuntimeCapability>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CapabilitySolver<'a> {
    pub fn new(manager: &'a NamespaceManager, graph: &'a CallGraph) -> Self {
        let mut solver = CapabilitySolver {
            manager,
            graph,
            cycle_seeds: HashMap::new(),
            source_caps: HashMap::new(),
            cache: HashMap::new(),
            diagnostics: Vec::new(),
        };
        solver.seed_cycles();
        solver
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn lookup(&self, name: &QualName) -> Option<&'a Callable> {
        match self.manager.try_get_callable(name) {
            LookupResult::Found(c) => Some(c),
            LookupResult::NotFound | LookupResult::Ambiguous => None,
        }
    }

    /// Source capability of a callable: the join of everything its own
    /// body demands. Unresolvable names contribute `Base`.
    fn source_capability(&mut self, name: &QualName) -> RuntimeCapability {
        if let Some(cap) = self.source_caps.get(name) {
            return *cap;
        }
        let cap = match self.lookup(name) {
            Some(callable) => super::source_capability(callable),
            None => RuntimeCapability::Base,
        };
        self.source_caps.insert(name.clone(), cap);
        cap
    }

    /// Seed every call cycle that touches the current compilation with the
    /// join of its members' source capabilities, so the dependent walk
    /// never has to close a fixed point.
    fn seed_cycles(&mut self) {
        for cycle in self.graph.call_cycles() {
            let touches_source = cycle
                .iter()
                .any(|n| self.lookup(n).map(|c| c.is_source_declared()).unwrap_or(false));
            if !touches_source {
                continue;
            }
            let cycle_cap = join_all(
                cycle
                    .iter()
                    .map(|n| self.source_capability(n))
                    .collect::<Vec<_>>(),
            );
            debug!("cycle {:?} seeded with {:?}", cycle, cycle_cap);
            for member in cycle {
                self.cycle_seeds.insert(member, cycle_cap);
            }
        }
    }

    fn initial_capability(&mut self, name: &QualName) -> RuntimeCapability {
        let source = self.source_capability(name);
        match self.cycle_seeds.get(name) {
            Some(seed) => source.combine(*seed),
            None => source,
        }
    }

    /// The capability a callable requires, including everything it
    /// transitively calls.
    pub fn final_capability(&mut self, name: &QualName) -> RuntimeCapability {
        let mut visited = IndexSet::new();
        self.final_capability_inner(name, &mut visited)
    }

    fn final_capability_inner(
        &mut self,
        name: &QualName,
        visited: &mut IndexSet<QualName>,
    ) -> RuntimeCapability {
        if let Some(cap) = self.cache.get(name) {
            return *cap;
        }

        let callable = self.lookup(name);
        let cap = match callable {
            None => {
                debug!("no resolution for callable {}", name);
                self.diagnostics.push(Diagnostic::info(
                    "UnknownCallableReference",
                    vec![name.to_dotted()],
                    crate::ast::Span::generated(),
                ));
                RuntimeCapability::Base
            }
            Some(c) => {
                if let Some(explicit) = namespace_manager::required_capability(&c.attributes) {
                    explicit
                } else if !c.is_source_declared() {
                    RuntimeCapability::Base
                } else {
                    // The visited set follows the current path only; a
                    // back-edge contributes nothing because the cycle
                    // pre-pass already accounted for it.
                    visited.insert(name.clone());
                    let mut cap = self.initial_capability(name);
                    let deps: Vec<QualName> = self
                        .graph
                        .direct_dependencies(name)
                        .map(|(dep, _)| dep.clone())
                        .collect();
                    for dep in deps {
                        if !visited.contains(&dep) {
                            cap = cap.combine(self.final_capability_inner(&dep, visited));
                        }
                    }
                    visited.shift_remove(name);
                    cap
                }
            }
        };

        self.cache.insert(name.clone(), cap);
        cap
    }
}

/// Attach a `RequiresCapability` attribute to every source-declared
/// callable that lacks one. Referenced-library callables and callables
/// with an explicit attribute are left untouched, which makes the
/// operation idempotent.
pub fn infer_capabilities(
    program: &Program,
    manager: &NamespaceManager,
) -> (Program, Vec<Diagnostic>) {
    let graph = CallGraph::build(program);
    let mut solver = CapabilitySolver::new(manager, &graph);

    let mut annotated = program.clone();
    for ns in &mut annotated.namespaces {
        for element in &mut ns.elements {
            let NamespaceElement::Callable(callable) = element else {
                continue;
            };
            if !callable.is_source_declared() {
                continue;
            }
            if namespace_manager::required_capability(&callable.attributes).is_some() {
                continue;
            }
            let capability = solver.final_capability(&callable.name);
            debug!("inferred {:?} for {}", capability, callable.name);
            callable.attributes.push(Attribute::requires_capability(capability));
        }
    }

    (annotated, solver.into_diagnostics())
}

/// Explain capability violations caused by referenced libraries: for every
/// call from a source callable to a reference callable whose body exceeds
/// the target, emit a warning at the call site carrying the reference
/// callable's name, its source file, the offending position inside it, and
/// the original diagnostic arguments.
pub fn diagnose_against_target(
    program: &Program,
    manager: &NamespaceManager,
    target: RuntimeCapability,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for ns in &program.namespaces {
        for callable in ns.callables() {
            if !callable.is_source_declared() {
                continue;
            }
            // Violations inside the source callable itself.
            for pattern in super::analyze_callable(callable) {
                if let Some(diag) = pattern.diagnose(target) {
                    diagnostics.push(diag);
                }
            }
            // Violations inside reference callables it calls directly.
            for (callee, site) in call_graph::collect_call_sites(callable) {
                let LookupResult::Found(reference) = manager.try_get_callable(&callee) else {
                    continue;
                };
                if reference.is_source_declared() {
                    continue;
                }
                for pattern in super::analyze_callable(reference) {
                    if target.supports(pattern.capability) {
                        continue;
                    }
                    let mut arguments = vec![
                        reference.name.to_dotted(),
                        reference.source.path.clone(),
                        pattern.span.to_string(),
                    ];
                    arguments.extend(pattern.arguments.iter().cloned());
                    diagnostics.push(Diagnostic::warning(
                        pattern.code.as_explanatory_warning(),
                        arguments,
                        site.span,
                    ));
                }
            }
        }
    }
    diagnostics
}
