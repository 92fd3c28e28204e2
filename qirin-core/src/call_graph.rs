//! Call graph over callable names.
//!
//! An edge `u -> v` exists iff `u` mentions `v` anywhere in one of its
//! specializations. Each edge carries the call sites that produced it,
//! with the functor kind and the type-argument resolution at the site.
//!
//! The graph is built once per inference run and read afterwards; cycle
//! enumeration returns the strongly connected components that actually
//! loop (size >= 2, or a single node with a self-edge).

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::ast::{
    Callable, ExprKind, Identifier, Program, QualName, ResolvedType, Span, TypedExpression,
};
use crate::visitor::{self, Visitor};
use std::ops::ControlFlow;

/// How a callable is referenced at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Direct,
    Adjoint,
    Controlled,
}

/// A single reference to a global callable.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite {
    pub kind: CallKind,
    pub type_args: Vec<(String, ResolvedType)>,
    pub span: Span,
}

#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    dependencies: IndexMap<QualName, IndexMap<QualName, Vec<CallSite>>>,
}

impl CallGraph {
    /// Build the call graph of a program from every source-order mention
    /// of a global callable.
    pub fn build(program: &Program) -> Self {
        let mut graph = CallGraph::default();
        for ns in &program.namespaces {
            for callable in ns.callables() {
                // Ensure every declared callable is a node even if it has
                // no outgoing edges.
                graph.dependencies.entry(callable.name.clone()).or_default();
                for (callee, site) in collect_call_sites(callable) {
                    graph.add_dependency(callable.name.clone(), callee, site);
                }
            }
        }
        graph
    }

    fn add_dependency(&mut self, from: QualName, to: QualName, site: CallSite) {
        self.dependencies
            .entry(from)
            .or_default()
            .entry(to)
            .or_default()
            .push(site);
    }

    pub fn nodes(&self) -> impl Iterator<Item = &QualName> {
        self.dependencies.keys()
    }

    pub fn contains_node(&self, node: &QualName) -> bool {
        self.dependencies.contains_key(node)
    }

    /// Direct dependencies of a node with their call sites, in the order
    /// the references appear in the source.
    pub fn direct_dependencies<'g>(
        &'g self,
        node: &QualName,
    ) -> impl Iterator<Item = (&'g QualName, &'g [CallSite])> + 'g {
        self.dependencies
            .get(node)
            .into_iter()
            .flat_map(|deps| deps.iter().map(|(name, sites)| (name, sites.as_slice())))
    }

    /// Enumerate call cycles: strongly connected components of size >= 2,
    /// plus single nodes with a self-edge. Components are returned in a
    /// deterministic order derived from the graph's insertion order.
    pub fn call_cycles(&self) -> Vec<Vec<QualName>> {
        let mut tarjan = Tarjan::new(self);
        for node in self.dependencies.keys() {
            if !tarjan.indices.contains_key(node) {
                tarjan.strong_connect(node);
            }
        }

        tarjan
            .components
            .into_iter()
            .filter(|component| {
                component.len() >= 2 || {
                    let node = &component[0];
                    self.dependencies
                        .get(node)
                        .map(|deps| deps.contains_key(node))
                        .unwrap_or(false)
                }
            })
            .collect()
    }
}

/// Tarjan's strongly-connected-components algorithm over the call graph.
struct Tarjan<'a> {
    graph: &'a CallGraph,
    next_index: usize,
    indices: HashMap<QualName, usize>,
    lowlinks: HashMap<QualName, usize>,
    stack: Vec<QualName>,
    on_stack: HashMap<QualName, bool>,
    components: Vec<Vec<QualName>>,
}

impl<'a> Tarjan<'a> {
    fn new(graph: &'a CallGraph) -> Self {
        Tarjan {
            graph,
            next_index: 0,
            indices: HashMap::new(),
            lowlinks: HashMap::new(),
            stack: Vec::new(),
            on_stack: HashMap::new(),
            components: Vec::new(),
        }
    }

    fn strong_connect(&mut self, node: &QualName) {
        self.indices.insert(node.clone(), self.next_index);
        self.lowlinks.insert(node.clone(), self.next_index);
        self.next_index += 1;
        self.stack.push(node.clone());
        self.on_stack.insert(node.clone(), true);

        let successors: Vec<QualName> = self
            .graph
            .direct_dependencies(node)
            .filter(|(succ, _)| self.graph.contains_node(succ))
            .map(|(succ, _)| succ.clone())
            .collect();

        for succ in successors {
            if !self.indices.contains_key(&succ) {
                self.strong_connect(&succ);
                let low = self.lowlinks[&succ].min(self.lowlinks[node]);
                self.lowlinks.insert(node.clone(), low);
            } else if self.on_stack.get(&succ).copied().unwrap_or(false) {
                let low = self.indices[&succ].min(self.lowlinks[node]);
                self.lowlinks.insert(node.clone(), low);
            }
        }

        if self.lowlinks[node] == self.indices[node] {
            let mut component = Vec::new();
            while let Some(member) = self.stack.pop() {
                self.on_stack.insert(member.clone(), false);
                let done = member == *node;
                component.push(member);
                if done {
                    break;
                }
            }
            component.reverse();
            self.components.push(component);
        }
    }
}

/// Collect every global callable reference inside a callable's
/// specializations, with the functor kind in effect at the reference.
pub fn collect_call_sites(callable: &Callable) -> Vec<(QualName, CallSite)> {
    let mut collector = CallSiteCollector {
        functor: CallKind::Direct,
        sites: Vec::new(),
    };
    let _ = collector.visit_callable(callable);
    collector.sites
}

struct CallSiteCollector {
    functor: CallKind,
    sites: Vec<(QualName, CallSite)>,
}

impl Visitor for CallSiteCollector {
    type Break = ();

    fn visit_expression(&mut self, e: &TypedExpression) -> ControlFlow<()> {
        match &e.kind {
            ExprKind::Adjoint(inner) => {
                let previous = self.functor;
                self.functor = CallKind::Adjoint;
                self.visit_expression(inner)?;
                self.functor = previous;
                ControlFlow::Continue(())
            }
            ExprKind::Controlled(inner) => {
                let previous = self.functor;
                self.functor = CallKind::Controlled;
                self.visit_expression(inner)?;
                self.functor = previous;
                ControlFlow::Continue(())
            }
            _ => visitor::walk_expression(self, e),
        }
    }

    fn visit_expr_identifier(&mut self, e: &TypedExpression, id: &Identifier) -> ControlFlow<()> {
        if let Identifier::Global(name) = id {
            self.sites.push((
                name.clone(),
                CallSite {
                    kind: self.functor,
                    type_args: e.type_args.clone(),
                    span: e.span,
                },
            ));
        }
        ControlFlow::Continue(())
    }
}
