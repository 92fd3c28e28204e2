//! Runtime capability model: the capability lattice, the pattern records
//! produced by the syntax analysers, and the solver that walks the call
//! graph.
//!
//! A capability is a point in a join-semilattice describing what a runtime
//! target must support. The analysers flag syntactic sites with the
//! capability each site demands; the solver joins those per callable and
//! across the call graph.

pub mod array_analyzer;
pub mod result_analyzer;
pub mod solver;
pub mod statement_analyzer;
pub mod type_analyzer;

use crate::ast::{Callable, QualName, ResolvedType, Span};
use crate::call_graph::CallKind;
use crate::diags::{Diagnostic, ErrorCode};

/// A point in the runtime capability lattice. The variants are totally
/// ordered, so `combine` is `max`: associative, commutative, idempotent,
/// with `Base` as the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuntimeCapability {
    /// Quantum gates only; no measurement-dependent classical control
    Base,
    /// Measurements whose results flow only into other quantum operations
    BasicQuantumFunctionality,
    /// Branching on measurement results inside operations
    BasicMeasurementFeedback,
    /// Unrestricted classical computation alongside quantum execution
    FullComputation,
}

impl RuntimeCapability {
    /// Least upper bound of two capabilities.
    pub fn combine(self, other: RuntimeCapability) -> RuntimeCapability {
        self.max(other)
    }

    /// Whether a target with this capability can run code demanding
    /// `required`.
    pub fn supports(self, required: RuntimeCapability) -> bool {
        self >= required
    }

    /// Canonical name, as carried in `RequiresCapability` attributes.
    pub fn name(self) -> &'static str {
        match self {
            RuntimeCapability::Base => "Base",
            RuntimeCapability::BasicQuantumFunctionality => "BasicQuantumFunctionality",
            RuntimeCapability::BasicMeasurementFeedback => "BasicMeasurementFeedback",
            RuntimeCapability::FullComputation => "FullComputation",
        }
    }

    pub fn from_name(name: &str) -> Option<RuntimeCapability> {
        match name {
            "Base" => Some(RuntimeCapability::Base),
            "BasicQuantumFunctionality" => Some(RuntimeCapability::BasicQuantumFunctionality),
            "BasicMeasurementFeedback" => Some(RuntimeCapability::BasicMeasurementFeedback),
            "FullComputation" => Some(RuntimeCapability::FullComputation),
            _ => None,
        }
    }
}

impl Default for RuntimeCapability {
    fn default() -> Self {
        RuntimeCapability::Base
    }
}

/// Join an iterator of capabilities; empty joins to `Base`.
pub fn join_all(caps: impl IntoIterator<Item = RuntimeCapability>) -> RuntimeCapability {
    caps.into_iter()
        .fold(RuntimeCapability::Base, RuntimeCapability::combine)
}

/// A syntactic site flagged by an analyser: the capability the site
/// demands plus everything needed to report it later. Reporting is a pure
/// function of the target capability, so patterns hold no closures.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityPattern {
    pub capability: RuntimeCapability,
    pub code: ErrorCode,
    pub arguments: Vec<String>,
    pub span: Span,
}

impl CapabilityPattern {
    pub fn new(capability: RuntimeCapability, code: ErrorCode, span: Span) -> Self {
        CapabilityPattern {
            capability,
            code,
            arguments: Vec::new(),
            span,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<String>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Produce a diagnostic iff this site exceeds the target capability.
    pub fn diagnose(&self, target: RuntimeCapability) -> Option<Diagnostic> {
        if target.supports(self.capability) {
            None
        } else {
            Some(Diagnostic::error(self.code, self.arguments.clone(), self.span))
        }
    }
}

/// A reference to another callable, recorded for dependency diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct CallPattern {
    pub callee: QualName,
    pub kind: CallKind,
    pub type_args: Vec<(String, ResolvedType)>,
    pub span: Span,
}

/// Run all syntax analysers against a callable's declaration, in a fixed
/// order. The output order is deterministic: analyser order first, source
/// order within each analyser.
pub fn analyze_callable(callable: &Callable) -> Vec<CapabilityPattern> {
    let mut patterns = result_analyzer::analyze_callable(callable);
    patterns.extend(statement_analyzer::analyze_callable(callable));
    patterns.extend(type_analyzer::analyze_callable(callable));
    patterns.extend(array_analyzer::analyze_callable(callable));
    patterns
}

/// The capability a callable's own body demands, before considering its
/// dependencies. Empty pattern set joins to `Base`.
pub fn source_capability(callable: &Callable) -> RuntimeCapability {
    join_all(analyze_callable(callable).into_iter().map(|p| p.capability))
}
