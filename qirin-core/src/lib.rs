pub mod ast;
pub mod call_graph;
pub mod capabilities;
pub mod diags;
pub mod error;
pub mod namespace_manager;
pub mod rewrite;
pub mod scope;
pub mod visitor;

pub mod lambda_lifting;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod analyzer_tests;
#[cfg(test)]
mod call_graph_tests;
#[cfg(test)]
mod capability_tests;
#[cfg(test)]
mod solver_tests;

use ast::Program;
use diags::Diagnostic;
use namespace_manager::NamespaceManager;

// Re-export key types for the public API
pub use ast::{Callable, Namespace, QualName, TypedExpression};
pub use capabilities::RuntimeCapability;

/// Lift every lambda expression into a fresh top-level callable.
/// See `lambda_lifting` for the full contract.
pub fn lift_lambdas(program: &Program) -> (Program, Vec<Diagnostic>) {
    lambda_lifting::lift_lambdas(program)
}

/// Attach inferred `RequiresCapability` attributes to source callables.
/// See `capabilities::solver` for the full contract.
pub fn infer_capabilities(
    program: &Program,
    manager: &NamespaceManager,
) -> (Program, Vec<Diagnostic>) {
    capabilities::solver::infer_capabilities(program, manager)
}

// =============================================================================
// Typestate pipeline
// =============================================================================
//
// Each struct represents a stage of the core; methods consume `self` and
// return the next stage, enforcing valid ordering:
//
//   let typed = Typed::new(program);
//     -> typed.lift_lambdas()                      -> Lifted
//       -> .infer_capabilities(&manager)           -> Annotated
//
// Both stages collect their diagnostics rather than failing; a fatal
// invariant violation surfaces as an error diagnostic with the stage's
// input program passed through unchanged.

/// A fully type-checked program, as handed over by the front end.
pub struct Typed {
    pub program: Program,
}

impl Typed {
    pub fn new(program: Program) -> Self {
        Typed { program }
    }

    /// Run the lambda lifting pass.
    pub fn lift_lambdas(self) -> Lifted {
        let (program, diagnostics) = lambda_lifting::lift_lambdas(&self.program);
        Lifted {
            program,
            diagnostics,
        }
    }
}

/// Lambdas have been lifted into top-level callables.
pub struct Lifted {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl Lifted {
    /// Run capability inference over the lifted program.
    pub fn infer_capabilities(self, manager: &NamespaceManager) -> Annotated {
        let (program, mut diagnostics) =
            capabilities::solver::infer_capabilities(&self.program, manager);
        let mut all = self.diagnostics;
        all.append(&mut diagnostics);
        Annotated {
            program,
            diagnostics: all,
        }
    }
}

/// Every source callable carries a capability attribute.
pub struct Annotated {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}
