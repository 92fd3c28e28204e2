//! Analysis of array constructions and updates.
//!
//! Arrays whose length is only known at runtime require dynamic
//! allocation on the target, and in-place updates at runtime-computed
//! indices require addressable classical memory during quantum execution.

use std::ops::ControlFlow;

use crate::ast::{Callable, CallableKind, ExprKind, TypedExpression};
use crate::diags::ErrorCode;
use crate::visitor::{self, Visitor};

use super::{CapabilityPattern, RuntimeCapability};

pub fn analyze_callable(callable: &Callable) -> Vec<CapabilityPattern> {
    let mut analyzer = ArrayAnalyzer {
        kind: callable.kind,
        patterns: Vec::new(),
    };
    let _ = analyzer.visit_callable(callable);
    analyzer.patterns
}

struct ArrayAnalyzer {
    kind: CallableKind,
    patterns: Vec<CapabilityPattern>,
}

fn is_constant_index(e: &TypedExpression) -> bool {
    matches!(e.kind, ExprKind::IntLiteral(_))
}

impl Visitor for ArrayAnalyzer {
    type Break = ();

    fn visit_expression(&mut self, e: &TypedExpression) -> ControlFlow<()> {
        match &e.kind {
            ExprKind::SizedArray { size, .. } if !is_constant_index(size) => {
                self.patterns.push(CapabilityPattern::new(
                    RuntimeCapability::FullComputation,
                    ErrorCode::UnsupportedDynamicArray,
                    e.span,
                ));
            }
            ExprKind::CopyAndUpdate { index, .. }
                if self.kind == CallableKind::Operation && !is_constant_index(index) =>
            {
                self.patterns.push(CapabilityPattern::new(
                    RuntimeCapability::FullComputation,
                    ErrorCode::UnsupportedArrayUpdate,
                    e.span,
                ));
            }
            ExprKind::Lambda(lambda) => {
                let previous = self.kind;
                self.kind = lambda.kind;
                let flow = visitor::walk_expression(self, e);
                self.kind = previous;
                return flow;
            }
            _ => {}
        }
        visitor::walk_expression(self, e)
    }
}
