//! Analysis of statement kinds that exceed `Base`.
//!
//! Arbitrary classical loops inside operation bodies cannot be unrolled
//! ahead of time: a `while` demands full classical computation on the
//! target, and a `repeat-until` loop terminates on a measurement outcome,
//! demanding measurement feedback.

use std::ops::ControlFlow;

use crate::ast::{Callable, CallableKind, ExprKind, Statement, StmtKind, TypedExpression};
use crate::diags::ErrorCode;
use crate::visitor::{self, Visitor};

use super::{CapabilityPattern, RuntimeCapability};

pub fn analyze_callable(callable: &Callable) -> Vec<CapabilityPattern> {
    let mut analyzer = StatementAnalyzer {
        kind: callable.kind,
        patterns: Vec::new(),
    };
    let _ = analyzer.visit_callable(callable);
    analyzer.patterns
}

struct StatementAnalyzer {
    kind: CallableKind,
    patterns: Vec<CapabilityPattern>,
}

impl Visitor for StatementAnalyzer {
    type Break = ();

    fn visit_statement(&mut self, s: &Statement) -> ControlFlow<()> {
        if self.kind == CallableKind::Operation {
            match &s.kind {
                StmtKind::While { .. } => {
                    self.patterns.push(
                        CapabilityPattern::new(
                            RuntimeCapability::FullComputation,
                            ErrorCode::UnsupportedClassicalLoop,
                            s.span,
                        )
                        .with_arguments(vec!["while".to_string()]),
                    );
                }
                StmtKind::RepeatUntil { .. } => {
                    self.patterns.push(
                        CapabilityPattern::new(
                            RuntimeCapability::BasicMeasurementFeedback,
                            ErrorCode::UnsupportedClassicalLoop,
                            s.span,
                        )
                        .with_arguments(vec!["repeat".to_string()]),
                    );
                }
                _ => {}
            }
        }
        visitor::walk_statement(self, s)
    }

    fn visit_expression(&mut self, e: &TypedExpression) -> ControlFlow<()> {
        if let ExprKind::Lambda(lambda) = &e.kind {
            let previous = self.kind;
            self.kind = lambda.kind;
            let flow = visitor::walk_expression(self, e);
            self.kind = previous;
            return flow;
        }
        visitor::walk_expression(self, e)
    }
}
