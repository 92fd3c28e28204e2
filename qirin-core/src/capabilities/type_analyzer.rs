//! Analysis of types that require higher runtime capability.
//!
//! `BigInt` values need arbitrary-precision arithmetic on the target and
//! demand `FullComputation` everywhere. `Double` values are fine in purely
//! classical functions but demand `FullComputation` when they flow through
//! operation bodies. Flags fire at value sites (literals, identifiers and
//! call results) rather than at every intermediate node.

use std::ops::ControlFlow;

use crate::ast::{Callable, CallableKind, ExprKind, Identifier, ResolvedType, TypedExpression};
use crate::diags::ErrorCode;
use crate::visitor::{self, Visitor};

use super::{CapabilityPattern, RuntimeCapability};

pub fn analyze_callable(callable: &Callable) -> Vec<CapabilityPattern> {
    let mut analyzer = TypeAnalyzer {
        kind: callable.kind,
        patterns: Vec::new(),
    };
    let _ = analyzer.visit_callable(callable);
    analyzer.patterns
}

struct TypeAnalyzer {
    kind: CallableKind,
    patterns: Vec<CapabilityPattern>,
}

impl TypeAnalyzer {
    fn flag_value_site(&mut self, e: &TypedExpression) {
        if e.ty.mentions(&|t| matches!(t, ResolvedType::BigInt)) {
            self.patterns.push(
                CapabilityPattern::new(
                    RuntimeCapability::FullComputation,
                    ErrorCode::UnsupportedClassicalType,
                    e.span,
                )
                .with_arguments(vec!["BigInt".to_string()]),
            );
        } else if self.kind == CallableKind::Operation
            && e.ty.mentions(&|t| matches!(t, ResolvedType::Double))
        {
            self.patterns.push(
                CapabilityPattern::new(
                    RuntimeCapability::FullComputation,
                    ErrorCode::UnsupportedClassicalType,
                    e.span,
                )
                .with_arguments(vec!["Double".to_string()]),
            );
        }
    }
}

impl Visitor for TypeAnalyzer {
    type Break = ();

    fn visit_expression(&mut self, e: &TypedExpression) -> ControlFlow<()> {
        match &e.kind {
            ExprKind::BigIntLiteral(_) | ExprKind::DoubleLiteral(_) | ExprKind::Call { .. } => {
                self.flag_value_site(e);
            }
            ExprKind::Identifier(Identifier::Local(_)) => {
                self.flag_value_site(e);
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
