//! Analysis of measurement-result use.
//!
//! Comparing `Result` values forces the target to feed measurement
//! outcomes back into classical control flow. Inside an operation's `if`
//! condition that takes `BasicMeasurementFeedback`; anywhere else the
//! comparison produces a classical value and takes `FullComputation`.
//! Within a block conditioned on such a comparison, returning early or
//! reassigning a variable declared outside the block also exceeds
//! measurement feedback.

use std::collections::HashSet;
use std::ops::ControlFlow;

use crate::ast::{
    BinOpKind, Callable, CallableKind, ExprKind, Scope, Statement, StmtKind, TypedExpression,
};
use crate::diags::ErrorCode;
use crate::visitor::{self, Visitor};

use super::{CapabilityPattern, RuntimeCapability};

pub fn analyze_callable(callable: &Callable) -> Vec<CapabilityPattern> {
    let mut analyzer = ResultAnalyzer {
        kind: callable.kind,
        in_condition: false,
        conditioned_blocks: Vec::new(),
        patterns: Vec::new(),
    };
    let _ = analyzer.visit_callable(callable);
    analyzer.patterns
}

struct ResultAnalyzer {
    kind: CallableKind,
    /// Currently visiting the condition expression of an `if`
    in_condition: bool,
    /// One entry per enclosing block conditioned on a Result comparison,
    /// holding the names declared inside that block so far
    conditioned_blocks: Vec<HashSet<String>>,
    patterns: Vec<CapabilityPattern>,
}

impl ResultAnalyzer {
    fn in_conditioned_block(&self) -> bool {
        !self.conditioned_blocks.is_empty()
    }

    fn declared_in_conditioned_block(&self, name: &str) -> bool {
        self.conditioned_blocks.iter().any(|block| block.contains(name))
    }

    fn record_declarations(&mut self, names: impl IntoIterator<Item = String>) {
        if let Some(block) = self.conditioned_blocks.last_mut() {
            block.extend(names);
        }
    }

    fn visit_conditioned_scope(&mut self, scope: &Scope) {
        self.conditioned_blocks.push(HashSet::new());
        let _ = self.visit_scope(scope);
        self.conditioned_blocks.pop();
    }
}

/// Does this condition expression contain a comparison of Result values?
fn compares_results(e: &TypedExpression) -> bool {
    struct Finder;
    impl Visitor for Finder {
        type Break = ();

        fn visit_expr_bin_op(
            &mut self,
            _e: &TypedExpression,
            op: BinOpKind,
            lhs: &TypedExpression,
            rhs: &TypedExpression,
        ) -> ControlFlow<()> {
            if op.is_comparison() && (lhs.ty.is_result() || rhs.ty.is_result()) {
                return ControlFlow::Break(());
            }
            visitor::walk_expr_bin_op(self, lhs, rhs)
        }
    }
    Finder.visit_expression(e).is_break()
}

impl Visitor for ResultAnalyzer {
    type Break = ();

    fn visit_statement(&mut self, s: &Statement) -> ControlFlow<()> {
        match &s.kind {
            StmtKind::If { branches, default } => {
                let mut any_conditioned = false;
                for (condition, block) in branches {
                    self.in_condition = true;
                    self.visit_expression(condition)?;
                    self.in_condition = false;

                    if compares_results(condition) {
                        any_conditioned = true;
                        self.visit_conditioned_scope(block);
                    } else {
                        self.visit_scope(block)?;
                    }
                }
                // The else block executes or not depending on the same
                // measurement outcome as the branches before it.
                if let Some(block) = default {
                    if any_conditioned {
                        self.visit_conditioned_scope(block);
                    } else {
                        self.visit_scope(block)?;
                    }
                }
                ControlFlow::Continue(())
            }
            StmtKind::Return(value) => {
                if self.in_conditioned_block() {
                    self.patterns.push(CapabilityPattern::new(
                        RuntimeCapability::FullComputation,
                        ErrorCode::ReturnInResultConditionedBlock,
                        s.span,
                    ));
                }
                self.visit_expression(value)
            }
            StmtKind::SetVariable { name, value } => {
                if self.in_conditioned_block() && !self.declared_in_conditioned_block(name) {
                    self.patterns.push(
                        CapabilityPattern::new(
                            RuntimeCapability::FullComputation,
                            ErrorCode::SetInResultConditionedBlock,
                            s.span,
                        )
                        .with_arguments(vec![name.clone()]),
                    );
                }
                self.visit_expression(value)
            }
            StmtKind::Let { binding, .. } | StmtKind::Mutable { binding, .. } => {
                self.record_declarations(binding.bound_names());
                visitor::walk_statement(self, s)
            }
            _ => visitor::walk_statement(self, s),
        }
    }

    fn visit_expr_bin_op(
        &mut self,
        e: &TypedExpression,
        op: BinOpKind,
        lhs: &TypedExpression,
        rhs: &TypedExpression,
    ) -> ControlFlow<()> {
        if op.is_comparison() && (lhs.ty.is_result() || rhs.ty.is_result()) {
            if self.in_condition && self.kind == CallableKind::Operation {
                self.patterns.push(CapabilityPattern::new(
                    RuntimeCapability::BasicMeasurementFeedback,
                    ErrorCode::UnsupportedResultComparison,
                    e.span,
                ));
            } else {
                self.patterns.push(CapabilityPattern::new(
                    RuntimeCapability::FullComputation,
                    ErrorCode::ResultComparisonNotInOperationIf,
                    e.span,
                ));
            }
        }
        visitor::walk_expr_bin_op(self, lhs, rhs)
    }

    fn visit_expression(&mut self, e: &TypedExpression) -> ControlFlow<()> {
        // Lambda bodies are analysed when the lifted callable is analysed;
        // before lifting they still belong to this callable's body.
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
