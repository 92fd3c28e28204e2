//! Visitor pattern for traversing the qirin syntax tree.
//!
//! This module provides the centralized read-only traversal mechanism for
//! typed programs. Each pass (pattern analysis, call graph construction,
//! etc.) implements the Visitor trait and overrides only the hooks it
//! needs, while the walk_* functions handle the actual tree traversal.
//!
//! Children are visited in source order, which scope-tracking passes rely
//! on.

use crate::ast::*;
use std::ops::ControlFlow;

/// Visitor trait for traversing a typed program.
///
/// All methods have default implementations that delegate to walk_*
/// functions. The Break associated type allows visitors to short-circuit
/// traversal with an error or other data.
pub trait Visitor: Sized {
    type Break;

    // --- Top-level program ---
    fn visit_program(&mut self, p: &Program) -> ControlFlow<Self::Break> {
        walk_program(self, p)
    }

    fn visit_namespace(&mut self, ns: &Namespace) -> ControlFlow<Self::Break> {
        walk_namespace(self, ns)
    }

    fn visit_namespace_element(&mut self, e: &NamespaceElement) -> ControlFlow<Self::Break> {
        walk_namespace_element(self, e)
    }

    fn visit_callable(&mut self, c: &Callable) -> ControlFlow<Self::Break> {
        walk_callable(self, c)
    }

    fn visit_type_decl(&mut self, _t: &TypeDecl) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_specialization(&mut self, s: &Specialization) -> ControlFlow<Self::Break> {
        walk_specialization(self, s)
    }

    fn visit_scope(&mut self, s: &Scope) -> ControlFlow<Self::Break> {
        walk_scope(self, s)
    }

    fn visit_statement(&mut self, s: &Statement) -> ControlFlow<Self::Break> {
        walk_statement(self, s)
    }

    // --- Expressions ---
    fn visit_expression(&mut self, e: &TypedExpression) -> ControlFlow<Self::Break> {
        walk_expression(self, e)
    }

    fn visit_expr_identifier(
        &mut self,
        _e: &TypedExpression,
        _id: &Identifier,
    ) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_expr_bin_op(
        &mut self,
        _e: &TypedExpression,
        _op: BinOpKind,
        lhs: &TypedExpression,
        rhs: &TypedExpression,
    ) -> ControlFlow<Self::Break> {
        walk_expr_bin_op(self, lhs, rhs)
    }

    fn visit_expr_call(
        &mut self,
        _e: &TypedExpression,
        callee: &TypedExpression,
        arg: &TypedExpression,
    ) -> ControlFlow<Self::Break> {
        walk_expr_call(self, callee, arg)
    }

    fn visit_expr_lambda(&mut self, _e: &TypedExpression, lambda: &Lambda) -> ControlFlow<Self::Break> {
        walk_expr_lambda(self, lambda)
    }

    // --- Types and bindings ---
    fn visit_type(&mut self, _t: &ResolvedType) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_symbol_binding(&mut self, _b: &SymbolBinding) -> ControlFlow<Self::Break> {
        ControlFlow::Continue(())
    }
}

// --- Walk functions: canonical traversal ---

pub fn walk_program<V: Visitor>(v: &mut V, p: &Program) -> ControlFlow<V::Break> {
    for ns in &p.namespaces {
        v.visit_namespace(ns)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_namespace<V: Visitor>(v: &mut V, ns: &Namespace) -> ControlFlow<V::Break> {
    for element in &ns.elements {
        v.visit_namespace_element(element)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_namespace_element<V: Visitor>(v: &mut V, e: &NamespaceElement) -> ControlFlow<V::Break> {
    match e {
        NamespaceElement::Callable(c) => v.visit_callable(c),
        NamespaceElement::TypeDecl(t) => v.visit_type_decl(t),
    }
}

pub fn walk_callable<V: Visitor>(v: &mut V, c: &Callable) -> ControlFlow<V::Break> {
    v.visit_type(&c.signature.input)?;
    v.visit_type(&c.signature.output)?;
    for spec in &c.specializations {
        v.visit_specialization(spec)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_specialization<V: Visitor>(v: &mut V, s: &Specialization) -> ControlFlow<V::Break> {
    match &s.implementation {
        SpecImpl::Provided(scope) => v.visit_scope(scope),
        SpecImpl::Intrinsic | SpecImpl::External | SpecImpl::Generated => ControlFlow::Continue(()),
    }
}

pub fn walk_scope<V: Visitor>(v: &mut V, s: &Scope) -> ControlFlow<V::Break> {
    for stmt in &s.statements {
        v.visit_statement(stmt)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_statement<V: Visitor>(v: &mut V, s: &Statement) -> ControlFlow<V::Break> {
    match &s.kind {
        StmtKind::Expr(e) | StmtKind::Return(e) | StmtKind::Fail(e) => v.visit_expression(e),
        StmtKind::Let { binding, value } | StmtKind::Mutable { binding, value } => {
            v.visit_symbol_binding(binding)?;
            v.visit_expression(value)
        }
        StmtKind::SetVariable { value, .. } => v.visit_expression(value),
        StmtKind::If { branches, default } => {
            for (condition, block) in branches {
                v.visit_expression(condition)?;
                v.visit_scope(block)?;
            }
            if let Some(block) = default {
                v.visit_scope(block)?;
            }
            ControlFlow::Continue(())
        }
        StmtKind::For {
            binding,
            iterable,
            body,
        } => {
            v.visit_symbol_binding(binding)?;
            v.visit_expression(iterable)?;
            v.visit_scope(body)
        }
        StmtKind::While { condition, body } => {
            v.visit_expression(condition)?;
            v.visit_scope(body)
        }
        StmtKind::RepeatUntil {
            body,
            condition,
            fixup,
        } => {
            v.visit_scope(body)?;
            v.visit_expression(condition)?;
            if let Some(block) = fixup {
                v.visit_scope(block)?;
            }
            ControlFlow::Continue(())
        }
        StmtKind::UseQubits {
            binding,
            count,
            body,
        } => {
            v.visit_symbol_binding(binding)?;
            v.visit_expression(count)?;
            v.visit_scope(body)
        }
    }
}

pub fn walk_expression<V: Visitor>(v: &mut V, e: &TypedExpression) -> ControlFlow<V::Break> {
    match &e.kind {
        ExprKind::UnitValue
        | ExprKind::IntLiteral(_)
        | ExprKind::BigIntLiteral(_)
        | ExprKind::DoubleLiteral(_)
        | ExprKind::BoolLiteral(_)
        | ExprKind::StringLiteral(_)
        | ExprKind::ResultLiteral(_)
        | ExprKind::Missing => ControlFlow::Continue(()),
        ExprKind::Identifier(id) => v.visit_expr_identifier(e, id),
        ExprKind::Tuple(items) | ExprKind::ArrayLiteral(items) => {
            for item in items {
                v.visit_expression(item)?;
            }
            ControlFlow::Continue(())
        }
        ExprKind::SizedArray { value, size } => {
            v.visit_expression(value)?;
            v.visit_expression(size)
        }
        ExprKind::ArrayItem { array, index } => {
            v.visit_expression(array)?;
            v.visit_expression(index)
        }
        ExprKind::CopyAndUpdate {
            array,
            index,
            value,
        } => {
            v.visit_expression(array)?;
            v.visit_expression(index)?;
            v.visit_expression(value)
        }
        ExprKind::BinOp { op, lhs, rhs } => v.visit_expr_bin_op(e, *op, lhs, rhs),
        ExprKind::Not(inner) | ExprKind::Neg(inner) => v.visit_expression(inner),
        ExprKind::Conditional {
            condition,
            then_expr,
            else_expr,
        } => {
            v.visit_expression(condition)?;
            v.visit_expression(then_expr)?;
            v.visit_expression(else_expr)
        }
        ExprKind::Call { callee, arg } => v.visit_expr_call(e, callee, arg),
        ExprKind::Adjoint(inner) | ExprKind::Controlled(inner) => v.visit_expression(inner),
        ExprKind::Lambda(lambda) => v.visit_expr_lambda(e, lambda),
    }
}

pub fn walk_expr_bin_op<V: Visitor>(
    v: &mut V,
    lhs: &TypedExpression,
    rhs: &TypedExpression,
) -> ControlFlow<V::Break> {
    v.visit_expression(lhs)?;
    v.visit_expression(rhs)
}

pub fn walk_expr_call<V: Visitor>(
    v: &mut V,
    callee: &TypedExpression,
    arg: &TypedExpression,
) -> ControlFlow<V::Break> {
    v.visit_expression(callee)?;
    v.visit_expression(arg)
}

pub fn walk_expr_lambda<V: Visitor>(v: &mut V, lambda: &Lambda) -> ControlFlow<V::Break> {
    v.visit_symbol_binding(&lambda.param)?;
    v.visit_expression(&lambda.body)
}
