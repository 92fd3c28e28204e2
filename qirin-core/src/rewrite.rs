//! Rewriting traversal for the qirin syntax tree.
//!
//! The read-only `visitor` module observes trees; this module rebuilds
//! them. A `Rewriter` consumes nodes and returns replacements of the same
//! category, with defaults that recurse into children in source order.
//! Passes override the hooks they care about and delegate back to the
//! rewrite_* functions for everything else.
//!
//! When `type_preserving()` holds (the default), every expression
//! replacement is checked against the resolved type of the node it
//! replaces; a disagreement fails the pass with a tree-invariant error.

use crate::ast::*;
use crate::bail_invariant_at;
use crate::error::Result;

pub trait Rewriter: Sized {
    /// Whether expression rewrites must preserve resolved types.
    fn type_preserving(&self) -> bool {
        true
    }

    fn map_program(&mut self, p: Program) -> Result<Program> {
        rewrite_program(self, p)
    }

    fn map_namespace(&mut self, ns: Namespace) -> Result<Namespace> {
        rewrite_namespace(self, ns)
    }

    fn map_namespace_element(&mut self, e: NamespaceElement) -> Result<NamespaceElement> {
        rewrite_namespace_element(self, e)
    }

    fn map_callable(&mut self, c: Callable) -> Result<Callable> {
        rewrite_callable(self, c)
    }

    fn map_specialization(&mut self, s: Specialization) -> Result<Specialization> {
        rewrite_specialization(self, s)
    }

    fn map_scope(&mut self, s: Scope) -> Result<Scope> {
        rewrite_scope(self, s)
    }

    fn map_statement(&mut self, s: Statement) -> Result<Statement> {
        rewrite_statement(self, s)
    }

    fn map_expression(&mut self, e: TypedExpression) -> Result<TypedExpression> {
        rewrite_expression(self, e)
    }
}

/// Rewrite a child expression, enforcing the type-preservation invariant.
/// All rewrite_* functions route child expressions through here so that
/// overrides of `map_expression` are checked no matter where they fire.
pub fn apply_expression<R: Rewriter>(r: &mut R, e: TypedExpression) -> Result<TypedExpression> {
    let span = e.span;
    let original_ty = e.ty.clone();
    let replaced = r.map_expression(e)?;
    if r.type_preserving() && replaced.ty != original_ty {
        bail_invariant_at!(
            span,
            "expression rewrite changed the resolved type from {} to {}",
            original_ty,
            replaced.ty
        );
    }
    Ok(replaced)
}

pub fn rewrite_program<R: Rewriter>(r: &mut R, p: Program) -> Result<Program> {
    let namespaces = p
        .namespaces
        .into_iter()
        .map(|ns| r.map_namespace(ns))
        .collect::<Result<Vec<_>>>()?;
    Ok(Program { namespaces })
}

pub fn rewrite_namespace<R: Rewriter>(r: &mut R, ns: Namespace) -> Result<Namespace> {
    let elements = ns
        .elements
        .into_iter()
        .map(|e| r.map_namespace_element(e))
        .collect::<Result<Vec<_>>>()?;
    Ok(Namespace {
        name: ns.name,
        elements,
        span: ns.span,
    })
}

pub fn rewrite_namespace_element<R: Rewriter>(
    r: &mut R,
    e: NamespaceElement,
) -> Result<NamespaceElement> {
    match e {
        NamespaceElement::Callable(c) => Ok(NamespaceElement::Callable(r.map_callable(c)?)),
        NamespaceElement::TypeDecl(t) => Ok(NamespaceElement::TypeDecl(t)),
    }
}

pub fn rewrite_callable<R: Rewriter>(r: &mut R, c: Callable) -> Result<Callable> {
    let specializations = c
        .specializations
        .into_iter()
        .map(|s| r.map_specialization(s))
        .collect::<Result<Vec<_>>>()?;
    Ok(Callable {
        name: c.name,
        kind: c.kind,
        access: c.access,
        source: c.source,
        signature: c.signature,
        arg_pattern: c.arg_pattern,
        specializations,
        attributes: c.attributes,
        doc: c.doc,
        span: c.span,
    })
}

pub fn rewrite_specialization<R: Rewriter>(r: &mut R, s: Specialization) -> Result<Specialization> {
    let implementation = match s.implementation {
        SpecImpl::Provided(scope) => SpecImpl::Provided(r.map_scope(scope)?),
        other => other,
    };
    Ok(Specialization {
        kind: s.kind,
        implementation,
        span: s.span,
    })
}

pub fn rewrite_scope<R: Rewriter>(r: &mut R, s: Scope) -> Result<Scope> {
    let statements = s
        .statements
        .into_iter()
        .map(|stmt| r.map_statement(stmt))
        .collect::<Result<Vec<_>>>()?;
    Ok(Scope {
        known_symbols: s.known_symbols,
        statements,
    })
}

pub fn rewrite_statement<R: Rewriter>(r: &mut R, s: Statement) -> Result<Statement> {
    let span = s.span;
    let kind = match s.kind {
        StmtKind::Expr(e) => StmtKind::Expr(apply_expression(r, e)?),
        StmtKind::Let { binding, value } => StmtKind::Let {
            binding,
            value: apply_expression(r, value)?,
        },
        StmtKind::Mutable { binding, value } => StmtKind::Mutable {
            binding,
            value: apply_expression(r, value)?,
        },
        StmtKind::SetVariable { name, value } => StmtKind::SetVariable {
            name,
            value: apply_expression(r, value)?,
        },
        StmtKind::Return(e) => StmtKind::Return(apply_expression(r, e)?),
        StmtKind::Fail(e) => StmtKind::Fail(apply_expression(r, e)?),
        StmtKind::If { branches, default } => {
            let branches = branches
                .into_iter()
                .map(|(cond, block)| Ok((apply_expression(r, cond)?, r.map_scope(block)?)))
                .collect::<Result<Vec<_>>>()?;
            let default = match default {
                Some(block) => Some(r.map_scope(block)?),
                None => None,
            };
            StmtKind::If { branches, default }
        }
        StmtKind::For {
            binding,
            iterable,
            body,
        } => StmtKind::For {
            binding,
            iterable: apply_expression(r, iterable)?,
            body: r.map_scope(body)?,
        },
        StmtKind::While { condition, body } => StmtKind::While {
            condition: apply_expression(r, condition)?,
            body: r.map_scope(body)?,
        },
        StmtKind::RepeatUntil {
            body,
            condition,
            fixup,
        } => StmtKind::RepeatUntil {
            body: r.map_scope(body)?,
            condition: apply_expression(r, condition)?,
            fixup: match fixup {
                Some(block) => Some(r.map_scope(block)?),
                None => None,
            },
        },
        StmtKind::UseQubits {
            binding,
            count,
            body,
        } => StmtKind::UseQubits {
            binding,
            count: apply_expression(r, count)?,
            body: r.map_scope(body)?,
        },
    };
    Ok(Statement { kind, span })
}

pub fn rewrite_expression<R: Rewriter>(r: &mut R, e: TypedExpression) -> Result<TypedExpression> {
    let kind = match e.kind {
        kind @ (ExprKind::UnitValue
        | ExprKind::IntLiteral(_)
        | ExprKind::BigIntLiteral(_)
        | ExprKind::DoubleLiteral(_)
        | ExprKind::BoolLiteral(_)
        | ExprKind::StringLiteral(_)
        | ExprKind::ResultLiteral(_)
        | ExprKind::Identifier(_)
        | ExprKind::Missing) => kind,
        ExprKind::Tuple(items) => ExprKind::Tuple(
            items
                .into_iter()
                .map(|item| apply_expression(r, item))
                .collect::<Result<Vec<_>>>()?,
        ),
        ExprKind::ArrayLiteral(items) => ExprKind::ArrayLiteral(
            items
                .into_iter()
                .map(|item| apply_expression(r, item))
                .collect::<Result<Vec<_>>>()?,
        ),
        ExprKind::SizedArray { value, size } => ExprKind::SizedArray {
            value: Box::new(apply_expression(r, *value)?),
            size: Box::new(apply_expression(r, *size)?),
        },
        ExprKind::ArrayItem { array, index } => ExprKind::ArrayItem {
            array: Box::new(apply_expression(r, *array)?),
            index: Box::new(apply_expression(r, *index)?),
        },
        ExprKind::CopyAndUpdate {
            array,
            index,
            value,
        } => ExprKind::CopyAndUpdate {
            array: Box::new(apply_expression(r, *array)?),
            index: Box::new(apply_expression(r, *index)?),
            value: Box::new(apply_expression(r, *value)?),
        },
        ExprKind::BinOp { op, lhs, rhs } => ExprKind::BinOp {
            op,
            lhs: Box::new(apply_expression(r, *lhs)?),
            rhs: Box::new(apply_expression(r, *rhs)?),
        },
        ExprKind::Not(inner) => ExprKind::Not(Box::new(apply_expression(r, *inner)?)),
        ExprKind::Neg(inner) => ExprKind::Neg(Box::new(apply_expression(r, *inner)?)),
        ExprKind::Conditional {
            condition,
            then_expr,
            else_expr,
        } => ExprKind::Conditional {
            condition: Box::new(apply_expression(r, *condition)?),
            then_expr: Box::new(apply_expression(r, *then_expr)?),
            else_expr: Box::new(apply_expression(r, *else_expr)?),
        },
        ExprKind::Call { callee, arg } => ExprKind::Call {
            callee: Box::new(apply_expression(r, *callee)?),
            arg: Box::new(apply_expression(r, *arg)?),
        },
        ExprKind::Adjoint(inner) => ExprKind::Adjoint(Box::new(apply_expression(r, *inner)?)),
        ExprKind::Controlled(inner) => ExprKind::Controlled(Box::new(apply_expression(r, *inner)?)),
        ExprKind::Lambda(lambda) => ExprKind::Lambda(Lambda {
            kind: lambda.kind,
            param: lambda.param,
            body: Box::new(apply_expression(r, *lambda.body)?),
        }),
    };
    Ok(TypedExpression {
        kind,
        ty: e.ty,
        type_args: e.type_args,
        info: e.info,
        span: e.span,
    })
}
