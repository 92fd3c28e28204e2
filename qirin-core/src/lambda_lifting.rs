//! Lambda lifting pass.
//!
//! Rewrites every lambda expression into a reference to a fresh top-level
//! callable in the enclosing namespace. Captured variables become a tuple
//! parameter prefixed to the lambda's own parameters, and the lambda site
//! is replaced by a partial application supplying the captured values:
//!
//! ```text
//! // Before:
//! operation Bar(n : Int) : Unit {
//!     let g = (x -> x + n);
//! }
//!
//! // After:
//! operation Bar(n : Int) : Unit {
//!     let g = __Bar_Lambda_0__(n, _);
//! }
//! function __Bar_Lambda_0__(n : Int, x : Int) : Int {
//!     return x + n;
//! }
//! ```
//!
//! Lambdas are lifted innermost-first, so a nested lambda's captures show
//! up as ordinary free identifiers by the time the enclosing lambda is
//! processed. A lambda whose body captures a mutable variable is left in
//! place: snapshotting the value at the lambda site would change the
//! meaning of later reassignments.

use std::collections::HashSet;
use std::ops::ControlFlow;

use indexmap::IndexSet;
use log::debug;

use crate::ast::*;
use crate::diags::Diagnostic;
use crate::err_shape_at;
use crate::error::Result;
use crate::rewrite::{self, apply_expression, Rewriter};
use crate::scope::{FreshNameSource, ScopeStack};
use crate::visitor::Visitor;

/// Lift every lambda in the program into a top-level callable.
///
/// On success the returned program contains no lambda expressions; source
/// locations of non-lifted constructs are preserved. A fatal invariant
/// violation returns the original program together with an error
/// diagnostic.
pub fn lift_lambdas(program: &Program) -> (Program, Vec<Diagnostic>) {
    let mut lifter = LambdaLifter::new();
    match lifter.map_program(program.clone()) {
        Ok(lifted) => (lifted, Vec::new()),
        Err(error) => {
            debug!("lambda lifting aborted: {}", error);
            (
                program.clone(),
                vec![Diagnostic::from_compiler_error(&error)],
            )
        }
    }
}

/// The callable whose body is currently being rewritten. The lifter
/// temporarily swaps the kind to the lambda's own kind while building a
/// generated callable.
#[derive(Debug, Clone)]
struct CurrentCallable {
    name: QualName,
    kind: CallableKind,
    source: SourceFile,
    type_params: Vec<String>,
}

struct LambdaLifter {
    /// Variables visible at the expression currently being rewritten
    known_vars: ScopeStack<LocalVariable>,
    current: Option<CurrentCallable>,
    namespace: Option<QualName>,
    /// Names already taken in the enclosing namespace
    namespace_symbols: IndexSet<String>,
    /// Callables generated while rewriting the current namespace, drained
    /// into its element list at namespace post-visit
    generated: Vec<Callable>,
    fresh: FreshNameSource,
    discard_counter: u32,
}

impl LambdaLifter {
    fn new() -> Self {
        LambdaLifter {
            known_vars: ScopeStack::new(),
            current: None,
            namespace: None,
            namespace_symbols: IndexSet::new(),
            generated: Vec::new(),
            fresh: FreshNameSource::new(),
            discard_counter: 0,
        }
    }

    /// Compute the generated callable's parameter pattern by matching the
    /// lambda's symbol tree against the input half of its resolved type.
    fn match_lambda_params(
        &mut self,
        param: &SymbolBinding,
        ty: &ResolvedType,
        span: Span,
    ) -> Result<ParamPattern> {
        match (param, ty) {
            (SymbolBinding::Name { name, span, .. }, t) => Ok(ParamPattern::Item(ParamItem {
                name: name.clone(),
                ty: t.clone(),
                span: *span,
            })),
            (SymbolBinding::Discarded { span, .. }, t) => {
                let name = format!("__discarded_{}__", self.discard_counter);
                self.discard_counter += 1;
                Ok(ParamPattern::Item(ParamItem {
                    name,
                    ty: t.clone(),
                    span: *span,
                }))
            }
            (SymbolBinding::Tuple(items), ResolvedType::Unit) if items.is_empty() => {
                Ok(ParamPattern::Item(ParamItem {
                    name: "__lambdaUnitParam__".to_string(),
                    ty: ResolvedType::Unit,
                    span,
                }))
            }
            (SymbolBinding::Tuple(items), ResolvedType::Tuple(types))
                if items.len() == types.len() =>
            {
                let params = items
                    .iter()
                    .zip(types.iter())
                    .map(|(item, item_ty)| self.match_lambda_params(item, item_ty, span))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ParamPattern::Tuple(params))
            }
            (got, expected) => Err(err_shape_at!(span, expected, describe_binding(got))),
        }
    }

    /// Try to lift one lambda expression whose body has already been
    /// rewritten. Returns the replacement expression, or the original
    /// lambda when lifting is refused.
    fn lift_lambda(&mut self, expr: TypedExpression) -> Result<TypedExpression> {
        let ExprKind::Lambda(lambda) = &expr.kind else {
            return Ok(expr);
        };
        let Some((input_ty, output_ty, info)) = expr.ty.input_output() else {
            return Err(err_shape_at!(
                expr.span,
                "a function or operation type",
                expr.ty
            ));
        };
        let (input_ty, output_ty, info) = (input_ty.clone(), output_ty.clone(), *info);

        let lambda_params = self.match_lambda_params(&lambda.param, &input_ty, expr.span)?;

        // Free variables of the body: identifiers used in the body that
        // resolve to bindings of the enclosing callable.
        let bound: HashSet<String> = lambda.param.bound_names().into_iter().collect();
        let used = free_variables(&lambda.body, bound);
        let captured: Vec<LocalVariable> = self
            .known_vars
            .flattened_bindings()
            .into_iter()
            .filter(|(name, _)| used.contains(name))
            .map(|(_, var)| var)
            .collect();

        if captured.iter().any(|var| var.mutable) {
            debug!(
                "not lifting lambda at {}: captures a mutable variable",
                expr.span
            );
            return Ok(expr);
        }

        // The generated callable takes its kind from the lambda itself,
        // not from the enclosing callable; swap the tracked record while
        // the shared lift_body routine runs.
        let lambda_kind = lambda.kind;
        let body = (*lambda.body).clone();
        let saved_kind = self.current.as_ref().map(|c| c.kind);
        if let Some(current) = self.current.as_mut() {
            current.kind = lambda_kind;
        }
        let lifted = self.lift_body(
            expr.span,
            body,
            captured,
            lambda_params,
            input_ty,
            output_ty,
            info,
            expr.ty.clone(),
        );
        if let (Some(current), Some(kind)) = (self.current.as_mut(), saved_kind) {
            current.kind = kind;
        }

        match lifted {
            Some((replacement, callable)) => {
                self.namespace_symbols.insert(callable.name.name.clone());
                self.generated.push(callable);
                Ok(replacement)
            }
            None => Ok(expr),
        }
    }

    /// Build the generated callable and the expression that replaces the
    /// lambda site. The callable's kind comes from the current-callable
    /// record, which the caller has substituted with the lambda's kind.
    /// Returns `None` when lifting would not preserve semantics.
    #[allow(clippy::too_many_arguments)]
    fn lift_body(
        &mut self,
        span: Span,
        body: TypedExpression,
        captured: Vec<LocalVariable>,
        lambda_params: ParamPattern,
        input_ty: ResolvedType,
        output_ty: ResolvedType,
        info: CallableInformation,
        lambda_ty: ResolvedType,
    ) -> Option<(TypedExpression, Callable)> {
        let current = self.current.clone()?;
        let namespace = self.namespace.clone()?;
        let kind = current.kind;

        let symbols = &self.namespace_symbols;
        let name = self
            .fresh
            .fresh(&current.name, "Lambda", |candidate| symbols.contains(candidate));
        let gen_name = QualName::namespaced(&namespace.to_dotted(), name);

        let characteristics = if kind == CallableKind::Operation {
            info
        } else {
            CallableInformation::empty()
        };

        // Parameter pattern: (captured tuple, lambda parameters), or just
        // the lambda parameters when nothing is captured.
        let (arg_pattern, full_input) = if captured.is_empty() {
            (lambda_params, input_ty.clone())
        } else {
            let captured_pattern = if captured.len() == 1 {
                let var = &captured[0];
                ParamPattern::Item(ParamItem {
                    name: var.name.clone(),
                    ty: var.ty.clone(),
                    span: var.span,
                })
            } else {
                ParamPattern::Tuple(
                    captured
                        .iter()
                        .map(|var| {
                            ParamPattern::Item(ParamItem {
                                name: var.name.clone(),
                                ty: var.ty.clone(),
                                span: var.span,
                            })
                        })
                        .collect(),
                )
            };
            let captured_ty = captured_pattern.ty();
            (
                ParamPattern::Tuple(vec![captured_pattern, lambda_params]),
                ResolvedType::Tuple(vec![captured_ty, input_ty.clone()]),
            )
        };

        let gen_ty = match kind {
            CallableKind::Operation => ResolvedType::Operation(
                Box::new(full_input.clone()),
                Box::new(output_ty.clone()),
                characteristics,
            ),
            _ => ResolvedType::Function(
                Box::new(full_input.clone()),
                Box::new(output_ty.clone()),
                characteristics,
            ),
        };

        // The body scope sees exactly the generated callable's parameters:
        // the captured environment plus the lambda's own parameters.
        let scope = Scope {
            known_symbols: arg_pattern.bound_variables(),
            statements: vec![Statement {
                kind: StmtKind::Return(body),
                span,
            }],
        };

        let callable = Callable {
            name: gen_name.clone(),
            kind,
            access: Access::Internal,
            source: current.source.clone(),
            signature: Signature {
                type_params: current.type_params.clone(),
                input: full_input,
                output: output_ty,
                info: characteristics,
            },
            arg_pattern,
            specializations: vec![Specialization {
                kind: SpecKind::Body,
                implementation: SpecImpl::Provided(scope),
                span,
            }],
            attributes: Vec::new(),
            doc: None,
            span,
        };

        // Replacement: a reference to the generated callable, partially
        // applied on the captured values when there are any. Either way
        // the replacement has exactly the lambda's original type.
        let replacement = if captured.is_empty() {
            TypedExpression {
                kind: ExprKind::Identifier(Identifier::Global(gen_name)),
                ty: lambda_ty,
                type_args: Vec::new(),
                info: ExprInfo::default(),
                span,
            }
        } else {
            let captured_expr = if captured.len() == 1 {
                let var = &captured[0];
                build::local(var.name.clone(), var.ty.clone())
            } else {
                build::tuple(
                    captured
                        .iter()
                        .map(|var| build::local(var.name.clone(), var.ty.clone()))
                        .collect(),
                )
            };
            let arg = build::tuple(vec![captured_expr, build::missing(input_ty)]);
            TypedExpression {
                kind: ExprKind::Call {
                    callee: Box::new(build::global(gen_name, gen_ty)),
                    arg: Box::new(arg),
                },
                ty: lambda_ty,
                type_args: Vec::new(),
                info: ExprInfo::default(),
                span,
            }
        };

        Some((replacement, callable))
    }
}

impl Rewriter for LambdaLifter {
    fn map_namespace(&mut self, ns: Namespace) -> Result<Namespace> {
        self.namespace = Some(ns.name.clone());
        self.namespace_symbols = ns.declared_names().map(String::from).collect();

        let mut mapped = rewrite::rewrite_namespace(self, ns)?;

        // Generated callables land at the end of their namespace, in the
        // order they were generated.
        mapped
            .elements
            .extend(self.generated.drain(..).map(NamespaceElement::Callable));
        self.namespace = None;
        Ok(mapped)
    }

    fn map_callable(&mut self, c: Callable) -> Result<Callable> {
        self.current = Some(CurrentCallable {
            name: c.name.clone(),
            kind: c.kind,
            source: c.source.clone(),
            type_params: c.signature.type_params.clone(),
        });
        self.known_vars.push_scope();
        for var in c.arg_pattern.bound_variables() {
            self.known_vars.insert(var.name.clone(), var);
        }

        let mapped = rewrite::rewrite_callable(self, c);

        self.known_vars.pop_scope();
        self.current = None;
        mapped
    }

    fn map_scope(&mut self, s: Scope) -> Result<Scope> {
        self.known_vars.push_scope();
        for var in &s.known_symbols {
            self.known_vars.insert(var.name.clone(), var.clone());
        }

        let mut statements = Vec::with_capacity(s.statements.len());
        for stmt in s.statements {
            let mapped = self.map_statement(stmt)?;
            // A binding becomes visible to the statements that follow it,
            // not inside its own subtree.
            for var in mapped.bound_variables() {
                self.known_vars.insert(var.name.clone(), var);
            }
            statements.push(mapped);
        }

        self.known_vars.pop_scope();
        Ok(Scope {
            known_symbols: s.known_symbols,
            statements,
        })
    }

    fn map_statement(&mut self, s: Statement) -> Result<Statement> {
        let span = s.span;
        match s.kind {
            // Loop and allocation bindings scope over their body only.
            StmtKind::For {
                binding,
                iterable,
                body,
            } => {
                let iterable = apply_expression(self, iterable)?;
                self.known_vars.push_scope();
                for var in binding.bound_variables(false) {
                    self.known_vars.insert(var.name.clone(), var);
                }
                let body = self.map_scope(body)?;
                self.known_vars.pop_scope();
                Ok(Statement {
                    kind: StmtKind::For {
                        binding,
                        iterable,
                        body,
                    },
                    span,
                })
            }
            StmtKind::UseQubits {
                binding,
                count,
                body,
            } => {
                let count = apply_expression(self, count)?;
                self.known_vars.push_scope();
                for var in binding.bound_variables(false) {
                    self.known_vars.insert(var.name.clone(), var);
                }
                let body = self.map_scope(body)?;
                self.known_vars.pop_scope();
                Ok(Statement {
                    kind: StmtKind::UseQubits {
                        binding,
                        count,
                        body,
                    },
                    span,
                })
            }
            kind => rewrite::rewrite_statement(self, Statement { kind, span }),
        }
    }

    fn map_expression(&mut self, e: TypedExpression) -> Result<TypedExpression> {
        match e.kind {
            ExprKind::Lambda(lambda) => {
                // Post-order: lift lambdas inside the body first, with the
                // lambda's parameters in scope.
                self.known_vars.push_scope();
                for var in lambda.param.bound_variables(false) {
                    self.known_vars.insert(var.name.clone(), var);
                }
                let body = apply_expression(self, *lambda.body)?;
                self.known_vars.pop_scope();

                let rebuilt = TypedExpression {
                    kind: ExprKind::Lambda(Lambda {
                        kind: lambda.kind,
                        param: lambda.param,
                        body: Box::new(body),
                    }),
                    ty: e.ty,
                    type_args: e.type_args,
                    info: e.info,
                    span: e.span,
                };
                self.lift_lambda(rebuilt)
            }
            _ => rewrite::rewrite_expression(self, e),
        }
    }
}

fn describe_binding(binding: &SymbolBinding) -> String {
    match binding {
        SymbolBinding::Name { name, .. } => name.clone(),
        SymbolBinding::Discarded { .. } => "_".to_string(),
        SymbolBinding::Tuple(items) => {
            let parts: Vec<String> = items.iter().map(describe_binding).collect();
            format!("({})", parts.join(", "))
        }
    }
}

/// Names used free in an expression: local identifiers not bound by the
/// initial set or by an enclosing lambda parameter inside the expression.
fn free_variables(body: &TypedExpression, initial_bound: HashSet<String>) -> IndexSet<String> {
    struct Collector {
        bound: Vec<HashSet<String>>,
        free: IndexSet<String>,
    }

    impl Collector {
        fn is_bound(&self, name: &str) -> bool {
            self.bound.iter().any(|frame| frame.contains(name))
        }
    }

    impl Visitor for Collector {
        type Break = ();

        fn visit_expr_identifier(
            &mut self,
            _e: &TypedExpression,
            id: &Identifier,
        ) -> ControlFlow<()> {
            if let Identifier::Local(name) = id {
                if !self.is_bound(name) {
                    self.free.insert(name.clone());
                }
            }
            ControlFlow::Continue(())
        }

        fn visit_expr_lambda(&mut self, _e: &TypedExpression, lambda: &Lambda) -> ControlFlow<()> {
            self.bound.push(lambda.param.bound_names().into_iter().collect());
            let flow = self.visit_expression(&lambda.body);
            self.bound.pop();
            flow
        }
    }

    let mut collector = Collector {
        bound: vec![initial_bound],
        free: IndexSet::new(),
    };
    let _ = collector.visit_expression(body);
    collector.free
}
