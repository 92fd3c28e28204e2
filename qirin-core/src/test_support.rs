//! Shared helpers for building typed test programs.

use std::ops::ControlFlow;

use crate::ast::{build, *};
use crate::capabilities::RuntimeCapability;
use crate::visitor::{self, Visitor};

pub fn test_span() -> Span {
    Span::new(2, 4, 2, 9)
}

pub fn stmt(kind: StmtKind) -> Statement {
    Statement {
        kind,
        span: test_span(),
    }
}

pub fn let_stmt(name: &str, value: TypedExpression) -> Statement {
    let ty = value.ty.clone();
    stmt(StmtKind::Let {
        binding: SymbolBinding::name(name, ty),
        value,
    })
}

pub fn mutable_stmt(name: &str, value: TypedExpression) -> Statement {
    let ty = value.ty.clone();
    stmt(StmtKind::Mutable {
        binding: SymbolBinding::name(name, ty),
        value,
    })
}

pub fn set_stmt(name: &str, value: TypedExpression) -> Statement {
    stmt(StmtKind::SetVariable {
        name: name.to_string(),
        value,
    })
}

pub fn return_stmt(value: TypedExpression) -> Statement {
    stmt(StmtKind::Return(value))
}

pub fn expr_stmt(value: TypedExpression) -> Statement {
    stmt(StmtKind::Expr(value))
}

pub fn while_stmt(condition: TypedExpression, body: Vec<Statement>) -> Statement {
    stmt(StmtKind::While {
        condition,
        body: Scope::new(body),
    })
}

/// A comparison of two Result literals.
pub fn result_compare() -> TypedExpression {
    build::bin_op(
        BinOpKind::Eq,
        build::result(ResultValue::Zero),
        build::result(ResultValue::One),
        ResolvedType::Bool,
    )
}

/// `if <result comparison> { then_stmts }`
pub fn if_result_stmt(then_stmts: Vec<Statement>) -> Statement {
    stmt(StmtKind::If {
        branches: vec![(result_compare(), Scope::new(then_stmts))],
        default: None,
    })
}

pub fn unit_op_ty() -> ResolvedType {
    ResolvedType::operation(
        ResolvedType::Unit,
        ResolvedType::Unit,
        CallableInformation::empty(),
    )
}

/// A fully applied call to the operation `Test.<name> : Unit => Unit`.
pub fn call_test_op(name: &str) -> TypedExpression {
    build::call(
        build::global(QualName::namespaced("Test", name), unit_op_ty()),
        build::unit(),
        ResolvedType::Unit,
    )
}

// =============================================================================
// Callable / program builders
// =============================================================================

pub struct CallableBuilder {
    name: QualName,
    kind: CallableKind,
    source: SourceFile,
    params: Vec<(String, ResolvedType)>,
    output: ResolvedType,
    attributes: Vec<Attribute>,
}

impl CallableBuilder {
    fn new(kind: CallableKind, name: &str) -> Self {
        CallableBuilder {
            name: QualName::namespaced("Test", name),
            kind,
            source: SourceFile::source("test.qn"),
            params: Vec::new(),
            output: ResolvedType::Unit,
            attributes: Vec::new(),
        }
    }

    pub fn operation(name: &str) -> Self {
        CallableBuilder::new(CallableKind::Operation, name)
    }

    pub fn function(name: &str) -> Self {
        CallableBuilder::new(CallableKind::Function, name)
    }

    /// Mark as loaded from a referenced library.
    pub fn reference(mut self) -> Self {
        self.source = SourceFile::reference("library.qn");
        self
    }

    pub fn param(mut self, name: &str, ty: ResolvedType) -> Self {
        self.params.push((name.to_string(), ty));
        self
    }

    pub fn returns(mut self, ty: ResolvedType) -> Self {
        self.output = ty;
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn body(self, statements: Vec<Statement>) -> Callable {
        let (arg_pattern, input) = match self.params.len() {
            0 => (ParamPattern::Tuple(Vec::new()), ResolvedType::Unit),
            1 => {
                let (name, ty) = self.params.into_iter().next().unwrap();
                (ParamPattern::item(name, ty.clone()), ty)
            }
            _ => {
                let items: Vec<ParamPattern> = self
                    .params
                    .iter()
                    .map(|(name, ty)| ParamPattern::item(name.clone(), ty.clone()))
                    .collect();
                let input = ResolvedType::Tuple(self.params.into_iter().map(|(_, ty)| ty).collect());
                (ParamPattern::Tuple(items), input)
            }
        };

        let mut scope = Scope::new(statements);
        scope.known_symbols = arg_pattern.bound_variables();

        Callable {
            name: self.name,
            kind: self.kind,
            access: Access::Public,
            source: self.source,
            signature: Signature {
                type_params: Vec::new(),
                input,
                output: self.output,
                info: CallableInformation::empty(),
            },
            arg_pattern,
            specializations: vec![Specialization::provided_body(scope)],
            attributes: self.attributes,
            doc: None,
            span: test_span(),
        }
    }
}

/// Wrap callables into a single `Test` namespace.
pub fn program_of(callables: Vec<Callable>) -> Program {
    Program {
        namespaces: vec![Namespace {
            name: QualName::unqualified("Test"),
            elements: callables.into_iter().map(NamespaceElement::Callable).collect(),
            span: test_span(),
        }],
    }
}

// =============================================================================
// Assertions over programs
// =============================================================================

pub fn find_callable<'a>(program: &'a Program, name: &str) -> Option<&'a Callable> {
    program
        .namespaces
        .iter()
        .flat_map(|ns| ns.callables())
        .find(|c| c.name.name == name)
}

pub fn body_statements(callable: &Callable) -> &[Statement] {
    callable
        .body_specialization()
        .and_then(|s| s.scope())
        .map(|scope| scope.statements.as_slice())
        .unwrap_or(&[])
}

/// Count lambda expressions anywhere in the program.
pub fn count_lambdas(program: &Program) -> usize {
    struct Counter {
        count: usize,
    }
    impl Visitor for Counter {
        type Break = ();
        fn visit_expr_lambda(&mut self, _e: &TypedExpression, lambda: &Lambda) -> ControlFlow<()> {
            self.count += 1;
            visitor::walk_expr_lambda(self, lambda)
        }
    }
    let mut counter = Counter { count: 0 };
    let _ = counter.visit_program(program);
    counter.count
}

/// The capability recorded on a callable's `RequiresCapability` attribute.
pub fn capability_attr(callable: &Callable) -> Option<RuntimeCapability> {
    callable.attributes.iter().find_map(|a| a.as_required_capability())
}
