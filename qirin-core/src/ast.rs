//! Typed syntax tree for qirin programs.
//!
//! The core consumes programs that have already been parsed, resolved and
//! type checked: every expression carries its resolved type, and every
//! identifier is either a local name or a fully qualified global. Passes
//! treat the tree as an immutable value and produce new trees.

use crate::capabilities::RuntimeCapability;

/// Qualified name representing a path through namespaces to a name.
/// E.g., Microsoft.Quantum.Intrinsic.X is represented as
/// `QualName { qualifiers: ["Microsoft", "Quantum", "Intrinsic"], name: "X" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualName {
    pub qualifiers: Vec<String>,
    pub name: String,
}

impl QualName {
    pub fn new(qualifiers: Vec<String>, name: String) -> Self {
        QualName { qualifiers, name }
    }

    /// Create an unqualified name (no qualifiers)
    pub fn unqualified(name: impl Into<String>) -> Self {
        QualName {
            qualifiers: vec![],
            name: name.into(),
        }
    }

    /// Create a name inside a dotted namespace, e.g. `("A.B", "Foo")`.
    pub fn namespaced(namespace: &str, name: impl Into<String>) -> Self {
        QualName {
            qualifiers: namespace.split('.').map(|s| s.to_string()).collect(),
            name: name.into(),
        }
    }

    /// Get the dotted notation, e.g. "A.B.Foo".
    pub fn to_dotted(&self) -> String {
        if self.qualifiers.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.qualifiers.join("."), self.name)
        }
    }

    /// The namespace part as a dotted string (empty for unqualified names).
    pub fn namespace(&self) -> String {
        self.qualifiers.join(".")
    }
}

impl std::fmt::Display for QualName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_dotted())
    }
}

/// Source location span tracking (line, column) start and end positions.
/// Positions are 0-based internally; the diagnostic wire form is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Span {
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Span {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Span for compiler-generated nodes (all zeros).
    pub fn generated() -> Self {
        Span {
            start_line: 0,
            start_col: 0,
            end_line: 0,
            end_col: 0,
        }
    }

    /// Check if this is a generated span (all zeros)
    pub fn is_generated(&self) -> bool {
        self.start_line == 0 && self.start_col == 0 && self.end_line == 0 && self.end_col == 0
    }

    /// Merge two spans to create a span covering both
    pub fn merge(&self, other: &Span) -> Span {
        let (start_line, start_col) = if self.start_line < other.start_line
            || (self.start_line == other.start_line && self.start_col <= other.start_col)
        {
            (self.start_line, self.start_col)
        } else {
            (other.start_line, other.start_col)
        };

        let (end_line, end_col) = if self.end_line > other.end_line
            || (self.end_line == other.end_line && self.end_col >= other.end_col)
        {
            (self.end_line, self.end_col)
        } else {
            (other.end_line, other.end_col)
        };

        Span {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.start_line == self.end_line {
            write!(f, "{}:{}..{}", self.start_line, self.start_col, self.end_col)
        } else {
            write!(
                f,
                "{}:{}..{}:{}",
                self.start_line, self.start_col, self.end_line, self.end_col
            )
        }
    }
}

/// Whether a callable comes from the current compilation or a referenced library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Declared in a source file of the current compilation
    Source,
    /// Loaded from a referenced library
    Reference,
}

/// The file a declaration originates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub kind: SourceKind,
}

impl SourceFile {
    pub fn source(path: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            kind: SourceKind::Source,
        }
    }

    pub fn reference(path: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            kind: SourceKind::Reference,
        }
    }

    pub fn is_source(&self) -> bool {
        self.kind == SourceKind::Source
    }
}

// =============================================================================
// Program structure
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub namespaces: Vec<Namespace>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub name: QualName,
    pub elements: Vec<NamespaceElement>,
    pub span: Span,
}

impl Namespace {
    /// Iterate over the callables declared in this namespace.
    pub fn callables(&self) -> impl Iterator<Item = &Callable> {
        self.elements.iter().filter_map(|e| match e {
            NamespaceElement::Callable(c) => Some(c),
            NamespaceElement::TypeDecl(_) => None,
        })
    }

    /// Names taken by the namespace's elements (used for fresh-name collision checks).
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| match e {
            NamespaceElement::Callable(c) => c.name.name.as_str(),
            NamespaceElement::TypeDecl(t) => t.name.name.as_str(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceElement {
    Callable(Callable),
    TypeDecl(TypeDecl),
}

/// A user-defined type declaration. Only carried through; the core never
/// rewrites these.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: QualName,
    pub underlying: ResolvedType,
    pub access: Access,
    pub source: SourceFile,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    Function,
    Operation,
    TypeConstructor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Internal,
}

/// Resolved characteristics of an operation (adjointable/controllable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallableInformation {
    pub adjointable: bool,
    pub controllable: bool,
}

impl CallableInformation {
    pub fn empty() -> Self {
        CallableInformation::default()
    }

    pub fn is_empty(&self) -> bool {
        !self.adjointable && !self.controllable
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub type_params: Vec<String>,
    pub input: ResolvedType,
    pub output: ResolvedType,
    pub info: CallableInformation,
}

/// A typed parameter tree. Invariant: the shape matches the signature's
/// input type (a tuple pattern has a tuple type of the same arity).
#[derive(Debug, Clone, PartialEq)]
pub enum ParamPattern {
    Item(ParamItem),
    Tuple(Vec<ParamPattern>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamItem {
    pub name: String,
    pub ty: ResolvedType,
    pub span: Span,
}

impl ParamPattern {
    pub fn item(name: impl Into<String>, ty: ResolvedType) -> Self {
        ParamPattern::Item(ParamItem {
            name: name.into(),
            ty,
            span: Span::generated(),
        })
    }

    /// The type this pattern binds against.
    pub fn ty(&self) -> ResolvedType {
        match self {
            ParamPattern::Item(item) => item.ty.clone(),
            ParamPattern::Tuple(items) => ResolvedType::Tuple(items.iter().map(|p| p.ty()).collect()),
        }
    }

    /// Number of top-level parameters (tuple arity; a single item counts as 1).
    pub fn arity(&self) -> usize {
        match self {
            ParamPattern::Item(_) => 1,
            ParamPattern::Tuple(items) => items.len(),
        }
    }

    /// All variables bound by this pattern, in declaration order.
    pub fn bound_variables(&self) -> Vec<LocalVariable> {
        let mut vars = Vec::new();
        self.collect_bound(&mut vars);
        vars
    }

    fn collect_bound(&self, vars: &mut Vec<LocalVariable>) {
        match self {
            ParamPattern::Item(item) => vars.push(LocalVariable {
                name: item.name.clone(),
                ty: item.ty.clone(),
                mutable: false,
                span: item.span,
            }),
            ParamPattern::Tuple(items) => {
                for item in items {
                    item.collect_bound(vars);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Callable {
    pub name: QualName,
    pub kind: CallableKind,
    pub access: Access,
    pub source: SourceFile,
    pub signature: Signature,
    pub arg_pattern: ParamPattern,
    pub specializations: Vec<Specialization>,
    pub attributes: Vec<Attribute>,
    pub doc: Option<String>,
    pub span: Span,
}

impl Callable {
    /// The body specialization, if one is provided.
    pub fn body_specialization(&self) -> Option<&Specialization> {
        self.specializations.iter().find(|s| s.kind == SpecKind::Body)
    }

    pub fn is_source_declared(&self) -> bool {
        self.source.is_source()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    Body,
    Adjoint,
    Controlled,
    ControlledAdjoint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpecImpl {
    /// A user-provided implementation
    Provided(Scope),
    /// Implemented by the target machine
    Intrinsic,
    /// Implemented in a referenced library without accessible body
    External,
    /// Derived by the compiler from another specialization
    Generated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Specialization {
    pub kind: SpecKind,
    pub implementation: SpecImpl,
    pub span: Span,
}

impl Specialization {
    pub fn provided_body(scope: Scope) -> Self {
        Specialization {
            kind: SpecKind::Body,
            implementation: SpecImpl::Provided(scope),
            span: Span::generated(),
        }
    }

    pub fn scope(&self) -> Option<&Scope> {
        match &self.implementation {
            SpecImpl::Provided(scope) => Some(scope),
            _ => None,
        }
    }
}

/// A local variable known inside a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariable {
    pub name: String,
    pub ty: ResolvedType,
    pub mutable: bool,
    pub span: Span,
}

/// A block of statements together with the variables visible at its entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub known_symbols: Vec<LocalVariable>,
    pub statements: Vec<Statement>,
}

impl Scope {
    pub fn new(statements: Vec<Statement>) -> Self {
        Scope {
            known_symbols: Vec::new(),
            statements,
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StmtKind,
    pub span: Span,
}

impl Statement {
    pub fn new(kind: StmtKind) -> Self {
        Statement {
            kind,
            span: Span::generated(),
        }
    }

    /// Variables this statement introduces into the scope of the statements
    /// that follow it. Loop and qubit bindings scope over their own body
    /// only, so they are not included here.
    pub fn bound_variables(&self) -> Vec<LocalVariable> {
        match &self.kind {
            StmtKind::Let { binding, .. } => binding.bound_variables(false),
            StmtKind::Mutable { binding, .. } => binding.bound_variables(true),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// A bare expression statement
    Expr(TypedExpression),
    /// Immutable binding: `let pat = value;`
    Let {
        binding: SymbolBinding,
        value: TypedExpression,
    },
    /// Mutable binding: `mutable pat = value;`
    Mutable {
        binding: SymbolBinding,
        value: TypedExpression,
    },
    /// Reassignment of a mutable variable: `set name = value;`
    SetVariable { name: String, value: TypedExpression },
    Return(TypedExpression),
    Fail(TypedExpression),
    /// Conditional with zero or more elif branches and an optional else
    If {
        branches: Vec<(TypedExpression, Scope)>,
        default: Option<Scope>,
    },
    For {
        binding: SymbolBinding,
        iterable: TypedExpression,
        body: Scope,
    },
    While {
        condition: TypedExpression,
        body: Scope,
    },
    RepeatUntil {
        body: Scope,
        condition: TypedExpression,
        fixup: Option<Scope>,
    },
    /// Qubit allocation: `use qs = Qubit[count] { body }`
    UseQubits {
        binding: SymbolBinding,
        count: TypedExpression,
        body: Scope,
    },
}

/// The symbol tree on binding sites and lambda parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolBinding {
    Name {
        name: String,
        ty: ResolvedType,
        span: Span,
    },
    Discarded {
        ty: ResolvedType,
        span: Span,
    },
    Tuple(Vec<SymbolBinding>),
}

impl SymbolBinding {
    pub fn name(name: impl Into<String>, ty: ResolvedType) -> Self {
        SymbolBinding::Name {
            name: name.into(),
            ty,
            span: Span::generated(),
        }
    }

    /// All variables bound by this symbol tree, in declaration order.
    pub fn bound_variables(&self, mutable: bool) -> Vec<LocalVariable> {
        let mut vars = Vec::new();
        self.collect_bound(mutable, &mut vars);
        vars
    }

    fn collect_bound(&self, mutable: bool, vars: &mut Vec<LocalVariable>) {
        match self {
            SymbolBinding::Name { name, ty, span } => vars.push(LocalVariable {
                name: name.clone(),
                ty: ty.clone(),
                mutable,
                span: *span,
            }),
            SymbolBinding::Discarded { .. } => {}
            SymbolBinding::Tuple(items) => {
                for item in items {
                    item.collect_bound(mutable, vars);
                }
            }
        }
    }

    /// Names bound by this symbol tree.
    pub fn bound_names(&self) -> Vec<String> {
        self.bound_variables(false).into_iter().map(|v| v.name).collect()
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// Inferred information attached to each typed expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExprInfo {
    /// The expression's value depends on a mutable variable
    pub is_mutable: bool,
    /// The expression depends on qubits allocated in the local scope
    pub has_local_quantum_deps: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpression {
    pub kind: ExprKind,
    pub ty: ResolvedType,
    /// Type-argument resolution at this node (call sites of generic callables)
    pub type_args: Vec<(String, ResolvedType)>,
    pub info: ExprInfo,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultValue {
    Zero,
    One,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// A local variable
    Local(String),
    /// A fully qualified global callable or type constructor
    Global(QualName),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Eq,
    Neq,
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Lt,
    Gt,
}

impl BinOpKind {
    pub fn is_comparison(&self) -> bool {
        matches!(self, BinOpKind::Eq | BinOpKind::Neq)
    }
}

/// An anonymous callable written as an expression. The body is a single
/// expression; statement bodies are desugared before this core runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub kind: CallableKind,
    pub param: SymbolBinding,
    pub body: Box<TypedExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    UnitValue,
    IntLiteral(i64),
    /// Arbitrary precision integer, carried as its decimal source text
    BigIntLiteral(String),
    DoubleLiteral(f64),
    BoolLiteral(bool),
    StringLiteral(String),
    ResultLiteral(ResultValue),
    Identifier(Identifier),
    Tuple(Vec<TypedExpression>),
    ArrayLiteral(Vec<TypedExpression>),
    /// `[value, size = n]` - array of `size` copies of `value`
    SizedArray {
        value: Box<TypedExpression>,
        size: Box<TypedExpression>,
    },
    ArrayItem {
        array: Box<TypedExpression>,
        index: Box<TypedExpression>,
    },
    /// `arr w/ index <- value` - copy of `arr` with element `index` replaced
    CopyAndUpdate {
        array: Box<TypedExpression>,
        index: Box<TypedExpression>,
        value: Box<TypedExpression>,
    },
    BinOp {
        op: BinOpKind,
        lhs: Box<TypedExpression>,
        rhs: Box<TypedExpression>,
    },
    Not(Box<TypedExpression>),
    Neg(Box<TypedExpression>),
    Conditional {
        condition: Box<TypedExpression>,
        then_expr: Box<TypedExpression>,
        else_expr: Box<TypedExpression>,
    },
    /// Application of a callable value to a (possibly tuple) argument.
    /// An argument containing `Missing` makes this a partial application.
    Call {
        callee: Box<TypedExpression>,
        arg: Box<TypedExpression>,
    },
    /// The adjoint functor applied to an operation value
    Adjoint(Box<TypedExpression>),
    /// The controlled functor applied to an operation value
    Controlled(Box<TypedExpression>),
    Lambda(Lambda),
    /// A missing argument item inside a partial application
    Missing,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType {
    Unit,
    Int,
    BigInt,
    Double,
    Bool,
    String,
    Qubit,
    Result,
    Pauli,
    Range,
    Array(Box<ResolvedType>),
    Tuple(Vec<ResolvedType>),
    Function(Box<ResolvedType>, Box<ResolvedType>, CallableInformation),
    Operation(Box<ResolvedType>, Box<ResolvedType>, CallableInformation),
    TypeParameter(String),
    UserDefined(QualName),
}

impl ResolvedType {
    pub fn function(input: ResolvedType, output: ResolvedType) -> Self {
        ResolvedType::Function(Box::new(input), Box::new(output), CallableInformation::empty())
    }

    pub fn operation(input: ResolvedType, output: ResolvedType, info: CallableInformation) -> Self {
        ResolvedType::Operation(Box::new(input), Box::new(output), info)
    }

    /// Input/output halves of a function or operation type.
    pub fn input_output(&self) -> Option<(&ResolvedType, &ResolvedType, &CallableInformation)> {
        match self {
            ResolvedType::Function(i, o, info) | ResolvedType::Operation(i, o, info) => {
                Some((i, o, info))
            }
            _ => None,
        }
    }

    pub fn is_result(&self) -> bool {
        matches!(self, ResolvedType::Result)
    }

    /// Check whether this type or any of its components satisfies `pred`.
    pub fn mentions(&self, pred: &dyn Fn(&ResolvedType) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        match self {
            ResolvedType::Array(inner) => inner.mentions(pred),
            ResolvedType::Tuple(items) => items.iter().any(|t| t.mentions(pred)),
            ResolvedType::Function(i, o, _) | ResolvedType::Operation(i, o, _) => {
                i.mentions(pred) || o.mentions(pred)
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ResolvedType::Unit => write!(f, "Unit"),
            ResolvedType::Int => write!(f, "Int"),
            ResolvedType::BigInt => write!(f, "BigInt"),
            ResolvedType::Double => write!(f, "Double"),
            ResolvedType::Bool => write!(f, "Bool"),
            ResolvedType::String => write!(f, "String"),
            ResolvedType::Qubit => write!(f, "Qubit"),
            ResolvedType::Result => write!(f, "Result"),
            ResolvedType::Pauli => write!(f, "Pauli"),
            ResolvedType::Range => write!(f, "Range"),
            ResolvedType::Array(inner) => write!(f, "{}[]", inner),
            ResolvedType::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            ResolvedType::Function(i, o, _) => write!(f, "({} -> {})", i, o),
            ResolvedType::Operation(i, o, _) => write!(f, "({} => {})", i, o),
            ResolvedType::TypeParameter(name) => write!(f, "'{}", name),
            ResolvedType::UserDefined(name) => write!(f, "{}", name),
        }
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Name of the attribute the capability solver attaches.
pub const REQUIRES_CAPABILITY_ATTRIBUTE: &str = "RequiresCapability";

/// Reason string recorded on inferred capability attributes.
pub const INFERRED_CAPABILITY_REASON: &str = "Inferred automatically by the compiler.";

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub arguments: Vec<String>,
    pub span: Span,
}

impl Attribute {
    /// Build a `RequiresCapability` attribute in its wire form: the
    /// capability's canonical name plus a fixed reason string.
    pub fn requires_capability(capability: RuntimeCapability) -> Self {
        Attribute {
            name: REQUIRES_CAPABILITY_ATTRIBUTE.to_string(),
            arguments: vec![
                capability.name().to_string(),
                INFERRED_CAPABILITY_REASON.to_string(),
            ],
            span: Span::generated(),
        }
    }

    /// Read a capability back out of a `RequiresCapability` attribute.
    pub fn as_required_capability(&self) -> Option<RuntimeCapability> {
        if self.name != REQUIRES_CAPABILITY_ATTRIBUTE {
            return None;
        }
        self.arguments.first().and_then(|s| RuntimeCapability::from_name(s))
    }
}

// =============================================================================
// Typed expression builders
// =============================================================================

/// Constructors for correctly typed expressions, used by the lifter when
/// synthesising replacement nodes and by tests when building input trees.
pub mod build {
    use super::*;

    fn expr(kind: ExprKind, ty: ResolvedType, span: Span) -> TypedExpression {
        TypedExpression {
            kind,
            ty,
            type_args: Vec::new(),
            info: ExprInfo::default(),
            span,
        }
    }

    pub fn unit() -> TypedExpression {
        expr(ExprKind::UnitValue, ResolvedType::Unit, Span::generated())
    }

    pub fn int(value: i64) -> TypedExpression {
        expr(ExprKind::IntLiteral(value), ResolvedType::Int, Span::generated())
    }

    pub fn double(value: f64) -> TypedExpression {
        expr(ExprKind::DoubleLiteral(value), ResolvedType::Double, Span::generated())
    }

    pub fn boolean(value: bool) -> TypedExpression {
        expr(ExprKind::BoolLiteral(value), ResolvedType::Bool, Span::generated())
    }

    pub fn result(value: ResultValue) -> TypedExpression {
        expr(ExprKind::ResultLiteral(value), ResolvedType::Result, Span::generated())
    }

    pub fn local(name: impl Into<String>, ty: ResolvedType) -> TypedExpression {
        expr(
            ExprKind::Identifier(Identifier::Local(name.into())),
            ty,
            Span::generated(),
        )
    }

    pub fn global(name: QualName, ty: ResolvedType) -> TypedExpression {
        expr(
            ExprKind::Identifier(Identifier::Global(name)),
            ty,
            Span::generated(),
        )
    }

    pub fn tuple(items: Vec<TypedExpression>) -> TypedExpression {
        let ty = ResolvedType::Tuple(items.iter().map(|e| e.ty.clone()).collect());
        expr(ExprKind::Tuple(items), ty, Span::generated())
    }

    pub fn call(callee: TypedExpression, arg: TypedExpression, out: ResolvedType) -> TypedExpression {
        expr(
            ExprKind::Call {
                callee: Box::new(callee),
                arg: Box::new(arg),
            },
            out,
            Span::generated(),
        )
    }

    pub fn missing(ty: ResolvedType) -> TypedExpression {
        expr(ExprKind::Missing, ty, Span::generated())
    }

    pub fn bin_op(
        op: BinOpKind,
        lhs: TypedExpression,
        rhs: TypedExpression,
        ty: ResolvedType,
    ) -> TypedExpression {
        expr(
            ExprKind::BinOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
            Span::generated(),
        )
    }

    pub fn lambda(
        kind: CallableKind,
        param: SymbolBinding,
        body: TypedExpression,
        ty: ResolvedType,
    ) -> TypedExpression {
        expr(
            ExprKind::Lambda(Lambda {
                kind,
                param,
                body: Box::new(body),
            }),
            ty,
            Span::generated(),
        )
    }
}
