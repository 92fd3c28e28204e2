//! Diagnostics produced by the lifting and inference passes.
//!
//! Diagnostics carry a code, ordered string arguments and a span; message
//! text is rendered from the code's template on demand. Spans are 0-based
//! internally and converted to the 1-based wire form by `Diagnostic::to_wire`.

use crate::ast::Span;
use crate::error::CompilerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Hidden,
    Info,
    Warning,
    Error,
}

/// Error codes emitted by the pattern analysers and the passes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnsupportedResultComparison,
    ResultComparisonNotInOperationIf,
    ReturnInResultConditionedBlock,
    SetInResultConditionedBlock,
    UnsupportedClassicalLoop,
    UnsupportedClassicalType,
    UnsupportedDynamicArray,
    UnsupportedArrayUpdate,
    UnknownCallableReference,
    LambdaShapeMismatch,
    TreeInvariantViolation,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedResultComparison => "UnsupportedResultComparison",
            ErrorCode::ResultComparisonNotInOperationIf => "ResultComparisonNotInOperationIf",
            ErrorCode::ReturnInResultConditionedBlock => "ReturnInResultConditionedBlock",
            ErrorCode::SetInResultConditionedBlock => "SetInResultConditionedBlock",
            ErrorCode::UnsupportedClassicalLoop => "UnsupportedClassicalLoop",
            ErrorCode::UnsupportedClassicalType => "UnsupportedClassicalType",
            ErrorCode::UnsupportedDynamicArray => "UnsupportedDynamicArray",
            ErrorCode::UnsupportedArrayUpdate => "UnsupportedArrayUpdate",
            ErrorCode::UnknownCallableReference => "UnknownCallableReference",
            ErrorCode::LambdaShapeMismatch => "LambdaShapeMismatch",
            ErrorCode::TreeInvariantViolation => "TreeInvariantViolation",
        }
    }

    /// The warning code used when this error is reported as an explanatory
    /// diagnostic at a call site, rather than as an error inside the
    /// offending callable itself (which may live in a referenced library).
    pub fn as_explanatory_warning(&self) -> WarningCode {
        match self {
            ErrorCode::UnsupportedResultComparison => WarningCode::UnsupportedResultComparison,
            ErrorCode::ResultComparisonNotInOperationIf => {
                WarningCode::ResultComparisonNotInOperationIf
            }
            ErrorCode::ReturnInResultConditionedBlock => WarningCode::ReturnInResultConditionedBlock,
            ErrorCode::SetInResultConditionedBlock => WarningCode::SetInResultConditionedBlock,
            ErrorCode::UnsupportedClassicalLoop => WarningCode::UnsupportedClassicalLoop,
            ErrorCode::UnsupportedClassicalType => WarningCode::UnsupportedClassicalType,
            ErrorCode::UnsupportedDynamicArray => WarningCode::UnsupportedDynamicArray,
            ErrorCode::UnsupportedArrayUpdate => WarningCode::UnsupportedArrayUpdate,
            ErrorCode::UnknownCallableReference => WarningCode::UnknownCallableReference,
            ErrorCode::LambdaShapeMismatch | ErrorCode::TreeInvariantViolation => {
                WarningCode::InternalIssue
            }
        }
    }
}

/// Warning codes; the analyser codes mirror their error counterparts for
/// explanatory call-site diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    UnsupportedResultComparison,
    ResultComparisonNotInOperationIf,
    ReturnInResultConditionedBlock,
    SetInResultConditionedBlock,
    UnsupportedClassicalLoop,
    UnsupportedClassicalType,
    UnsupportedDynamicArray,
    UnsupportedArrayUpdate,
    UnknownCallableReference,
    InternalIssue,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::UnsupportedResultComparison => "UnsupportedResultComparison",
            WarningCode::ResultComparisonNotInOperationIf => "ResultComparisonNotInOperationIf",
            WarningCode::ReturnInResultConditionedBlock => "ReturnInResultConditionedBlock",
            WarningCode::SetInResultConditionedBlock => "SetInResultConditionedBlock",
            WarningCode::UnsupportedClassicalLoop => "UnsupportedClassicalLoop",
            WarningCode::UnsupportedClassicalType => "UnsupportedClassicalType",
            WarningCode::UnsupportedDynamicArray => "UnsupportedDynamicArray",
            WarningCode::UnsupportedArrayUpdate => "UnsupportedArrayUpdate",
            WarningCode::UnknownCallableReference => "UnknownCallableReference",
            WarningCode::InternalIssue => "InternalIssue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    Error(ErrorCode),
    Warning(WarningCode),
    /// Internal bookkeeping notes (unresolved references etc.)
    Info(&'static str),
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::Error(code) => code.as_str(),
            DiagnosticCode::Warning(code) => code.as_str(),
            DiagnosticCode::Info(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub arguments: Vec<String>,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, arguments: Vec<String>, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code: DiagnosticCode::Error(code),
            arguments,
            span,
        }
    }

    pub fn warning(code: WarningCode, arguments: Vec<String>, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            code: DiagnosticCode::Warning(code),
            arguments,
            span,
        }
    }

    pub fn info(code: &'static str, arguments: Vec<String>, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Info,
            code: DiagnosticCode::Info(code),
            arguments,
            span,
        }
    }

    /// Report a fatal pass failure as an error diagnostic.
    pub fn from_compiler_error(error: &CompilerError) -> Self {
        match error {
            CompilerError::LambdaShape { expected, got, span } => Diagnostic::error(
                ErrorCode::LambdaShapeMismatch,
                vec![expected.clone(), got.clone()],
                *span,
            ),
            CompilerError::TreeInvariant { span, message } => Diagnostic::error(
                ErrorCode::TreeInvariantViolation,
                vec![message.clone()],
                *span,
            ),
            CompilerError::UnknownCallable { name } => Diagnostic::error(
                ErrorCode::UnknownCallableReference,
                vec![name.clone()],
                Span::generated(),
            ),
            CompilerError::Internal(message) => Diagnostic::error(
                ErrorCode::TreeInvariantViolation,
                vec![message.clone()],
                Span::generated(),
            ),
        }
    }

    /// Convert to the 1-based wire form.
    pub fn to_wire(&self) -> WireDiagnostic {
        WireDiagnostic {
            severity: self.severity,
            code: self.code.as_str().to_string(),
            arguments: self.arguments.clone(),
            range: WireRange {
                start: WirePosition {
                    line: self.span.start_line + 1,
                    col: self.span.start_col + 1,
                },
                end: WirePosition {
                    line: self.span.end_line + 1,
                    col: self.span.end_col + 1,
                },
            },
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?} {}", self.severity, self.code.as_str())?;
        if !self.arguments.is_empty() {
            write!(f, "({})", self.arguments.join(", "))?;
        }
        write!(f, " at {}", self.span)
    }
}

// Wire form: 1-based positions, stringly-typed code.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WirePosition {
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireRange {
    pub start: WirePosition,
    pub end: WirePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WireDiagnostic {
    pub severity: Severity,
    pub code: String,
    pub arguments: Vec<String>,
    pub range: WireRange,
}
