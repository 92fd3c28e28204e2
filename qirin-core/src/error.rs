//! Error types for the qirin compiler core.
//!
//! `CompilerError` covers the fatal invariant violations a pass can hit;
//! everything a user should see travels as a `diags::Diagnostic` instead.
//! The public pipeline surface never lets a `CompilerError` escape: it is
//! converted into an error diagnostic and the original program is returned.

use crate::ast::Span;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompilerError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilerError {
    /// A lambda's parameter symbol tree does not match the input half of
    /// its resolved type. This is an internal invariant of the type
    /// checker; hitting it aborts the lifting pass.
    #[error("lambda parameter shape mismatch at {span}: expected a pattern for `{expected}`, got `{got}`")]
    LambdaShape {
        expected: String,
        got: String,
        span: Span,
    },

    /// A rewriting override returned a node whose resolved type disagrees
    /// with the node it replaced.
    #[error("tree invariant violated at {span}: {message}")]
    TreeInvariant { span: Span, message: String },

    /// A call graph node names a callable with no resolution.
    #[error("unknown callable `{name}`")]
    UnknownCallable { name: String },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Construct a `CompilerError::LambdaShape` at the given span.
#[macro_export]
macro_rules! err_shape_at {
    ($span:expr, $expected:expr, $got:expr) => {
        $crate::error::CompilerError::LambdaShape {
            expected: $expected.to_string(),
            got: $got.to_string(),
            span: $span,
        }
    };
}

/// Construct a `CompilerError::TreeInvariant` at the given span.
#[macro_export]
macro_rules! err_invariant_at {
    ($span:expr, $($arg:tt)*) => {
        $crate::error::CompilerError::TreeInvariant {
            span: $span,
            message: format!($($arg)*),
        }
    };
}

/// Return early with a `CompilerError::TreeInvariant`.
#[macro_export]
macro_rules! bail_invariant_at {
    ($span:expr, $($arg:tt)*) => {
        return Err($crate::err_invariant_at!($span, $($arg)*))
    };
}

/// Construct a `CompilerError::Internal`.
#[macro_export]
macro_rules! err_internal {
    ($($arg:tt)*) => {
        $crate::error::CompilerError::Internal(format!($($arg)*))
    };
}
