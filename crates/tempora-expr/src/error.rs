//! Evaluation errors for interval expressions

use tempora_diagnostics::{ErrorCode, TMP0100, TMP0200, TMP0201, TMP0900};
use tempora_types::ValueError;
use thiserror::Error;

/// Result type for construction and evaluation of expressions
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur while building or evaluating an expression
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Error from the value layer, propagated unchanged
    #[error(transparent)]
    Value(#[from] ValueError),

    /// Operand types the operation is not defined for
    #[error("Incompatible operand types for {operation}: {left} and {right}")]
    IncompatibleOperands {
        operation: String,
        left: String,
        right: String,
    },

    /// Column reference evaluated before it was mapped to a row slot
    #[error("Column not mapped: {name}")]
    UnmappedColumn { name: String },

    /// Sub-expression or row slot index out of bounds
    #[error("Index {index} out of bounds")]
    IndexOutOfBounds { index: usize },

    /// Internal error (should not happen)
    #[error("Internal evaluation error: {message}")]
    Internal { message: String },
}

impl EvalError {
    /// Create an incompatible operands error
    pub fn incompatible(
        operation: impl Into<String>,
        left: impl ToString,
        right: impl ToString,
    ) -> Self {
        Self::IncompatibleOperands {
            operation: operation.into(),
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    /// Create an unmapped column error
    pub fn unmapped_column(name: impl Into<String>) -> Self {
        Self::UnmappedColumn { name: name.into() }
    }

    /// Create an index out of bounds error
    pub fn index_out_of_bounds(index: usize) -> Self {
        Self::IndexOutOfBounds { index }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        log::debug!("internal evaluation error: {message}");
        Self::Internal { message }
    }

    /// Diagnostic code of this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Value(e) => e.code(),
            Self::IncompatibleOperands { .. } => TMP0100,
            Self::UnmappedColumn { .. } => TMP0200,
            Self::IndexOutOfBounds { .. } => TMP0201,
            Self::Internal { .. } => TMP0900,
        }
    }

    /// Check if this error signals a broken contract rather than bad data
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempora_diagnostics::TMP0002;

    #[test]
    fn test_value_errors_pass_through() {
        let err: EvalError = ValueError::division_by_zero(10).into();
        assert_eq!(err.code(), TMP0002);
        assert_eq!(err.to_string(), "Division by zero: 10");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_codes() {
        assert!(EvalError::incompatible("+", "TIME", "INTERVAL YEAR").code().is_type_error());
        assert!(EvalError::unmapped_column("A").code().is_evaluation_error());
        assert!(EvalError::internal("type=Time").is_internal());
        assert!(EvalError::internal("type=Time").code().is_internal());
    }
}
