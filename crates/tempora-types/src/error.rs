//! Errors raised by the value layer

use std::fmt;
use tempora_diagnostics::{ErrorCode, TMP0001, TMP0002, TMP0003, TMP0004};
use thiserror::Error;

/// Result type for value layer operations
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors that can occur while constructing, converting or computing values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A computed value does not fit its target representation
    #[error("Numeric value out of range: {value}")]
    NumericValueOutOfRange { value: String },

    /// Division by an exactly zero divisor
    #[error("Division by zero: {dividend}")]
    DivisionByZero { dividend: String },

    /// A component of a value is invalid
    #[error("Invalid value \"{value}\" for parameter \"{name}\"")]
    InvalidValue { name: String, value: String },

    /// A value cannot be converted to the requested kind
    #[error("Data conversion error converting {from} to {to}")]
    ConversionFailed { from: String, to: String },
}

impl ValueError {
    /// Create an out of range error carrying the offending value
    pub fn out_of_range(value: impl fmt::Display) -> Self {
        Self::NumericValueOutOfRange {
            value: value.to_string(),
        }
    }

    /// Create a division by zero error
    pub fn division_by_zero(dividend: impl fmt::Display) -> Self {
        Self::DivisionByZero {
            dividend: dividend.to_string(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(name: impl Into<String>, value: impl fmt::Display) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value: value.to_string(),
        }
    }

    /// Create a conversion error
    pub fn conversion(from: impl fmt::Display, to: impl fmt::Display) -> Self {
        Self::ConversionFailed {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Diagnostic code of this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NumericValueOutOfRange { .. } => TMP0001,
            Self::DivisionByZero { .. } => TMP0002,
            Self::InvalidValue { .. } => TMP0003,
            Self::ConversionFailed { .. } => TMP0004,
        }
    }
}
