//! Exact SQL interval and date/time arithmetic
//!
//! This crate provides the temporal arithmetic of a SQL engine:
//! - Interval values of the year-month and day-time families
//! - Date, time and timestamp values with and without time zone offsets
//! - Static result types of interval expressions
//! - Evaluation of interval arithmetic without loss of precision
//!
//! # Example
//!
//! ```ignore
//! use tempora::{EvaluationContext, Expression, IntervalOpType, IntervalOperation};
//!
//! let op = IntervalOperation::new(
//!     IntervalOpType::DatetimeMinusDatetime,
//!     Expression::constant(finished),
//!     Expression::constant(started),
//! )?;
//! let elapsed = op.evaluate(&EvaluationContext::new())?;
//! ```

// Re-export all public APIs from internal crates
pub use tempora_diagnostics as diagnostics;
pub use tempora_expr as expr;
pub use tempora_types as types;

// Convenience re-exports
pub use tempora_diagnostics::ErrorCode;
pub use tempora_expr::{
    EvalError, EvalResult, EvaluationContext, Expression, IntervalOpType, IntervalOperation,
    SessionSettings,
};
pub use tempora_types::{IntervalQualifier, IntervalValue, TypeInfo, Value, ValueType};
