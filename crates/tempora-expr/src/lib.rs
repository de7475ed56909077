//! Interval arithmetic expressions
//!
//! This crate evaluates SQL arithmetic that involves intervals:
//!
//! - **Interval operators**: `INTERVAL ± INTERVAL`, `INTERVAL / INTERVAL`,
//!   `INTERVAL * NUMERIC`, `INTERVAL / NUMERIC`
//! - **Date/time operators**: `DATETIME ± INTERVAL`, `DATETIME - DATETIME`
//!
//! # Example
//!
//! ```ignore
//! use tempora_expr::{EvaluationContext, Expression, IntervalOpType, IntervalOperation};
//!
//! let op = IntervalOperation::new(IntervalOpType::IntervalPlusInterval, one_month, one_year)?;
//! let value = op.evaluate(&EvaluationContext::new())?;
//! ```
//!
//! # Architecture
//!
//! - `Expression`: the expression tree the operation is part of
//! - `IntervalOperation`: the operation node; its result type is resolved once
//!   at construction by `resolve_type`
//! - `operators`: the arithmetic behind each operation kind
//! - `EvaluationContext`: session settings and the current row
//!
//! # Null handling
//!
//! A null operand makes the result null for every operation kind.

pub mod context;
pub mod error;
pub mod expression;
pub mod interval_operation;
pub mod operators;

pub use context::{EvaluationContext, EvaluationContextBuilder, SessionSettings};
pub use error::{EvalError, EvalResult};
pub use expression::{ColumnRef, ColumnResolver, Expression, ExpressionVisitor};
pub use interval_operation::{IntervalOpType, IntervalOperation, resolve_type};
