//! Arithmetic algorithms of interval operations
//!
//! - Interval operators: interval plus/minus interval, interval divided by
//!   interval, interval multiplied/divided by a number
//! - Date/time operators: date/time plus/minus interval, date/time minus
//!   date/time

pub mod datetime;
pub mod interval;

use tempora_types::{IntervalValue, Value};

use crate::error::{EvalError, EvalResult};

/// Interval held by an operand value; any other kind is a broken contract
fn expect_interval(value: &Value) -> EvalResult<&IntervalValue> {
    value
        .as_interval()
        .ok_or_else(|| EvalError::internal(format!("type={}", value.value_type())))
}
