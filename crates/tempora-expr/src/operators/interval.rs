//! Interval operators
//!
//! Both operands are taken to their absolute form (months or nanoseconds),
//! combined exactly, and converted back.

use tempora_types::{Decimal, Value, interval_from_absolute, interval_to_absolute};

use super::expect_interval;
use crate::error::{EvalError, EvalResult};
use crate::interval_operation::{
    INTERVAL_DIVIDE_INTERVAL_DAY_TYPE, INTERVAL_DIVIDE_INTERVAL_YEAR_TYPE, IntervalOpType,
    IntervalOperation,
};

impl IntervalOperation {
    /// `INTERVAL + INTERVAL` and `INTERVAL - INTERVAL`, in the higher-order
    /// qualifier of both operands
    pub fn interval_plus_minus_interval(&self, l: &Value, r: &Value) -> EvalResult<Value> {
        let (li, ri) = (expect_interval(l)?, expect_interval(r)?);
        let qualifier = li.qualifier().higher_order(ri.qualifier()).ok_or_else(|| {
            EvalError::internal(format!("type={} {}", l.value_type(), r.value_type()))
        })?;
        let (a1, a2) = (interval_to_absolute(li), interval_to_absolute(ri));
        let absolute = if self.op_type().is_plus() {
            a1 + a2
        } else {
            a1 - a2
        };
        Ok(Value::Interval(interval_from_absolute(qualifier, &absolute)?))
    }

    /// `INTERVAL / INTERVAL` as an exact decimal
    pub fn interval_divide_interval(&self, l: &Value, r: &Value) -> EvalResult<Value> {
        let (li, ri) = (expect_interval(l)?, expect_interval(r)?);
        let result_type = if li.qualifier().is_year_month() || ri.qualifier().is_year_month() {
            INTERVAL_DIVIDE_INTERVAL_YEAR_TYPE
        } else {
            INTERVAL_DIVIDE_INTERVAL_DAY_TYPE
        };
        let dividend = Decimal::from_bigint(interval_to_absolute(li));
        let divisor = Decimal::from_bigint(interval_to_absolute(ri));
        let quotient = dividend.divide(&divisor, i64::from(result_type.scale()))?;
        Ok(Value::Decimal(quotient))
    }

    /// `INTERVAL * NUMERIC` and `INTERVAL / NUMERIC`, truncated to the
    /// qualifier of the interval operand
    pub fn interval_with_numeric(&self, l: &Value, r: &Value) -> EvalResult<Value> {
        let li = expect_interval(l)?;
        let a1 = Decimal::from_bigint(interval_to_absolute(li));
        let a2 = r.to_decimal()?;
        let absolute = match self.op_type() {
            IntervalOpType::IntervalMultiplyNumeric => a1.multiply(&a2).to_bigint_truncated(),
            _ => a1.divide_integral(&a2)?,
        };
        Ok(Value::Interval(interval_from_absolute(li.qualifier(), &absolute)?))
    }
}
