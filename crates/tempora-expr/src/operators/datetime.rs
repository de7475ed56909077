//! Date/time operators
//!
//! Date/time plus or minus an interval, and the difference of two date/time
//! values as an interval.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use tempora_types::datetime::{
    NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_SECOND, absolute_day_from_date, add_months,
    date_and_time_from_value, date_from_absolute_day, date_time_to_value, nanos_of_day,
    time_from_nanos,
};
use tempora_types::{
    IntervalQualifier, IntervalValue, TimeTz, Value, ValueError, interval_from_absolute,
    interval_to_absolute,
};

use super::expect_interval;
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::interval_operation::IntervalOperation;

fn to_i64(value: &BigInt) -> EvalResult<i64> {
    value
        .to_i64()
        .ok_or_else(|| ValueError::out_of_range(value).into())
}

/// Absolute position of a date/time value in nanoseconds since 1970-01-01,
/// on its local clock
fn nanos_from_value(value: &Value) -> EvalResult<BigInt> {
    let (date, nanos) = date_and_time_from_value(value)?;
    Ok(BigInt::from(absolute_day_from_date(date)) * NANOS_PER_DAY + nanos)
}

/// Offset of a value's time zone; bare values are in the session time zone
fn zone_offset(value: &Value, session_offset_seconds: i32) -> EvalResult<i64> {
    let offset = match value {
        Value::Time(_) | Value::TimeTz(_) => value.to_time_tz(session_offset_seconds)?.offset_seconds(),
        _ => value.to_timestamp_tz(session_offset_seconds)?.offset_seconds(),
    };
    Ok(i64::from(offset))
}

impl IntervalOperation {
    /// `DATETIME + INTERVAL` and `DATETIME - INTERVAL`
    pub fn datetime_with_interval(&self, l: &Value, r: &Value) -> EvalResult<Value> {
        let interval = expect_interval(r)?;
        let year_month = interval.qualifier().is_year_month();
        match l {
            Value::Time(_) | Value::TimeTz(_) if year_month => {
                Err(EvalError::internal(format!("type={}", r.value_type())))
            }
            Value::Time(time) => {
                let nanos = self.time_with_interval(interval, nanos_of_day(*time))?;
                Ok(Value::Time(time_from_nanos(nanos)?))
            }
            Value::TimeTz(time) => {
                let nanos = self.time_with_interval(interval, nanos_of_day(time.time()))?;
                Ok(Value::TimeTz(TimeTz::new(
                    time_from_nanos(nanos)?,
                    time.offset_seconds(),
                )?))
            }
            Value::Date(_) | Value::Timestamp(_) | Value::TimestampTz(_) if year_month => {
                let mut months = to_i64(&interval_to_absolute(interval))?;
                if !self.op_type().is_plus() {
                    months = -months;
                }
                Ok(add_months(l, months)?)
            }
            Value::Date(date) => {
                let days = interval_to_absolute(interval) / NANOS_PER_DAY;
                let day = BigInt::from(absolute_day_from_date(*date));
                let day = if self.op_type().is_plus() {
                    day + days
                } else {
                    day - days
                };
                Ok(Value::Date(date_from_absolute_day(to_i64(&day)?)?))
            }
            Value::Timestamp(_) | Value::TimestampTz(_) => {
                let (date, mut time_nanos) = date_and_time_from_value(l)?;
                let mut absolute_day = absolute_day_from_date(date);
                let absolute = interval_to_absolute(interval);
                let days = to_i64(&(&absolute / NANOS_PER_DAY))?;
                let nanos = to_i64(&(&absolute % NANOS_PER_DAY))?;
                let shifted = if self.op_type().is_plus() {
                    absolute_day.checked_add(days)
                } else {
                    absolute_day.checked_sub(days)
                };
                absolute_day = shifted.ok_or_else(|| ValueError::out_of_range(&absolute))?;
                if self.op_type().is_plus() {
                    time_nanos += nanos;
                } else {
                    time_nanos -= nanos;
                }
                if time_nanos >= NANOS_PER_DAY {
                    time_nanos -= NANOS_PER_DAY;
                    absolute_day += 1;
                } else if time_nanos < 0 {
                    time_nanos += NANOS_PER_DAY;
                    absolute_day -= 1;
                }
                Ok(date_time_to_value(
                    l,
                    date_from_absolute_day(absolute_day)?,
                    time_nanos,
                )?)
            }
            other => Err(EvalError::internal(format!("type={}", other.value_type()))),
        }
    }

    /// Shift nanoseconds of day by an interval; leaving the day is an error
    fn time_with_interval(&self, interval: &IntervalValue, nanos: i64) -> EvalResult<i64> {
        let a1 = BigInt::from(nanos);
        let a2 = interval_to_absolute(interval);
        let n = if self.op_type().is_plus() {
            a1 + a2
        } else {
            a1 - a2
        };
        if n.is_negative() || n >= BigInt::from(NANOS_PER_DAY) {
            return Err(ValueError::out_of_range(&n).into());
        }
        to_i64(&n)
    }

    /// `DATETIME - DATETIME`, cast to the forced type if there is one
    pub fn datetime_minus_datetime(
        &self,
        ctx: &EvaluationContext,
        l: &Value,
        r: &Value,
    ) -> EvalResult<Value> {
        let (lt, rt) = (l.value_type(), r.value_type());
        if !lt.is_datetime() || !rt.is_datetime() {
            return Err(EvalError::internal(format!("type={lt} {rt}")));
        }
        let session_offset = ctx.time_zone_offset_seconds();
        let mut result = if lt.is_time_of_day() && rt.is_time_of_day() {
            let diff = match (l, r) {
                (Value::Time(a), Value::Time(b)) => nanos_of_day(*a) - nanos_of_day(*b),
                _ => {
                    let (a, b) = (l.to_time_tz(session_offset)?, r.to_time_tz(session_offset)?);
                    nanos_of_day(a.time()) - nanos_of_day(b.time())
                        + (i64::from(b.offset_seconds()) - i64::from(a.offset_seconds()))
                            * NANOS_PER_SECOND
                }
            };
            let magnitude = diff.unsigned_abs();
            IntervalValue::new(
                IntervalQualifier::HourToSecond,
                diff < 0,
                magnitude / NANOS_PER_HOUR as u64,
                magnitude % NANOS_PER_HOUR as u64,
            )?
        } else if let (Value::Date(a), Value::Date(b)) = (l, r) {
            let diff = absolute_day_from_date(*a) - absolute_day_from_date(*b);
            IntervalValue::new(IntervalQualifier::Day, diff < 0, diff.unsigned_abs(), 0)?
        } else {
            let mut diff = nanos_from_value(l)? - nanos_from_value(r)?;
            if matches!(l, Value::TimestampTz(_)) || matches!(r, Value::TimestampTz(_)) {
                let offsets = zone_offset(r, session_offset)? - zone_offset(l, session_offset)?;
                diff += BigInt::from(offsets * NANOS_PER_SECOND);
            }
            interval_from_absolute(IntervalQualifier::DayToSecond, &diff)?
        };
        if let Some(forced) = self.forced_type() {
            let qualifier = forced
                .value_type()
                .interval_qualifier()
                .ok_or_else(|| EvalError::internal(format!("forced type={forced}")))?;
            result = result.convert_to(qualifier)?.convert_scale(forced.scale())?;
        }
        Ok(Value::Interval(result))
    }
}
