//! Runtime scalar values

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::datetime::{MAX_TIME_ZONE_OFFSET_SECONDS, format_nanos_of_day, format_offset, nanos_of_day};
use crate::decimal::Decimal;
use crate::error::{ValueError, ValueResult};
use crate::interval::IntervalValue;
use crate::type_info::{TypeInfo, ValueType};

fn check_offset(offset_seconds: i32) -> ValueResult<i32> {
    if offset_seconds.abs() > MAX_TIME_ZONE_OFFSET_SECONDS {
        return Err(ValueError::invalid_value("time zone offset", offset_seconds));
    }
    Ok(offset_seconds)
}

/// Time of day with a time zone offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeTz {
    time: NaiveTime,
    offset_seconds: i32,
}

impl TimeTz {
    pub fn new(time: NaiveTime, offset_seconds: i32) -> ValueResult<Self> {
        Ok(Self {
            time,
            offset_seconds: check_offset(offset_seconds)?,
        })
    }

    /// Local time of day
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Offset from UTC in seconds
    pub fn offset_seconds(&self) -> i32 {
        self.offset_seconds
    }
}

/// Timestamp with a time zone offset
///
/// The date and time fields are local to the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimestampTz {
    local: NaiveDateTime,
    offset_seconds: i32,
}

impl TimestampTz {
    pub fn new(local: NaiveDateTime, offset_seconds: i32) -> ValueResult<Self> {
        Ok(Self {
            local,
            offset_seconds: check_offset(offset_seconds)?,
        })
    }

    /// Local date and time
    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    /// Offset from UTC in seconds
    pub fn offset_seconds(&self) -> i32 {
        self.offset_seconds
    }
}

/// A scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// SQL NULL
    Null,
    /// 32-bit signed integer
    Integer(i32),
    /// 64-bit signed integer
    BigInt(i64),
    /// Exact decimal
    Decimal(Decimal),
    /// Double precision float
    Double(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    TimeTz(TimeTz),
    Timestamp(NaiveDateTime),
    TimestampTz(TimestampTz),
    Interval(IntervalValue),
}

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Kind of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Integer(_) => ValueType::Integer,
            Self::BigInt(_) => ValueType::BigInt,
            Self::Decimal(_) => ValueType::Decimal,
            Self::Double(_) => ValueType::Double,
            Self::Date(_) => ValueType::Date,
            Self::Time(_) => ValueType::Time,
            Self::TimeTz(_) => ValueType::TimeTz,
            Self::Timestamp(_) => ValueType::Timestamp,
            Self::TimestampTz(_) => ValueType::TimestampTz,
            Self::Interval(v) => ValueType::Interval(v.qualifier()),
        }
    }

    /// Type descriptor of this value.
    ///
    /// Decimals report their own precision and scale; all other kinds report
    /// their kind's defaults.
    pub fn type_info(&self) -> TypeInfo {
        match self {
            Self::Decimal(d) => TypeInfo::new(
                ValueType::Decimal,
                d.precision() as i64,
                i32::try_from(d.scale()).unwrap_or(i32::MAX),
            ),
            other => TypeInfo::of(other.value_type()),
        }
    }

    /// Exact decimal value of a numeric value
    pub fn to_decimal(&self) -> ValueResult<Decimal> {
        match self {
            Self::Integer(v) => Ok(Decimal::from(i64::from(*v))),
            Self::BigInt(v) => Ok(Decimal::from(*v)),
            Self::Decimal(d) => Ok(d.clone()),
            Self::Double(v) => BigDecimal::from_f64(*v)
                .map(Decimal::new)
                .ok_or_else(|| ValueError::conversion(v, "NUMERIC")),
            other => Err(ValueError::conversion(other.value_type(), "NUMERIC")),
        }
    }

    /// Try to get as an interval
    pub fn as_interval(&self) -> Option<&IntervalValue> {
        match self {
            Self::Interval(v) => Some(v),
            _ => None,
        }
    }

    /// Convert a time of day to its zoned form; a bare time takes the given
    /// session offset
    pub fn to_time_tz(&self, session_offset_seconds: i32) -> ValueResult<TimeTz> {
        match self {
            Self::Time(t) => TimeTz::new(*t, session_offset_seconds),
            Self::TimeTz(t) => Ok(*t),
            other => Err(ValueError::conversion(other.value_type(), ValueType::TimeTz)),
        }
    }

    /// Convert a date or timestamp to its zoned form; bare values take the
    /// given session offset
    pub fn to_timestamp_tz(&self, session_offset_seconds: i32) -> ValueResult<TimestampTz> {
        match self {
            Self::Date(d) => TimestampTz::new(d.and_time(NaiveTime::MIN), session_offset_seconds),
            Self::Timestamp(ts) => TimestampTz::new(*ts, session_offset_seconds),
            Self::TimestampTz(ts) => Ok(*ts),
            other => Err(ValueError::conversion(other.value_type(), ValueType::TimestampTz)),
        }
    }
}

impl From<IntervalValue> for Value {
    fn from(value: IntervalValue) -> Self {
        Self::Interval(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::BigInt(v) => write!(f, "{v}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Double(v) => write!(f, "CAST({v} AS DOUBLE PRECISION)"),
            Self::Date(d) => write!(f, "DATE '{}'", d.format("%Y-%m-%d")),
            Self::Time(t) => write!(f, "TIME '{}'", format_nanos_of_day(nanos_of_day(*t))),
            Self::TimeTz(t) => write!(
                f,
                "TIME WITH TIME ZONE '{}{}'",
                format_nanos_of_day(nanos_of_day(t.time)),
                format_offset(t.offset_seconds)
            ),
            Self::Timestamp(ts) => write!(
                f,
                "TIMESTAMP '{} {}'",
                ts.date().format("%Y-%m-%d"),
                format_nanos_of_day(nanos_of_day(ts.time()))
            ),
            Self::TimestampTz(ts) => write!(
                f,
                "TIMESTAMP WITH TIME ZONE '{} {}{}'",
                ts.local.date().format("%Y-%m-%d"),
                format_nanos_of_day(nanos_of_day(ts.local.time())),
                format_offset(ts.offset_seconds)
            ),
            Self::Interval(v) => write!(f, "{v}"),
        }
    }
}
