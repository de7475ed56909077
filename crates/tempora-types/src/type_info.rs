//! Value kinds and type descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::interval::{DEFAULT_PRECISION, DEFAULT_SCALE, IntervalQualifier, MAXIMUM_PRECISION};

/// Kind of a scalar value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Null,
    Integer,
    BigInt,
    Decimal,
    Double,
    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Interval(IntervalQualifier),
}

impl ValueType {
    pub fn is_interval(self) -> bool {
        matches!(self, Self::Interval(_))
    }

    /// The qualifier of an interval kind
    pub fn interval_qualifier(self) -> Option<IntervalQualifier> {
        match self {
            Self::Interval(q) => Some(q),
            _ => None,
        }
    }

    pub fn is_year_month_interval(self) -> bool {
        matches!(self, Self::Interval(q) if q.is_year_month())
    }

    pub fn is_day_time_interval(self) -> bool {
        matches!(self, Self::Interval(q) if !q.is_year_month())
    }

    /// Check if this is TIME or TIME WITH TIME ZONE
    pub fn is_time_of_day(self) -> bool {
        matches!(self, Self::Time | Self::TimeTz)
    }

    /// Check if this is any date, time or timestamp kind
    pub fn is_datetime(self) -> bool {
        matches!(
            self,
            Self::Date | Self::Time | Self::TimeTz | Self::Timestamp | Self::TimestampTz
        )
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::BigInt | Self::Decimal | Self::Double)
    }

    /// SQL name of this kind
    pub fn sql_name(self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Integer => "INTEGER".to_string(),
            Self::BigInt => "BIGINT".to_string(),
            Self::Decimal => "NUMERIC".to_string(),
            Self::Double => "DOUBLE PRECISION".to_string(),
            Self::Date => "DATE".to_string(),
            Self::Time => "TIME".to_string(),
            Self::TimeTz => "TIME WITH TIME ZONE".to_string(),
            Self::Timestamp => "TIMESTAMP".to_string(),
            Self::TimestampTz => "TIMESTAMP WITH TIME ZONE".to_string(),
            Self::Interval(q) => format!("INTERVAL {q}"),
        }
    }

    /// Precision a type of this kind has when none is declared
    pub fn default_precision(self) -> i64 {
        match self {
            Self::Null => 1,
            Self::Integer => 32,
            Self::BigInt => 64,
            Self::Decimal => 100_000,
            Self::Double => 53,
            Self::Date => 10,
            Self::Time => 8,
            Self::TimeTz => 14,
            Self::Timestamp => 26,
            Self::TimestampTz => 32,
            Self::Interval(_) => DEFAULT_PRECISION,
        }
    }

    /// Scale a type of this kind has when none is declared
    pub fn default_scale(self) -> i32 {
        match self {
            Self::Timestamp | Self::TimestampTz => 6,
            Self::Interval(q) if q.has_seconds() => DEFAULT_SCALE,
            _ => 0,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql_name())
    }
}

/// Static type of an expression: value kind, precision and scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeInfo {
    value_type: ValueType,
    precision: i64,
    scale: i32,
}

/// `INTERVAL HOUR TO SECOND` at maximum precision
pub const TYPE_INTERVAL_HOUR_TO_SECOND: TypeInfo = TypeInfo::new(
    ValueType::Interval(IntervalQualifier::HourToSecond),
    MAXIMUM_PRECISION,
    DEFAULT_SCALE,
);

/// `INTERVAL DAY` at maximum precision
pub const TYPE_INTERVAL_DAY: TypeInfo = TypeInfo::new(
    ValueType::Interval(IntervalQualifier::Day),
    MAXIMUM_PRECISION,
    0,
);

/// `INTERVAL DAY TO SECOND` at maximum precision
pub const TYPE_INTERVAL_DAY_TO_SECOND: TypeInfo = TypeInfo::new(
    ValueType::Interval(IntervalQualifier::DayToSecond),
    MAXIMUM_PRECISION,
    DEFAULT_SCALE,
);

impl TypeInfo {
    pub const fn new(value_type: ValueType, precision: i64, scale: i32) -> Self {
        Self {
            value_type,
            precision,
            scale,
        }
    }

    /// Type of the given kind with its default precision and scale
    pub fn of(value_type: ValueType) -> Self {
        Self::new(
            value_type,
            value_type.default_precision(),
            value_type.default_scale(),
        )
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn precision(&self) -> i64 {
        self.precision
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value_type {
            ValueType::Interval(q) => {
                let mut s = String::new();
                let scale = q.has_seconds().then_some(self.scale);
                q.write_type_name(&mut s, Some(self.precision), scale, false);
                f.write_str(&s)
            }
            ValueType::Decimal => write!(f, "NUMERIC({}, {})", self.precision, self.scale),
            ValueType::Time | ValueType::Timestamp if self.scale != 0 => {
                write!(f, "{}({})", self.value_type.sql_name(), self.scale)
            }
            ValueType::TimeTz => write!(f, "TIME({}) WITH TIME ZONE", self.scale),
            ValueType::TimestampTz => write!(f, "TIMESTAMP({}) WITH TIME ZONE", self.scale),
            other => f.write_str(&other.sql_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_families() {
        let ym = ValueType::Interval(IntervalQualifier::YearToMonth);
        let dt = ValueType::Interval(IntervalQualifier::Minute);
        assert!(ym.is_year_month_interval());
        assert!(!ym.is_day_time_interval());
        assert!(dt.is_day_time_interval());
        assert!(!ValueType::Date.is_interval());
        assert_eq!(dt.interval_qualifier(), Some(IntervalQualifier::Minute));
    }

    #[test]
    fn test_kind_predicates() {
        assert!(ValueType::TimeTz.is_time_of_day());
        assert!(!ValueType::Timestamp.is_time_of_day());
        assert!(ValueType::Date.is_datetime());
        assert!(ValueType::Double.is_numeric());
        assert!(!ValueType::Interval(IntervalQualifier::Day).is_numeric());
    }

    #[test]
    fn test_type_of_defaults() {
        let t = TypeInfo::of(ValueType::Interval(IntervalQualifier::DayToSecond));
        assert_eq!(t.precision(), DEFAULT_PRECISION);
        assert_eq!(t.scale(), DEFAULT_SCALE);
        assert_eq!(TypeInfo::of(ValueType::Interval(IntervalQualifier::Day)).scale(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TYPE_INTERVAL_DAY_TO_SECOND.to_string(),
            "INTERVAL DAY(18) TO SECOND(6)"
        );
        assert_eq!(TYPE_INTERVAL_DAY.to_string(), "INTERVAL DAY(18)");
        assert_eq!(
            TypeInfo::new(ValueType::Decimal, 96, 64).to_string(),
            "NUMERIC(96, 64)"
        );
        assert_eq!(TypeInfo::of(ValueType::Date).to_string(), "DATE");
    }
}
