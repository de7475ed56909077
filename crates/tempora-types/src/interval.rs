//! Interval qualifiers and sign-magnitude interval values
//!
//! Interval values keep their sign apart from their magnitude fields. All
//! arithmetic goes through the absolute form instead: a signed count of months
//! for the year-month family, and a signed count of nanoseconds for the
//! day-time family. The absolute form is an arbitrary precision integer, so
//! `INTERVAL '999999999999999999' DAY` converts without overflow.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::datetime::{
    NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MINUTE, NANOS_PER_SECOND, append_fraction, round_nanos,
};
use crate::error::{ValueError, ValueResult};

/// Default leading field precision of an interval type
pub const DEFAULT_PRECISION: i64 = 2;

/// Maximum leading field precision of an interval type
pub const MAXIMUM_PRECISION: i64 = 18;

/// Default fractional seconds precision of an interval type
pub const DEFAULT_SCALE: i32 = 6;

/// Maximum fractional seconds precision of an interval type
pub const MAXIMUM_SCALE: i32 = 9;

/// Largest leading field value (18 digits)
pub const MAXIMUM_LEADING: u64 = 999_999_999_999_999_999;

/// A datetime field an interval qualifier starts or ends with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntervalField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl IntervalField {
    /// SQL keyword of this field
    pub fn name(self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
        }
    }
}

impl fmt::Display for IntervalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interval qualifier: which fields an interval value carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalQualifier {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    YearToMonth,
    DayToHour,
    DayToMinute,
    DayToSecond,
    HourToMinute,
    HourToSecond,
    MinuteToSecond,
}

impl IntervalQualifier {
    /// All qualifiers
    pub const ALL: [IntervalQualifier; 13] = [
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::YearToMonth,
        Self::DayToHour,
        Self::DayToMinute,
        Self::DayToSecond,
        Self::HourToMinute,
        Self::HourToSecond,
        Self::MinuteToSecond,
    ];

    /// The leading field
    pub const fn start_field(self) -> IntervalField {
        match self {
            Self::Year | Self::YearToMonth => IntervalField::Year,
            Self::Month => IntervalField::Month,
            Self::Day | Self::DayToHour | Self::DayToMinute | Self::DayToSecond => IntervalField::Day,
            Self::Hour | Self::HourToMinute | Self::HourToSecond => IntervalField::Hour,
            Self::Minute | Self::MinuteToSecond => IntervalField::Minute,
            Self::Second => IntervalField::Second,
        }
    }

    /// The trailing field
    pub const fn end_field(self) -> IntervalField {
        match self {
            Self::Year => IntervalField::Year,
            Self::Month | Self::YearToMonth => IntervalField::Month,
            Self::Day => IntervalField::Day,
            Self::Hour | Self::DayToHour => IntervalField::Hour,
            Self::Minute | Self::DayToMinute | Self::HourToMinute => IntervalField::Minute,
            Self::Second | Self::DayToSecond | Self::HourToSecond | Self::MinuteToSecond => {
                IntervalField::Second
            }
        }
    }

    /// Find the qualifier spanning `start` to `end`
    pub fn from_fields(start: IntervalField, end: IntervalField) -> Option<Self> {
        use IntervalField as F;
        Some(match (start, end) {
            (F::Year, F::Year) => Self::Year,
            (F::Month, F::Month) => Self::Month,
            (F::Year, F::Month) => Self::YearToMonth,
            (F::Day, F::Day) => Self::Day,
            (F::Hour, F::Hour) => Self::Hour,
            (F::Minute, F::Minute) => Self::Minute,
            (F::Second, F::Second) => Self::Second,
            (F::Day, F::Hour) => Self::DayToHour,
            (F::Day, F::Minute) => Self::DayToMinute,
            (F::Day, F::Second) => Self::DayToSecond,
            (F::Hour, F::Minute) => Self::HourToMinute,
            (F::Hour, F::Second) => Self::HourToSecond,
            (F::Minute, F::Second) => Self::MinuteToSecond,
            _ => return None,
        })
    }

    /// Check if this qualifier belongs to the year-month family
    pub const fn is_year_month(self) -> bool {
        matches!(self, Self::Year | Self::Month | Self::YearToMonth)
    }

    /// Check if this qualifier carries a seconds field
    pub const fn has_seconds(self) -> bool {
        matches!(self.end_field(), IntervalField::Second)
    }

    /// Check if this qualifier has a start and an end field
    pub const fn has_multiple_fields(self) -> bool {
        !matches!(
            self,
            Self::Year | Self::Month | Self::Day | Self::Hour | Self::Minute | Self::Second
        )
    }

    /// The higher-order qualifier of two qualifiers of the same family: the one
    /// whose fields are a superset of both. `None` if the families differ.
    pub fn higher_order(self, other: IntervalQualifier) -> Option<Self> {
        if self.is_year_month() != other.is_year_month() {
            return None;
        }
        let start = self.start_field().min(other.start_field());
        let end = self.end_field().max(other.end_field());
        Self::from_fields(start, end)
    }

    /// Exclusive upper bound of the `remaining` magnitude field
    pub const fn remaining_bound(self) -> u64 {
        match self {
            Self::Year | Self::Month | Self::Day | Self::Hour | Self::Minute => 1,
            Self::Second => NANOS_PER_SECOND as u64,
            Self::YearToMonth => 12,
            Self::DayToHour => 24,
            Self::DayToMinute => 24 * 60,
            Self::DayToSecond => NANOS_PER_DAY as u64,
            Self::HourToMinute => 60,
            Self::HourToSecond => NANOS_PER_HOUR as u64,
            Self::MinuteToSecond => NANOS_PER_MINUTE as u64,
        }
    }

    /// Append the type name of this qualifier.
    ///
    /// `precision` is the leading field precision and `scale` the fractional
    /// seconds precision; `None` omits them. With `qualifier_only` the
    /// `INTERVAL` keyword is left out.
    pub fn write_type_name(
        self,
        out: &mut String,
        precision: Option<i64>,
        scale: Option<i32>,
        qualifier_only: bool,
    ) {
        if !qualifier_only {
            out.push_str("INTERVAL ");
        }
        let start = self.start_field();
        out.push_str(start.name());
        if self == Self::Second {
            if precision.is_some() || scale.is_some() {
                out.push('(');
                out.push_str(&precision.unwrap_or(DEFAULT_PRECISION).to_string());
                if let Some(scale) = scale {
                    out.push_str(", ");
                    out.push_str(&scale.to_string());
                }
                out.push(')');
            }
            return;
        }
        if let Some(precision) = precision {
            out.push('(');
            out.push_str(&precision.to_string());
            out.push(')');
        }
        if self.has_multiple_fields() {
            let end = self.end_field();
            out.push_str(" TO ");
            out.push_str(end.name());
            if let (IntervalField::Second, Some(scale)) = (end, scale) {
                out.push('(');
                out.push_str(&scale.to_string());
                out.push(')');
            }
        }
    }
}

impl fmt::Display for IntervalQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        self.write_type_name(&mut s, None, None, true);
        f.write_str(&s)
    }
}

/// Sign-magnitude interval value
///
/// `leading` holds the leading field, `remaining` the rest of the value in
/// units of the secondary field (months, hours, minutes, or nanoseconds for
/// qualifiers that end with seconds). Both are non-negative; the sign lives in
/// `negative`, which is never set on a zero interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalValue {
    qualifier: IntervalQualifier,
    negative: bool,
    leading: u64,
    remaining: u64,
}

impl IntervalValue {
    /// Create an interval, validating its magnitude fields
    pub fn new(
        qualifier: IntervalQualifier,
        negative: bool,
        leading: u64,
        remaining: u64,
    ) -> ValueResult<Self> {
        if leading > MAXIMUM_LEADING {
            return Err(ValueError::out_of_range(leading));
        }
        if remaining >= qualifier.remaining_bound() {
            return Err(ValueError::invalid_value("remaining", remaining));
        }
        Ok(Self {
            qualifier,
            negative: negative && (leading != 0 || remaining != 0),
            leading,
            remaining,
        })
    }

    pub fn qualifier(&self) -> IntervalQualifier {
        self.qualifier
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn leading(&self) -> u64 {
        self.leading
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_zero(&self) -> bool {
        self.leading == 0 && self.remaining == 0
    }

    /// The same magnitude with the opposite sign
    pub fn negate(&self) -> Self {
        Self {
            negative: !self.negative && !self.is_zero(),
            ..self.clone()
        }
    }

    /// Convert to another qualifier of the same family
    pub fn convert_to(&self, qualifier: IntervalQualifier) -> ValueResult<Self> {
        if qualifier == self.qualifier {
            return Ok(self.clone());
        }
        if qualifier.is_year_month() != self.qualifier.is_year_month() {
            return Err(ValueError::conversion(
                format!("INTERVAL {}", self.qualifier),
                format!("INTERVAL {}", qualifier),
            ));
        }
        interval_from_absolute(qualifier, &interval_to_absolute(self))
    }

    /// Round the fractional seconds to `scale` digits (half up), carrying a
    /// full unit into the leading field
    pub fn convert_scale(&self, scale: i32) -> ValueResult<Self> {
        if scale >= MAXIMUM_SCALE || !self.qualifier.has_seconds() {
            return Ok(self.clone());
        }
        if scale < 0 {
            return Err(ValueError::invalid_value("scale", scale));
        }
        let mut remaining = round_nanos(self.remaining, scale as u32);
        if remaining == self.remaining {
            return Ok(self.clone());
        }
        let mut leading = self.leading;
        let bound = self.qualifier.remaining_bound();
        if remaining >= bound {
            remaining -= bound;
            leading = leading
                .checked_add(1)
                .ok_or_else(|| ValueError::out_of_range(leading))?;
        }
        Self::new(self.qualifier, self.negative, leading, remaining)
    }
}

impl fmt::Display for IntervalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::from("INTERVAL '");
        if self.negative {
            s.push('-');
        }
        let (leading, remaining) = (self.leading, self.remaining);
        let nanos = remaining as i64;
        match self.qualifier {
            IntervalQualifier::Year
            | IntervalQualifier::Month
            | IntervalQualifier::Day
            | IntervalQualifier::Hour
            | IntervalQualifier::Minute => s.push_str(&leading.to_string()),
            IntervalQualifier::Second => {
                s.push_str(&leading.to_string());
                append_fraction(&mut s, nanos);
            }
            IntervalQualifier::YearToMonth => s.push_str(&format!("{leading}-{remaining}")),
            IntervalQualifier::DayToHour => s.push_str(&format!("{leading} {remaining:02}")),
            IntervalQualifier::DayToMinute => {
                s.push_str(&format!("{leading} {:02}:{:02}", remaining / 60, remaining % 60))
            }
            IntervalQualifier::DayToSecond => {
                s.push_str(&format!(
                    "{leading} {:02}:{:02}:{:02}",
                    nanos / NANOS_PER_HOUR,
                    nanos / NANOS_PER_MINUTE % 60,
                    nanos / NANOS_PER_SECOND % 60
                ));
                append_fraction(&mut s, nanos);
            }
            IntervalQualifier::HourToMinute => s.push_str(&format!("{leading}:{remaining:02}")),
            IntervalQualifier::HourToSecond => {
                s.push_str(&format!(
                    "{leading}:{:02}:{:02}",
                    nanos / NANOS_PER_MINUTE,
                    nanos / NANOS_PER_SECOND % 60
                ));
                append_fraction(&mut s, nanos);
            }
            IntervalQualifier::MinuteToSecond => {
                s.push_str(&format!("{leading}:{:02}", nanos / NANOS_PER_SECOND));
                append_fraction(&mut s, nanos);
            }
        }
        s.push_str("' ");
        s.push_str(&self.qualifier.to_string());
        f.write_str(&s)
    }
}

/// Convert an interval to its absolute form: signed months for year-month
/// qualifiers, signed nanoseconds for day-time qualifiers.
pub fn interval_to_absolute(interval: &IntervalValue) -> BigInt {
    let leading = BigInt::from(interval.leading);
    let remaining = BigInt::from(interval.remaining);
    let absolute = match interval.qualifier {
        IntervalQualifier::Year => leading * 12,
        IntervalQualifier::Month => leading,
        IntervalQualifier::Day => leading * NANOS_PER_DAY,
        IntervalQualifier::Hour => leading * NANOS_PER_HOUR,
        IntervalQualifier::Minute => leading * NANOS_PER_MINUTE,
        IntervalQualifier::Second => leading * NANOS_PER_SECOND + remaining,
        IntervalQualifier::YearToMonth => leading * 12 + remaining,
        IntervalQualifier::DayToHour => (leading * 24 + remaining) * NANOS_PER_HOUR,
        IntervalQualifier::DayToMinute => (leading * (24 * 60) + remaining) * NANOS_PER_MINUTE,
        IntervalQualifier::DayToSecond => leading * NANOS_PER_DAY + remaining,
        IntervalQualifier::HourToMinute => (leading * 60 + remaining) * NANOS_PER_MINUTE,
        IntervalQualifier::HourToSecond => leading * NANOS_PER_HOUR + remaining,
        IntervalQualifier::MinuteToSecond => leading * NANOS_PER_MINUTE + remaining,
    };
    if interval.negative { -absolute } else { absolute }
}

/// Convert an absolute form back to an interval with the given qualifier.
///
/// Fractions of the trailing field are truncated toward zero. Fails with a
/// numeric range error when the leading field exceeds 18 digits.
pub fn interval_from_absolute(
    qualifier: IntervalQualifier,
    absolute: &BigInt,
) -> ValueResult<IntervalValue> {
    let negative = absolute.is_negative();
    match qualifier {
        IntervalQualifier::Year => single(qualifier, negative, &(absolute / 12)),
        IntervalQualifier::Month => single(qualifier, negative, absolute),
        IntervalQualifier::Day => single(qualifier, negative, &(absolute / NANOS_PER_DAY)),
        IntervalQualifier::Hour => single(qualifier, negative, &(absolute / NANOS_PER_HOUR)),
        IntervalQualifier::Minute => single(qualifier, negative, &(absolute / NANOS_PER_MINUTE)),
        IntervalQualifier::Second => split(qualifier, negative, absolute, NANOS_PER_SECOND),
        IntervalQualifier::YearToMonth => split(qualifier, negative, absolute, 12),
        IntervalQualifier::DayToHour => {
            split(qualifier, negative, &(absolute / NANOS_PER_HOUR), 24)
        }
        IntervalQualifier::DayToMinute => {
            split(qualifier, negative, &(absolute / NANOS_PER_MINUTE), 24 * 60)
        }
        IntervalQualifier::DayToSecond => split(qualifier, negative, absolute, NANOS_PER_DAY),
        IntervalQualifier::HourToMinute => {
            split(qualifier, negative, &(absolute / NANOS_PER_MINUTE), 60)
        }
        IntervalQualifier::HourToSecond => split(qualifier, negative, absolute, NANOS_PER_HOUR),
        IntervalQualifier::MinuteToSecond => {
            split(qualifier, negative, absolute, NANOS_PER_MINUTE)
        }
    }
}

fn single(qualifier: IntervalQualifier, negative: bool, leading: &BigInt) -> ValueResult<IntervalValue> {
    IntervalValue::new(qualifier, negative, leading_exact(leading)?, 0)
}

fn split(
    qualifier: IntervalQualifier,
    negative: bool,
    absolute: &BigInt,
    divisor: i64,
) -> ValueResult<IntervalValue> {
    let divisor = BigInt::from(divisor);
    let leading = leading_exact(&(absolute / &divisor))?;
    let remaining = (absolute % &divisor)
        .abs()
        .to_u64()
        .ok_or_else(|| ValueError::out_of_range(absolute))?;
    IntervalValue::new(qualifier, negative, leading, remaining)
}

fn leading_exact(leading: &BigInt) -> ValueResult<u64> {
    leading
        .abs()
        .to_u64()
        .filter(|value| *value <= MAXIMUM_LEADING)
        .ok_or_else(|| ValueError::out_of_range(leading))
}
