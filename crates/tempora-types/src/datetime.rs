//! Date/time field access and calendar arithmetic
//!
//! Dates are addressed by their absolute day number (days since 1970-01-01)
//! and times of day by nanoseconds since midnight. Zoned values expose their
//! local fields; the offset is handled separately by callers.

use chrono::{Datelike, Months, NaiveDate, NaiveTime, Timelike};

use crate::error::{ValueError, ValueResult};
use crate::value::{TimeTz, TimestampTz, Value};

pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
pub const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01
const UNIX_EPOCH_DAY_FROM_CE: i64 = 719_163;

/// Largest time zone offset accepted, in seconds (18 hours)
pub const MAX_TIME_ZONE_OFFSET_SECONDS: i32 = 18 * 3600;

/// Absolute day number of a date: days since 1970-01-01
pub fn absolute_day_from_date(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAY_FROM_CE
}

/// Calendar date of an absolute day number
pub fn date_from_absolute_day(absolute_day: i64) -> ValueResult<NaiveDate> {
    absolute_day
        .checked_add(UNIX_EPOCH_DAY_FROM_CE)
        .and_then(|days| i32::try_from(days).ok())
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| ValueError::out_of_range(absolute_day))
}

/// Nanoseconds since midnight
pub fn nanos_of_day(time: NaiveTime) -> i64 {
    // leap second representations are folded into the last second
    let nanos = time.nanosecond().min(999_999_999);
    i64::from(time.num_seconds_from_midnight()) * NANOS_PER_SECOND + i64::from(nanos)
}

/// Time of day from nanoseconds since midnight, which must lie within one day
pub fn time_from_nanos(nanos: i64) -> ValueResult<NaiveTime> {
    if !(0..NANOS_PER_DAY).contains(&nanos) {
        return Err(ValueError::out_of_range(nanos));
    }
    NaiveTime::from_num_seconds_from_midnight_opt(
        (nanos / NANOS_PER_SECOND) as u32,
        (nanos % NANOS_PER_SECOND) as u32,
    )
    .ok_or_else(|| ValueError::out_of_range(nanos))
}

/// Split a date or time value into its local date and nanoseconds of day.
///
/// Dates yield midnight; times of day yield 1970-01-01.
pub fn date_and_time_from_value(value: &Value) -> ValueResult<(NaiveDate, i64)> {
    match value {
        Value::Date(date) => Ok((*date, 0)),
        Value::Time(time) => Ok((NaiveDate::default(), nanos_of_day(*time))),
        Value::TimeTz(time) => Ok((NaiveDate::default(), nanos_of_day(time.time()))),
        Value::Timestamp(ts) => Ok((ts.date(), nanos_of_day(ts.time()))),
        Value::TimestampTz(ts) => Ok((ts.local().date(), nanos_of_day(ts.local().time()))),
        other => Err(ValueError::conversion(other.value_type(), "TIMESTAMP")),
    }
}

/// Rebuild a value of the same kind as `original` from a date and nanoseconds
/// of day, keeping the time zone offset of zoned values
pub fn date_time_to_value(original: &Value, date: NaiveDate, nanos: i64) -> ValueResult<Value> {
    if let Value::Date(_) = original {
        return Ok(Value::Date(date));
    }
    let time = time_from_nanos(nanos)?;
    Ok(match original {
        Value::Time(_) => Value::Time(time),
        Value::TimeTz(tz) => Value::TimeTz(TimeTz::new(time, tz.offset_seconds())?),
        Value::TimestampTz(tz) => {
            Value::TimestampTz(TimestampTz::new(date.and_time(time), tz.offset_seconds())?)
        }
        _ => Value::Timestamp(date.and_time(time)),
    })
}

/// Shift a date or timestamp by a signed number of months.
///
/// A day of month that does not exist in the target month is clamped to the
/// last day of that month: 2021-01-31 plus one month is 2021-02-28.
pub fn add_months(value: &Value, months: i64) -> ValueResult<Value> {
    if !matches!(
        value,
        Value::Date(_) | Value::Timestamp(_) | Value::TimestampTz(_)
    ) {
        return Err(ValueError::conversion(value.value_type(), "TIMESTAMP"));
    }
    let (date, nanos) = date_and_time_from_value(value)?;
    let count = u32::try_from(months.unsigned_abs()).map_err(|_| ValueError::out_of_range(months))?;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(count))
    } else {
        date.checked_sub_months(Months::new(count))
    }
    .ok_or_else(|| ValueError::out_of_range(months))?;
    date_time_to_value(value, shifted, nanos)
}

/// Round nanoseconds to `scale` fractional digits, half up
pub fn round_nanos(nanos: u64, scale: u32) -> u64 {
    if scale >= 9 {
        return nanos;
    }
    let unit = 10u64.pow(9 - scale);
    let rest = nanos % unit;
    if rest >= unit / 2 {
        nanos - rest + unit
    } else {
        nanos - rest
    }
}

/// Append the fractional seconds of `nanos` without trailing zeros
pub fn append_fraction(out: &mut String, nanos: i64) {
    let fraction = nanos % NANOS_PER_SECOND;
    if fraction != 0 {
        let digits = format!("{:09}", fraction);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
}

/// Format nanoseconds of day as `hh:mm:ss[.fffffffff]`
pub fn format_nanos_of_day(nanos: i64) -> String {
    let mut s = format!(
        "{:02}:{:02}:{:02}",
        nanos / NANOS_PER_HOUR,
        nanos / NANOS_PER_MINUTE % 60,
        nanos / NANOS_PER_SECOND % 60
    );
    append_fraction(&mut s, nanos);
    s
}

/// Format a time zone offset as `+hh[:mm[:ss]]`
pub fn format_offset(offset_seconds: i32) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let abs = offset_seconds.unsigned_abs();
    let (hours, minutes, seconds) = (abs / 3600, abs / 60 % 60, abs % 60);
    let mut s = format!("{sign}{hours:02}");
    if minutes != 0 || seconds != 0 {
        s.push_str(&format!(":{minutes:02}"));
        if seconds != 0 {
            s.push_str(&format!(":{seconds:02}"));
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_absolute_day() {
        assert_eq!(absolute_day_from_date(date(1970, 1, 1)), 0);
        assert_eq!(absolute_day_from_date(date(1969, 12, 31)), -1);
        assert_eq!(absolute_day_from_date(date(2000, 3, 1)), 11_017);
        assert_eq!(date_from_absolute_day(11_017).unwrap(), date(2000, 3, 1));
        assert!(date_from_absolute_day(i64::MAX).is_err());
    }

    #[test]
    fn test_time_from_nanos_bounds() {
        assert!(time_from_nanos(-1).is_err());
        assert!(time_from_nanos(NANOS_PER_DAY).is_err());
        let t = time_from_nanos(NANOS_PER_DAY - 1).unwrap();
        assert_eq!(nanos_of_day(t), NANOS_PER_DAY - 1);
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        let shifted = add_months(&Value::Date(date(2021, 1, 31)), 1).unwrap();
        assert_eq!(shifted, Value::Date(date(2021, 2, 28)));
        let shifted = add_months(&Value::Date(date(2020, 1, 31)), 1).unwrap();
        assert_eq!(shifted, Value::Date(date(2020, 2, 29)));
        let shifted = add_months(&Value::Date(date(2020, 3, 31)), -13).unwrap();
        assert_eq!(shifted, Value::Date(date(2019, 2, 28)));
    }

    #[test]
    fn test_add_months_keeps_time_and_offset() {
        let local = date(2021, 5, 31).and_hms_opt(10, 30, 0).unwrap();
        let ts = Value::TimestampTz(TimestampTz::new(local, 3600).unwrap());
        let shifted = add_months(&ts, 1).unwrap();
        let expected = date(2021, 6, 30).and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(shifted, Value::TimestampTz(TimestampTz::new(expected, 3600).unwrap()));
    }

    #[test]
    fn test_add_months_rejects_time_of_day() {
        let t = Value::Time(NaiveTime::from_hms_opt(1, 0, 0).unwrap());
        assert!(add_months(&t, 1).is_err());
    }

    #[test]
    fn test_round_nanos() {
        assert_eq!(round_nanos(123_456_789, 9), 123_456_789);
        assert_eq!(round_nanos(123_456_789, 3), 123_000_000);
        assert_eq!(round_nanos(123_500_000, 3), 124_000_000);
        assert_eq!(round_nanos(999_999_999, 0), 1_000_000_000);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_nanos_of_day(23 * NANOS_PER_HOUR), "23:00:00");
        assert_eq!(format_nanos_of_day(NANOS_PER_SECOND + 120_000_000), "00:00:01.12");
        assert_eq!(format_offset(3600), "+01");
        assert_eq!(format_offset(-(5 * 3600 + 30 * 60)), "-05:30");
        assert_eq!(format_offset(0), "+00");
    }
}
