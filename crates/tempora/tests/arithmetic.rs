//! End-to-end interval arithmetic tests
//!
//! Tests for: interval addition and division, month arithmetic with end of
//! month clamping, time of day range errors, date/time differences, and the
//! exactness of interval addition over the absolute form

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use num_bigint::BigInt;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use tempora::types::interval_to_absolute;
use tempora::{
    EvalError, EvalResult, EvaluationContext, Expression, IntervalOpType, IntervalOperation,
    IntervalQualifier, IntervalValue, SessionSettings, Value,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn interval(q: IntervalQualifier, negative: bool, leading: u64, remaining: u64) -> Value {
    Value::Interval(IntervalValue::new(q, negative, leading, remaining).unwrap())
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn ts(s: &str) -> Value {
    Value::Timestamp(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap())
}

fn eval(op: IntervalOpType, l: Value, r: Value) -> EvalResult<Value> {
    IntervalOperation::new(op, Expression::constant(l), Expression::constant(r))?
        .evaluate(&EvaluationContext::new())
}

// ============================================================================
// Interval operators
// ============================================================================

#[test]
fn test_month_plus_year_is_year_to_month() {
    let result = eval(
        IntervalOpType::IntervalPlusInterval,
        interval(IntervalQualifier::Month, false, 1, 0),
        interval(IntervalQualifier::Year, false, 1, 0),
    )
    .unwrap();
    assert_eq!(result.to_string(), "INTERVAL '1-1' YEAR TO MONTH");
}

#[test]
fn test_day_ratio_at_scale_64() {
    let result = eval(
        IntervalOpType::IntervalDivideInterval,
        interval(IntervalQualifier::Day, false, 10, 0),
        interval(IntervalQualifier::Day, false, 3, 0),
    )
    .unwrap();
    assert_eq!(result.to_string(), format!("3.{}", "3".repeat(64)));
    assert_eq!(result.type_info().scale(), 64);
}

// ============================================================================
// Date/time operators
// ============================================================================

#[rstest]
#[case(date(2021, 1, 31), date(2021, 2, 28))]
#[case(date(2020, 1, 31), date(2020, 2, 29))]
#[case(date(2021, 3, 15), date(2021, 4, 15))]
fn test_plus_one_month_clamps(#[case] start: Value, #[case] expected: Value) {
    let result = eval(
        IntervalOpType::DatetimePlusInterval,
        start,
        interval(IntervalQualifier::Month, false, 1, 0),
    )
    .unwrap();
    assert_eq!(result, expected);
}

#[test]
fn test_time_does_not_wrap_around() {
    let err = eval(
        IntervalOpType::DatetimePlusInterval,
        Value::Time(NaiveTime::from_hms_opt(23, 0, 0).unwrap()),
        interval(IntervalQualifier::Hour, false, 2, 0),
    )
    .unwrap_err();
    assert!(matches!(err, EvalError::Value(_)));
    assert_eq!(err.code(), tempora::diagnostics::TMP0001);
    assert_eq!(
        err.to_string(),
        format!("Numeric value out of range: {}", 25 * 3_600_000_000_000i64)
    );
}

#[rstest]
#[case("2021-01-01 00:00:00", "2020-12-30 23:00:00", "INTERVAL '1 01:00:00' DAY TO SECOND")]
#[case("2021-01-01 00:00:00", "2020-12-31 23:00:00", "INTERVAL '0 01:00:00' DAY TO SECOND")]
#[case("2020-12-31 23:00:00", "2021-01-01 00:00:00", "INTERVAL '-0 01:00:00' DAY TO SECOND")]
fn test_timestamp_difference(#[case] l: &str, #[case] r: &str, #[case] expected: &str) {
    let result = eval(IntervalOpType::DatetimeMinusDatetime, ts(l), ts(r)).unwrap();
    assert_eq!(result.to_string(), expected);
}

#[test]
fn test_date_difference_is_negative_days() {
    let result = eval(
        IntervalOpType::DatetimeMinusDatetime,
        date(2021, 1, 1),
        date(2021, 2, 1),
    )
    .unwrap();
    assert_eq!(result, interval(IntervalQualifier::Day, true, 31, 0));
    assert_eq!(result.to_string(), "INTERVAL '-31' DAY");
}

#[test]
fn test_session_settings_from_json() {
    let settings = SessionSettings::from_json(r#"{"time_zone_offset_seconds": -18000}"#).unwrap();
    let ctx = EvaluationContext::builder().settings(settings).build();
    let zoned = tempora::types::TimestampTz::new(
        NaiveDateTime::parse_from_str("2021-06-01 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
        0,
    )
    .unwrap();
    // 12:00 in UTC is 07:00 in the session zone
    let op = IntervalOperation::new(
        IntervalOpType::DatetimeMinusDatetime,
        Expression::constant(Value::TimestampTz(zoned)),
        Expression::constant(ts("2021-06-01 07:00:00")),
    )
    .unwrap();
    assert_eq!(
        op.evaluate(&ctx).unwrap().to_string(),
        "INTERVAL '0 00:00:00' DAY TO SECOND"
    );
}

// ============================================================================
// Exactness
// ============================================================================

fn qualifier(year_month: bool) -> impl Strategy<Value = IntervalQualifier> {
    let qualifiers: Vec<_> = IntervalQualifier::ALL
        .into_iter()
        .filter(|q| q.is_year_month() == year_month)
        .collect();
    proptest::sample::select(qualifiers)
}

fn interval_in(q: IntervalQualifier) -> impl Strategy<Value = IntervalValue> {
    (any::<bool>(), 0u64..1_000_000_000_000, 0..q.remaining_bound())
        .prop_map(move |(negative, leading, remaining)| {
            IntervalValue::new(q, negative, leading, remaining).unwrap()
        })
}

fn same_family_pair() -> impl Strategy<Value = (IntervalValue, IntervalValue)> {
    any::<bool>()
        .prop_flat_map(|year_month| (qualifier(year_month), qualifier(year_month)))
        .prop_flat_map(|(qa, qb)| (interval_in(qa), interval_in(qb)))
}

proptest! {
    #[test]
    fn prop_plus_then_minus_restores_value((a, b) in same_family_pair()) {
        let sum = IntervalOperation::new(
            IntervalOpType::IntervalPlusInterval,
            Expression::constant(a.clone()),
            Expression::constant(b.clone()),
        )
        .unwrap();
        let difference = IntervalOperation::new(
            IntervalOpType::IntervalMinusInterval,
            Expression::interval(sum),
            Expression::constant(b),
        )
        .unwrap();
        let result = difference.evaluate(&EvaluationContext::new()).unwrap();
        let result = result.as_interval().unwrap();
        prop_assert_eq!(interval_to_absolute(result), interval_to_absolute(&a));
        prop_assert_eq!(result.is_negative(), interval_to_absolute(&a) < BigInt::from(0));
    }
}
