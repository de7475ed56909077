//! Arithmetic operations with intervals
//!
//! [`IntervalOperation`] combines two operands where at least one side is an
//! interval, or subtracts two date/time values. Its result type is derived
//! once, when the node is built, by [`resolve_type`]; evaluation dispatches on
//! the operation and on the run-time kinds of the operand values.

use std::fmt;
use tempora_types::interval::{DEFAULT_PRECISION, DEFAULT_SCALE, MAXIMUM_PRECISION};
use tempora_types::type_info::{
    TYPE_INTERVAL_DAY, TYPE_INTERVAL_DAY_TO_SECOND, TYPE_INTERVAL_HOUR_TO_SECOND,
};
use tempora_types::{TypeInfo, Value, ValueType};

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::expression::{ColumnResolver, Expression, ExpressionVisitor};

/// Digits enough to hold `INTERVAL '999999999999999999' YEAR / INTERVAL '1' MONTH`
const INTERVAL_YEAR_DIGITS: i64 = 20;

/// Digits enough to hold `INTERVAL '999999999999999999' DAY / INTERVAL '0.000000001' SECOND`
const INTERVAL_DAY_DIGITS: i64 = 32;

/// Result type of a year-month interval divided by an interval
pub const INTERVAL_DIVIDE_INTERVAL_YEAR_TYPE: TypeInfo = TypeInfo::new(
    ValueType::Decimal,
    INTERVAL_YEAR_DIGITS * 3,
    (INTERVAL_YEAR_DIGITS * 2) as i32,
);

/// Result type of a day-time interval divided by an interval
pub const INTERVAL_DIVIDE_INTERVAL_DAY_TYPE: TypeInfo = TypeInfo::new(
    ValueType::Decimal,
    INTERVAL_DAY_DIGITS * 3,
    (INTERVAL_DAY_DIGITS * 2) as i32,
);

/// Kind of interval operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalOpType {
    IntervalPlusInterval,
    IntervalMinusInterval,
    /// Non-standard: the ratio of two intervals as an exact decimal
    IntervalDivideInterval,
    DatetimePlusInterval,
    DatetimeMinusInterval,
    IntervalMultiplyNumeric,
    IntervalDivideNumeric,
    DatetimeMinusDatetime,
}

impl IntervalOpType {
    /// Operator token used in SQL text
    pub fn token(self) -> char {
        match self {
            Self::IntervalPlusInterval | Self::DatetimePlusInterval => '+',
            Self::IntervalMinusInterval | Self::DatetimeMinusInterval | Self::DatetimeMinusDatetime => '-',
            Self::IntervalMultiplyNumeric => '*',
            Self::IntervalDivideInterval | Self::IntervalDivideNumeric => '/',
        }
    }

    /// Check if this operation adds its right operand
    pub fn is_plus(self) -> bool {
        matches!(self, Self::IntervalPlusInterval | Self::DatetimePlusInterval)
    }
}

impl fmt::Display for IntervalOpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Derive the result type of an interval operation from its operand types.
///
/// A `NULL` operand type is compatible with every operation. Operand kinds the
/// operation is not defined for, including a time of day combined with a
/// year-month interval, fail with [`EvalError::IncompatibleOperands`].
pub fn resolve_type(
    op_type: IntervalOpType,
    left: &TypeInfo,
    right: &TypeInfo,
    forced_type: Option<&TypeInfo>,
) -> EvalResult<TypeInfo> {
    let (l, r) = (left.value_type(), right.value_type());
    let incompatible = || EvalError::incompatible(op_type.to_string(), l, r);
    let is = |t: ValueType, pred: fn(ValueType) -> bool| t == ValueType::Null || pred(t);

    if let Some(forced) = forced_type {
        if op_type != IntervalOpType::DatetimeMinusDatetime || !forced.value_type().is_interval() {
            return Err(EvalError::incompatible(op_type.to_string(), l, forced.value_type()));
        }
    }

    match op_type {
        IntervalOpType::IntervalPlusInterval | IntervalOpType::IntervalMinusInterval => {
            match (l.interval_qualifier(), r.interval_qualifier()) {
                (Some(lq), Some(rq)) => lq
                    .higher_order(rq)
                    .map(|q| TypeInfo::of(ValueType::Interval(q)))
                    .ok_or_else(incompatible),
                (Some(_), None) if r == ValueType::Null => Ok(TypeInfo::of(l)),
                (None, Some(_)) if l == ValueType::Null => Ok(TypeInfo::of(r)),
                (None, None) if l == ValueType::Null && r == ValueType::Null => {
                    Ok(TypeInfo::of(ValueType::Null))
                }
                _ => Err(incompatible()),
            }
        }
        IntervalOpType::IntervalDivideInterval => {
            if !is(l, ValueType::is_interval) || !is(r, ValueType::is_interval) {
                return Err(incompatible());
            }
            if l.is_interval() && r.is_interval() && l.is_year_month_interval() != r.is_year_month_interval() {
                return Err(incompatible());
            }
            if l.is_year_month_interval() || r.is_year_month_interval() {
                Ok(INTERVAL_DIVIDE_INTERVAL_YEAR_TYPE)
            } else {
                Ok(INTERVAL_DIVIDE_INTERVAL_DAY_TYPE)
            }
        }
        IntervalOpType::DatetimePlusInterval | IntervalOpType::DatetimeMinusInterval => {
            if !is(l, ValueType::is_datetime) || !is(r, ValueType::is_interval) {
                return Err(incompatible());
            }
            if l.is_time_of_day() && r.is_year_month_interval() {
                return Err(incompatible());
            }
            Ok(*left)
        }
        IntervalOpType::IntervalMultiplyNumeric | IntervalOpType::IntervalDivideNumeric => {
            if !is(l, ValueType::is_interval) || !is(r, ValueType::is_numeric) {
                return Err(incompatible());
            }
            Ok(*left)
        }
        IntervalOpType::DatetimeMinusDatetime => {
            if !is(l, ValueType::is_datetime) || !is(r, ValueType::is_datetime) {
                return Err(incompatible());
            }
            Ok(if let Some(forced) = forced_type {
                TypeInfo::new(forced.value_type(), MAXIMUM_PRECISION, forced.scale())
            } else if l.is_time_of_day() && r.is_time_of_day() {
                TYPE_INTERVAL_HOUR_TO_SECOND
            } else if l == ValueType::Date && r == ValueType::Date {
                TYPE_INTERVAL_DAY
            } else {
                TYPE_INTERVAL_DAY_TO_SECOND
            })
        }
    }
}

/// A binary operation with intervals
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalOperation {
    op_type: IntervalOpType,
    left: Expression,
    right: Expression,
    forced_type: Option<TypeInfo>,
    type_info: TypeInfo,
}

impl IntervalOperation {
    /// Create an operation, deriving its result type
    pub fn new(op_type: IntervalOpType, left: Expression, right: Expression) -> EvalResult<Self> {
        Self::build(op_type, left, right, None)
    }

    /// Create a date/time subtraction whose result is cast to `forced_type`
    pub fn with_forced_type(
        op_type: IntervalOpType,
        left: Expression,
        right: Expression,
        forced_type: TypeInfo,
    ) -> EvalResult<Self> {
        Self::build(op_type, left, right, Some(forced_type))
    }

    fn build(
        op_type: IntervalOpType,
        left: Expression,
        right: Expression,
        forced_type: Option<TypeInfo>,
    ) -> EvalResult<Self> {
        let type_info = resolve_type(
            op_type,
            &left.type_info(),
            &right.type_info(),
            forced_type.as_ref(),
        )?;
        Ok(Self {
            op_type,
            left,
            right,
            forced_type,
            type_info,
        })
    }

    pub fn op_type(&self) -> IntervalOpType {
        self.op_type
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }

    pub fn forced_type(&self) -> Option<&TypeInfo> {
        self.forced_type.as_ref()
    }

    /// Result type derived at construction
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// Evaluate both operands and combine them; a null operand gives null
    pub fn evaluate(&self, ctx: &EvaluationContext) -> EvalResult<Value> {
        let l = self.left.evaluate(ctx)?;
        let r = self.right.evaluate(ctx)?;
        if l.is_null() || r.is_null() {
            return Ok(Value::Null);
        }
        log::trace!(
            "evaluating {:?} on {} and {}",
            self.op_type,
            l.value_type(),
            r.value_type()
        );
        match self.op_type {
            IntervalOpType::IntervalPlusInterval | IntervalOpType::IntervalMinusInterval => {
                self.interval_plus_minus_interval(&l, &r)
            }
            IntervalOpType::IntervalDivideInterval => self.interval_divide_interval(&l, &r),
            IntervalOpType::DatetimePlusInterval | IntervalOpType::DatetimeMinusInterval => {
                self.datetime_with_interval(&l, &r)
            }
            IntervalOpType::IntervalMultiplyNumeric | IntervalOpType::IntervalDivideNumeric => {
                self.interval_with_numeric(&l, &r)
            }
            IntervalOpType::DatetimeMinusDatetime => self.datetime_minus_datetime(ctx, &l, &r),
        }
    }

    pub fn map_columns(&mut self, resolver: &dyn ColumnResolver) {
        self.left.map_columns(resolver);
        self.right.map_columns(resolver);
    }

    pub fn set_evaluatable(&mut self, table_alias: &str, evaluatable: bool) {
        self.left.set_evaluatable(table_alias, evaluatable);
        self.right.set_evaluatable(table_alias, evaluatable);
    }

    /// Optimize both operands; if both become constants, replace the operation
    /// by its value
    pub fn optimize(self, ctx: &EvaluationContext) -> EvalResult<Expression> {
        let Self {
            op_type,
            left,
            right,
            forced_type,
            type_info,
        } = self;
        let folded = Self {
            op_type,
            left: left.optimize(ctx)?,
            right: right.optimize(ctx)?,
            forced_type,
            type_info,
        };
        if folded.left.is_constant() && folded.right.is_constant() {
            let value = folded.evaluate(ctx)?;
            log::trace!("folded {} to {}", folded.sql(), value);
            return Ok(Expression::Constant(value));
        }
        Ok(Expression::interval(folded))
    }

    pub fn is_everything(&self, visitor: ExpressionVisitor) -> bool {
        self.left.is_everything(visitor) && self.right.is_everything(visitor)
    }

    pub fn cost(&self) -> u32 {
        self.left.cost() + 1 + self.right.cost()
    }

    /// Operand at `index`: 0 is the left operand, 1 the right one
    pub fn subexpression(&self, index: usize) -> EvalResult<&Expression> {
        match index {
            0 => Ok(&self.left),
            1 => Ok(&self.right),
            _ => Err(EvalError::index_out_of_bounds(index)),
        }
    }

    /// SQL text: `(left op right)`, followed by the forced type if any
    pub fn sql(&self) -> String {
        let mut s = format!(
            "({} {} {})",
            self.left.sql(),
            self.op_type.token(),
            self.right.sql()
        );
        if let Some(forced) = &self.forced_type {
            s.push(' ');
            write_forced_type(&mut s, forced);
        }
        s
    }
}

/// Append the qualifier of a forced interval type, leaving out a default
/// precision or scale
fn write_forced_type(out: &mut String, forced: &TypeInfo) {
    if let Some(qualifier) = forced.value_type().interval_qualifier() {
        let precision = Some(forced.precision()).filter(|p| *p != DEFAULT_PRECISION);
        let scale = Some(forced.scale()).filter(|s| *s != DEFAULT_SCALE);
        qualifier.write_type_name(out, precision, scale, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempora_types::{IntervalQualifier, IntervalValue};

    fn interval_type(q: IntervalQualifier) -> TypeInfo {
        TypeInfo::of(ValueType::Interval(q))
    }

    fn resolve(op: IntervalOpType, l: TypeInfo, r: TypeInfo) -> EvalResult<TypeInfo> {
        resolve_type(op, &l, &r, None)
    }

    #[test]
    fn test_interval_plus_interval_takes_higher_order() {
        let t = resolve(
            IntervalOpType::IntervalPlusInterval,
            interval_type(IntervalQualifier::Month),
            interval_type(IntervalQualifier::Year),
        )
        .unwrap();
        assert_eq!(t.value_type(), ValueType::Interval(IntervalQualifier::YearToMonth));

        let err = resolve(
            IntervalOpType::IntervalMinusInterval,
            interval_type(IntervalQualifier::Month),
            interval_type(IntervalQualifier::Day),
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::IncompatibleOperands { .. }));
    }

    #[test]
    fn test_interval_divide_interval_type() {
        let day = resolve(
            IntervalOpType::IntervalDivideInterval,
            interval_type(IntervalQualifier::Day),
            interval_type(IntervalQualifier::Second),
        )
        .unwrap();
        assert_eq!((day.precision(), day.scale()), (96, 64));

        let year = resolve(
            IntervalOpType::IntervalDivideInterval,
            TypeInfo::of(ValueType::Null),
            interval_type(IntervalQualifier::YearToMonth),
        )
        .unwrap();
        assert_eq!((year.precision(), year.scale()), (60, 40));
    }

    #[test]
    fn test_datetime_with_interval_keeps_left_type() {
        let ts = TypeInfo::new(ValueType::Timestamp, 26, 3);
        let t = resolve(
            IntervalOpType::DatetimePlusInterval,
            ts,
            interval_type(IntervalQualifier::YearToMonth),
        )
        .unwrap();
        assert_eq!(t, ts);

        let err = resolve(
            IntervalOpType::DatetimeMinusInterval,
            TypeInfo::of(ValueType::TimeTz),
            interval_type(IntervalQualifier::Year),
        )
        .unwrap_err();
        assert_eq!(err.code(), tempora_diagnostics::TMP0100);
    }

    #[test]
    fn test_datetime_minus_datetime_types() {
        let op = IntervalOpType::DatetimeMinusDatetime;
        let time = TypeInfo::of(ValueType::Time);
        let time_tz = TypeInfo::of(ValueType::TimeTz);
        let date = TypeInfo::of(ValueType::Date);
        let ts = TypeInfo::of(ValueType::Timestamp);
        assert_eq!(resolve(op, time, time_tz).unwrap(), TYPE_INTERVAL_HOUR_TO_SECOND);
        assert_eq!(resolve(op, date, date).unwrap(), TYPE_INTERVAL_DAY);
        assert_eq!(resolve(op, date, ts).unwrap(), TYPE_INTERVAL_DAY_TO_SECOND);

        let forced = TypeInfo::new(ValueType::Interval(IntervalQualifier::Hour), 5, 0);
        let t = resolve_type(op, &ts, &ts, Some(&forced)).unwrap();
        assert_eq!(t, TypeInfo::new(ValueType::Interval(IntervalQualifier::Hour), 18, 0));
    }

    #[test]
    fn test_forced_type_only_for_datetime_difference() {
        let forced = interval_type(IntervalQualifier::Hour);
        let day = interval_type(IntervalQualifier::Day);
        assert!(resolve_type(IntervalOpType::IntervalPlusInterval, &day, &day, Some(&forced)).is_err());
        let numeric = TypeInfo::of(ValueType::Decimal);
        let ts = TypeInfo::of(ValueType::Timestamp);
        assert!(resolve_type(IntervalOpType::DatetimeMinusDatetime, &ts, &ts, Some(&numeric)).is_err());
    }

    #[test]
    fn test_sql_and_cost() {
        let one_day = Expression::constant(IntervalValue::new(IntervalQualifier::Day, false, 1, 0).unwrap());
        let op = IntervalOperation::new(
            IntervalOpType::IntervalMultiplyNumeric,
            one_day,
            Expression::constant(Value::Integer(3)),
        )
        .unwrap();
        assert_eq!(op.sql(), "(INTERVAL '1' DAY * 3)");
        assert_eq!(op.cost(), 1);
        assert!(op.subexpression(1).is_ok());
        assert!(op.subexpression(2).is_err());
    }

    #[test]
    fn test_forced_type_sql() {
        let mut s = String::new();
        write_forced_type(
            &mut s,
            &TypeInfo::new(ValueType::Interval(IntervalQualifier::DayToSecond), 2, 6),
        );
        assert_eq!(s, "DAY TO SECOND");

        let mut s = String::new();
        write_forced_type(
            &mut s,
            &TypeInfo::new(ValueType::Interval(IntervalQualifier::DayToSecond), 18, 3),
        );
        assert_eq!(s, "DAY(18) TO SECOND(3)");
    }
}
