//! Tempora value layer
//!
//! This crate defines the scalar values the temporal arithmetic core works on:
//! - Date, time and timestamp values, with and without a time zone offset
//! - Sign-magnitude interval values for the year-month and day-time families
//! - Exact arbitrary precision decimals
//! - Type descriptors (value type, precision, scale)
//!
//! It also provides the collaborators the expression evaluator relies on:
//! conversion of intervals to and from their absolute form, date/time field
//! access, and calendar month arithmetic.

pub mod datetime;
pub mod decimal;
pub mod error;
pub mod interval;
pub mod type_info;
pub mod value;

pub use decimal::Decimal;
pub use error::{ValueError, ValueResult};
pub use interval::{
    IntervalField, IntervalQualifier, IntervalValue, interval_from_absolute, interval_to_absolute,
};
pub use type_info::{TypeInfo, ValueType};
pub use value::{TimeTz, TimestampTz, Value};
