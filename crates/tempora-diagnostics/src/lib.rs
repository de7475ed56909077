//! Tempora diagnostics
//!
//! Structured error codes used by the value layer and the expression evaluator,
//! so callers can tell data errors apart from internal contract violations.

mod error_code;

pub use error_code::*;
