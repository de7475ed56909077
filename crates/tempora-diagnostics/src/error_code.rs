//! Error codes following a structured numbering system
//!
//! Error code ranges:
//! - TMP0001-TMP0099: Data errors raised by the value layer
//! - TMP0100-TMP0199: Type resolution errors (expression construction)
//! - TMP0200-TMP0299: Evaluation errors (runtime)
//! - TMP0900-TMP0999: Internal errors (contract violations, never user-facing)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a data error (0001-0099)
    pub const fn is_data_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a type resolution error (0100-0199)
    pub const fn is_type_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is an evaluation error (0200-0299)
    pub const fn is_evaluation_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is an internal error (0900-0999)
    pub const fn is_internal(&self) -> bool {
        self.0 >= 900 && self.0 < 1000
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TMP{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Data errors (0001-0099)
    map.insert(1, ErrorInfo::new("Numeric value out of range")
        .with_help("The computed value does not fit the target type; time-of-day arithmetic does not wrap around midnight"));
    map.insert(2, ErrorInfo::new("Division by zero"));
    map.insert(3, ErrorInfo::new("Invalid value"));
    map.insert(4, ErrorInfo::new("Data conversion failed"));

    // Type resolution errors (0100-0199)
    map.insert(100, ErrorInfo::new("Incompatible operand types")
        .with_help("Year-month and day-time intervals cannot be combined, and a time of day only accepts day-time intervals"));

    // Evaluation errors (0200-0299)
    map.insert(200, ErrorInfo::new("Column is not mapped"));
    map.insert(201, ErrorInfo::new("Index out of bounds"));

    // Internal errors (0900-0999)
    map.insert(900, ErrorInfo::new("Internal error"));

    map
});

// Data errors
pub const TMP0001: ErrorCode = ErrorCode::new(1);
pub const TMP0002: ErrorCode = ErrorCode::new(2);
pub const TMP0003: ErrorCode = ErrorCode::new(3);
pub const TMP0004: ErrorCode = ErrorCode::new(4);

// Type resolution errors
pub const TMP0100: ErrorCode = ErrorCode::new(100);

// Evaluation errors
pub const TMP0200: ErrorCode = ErrorCode::new(200);
pub const TMP0201: ErrorCode = ErrorCode::new(201);

// Internal errors
pub const TMP0900: ErrorCode = ErrorCode::new(900);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(TMP0001.to_string(), "TMP0001");
        assert_eq!(TMP0100.to_string(), "TMP0100");
        assert_eq!(TMP0900.to_string(), "TMP0900");
    }

    #[test]
    fn test_error_categories() {
        assert!(TMP0001.is_data_error());
        assert!(!TMP0001.is_type_error());

        assert!(TMP0100.is_type_error());
        assert!(TMP0200.is_evaluation_error());
        assert!(TMP0900.is_internal());
        assert!(!TMP0002.is_internal());
    }

    #[test]
    fn test_error_info() {
        assert_eq!(TMP0002.info().description, "Division by zero");
        assert!(TMP0001.info().help.is_some());
        assert_eq!(ErrorCode::new(555).info().description, "Unknown error");
    }
}
