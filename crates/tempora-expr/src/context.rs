//! Evaluation context for interval expressions

use serde::{Deserialize, Serialize};
use tempora_types::Value;

use crate::error::{EvalError, EvalResult};

/// Session level settings that affect evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Offset of the session time zone from UTC, in seconds.
    ///
    /// Bare times and timestamps are taken to be in this zone whenever they
    /// have to be compared with zoned values.
    pub time_zone_offset_seconds: i32,
}

impl SessionSettings {
    /// Load settings from a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Context a single evaluation reads from: the session settings and the
/// current row that column references resolve against
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    settings: SessionSettings,
    row: Vec<Value>,
}

impl EvaluationContext {
    /// Create a context with default settings and an empty row
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EvaluationContextBuilder {
        EvaluationContextBuilder::default()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Session time zone offset in seconds
    pub fn time_zone_offset_seconds(&self) -> i32 {
        self.settings.time_zone_offset_seconds
    }

    /// Replace the current row
    pub fn set_row(&mut self, row: Vec<Value>) {
        self.row = row;
    }

    /// Value in the given slot of the current row
    pub fn column_value(&self, slot: usize) -> EvalResult<&Value> {
        self.row
            .get(slot)
            .ok_or_else(|| EvalError::index_out_of_bounds(slot))
    }
}

/// Builder for [`EvaluationContext`]
#[derive(Debug, Default)]
pub struct EvaluationContextBuilder {
    settings: SessionSettings,
    row: Vec<Value>,
}

impl EvaluationContextBuilder {
    pub fn settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn time_zone_offset_seconds(mut self, offset_seconds: i32) -> Self {
        self.settings.time_zone_offset_seconds = offset_seconds;
        self
    }

    pub fn row(mut self, row: Vec<Value>) -> Self {
        self.row = row;
        self
    }

    pub fn build(self) -> EvaluationContext {
        EvaluationContext {
            settings: self.settings,
            row: self.row,
        }
    }
}
