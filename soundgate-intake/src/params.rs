//! Non-file parameter checks and line assembly
//!
//! The upload surfaces sit next to plain text inputs (path, amplitude,
//! offset) that feed the same downstream line. Checks mirror the intake
//! validator's shape: errors are collected, never thrown.

use serde::Serialize;
use soundgate_common::events::Parameter;

/// Error shown when the path field is empty
pub const PATH_EMPTY_ERROR: &str = "File path can't be empty.";
/// Error shown when the amplitude field is not numeric
pub const AMPLITUDE_NAN_ERROR: &str = "Amplitude value must be a number.";
/// Error shown when the amplitude is outside the accepted range
pub const AMPLITUDE_RANGE_ERROR: &str = "Amplitude value must be between -70 and 6.";
/// Error shown when the offset field is not numeric
pub const OFFSET_NAN_ERROR: &str = "Offset value must be a number.";
/// Error shown when the offset is outside the accepted range
pub const OFFSET_RANGE_ERROR: &str = "Offset value must be between 0 and 10.";

/// Accepted amplitude range in dB
pub const AMPLITUDE_RANGE: std::ops::RangeInclusive<f64> = -70.0..=6.0;
/// Accepted offset range in seconds
pub const OFFSET_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

/// A validated parameter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Path(String),
    Amplitude(f64),
    Offset(f64),
}

/// Outcome of checking one parameter input
#[derive(Debug, Clone, Default)]
pub struct ParameterCheck {
    /// Error messages for the parameter's error container
    pub errors: Vec<String>,
    /// Parsed value, present only when no errors were recorded
    pub value: Option<ParameterValue>,
}

impl ParameterCheck {
    fn ok(value: ParameterValue) -> Self {
        Self {
            errors: Vec::new(),
            value: Some(value),
        }
    }

    fn fail(errors: Vec<String>) -> Self {
        Self {
            errors,
            value: None,
        }
    }

    /// True when the input passed all checks
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check the path field: must be non-empty
///
/// Anything beyond emptiness (invalid characters, existence) is the
/// host's concern.
pub fn check_path(raw: &str) -> ParameterCheck {
    if raw.is_empty() {
        return ParameterCheck::fail(vec![PATH_EMPTY_ERROR.to_string()]);
    }
    ParameterCheck::ok(ParameterValue::Path(raw.to_string()))
}

/// Check the amplitude field: numeric, within [`AMPLITUDE_RANGE`] dB
pub fn check_amplitude(raw: &str) -> ParameterCheck {
    check_numeric(
        raw,
        AMPLITUDE_RANGE,
        AMPLITUDE_NAN_ERROR,
        AMPLITUDE_RANGE_ERROR,
        ParameterValue::Amplitude,
    )
}

/// Check the offset field: numeric, within [`OFFSET_RANGE`] seconds
pub fn check_offset(raw: &str) -> ParameterCheck {
    check_numeric(
        raw,
        OFFSET_RANGE,
        OFFSET_NAN_ERROR,
        OFFSET_RANGE_ERROR,
        ParameterValue::Offset,
    )
}

fn check_numeric(
    raw: &str,
    range: std::ops::RangeInclusive<f64>,
    nan_error: &str,
    range_error: &str,
    wrap: fn(f64) -> ParameterValue,
) -> ParameterCheck {
    let value = match raw.trim().parse::<f64>() {
        Ok(value) if !value.is_nan() => value,
        _ => return ParameterCheck::fail(vec![nan_error.to_string()]),
    };
    if !range.contains(&value) {
        return ParameterCheck::fail(vec![range_error.to_string()]);
    }
    ParameterCheck::ok(wrap(value))
}

/// Accumulated parameter values for one upload role
///
/// The line is handed downstream once a path is present; amplitude and
/// offset are optional refinements.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParameterLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
}

impl ParameterLine {
    /// Record a validated value
    pub fn set(&mut self, value: ParameterValue) {
        match value {
            ParameterValue::Path(path) => self.path = Some(path),
            ParameterValue::Amplitude(amplitude) => self.amplitude = Some(amplitude),
            ParameterValue::Offset(offset) => self.offset = Some(offset),
        }
    }

    /// A line is ready once its path is known
    pub fn is_ready(&self) -> bool {
        self.path.is_some()
    }

    /// Assembled line as JSON for logging and the LineReady event
    pub fn as_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::Value::Null)
    }
}

/// Which parameter a value belongs to
pub fn parameter_of(value: &ParameterValue) -> Parameter {
    match value {
        ParameterValue::Path(_) => Parameter::Path,
        ParameterValue::Amplitude(_) => Parameter::Amplitude,
        ParameterValue::Offset(_) => Parameter::Offset,
    }
}
