//! Shared type definitions for event data
//!
//! Common enums used across the intake pipeline and its events.

use serde::{Deserialize, Serialize};

/// Role of an upload surface
///
/// Determines the cardinality rule applied during validation: a Target
/// surface accepts exactly one file, any other surface accepts many.
/// The role is fixed per drop-zone and passed in by the host UI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UploadRole {
    /// The single required primary audio file
    Target,
    /// A corpus/auxiliary upload permitting many files
    Other,
}

impl std::fmt::Display for UploadRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadRole::Target => write!(f, "target"),
            UploadRole::Other => write!(f, "other"),
        }
    }
}

/// How an upload event reached the pipeline
///
/// Rejected picker uploads instruct the host to clear the input's
/// selection; rejected drops have nothing to clear.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventOrigin {
    /// File-picker input (change event)
    Picker,
    /// Drop-zone region (drop event)
    Drop,
}

impl std::fmt::Display for EventOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventOrigin::Picker => write!(f, "picker"),
            EventOrigin::Drop => write!(f, "drop"),
        }
    }
}

/// Input parameter handled by a drop-zone controller
///
/// Handlers are resolved through an explicit match on this enum rather
/// than by name lookup, so an unknown parameter cannot reach dispatch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    /// Uploaded file(s), validated through the intake pipeline
    File,
    /// Full path text field
    Path,
    /// Amplitude in dB
    Amplitude,
    /// Offset in seconds
    Offset,
}

impl Parameter {
    /// Key used for this parameter in assembled line output
    pub fn key(&self) -> &'static str {
        match self {
            Parameter::File => "file",
            Parameter::Path => "path",
            Parameter::Amplitude => "amplitude",
            Parameter::Offset => "offset",
        }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
