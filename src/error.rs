//! Unified error types for the PetCare controller.
//!
//! Every failure the core can see is local and non-fatal: a bad instruction
//! line, a payload that does not decode, a time string that does not fit the
//! fixed layout.  Callers log these on the diagnostic channel and carry on
//! with the next tick.  Only configuration errors surface at boot.

use core::fmt;

// ---------------------------------------------------------------------------
// Time parsing
// ---------------------------------------------------------------------------

/// Which field of a time or timestamp string was at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeParseError {
    /// The string ends before the last fixed-offset field.
    TooShort { expected: usize, actual: usize },
    /// A field contains something other than ASCII digits.
    NotDigits(TimeField),
    /// A field has the wrong separator in front of it (`HH:MM` only).
    BadSeparator { offset: usize },
    /// A field parsed but is outside its accepted range.
    OutOfRange { field: TimeField, value: u16 },
}

impl fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { expected, actual } => {
                write!(f, "too short: need {expected} chars, got {actual}")
            }
            Self::NotDigits(field) => write!(f, "{field} is not numeric"),
            Self::BadSeparator { offset } => write!(f, "expected ':' at offset {offset}"),
            Self::OutOfRange { field, value } => write!(f, "{field} {value} out of range"),
        }
    }
}

impl std::error::Error for TimeParseError {}

// ---------------------------------------------------------------------------
// Command protocol
// ---------------------------------------------------------------------------

/// Reasons an instruction line could not be turned into an [`AppCommand`].
///
/// [`AppCommand`]: crate::app::commands::AppCommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// No known instruction or prefix matched.
    Unrecognized(String),
    /// The line exceeds the configured maximum length.
    LineTooLong { len: usize, max: usize },
    /// JSON payload failed to decode.
    MalformedJson(String),
    /// A program or lamp entry carried an unusable time string.
    BadScheduleTime { index: usize, source: TimeParseError },
    /// `SET_TIME` payload rejected.
    BadTimestamp(TimeParseError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized(line) => write!(f, "unknown command: {line:?}"),
            Self::LineTooLong { len, max } => write!(f, "line too long ({len} > {max} bytes)"),
            Self::MalformedJson(msg) => write!(f, "JSON parsing failed: {msg}"),
            Self::BadScheduleTime { index, source } => {
                write!(f, "entry {index}: bad time: {source}")
            }
            Self::BadTimestamp(e) => write!(f, "bad timestamp: {e}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedJson(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Io(std::io::Error),
    /// Config file is not valid JSON for [`SystemConfig`](crate::config::SystemConfig).
    Corrupted(String),
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Corrupted(msg) => write!(f, "config corrupted: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
