use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StampError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Output would need {needed} bytes (capacity: {capacity})")]
    BufferOverflow { needed: usize, capacity: usize },

    #[error("No registry entry converted the line to a time value")]
    TimeParse,

    #[error("No timestamp-shaped span found in the line")]
    NoMatch,

    #[error("System clock read failed")]
    SystemClock,

    #[error("Invalid detection pattern '{name}': {reason}")]
    Pattern { name: &'static str, reason: String },
}

/// Byte span of a recognized timestamp substring within a line.
///
/// `end` is exclusive. A span identifies *where* a timestamp-shaped
/// substring sits, independent of whether it parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An absolute time recovered from a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStamp {
    /// Seconds since the Unix epoch.
    pub epoch_seconds: i64,
    /// Sub-second remainder, where the matched text carried one
    /// (unix-fractional encoding only).
    pub fraction_nanos: Option<u32>,
}

impl ParsedStamp {
    pub fn from_seconds(epoch_seconds: i64) -> Self {
        Self {
            epoch_seconds,
            fraction_nanos: None,
        }
    }
}

/// How a registry entry converts its matched text into a time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// strftime-style template fed to the calendar parser.
    Calendar(&'static str),
    /// Run of >= 10 digits read as epoch seconds.
    UnixPlain,
    /// Digits, a dot, 1-9 fractional digits.
    UnixFractional,
}
