//! Finding where a timestamp-shaped substring begins.
//!
//! Location is independent of parseability: a span is reported for anything
//! that *looks* like a recognized encoding, whether or not the parser could
//! convert it. The rewriter only needs to know where to splice.

use grep_matcher::Matcher;

use super::model::{MatchSpan, StampError};
use super::registry::FormatRegistry;

impl FormatRegistry {
    /// Return the leftmost timestamp-shaped span in `line`.
    ///
    /// Every registry pattern is scanned; the span with the smallest start
    /// offset wins, and ties between equal starts go to the
    /// earliest-registered pattern. Fails with [`StampError::NoMatch`] when
    /// no pattern matches anywhere in the line.
    pub fn locate(&self, line: &[u8]) -> Result<MatchSpan, StampError> {
        if line.is_empty() {
            return Err(StampError::InvalidArgument("empty line".into()));
        }

        let mut best: Option<MatchSpan> = None;
        for entry in self.entries() {
            let Some(m) = entry.matcher().find(line).ok().flatten() else {
                continue;
            };
            // Strictly smaller keeps the earliest-registered winner on ties
            if best.map_or(true, |b| m.start() < b.start) {
                best = Some(MatchSpan::new(m.start(), m.end()));
            }
        }

        best.ok_or(StampError::NoMatch)
    }
}
