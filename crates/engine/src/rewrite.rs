//! In-line timestamp substitution.
//!
//! Splices a freshly rendered timestamp over a previously located span,
//! leaving every other byte of the line exactly as it was. The composed
//! length is validated against the destination capacity before any byte is
//! written; a partially assembled result is never observable.

use bytes::Bytes;

use crate::stamp::{MatchSpan, StampError};

/// Produce `line[..start] + replacement + line[end..]`.
///
/// A `None` span is a successful pass-through: the line is returned
/// unchanged. Fails with [`StampError::BufferOverflow`] when the composed
/// line would exceed `capacity`, and [`StampError::InvalidArgument`] when
/// the span does not fit inside the line.
pub fn rewrite_line(
    line: &[u8],
    replacement: &str,
    span: Option<MatchSpan>,
    capacity: usize,
) -> Result<Bytes, StampError> {
    let Some(span) = span else {
        if line.len() > capacity {
            return Err(StampError::BufferOverflow {
                needed: line.len(),
                capacity,
            });
        }
        return Ok(Bytes::copy_from_slice(line));
    };

    if span.start > span.end || span.end > line.len() {
        return Err(StampError::InvalidArgument(format!(
            "span {}..{} out of bounds for a {}-byte line",
            span.start,
            span.end,
            line.len()
        )));
    }

    let needed = line.len() - span.len() + replacement.len();
    if needed > capacity {
        return Err(StampError::BufferOverflow { needed, capacity });
    }

    let mut out = Vec::with_capacity(needed);
    out.extend_from_slice(&line[..span.start]);
    out.extend_from_slice(replacement.as_bytes());
    out.extend_from_slice(&line[span.end..]);
    Ok(Bytes::from(out))
}
