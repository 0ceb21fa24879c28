//! Bounds-checked output building.
//!
//! [`BoundedBuffer`] is a growable string builder with a hard byte capacity.
//! Every append validates the committed length *before* writing, so a failed
//! append leaves the buffer exactly as it was. This replaces fixed C-style
//! destination buffers where an oversized write either truncates silently or
//! scribbles past the end.

use std::fmt;

use crate::stamp::StampError;

/// Growable output buffer with a hard capacity cap.
#[derive(Debug)]
pub struct BoundedBuffer {
    inner: String,
    capacity: usize,
    overflow_needed: Option<usize>,
}

impl BoundedBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: String::new(),
            capacity,
            overflow_needed: None,
        }
    }

    /// Bytes committed so far.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether any append has ever been rejected for capacity.
    ///
    /// Lets callers driving this buffer through `fmt::Write` tell a capacity
    /// rejection apart from a formatter-side error, since `fmt::Error`
    /// carries no cause.
    pub fn overflowed(&self) -> bool {
        self.overflow_needed.is_some()
    }

    /// The overflow error for the last rejected append, if any.
    pub fn overflow_error(&self) -> Option<StampError> {
        self.overflow_needed.map(|needed| StampError::BufferOverflow {
            needed,
            capacity: self.capacity,
        })
    }

    /// Append a string slice, or fail without writing if it would exceed
    /// the capacity.
    pub fn push_str(&mut self, s: &str) -> Result<(), StampError> {
        let needed = self.inner.len() + s.len();
        if needed > self.capacity {
            self.overflow_needed = Some(needed);
            return Err(StampError::BufferOverflow {
                needed,
                capacity: self.capacity,
            });
        }
        self.inner.push_str(s);
        Ok(())
    }

    pub fn push_char(&mut self, c: char) -> Result<(), StampError> {
        let mut utf8 = [0u8; 4];
        self.push_str(c.encode_utf8(&mut utf8))
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn into_string(self) -> String {
        self.inner
    }
}

impl fmt::Write for BoundedBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s).map_err(|_| fmt::Error)
    }
}
