//! High-resolution clock samples.
//!
//! A [`HighResTime`] is an epoch-relative second count plus a nanosecond
//! remainder, captured from either the wall clock or a monotonic source.
//! Samples are immutable once taken; subtracting two samples borrows
//! correctly across the nanosecond boundary.

use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Anchor for monotonic samples. `Instant` exposes no raw counter value, so
/// monotonic time is measured from the first sample taken by this process;
/// callers of monotonic mode only ever consume differences.
static MONOTONIC_ANCHOR: OnceLock<Instant> = OnceLock::new();

pub const NANOS_PER_SEC: u32 = 1_000_000_000;

/// An instant with nanosecond resolution.
///
/// `seconds` is signed so that [`HighResTime::elapsed_since`] can represent
/// a negative interval; `nanoseconds` is always in `[0, 1e9)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HighResTime {
    pub seconds: i64,
    pub nanoseconds: u32,
}

impl HighResTime {
    pub const ZERO: HighResTime = HighResTime {
        seconds: 0,
        nanoseconds: 0,
    };

    pub fn new(seconds: i64, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Signed difference `self - earlier`, borrowing across the nanosecond
    /// boundary so the remainder stays in `[0, 1e9)`.
    pub fn elapsed_since(&self, earlier: &HighResTime) -> HighResTime {
        let mut seconds = self.seconds - earlier.seconds;
        let mut nanoseconds = self.nanoseconds as i64 - earlier.nanoseconds as i64;
        if nanoseconds < 0 {
            seconds -= 1;
            nanoseconds += NANOS_PER_SEC as i64;
        }
        HighResTime {
            seconds,
            nanoseconds: nanoseconds as u32,
        }
    }
}

/// Which clock a sample is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    /// Epoch-relative wall-clock time.
    WallClock,
    /// Monotonic time, immune to wall-clock steps. Only differences between
    /// monotonic samples are meaningful.
    Monotonic,
}

impl ClockSource {
    /// Take a sample. A failed clock read degrades to [`HighResTime::ZERO`]
    /// instead of propagating, keeping the per-line path infallible.
    pub fn sample(&self) -> HighResTime {
        match self {
            ClockSource::WallClock => match SystemTime::now().duration_since(UNIX_EPOCH) {
                Ok(d) => HighResTime {
                    seconds: d.as_secs() as i64,
                    nanoseconds: d.subsec_nanos(),
                },
                Err(_) => HighResTime::ZERO,
            },
            ClockSource::Monotonic => {
                let anchor = MONOTONIC_ANCHOR.get_or_init(Instant::now);
                let d = anchor.elapsed();
                HighResTime {
                    seconds: d.as_secs() as i64,
                    nanoseconds: d.subsec_nanos(),
                }
            }
        }
    }
}
