//! Per-line transformation and stream-mode bookkeeping.
//!
//! Owns the state the engine deliberately does not keep across lines: the
//! start and previous clock samples for the elapsed modes, and the previous
//! line for duplicate suppression. Any engine error for a line emits the
//! original line unchanged; one bad line never aborts the stream.

use bytes::Bytes;
use linestamp_engine::{
    humanize_offset, render_elapsed, render_timestamp, rewrite_line, ClockSource, FormatRegistry,
    HighResTime, StampError,
};
use tracing::debug;

use crate::config::StampConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Prepend a freshly rendered timestamp.
    Absolute,
    /// Convert a timestamp already present in the line.
    Relative,
    /// Prepend the elapsed time since the previous line.
    Incremental,
    /// Prepend the elapsed time since program start.
    SinceStart,
}

pub struct Pipeline {
    mode: Mode,
    template: String,
    /// Whether the template came from the user rather than config defaults;
    /// relative mode humanizes unless a format was explicitly given.
    custom_template: bool,
    clock: ClockSource,
    unique: bool,
    max_line_len: usize,
    registry: FormatRegistry,
    start: HighResTime,
    last: HighResTime,
    last_line: Option<Vec<u8>>,
}

impl Pipeline {
    pub fn new(
        mode: Mode,
        format_arg: Option<String>,
        clock: ClockSource,
        unique: bool,
        config: &StampConfig,
    ) -> Result<Self, StampError> {
        let custom_template = format_arg.is_some();
        let template = format_arg.unwrap_or_else(|| match mode {
            Mode::Incremental | Mode::SinceStart => config.elapsed_format.clone(),
            Mode::Absolute | Mode::Relative => config.default_format.clone(),
        });

        let start = clock.sample();
        Ok(Self {
            mode,
            template,
            custom_template,
            clock,
            unique,
            max_line_len: config.max_line_len,
            registry: FormatRegistry::new()?,
            start,
            last: start,
            last_line: None,
        })
    }

    /// Transform one line (without its terminator). `None` means the line
    /// is suppressed by unique mode.
    pub fn process(&mut self, line: &[u8]) -> Option<Bytes> {
        if self.unique {
            if self.last_line.as_deref() == Some(line) {
                return None;
            }
            self.last_line = Some(line.to_vec());
        }

        let now = self.clock.sample();
        let out = match self.mode {
            Mode::Absolute => self.prepend_rendered(line, now),
            Mode::Incremental => {
                let elapsed = now.elapsed_since(&self.last);
                self.last = now;
                self.prepend_elapsed(line, elapsed)
            }
            Mode::SinceStart => {
                let elapsed = now.elapsed_since(&self.start);
                self.prepend_elapsed(line, elapsed)
            }
            Mode::Relative => self.convert_existing(line),
        };

        Some(out.unwrap_or_else(|err| {
            debug!(%err, "line passed through unmodified");
            Bytes::copy_from_slice(line)
        }))
    }

    fn prepend_rendered(&self, line: &[u8], now: HighResTime) -> Result<Bytes, StampError> {
        let stamp = render_timestamp(&self.template, now)?;
        Ok(prepend(&stamp, line))
    }

    fn prepend_elapsed(&self, line: &[u8], elapsed: HighResTime) -> Result<Bytes, StampError> {
        let stamp = render_elapsed(&self.template, elapsed)?;
        Ok(prepend(&stamp, line))
    }

    /// Relative mode: parse the timestamp already in the line, re-render it
    /// (custom format) or humanize it (no format), and splice the result
    /// over the located span.
    fn convert_existing(&self, line: &[u8]) -> Result<Bytes, StampError> {
        let parsed = self.registry.parse_line(line)?;

        let replacement = if self.custom_template {
            let stamp = HighResTime::new(
                parsed.epoch_seconds,
                parsed.fraction_nanos.unwrap_or(0),
            );
            render_timestamp(&self.template, stamp)?
        } else {
            // Humanizing is always wall-clock relative, monotonic mode or not
            let now = ClockSource::WallClock.sample();
            humanize_offset(now.seconds - parsed.epoch_seconds)
        };

        let span = self.registry.locate(line).ok();
        rewrite_line(line, &replacement, span, self.max_line_len)
    }
}

fn prepend(stamp: &str, line: &[u8]) -> Bytes {
    let mut out = Vec::with_capacity(stamp.len() + 1 + line.len());
    out.extend_from_slice(stamp.as_bytes());
    out.push(b' ');
    out.extend_from_slice(line);
    Bytes::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline(mode: Mode, format: Option<&str>, unique: bool) -> Pipeline {
        Pipeline::new(
            mode,
            format.map(str::to_string),
            ClockSource::Monotonic,
            unique,
            &StampConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_absolute_mode_prepends_stamp_and_space() {
        let mut p = pipeline(Mode::Absolute, Some("%s"), false);
        let out = p.process(b"hello").unwrap();
        let text = std::str::from_utf8(&out).unwrap();
        let (stamp, rest) = text.split_once(' ').unwrap();
        assert!(stamp.bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(rest, "hello");
    }

    #[test]
    fn test_unique_mode_suppresses_repeats() {
        let mut p = pipeline(Mode::Absolute, Some("%s"), true);
        assert!(p.process(b"same").is_some());
        assert!(p.process(b"same").is_none());
        assert!(p.process(b"different").is_some());
        // The previous-line record follows every emitted line
        assert!(p.process(b"same").is_some());
    }

    #[test]
    fn test_incremental_mode_first_line_is_subsecond() {
        let mut p = pipeline(Mode::Incremental, Some("%.s"), false);
        let out = p.process(b"tick").unwrap();
        let text = std::str::from_utf8(&out).unwrap();
        assert!(
            text.starts_with("0."),
            "expected sub-second first interval, got: {}",
            text
        );
    }

    #[test]
    fn test_since_start_mode_is_subsecond_early_on() {
        let mut p = pipeline(Mode::SinceStart, Some("%.s"), false);
        p.process(b"one").unwrap();
        let out = p.process(b"two").unwrap();
        assert!(std::str::from_utf8(&out).unwrap().starts_with("0."));
    }

    #[test]
    fn test_relative_mode_custom_format_rewrites_in_place() {
        let mut p = pipeline(Mode::Relative, Some("%.s"), false);
        let out = p.process(b"ts=1755921813 msg=ok").unwrap();
        assert_eq!(out.as_ref(), b"ts=1755921813.000000 msg=ok");
    }

    #[test]
    fn test_relative_mode_carries_fraction() {
        let mut p = pipeline(Mode::Relative, Some("%.s"), false);
        let out = p.process(b"ts=1755921813.250 msg=ok").unwrap();
        assert_eq!(out.as_ref(), b"ts=1755921813.250000 msg=ok");
    }

    #[test]
    fn test_relative_mode_humanizes_without_format() {
        let mut p = pipeline(Mode::Relative, None, false);
        // Epoch seconds from 2001: far enough back to always be days ago
        let out = p.process(b"at 1000000000 it happened").unwrap();
        let text = std::str::from_utf8(&out).unwrap();
        assert!(text.starts_with("at "));
        assert!(text.ends_with(" it happened"));
        assert!(text.contains("d"));
        assert!(text.contains(" ago "));
    }

    #[test]
    fn test_relative_mode_passes_through_unparseable_line() {
        let mut p = pipeline(Mode::Relative, Some("%s"), false);
        let out = p.process(b"no timestamps in sight").unwrap();
        assert_eq!(out.as_ref(), b"no timestamps in sight");
    }

    #[test]
    fn test_default_templates_per_mode() {
        let p = pipeline(Mode::Absolute, None, false);
        assert_eq!(p.template, "%b %d %H:%M:%S");
        let p = pipeline(Mode::Incremental, None, false);
        assert_eq!(p.template, "%H:%M:%S");
        let p = pipeline(Mode::SinceStart, None, false);
        assert_eq!(p.template, "%H:%M:%S");
    }
}
