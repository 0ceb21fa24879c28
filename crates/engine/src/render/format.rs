//! The extended format-string language.
//!
//! Templates are rendered in two passes. Pass one scans left to right and
//! expands the sub-second extensions immediately, longest prefix first:
//!
//! - `%.S`: two-digit local seconds, dot, 6-digit microseconds
//! - `%.s`: epoch seconds, dot, 6-digit microseconds
//! - `%.T`: local `HH:MM:SS`, dot, 6-digit microseconds
//! - `%N`: 9-digit nanoseconds
//! - `%s`: epoch seconds
//!
//! Everything else is copied verbatim. Pass two feeds the intermediate text
//! to the calendar formatter, but only if a `%` survived pass one, so the
//! extensions' literal output is never reinterpreted as calendar directives.

use std::fmt::Write;

use chrono::format::StrftimeItems;
use chrono::{DateTime, Local, TimeZone, Timelike, Utc};

use crate::buffer::BoundedBuffer;
use crate::clock::HighResTime;
use crate::stamp::StampError;
use crate::{MAX_STAMP_LEN, MAX_TEMPLATE_LEN};

/// Render `stamp` through `template`.
///
/// Calendar fields use the local timezone. Fails with
/// [`StampError::BufferOverflow`] when the output would exceed the stamp
/// capacity, and [`StampError::InvalidArgument`] on an empty or oversized
/// template or one the calendar formatter rejects.
pub fn render_timestamp(template: &str, stamp: HighResTime) -> Result<String, StampError> {
    check_template(template)?;

    let local = Local
        .timestamp_opt(stamp.seconds, stamp.nanoseconds)
        .single()
        .ok_or_else(|| StampError::InvalidArgument("time value out of calendar range".into()))?;

    let intermediate = expand_extensions(template, stamp, &local)?;
    if !intermediate.contains('%') {
        return Ok(intermediate);
    }

    let mut out = BoundedBuffer::new(MAX_STAMP_LEN);
    let items = StrftimeItems::new(&intermediate);
    if write!(out, "{}", local.format_with_items(items)).is_err() {
        return Err(fmt_failure(&out));
    }
    Ok(out.into_string())
}

/// Render an elapsed interval through `template`, the way the incremental
/// and since-start modes expect.
///
/// Templates containing a sub-second extension take dedicated duration
/// paths (`%.T` renders unbounded hours). Anything else is rendered as a
/// UTC calendar breakdown of the elapsed seconds, which folds days into a
/// wrapped hour field once the interval passes 24h, kept for wire
/// compatibility with existing log pipelines.
pub fn render_elapsed(template: &str, elapsed: HighResTime) -> Result<String, StampError> {
    check_template(template)?;

    // A backwards wall-clock step between samples would go negative; render
    // as zero rather than as a pre-epoch calendar date.
    let (seconds, nanoseconds) = if elapsed.seconds < 0 {
        (0, 0)
    } else {
        (elapsed.seconds, elapsed.nanoseconds)
    };
    let micros = nanoseconds / 1000;

    let mut out = BoundedBuffer::new(MAX_STAMP_LEN);
    if template.contains("%.s") {
        write_checked(&mut out, format_args!("{}.{:06}", seconds, micros))?;
    } else if template.contains("%.S") {
        write_checked(&mut out, format_args!("{:02}.{:06}", seconds % 60, micros))?;
    } else if template.contains("%.T") {
        write_checked(
            &mut out,
            format_args!(
                "{:02}:{:02}:{:02}.{:06}",
                seconds / 3600,
                (seconds % 3600) / 60,
                seconds % 60,
                micros
            ),
        )?;
    } else {
        let utc = Utc
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| StampError::InvalidArgument("interval out of calendar range".into()))?;
        let items = StrftimeItems::new(template);
        if write!(out, "{}", utc.format_with_items(items)).is_err() {
            return Err(fmt_failure(&out));
        }
    }
    Ok(out.into_string())
}

fn check_template(template: &str) -> Result<(), StampError> {
    if template.is_empty() {
        return Err(StampError::InvalidArgument("empty format template".into()));
    }
    if template.len() > MAX_TEMPLATE_LEN {
        return Err(StampError::InvalidArgument(format!(
            "format template longer than {} bytes",
            MAX_TEMPLATE_LEN
        )));
    }
    Ok(())
}

/// Pass one: expand the sub-second extensions, copy everything else.
fn expand_extensions(
    template: &str,
    stamp: HighResTime,
    local: &DateTime<Local>,
) -> Result<String, StampError> {
    let micros = stamp.nanoseconds / 1000;
    let mut out = BoundedBuffer::new(MAX_STAMP_LEN);

    let mut rest = template;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("%.S") {
            write_checked(
                &mut out,
                format_args!("{:02}.{:06}", local.second(), micros),
            )?;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("%.s") {
            write_checked(&mut out, format_args!("{}.{:06}", stamp.seconds, micros))?;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("%.T") {
            write_checked(
                &mut out,
                format_args!(
                    "{:02}:{:02}:{:02}.{:06}",
                    local.hour(),
                    local.minute(),
                    local.second(),
                    micros
                ),
            )?;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("%N") {
            write_checked(&mut out, format_args!("{:09}", stamp.nanoseconds))?;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("%s") {
            write_checked(&mut out, format_args!("{}", stamp.seconds))?;
            rest = tail;
        } else {
            // Verbatim copy, one character at a time; unrecognized
            // %-sequences stay intact for the calendar pass
            let Some(c) = rest.chars().next() else { break };
            out.push_char(c)?;
            rest = &rest[c.len_utf8()..];
        }
    }

    Ok(out.into_string())
}

fn write_checked(buf: &mut BoundedBuffer, args: std::fmt::Arguments) -> Result<(), StampError> {
    if buf.write_fmt(args).is_err() {
        return Err(fmt_failure(buf));
    }
    Ok(())
}

/// A failed formatted write is either a capacity rejection or a formatter
/// error (unsupported calendar directive); the buffer knows which.
fn fmt_failure(buf: &BoundedBuffer) -> StampError {
    buf.overflow_error()
        .unwrap_or_else(|| StampError::InvalidArgument("unsupported format directive".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    /// 2025-12-22 22:25:23 local, as an epoch value, so expectations hold
    /// in any test timezone.
    fn fixed_stamp(nanos: u32) -> HighResTime {
        let dt = Local
            .with_ymd_and_hms(2025, 12, 22, 22, 25, 23)
            .single()
            .unwrap();
        HighResTime::new(dt.timestamp(), nanos)
    }

    #[test]
    fn test_subsecond_seconds_directive() {
        let out = render_timestamp("%.S", fixed_stamp(123_456_789)).unwrap();
        assert_eq!(out, "23.123456");
    }

    #[test]
    fn test_subsecond_epoch_directive() {
        let stamp = fixed_stamp(123_456_789);
        let out = render_timestamp("%.s", stamp).unwrap();
        assert_eq!(out, format!("{}.123456", stamp.seconds));
    }

    #[test]
    fn test_subsecond_time_directive() {
        let out = render_timestamp("%.T", fixed_stamp(5_000)).unwrap();
        assert_eq!(out, "22:25:23.000005");
    }

    #[test]
    fn test_nanosecond_directive() {
        let out = render_timestamp("%N", fixed_stamp(123_456_789)).unwrap();
        assert_eq!(out, "123456789");
        let out = render_timestamp("%N", fixed_stamp(42)).unwrap();
        assert_eq!(out, "000000042");
    }

    #[test]
    fn test_epoch_directive() {
        let stamp = fixed_stamp(0);
        let out = render_timestamp("%s", stamp).unwrap();
        assert_eq!(out, stamp.seconds.to_string());
    }

    #[test]
    fn test_calendar_directives_pass_through_to_second_pass() {
        let out = render_timestamp("%Y-%m-%d %H:%M:%S", fixed_stamp(0)).unwrap();
        assert_eq!(out, "2025-12-22 22:25:23");
    }

    #[test]
    fn test_mixed_custom_and_calendar_directives() {
        // Custom and standard directives expand without corrupting each
        // other across the two passes
        let out = render_timestamp("%Y%m%d-%H%M%S.%.S", fixed_stamp(123_456_789)).unwrap();
        assert_eq!(out, "20251222-222523.23.123456");
    }

    #[test]
    fn test_literal_text_preserved() {
        let out = render_timestamp("took %N ns", fixed_stamp(7)).unwrap();
        assert_eq!(out, "took 000000007 ns");
    }

    #[test]
    fn test_no_percent_skips_calendar_pass() {
        let out = render_timestamp("plain text", fixed_stamp(0)).unwrap();
        assert_eq!(out, "plain text");
    }

    #[test]
    fn test_percent_escape() {
        let out = render_timestamp("100%%", fixed_stamp(0)).unwrap();
        assert_eq!(out, "100%");
    }

    #[test]
    fn test_default_template_shape() {
        let out = render_timestamp("%b %d %H:%M:%S", fixed_stamp(0)).unwrap();
        assert_eq!(out, "Dec 22 22:25:23");
    }

    #[test]
    fn test_empty_template_rejected() {
        let err = render_timestamp("", fixed_stamp(0)).unwrap_err();
        assert!(matches!(err, StampError::InvalidArgument(_)));
    }

    #[test]
    fn test_oversized_template_rejected() {
        let template = "x".repeat(MAX_TEMPLATE_LEN + 1);
        let err = render_timestamp(&template, fixed_stamp(0)).unwrap_err();
        assert!(matches!(err, StampError::InvalidArgument(_)));
    }

    #[test]
    fn test_output_overflow_detected() {
        // 60 expansions of 9 digits each blow past the stamp capacity
        // during the first pass
        let template = "%N".repeat(60);
        let err = render_timestamp(&template, fixed_stamp(1)).unwrap_err();
        assert!(matches!(err, StampError::BufferOverflow { .. }));
    }

    #[test]
    fn test_render_local_year_matches_breakdown() {
        let stamp = fixed_stamp(0);
        let out = render_timestamp("%Y", stamp).unwrap();
        let dt = Local.timestamp_opt(stamp.seconds, 0).single().unwrap();
        assert_eq!(out, dt.year().to_string());
    }

    // ── render_elapsed ──────────────────────────────────────────

    #[test]
    fn test_elapsed_epoch_fast_path() {
        let out = render_elapsed("%.s", HighResTime::new(83, 42_000)).unwrap();
        assert_eq!(out, "83.000042");
    }

    #[test]
    fn test_elapsed_seconds_fast_path() {
        let out = render_elapsed("%.S", HighResTime::new(83, 500_000_000)).unwrap();
        assert_eq!(out, "23.500000");
    }

    #[test]
    fn test_elapsed_time_fast_path() {
        let out = render_elapsed("%.T", HighResTime::new(3_665, 123_000)).unwrap();
        assert_eq!(out, "01:01:05.000123");
    }

    #[test]
    fn test_elapsed_time_fast_path_unbounded_hours() {
        // 25h: the dedicated path does not wrap at midnight
        let out = render_elapsed("%.T", HighResTime::new(90_000, 0)).unwrap();
        assert_eq!(out, "25:00:00.000000");
    }

    #[test]
    fn test_elapsed_calendar_fallback() {
        let out = render_elapsed("%H:%M:%S", HighResTime::new(3_661, 0)).unwrap();
        assert_eq!(out, "01:01:01");
    }

    #[test]
    fn test_elapsed_calendar_fallback_wraps_past_midnight() {
        // Legacy behaviour: 25h folds into the hour field of day two
        let out = render_elapsed("%H:%M:%S", HighResTime::new(90_000, 0)).unwrap();
        assert_eq!(out, "01:00:00");
    }

    #[test]
    fn test_elapsed_negative_clamps_to_zero() {
        let out = render_elapsed("%.s", HighResTime::new(-5, 200)).unwrap();
        assert_eq!(out, "0.000000");
    }
}
