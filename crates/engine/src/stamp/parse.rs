//! Converting a matched timestamp substring into an absolute time value.
//!
//! Registry entries are tried in priority order. The first entry whose
//! pattern matches the line gets to run its parse strategy; a strategy that
//! fails to convert falls through to the next entry, even when that entry
//! would match a different substring.

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use grep_matcher::Matcher;
use tracing::debug;

use super::model::{ParseStrategy, ParsedStamp, StampError};
use super::registry::FormatRegistry;

/// A year-less date parsed in early January can belong to late in the
/// previous year (log rotation). Anything landing this far in the future is
/// re-read with the year decremented.
const FUTURE_SLACK_SECS: i64 = 30 * 86_400;

impl FormatRegistry {
    /// Find and convert the first parseable timestamp in `line`.
    ///
    /// Fails with [`StampError::TimeParse`] when no registry entry both
    /// matches and converts.
    pub fn parse_line(&self, line: &[u8]) -> Result<ParsedStamp, StampError> {
        self.parse_line_at(line, Local::now())
    }

    /// [`FormatRegistry::parse_line`] with an explicit "now", which anchors
    /// the current-year default and the future-rollover correction.
    pub fn parse_line_at(
        &self,
        line: &[u8],
        now: DateTime<Local>,
    ) -> Result<ParsedStamp, StampError> {
        if line.is_empty() {
            return Err(StampError::InvalidArgument("empty line".into()));
        }

        for entry in self.entries() {
            let Some(m) = entry.matcher().find(line).ok().flatten() else {
                continue;
            };
            // Every detection pattern is ASCII-only, so the matched span is
            // valid UTF-8 even inside an otherwise binary line.
            let Ok(text) = std::str::from_utf8(&line[m.start()..m.end()]) else {
                continue;
            };

            let converted = match entry.strategy {
                ParseStrategy::Calendar(template) => {
                    convert_calendar(text, template, &now).map(ParsedStamp::from_seconds)
                }
                ParseStrategy::UnixPlain => convert_unix_plain(text),
                ParseStrategy::UnixFractional => convert_unix_fractional(text),
            };

            match converted {
                Some(stamp) => return Ok(stamp),
                None => {
                    debug!(format = entry.name, matched = text, "match did not convert");
                }
            }
        }

        Err(StampError::TimeParse)
    }
}

/// Run the strftime-equivalent over an all-zero record, default the fields
/// the template did not consume, and apply the future-rollover correction.
fn convert_calendar(text: &str, template: &str, now: &DateTime<Local>) -> Option<i64> {
    let mut record = Parsed::new();
    parse(&mut record, text, StrftimeItems::new(template)).ok()?;

    // Missing year defaults to the current local year. A two-digit year uses
    // the POSIX pivot: 69-99 are 19xx, 00-68 are 20xx.
    let year = record
        .year()
        .or_else(|| {
            record
                .year_mod_100()
                .map(|y| if y >= 69 { 1900 + y } else { 2000 + y })
        })
        .unwrap_or_else(|| now.year());
    // Missing month and day default to January 1st. A documented quirk, not
    // an inference: "22:25:23" alone would land on Jan 1.
    let month = record.month().unwrap_or(1);
    let day = record.day().unwrap_or(1);
    let hour = match (record.hour_div_12(), record.hour_mod_12()) {
        (Some(div), Some(rem)) => div * 12 + rem,
        _ => 0,
    };
    let minute = record.minute().unwrap_or(0);
    let second = record.second().unwrap_or(0);

    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    let epoch = to_local_epoch(year, month, day, time)?;

    // More than 30 days in the future: the year guess was wrong by one.
    if epoch > now.timestamp() + FUTURE_SLACK_SECS {
        return to_local_epoch(year - 1, month, day, time);
    }
    Some(epoch)
}

fn to_local_epoch(year: i32, month: u32, day: u32, time: NaiveTime) -> Option<i64> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let naive = NaiveDateTime::new(date, time);
    // Skipped local times (DST gap) have no mapping; ambiguous ones take the
    // earlier instant.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
}

/// Digit run as epoch seconds. Zero is reserved as a parse-failure sentinel
/// in the wire format, so an all-zero run is rejected; so is anything that
/// overflows.
fn convert_unix_plain(text: &str) -> Option<ParsedStamp> {
    let value: u64 = text.parse().ok()?;
    if value == 0 {
        return None;
    }
    let seconds = i64::try_from(value).ok()?;
    Some(ParsedStamp::from_seconds(seconds))
}

/// `seconds.frac` with 1-9 fractional digits. The integer part follows the
/// same rules as the plain encoding; the fraction scales to nanoseconds.
fn convert_unix_fractional(text: &str) -> Option<ParsedStamp> {
    let (int_part, frac_part) = text.split_once('.')?;
    let base = convert_unix_plain(int_part)?;

    let mut nanos: u32 = 0;
    for (i, digit) in frac_part.bytes().enumerate().take(9) {
        nanos += u32::from(digit - b'0') * 10u32.pow(8 - i as u32);
    }

    Some(ParsedStamp {
        epoch_seconds: base.epoch_seconds,
        fraction_nanos: Some(nanos),
    })
}
