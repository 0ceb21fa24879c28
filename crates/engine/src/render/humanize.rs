//! Bucketed relative-time phrases.

/// Convert a signed offset in seconds into a short phrase: `"59s ago"`,
/// `"1h1m ago"`, `"in 2d5h"`.
///
/// The offset is `now - timestamp`: positive offsets are in the past and
/// get an `" ago"` suffix, negative ones are in the future and get an
/// `"in "` prefix. Exactly one unit pair is shown, and a zero remainder at
/// the chosen granularity is omitted.
pub fn humanize_offset(offset_seconds: i64) -> String {
    let future = offset_seconds < 0;
    let d = offset_seconds.unsigned_abs();

    let body = if d < 60 {
        format!("{}s", d)
    } else if d < 3_600 {
        let minutes = d / 60;
        let seconds = d % 60;
        if seconds > 0 {
            format!("{}m{}s", minutes, seconds)
        } else {
            format!("{}m", minutes)
        }
    } else if d < 86_400 {
        let hours = d / 3_600;
        let minutes = (d % 3_600) / 60;
        if minutes > 0 {
            format!("{}h{}m", hours, minutes)
        } else {
            format!("{}h", hours)
        }
    } else {
        let days = d / 86_400;
        let hours = (d % 86_400) / 3_600;
        if hours > 0 {
            format!("{}d{}h", days, hours)
        } else {
            format!("{}d", days)
        }
    };

    if future {
        format!("in {}", body)
    } else {
        format!("{} ago", body)
    }
}
