/// Rendering absolute and elapsed times as text.
///
/// - `format.rs`: the extended format-string language (standard calendar
///   directives plus sub-second, nanosecond and raw-epoch extensions)
/// - `humanize.rs`: bucketed "N ago" / "in N" phrases
pub mod format;
pub mod humanize;

pub use format::{render_elapsed, render_timestamp};
pub use humanize::humanize_offset;
