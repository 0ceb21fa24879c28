/// Timestamp recognition, parsing and re-rendering engine.
///
/// Converts log-style timestamp text found anywhere in a line into an
/// absolute time value, renders absolute or elapsed times through an
/// extended strftime-like template language, and splices rendered
/// timestamps back into lines without touching the surrounding text.
///
/// # Architecture
///
/// - `buffer.rs`: bounds-checked output builder shared by the renderers
/// - `clock.rs`: high-resolution clock samples (wall-clock / monotonic)
/// - `stamp/`: format registry, timestamp parser, span locator
/// - `render/`: extended-format renderer and relative-time humanizer
/// - `rewrite.rs`: in-line timestamp substitution
///
/// # Safety Guarantees
///
/// All operations:
/// - Return `Result` instead of panicking on bad input
/// - Validate output length before writing (no partial writes)
/// - Handle non-UTF8 lines gracefully (matching is byte-oriented)

// Core infrastructure
pub mod buffer;
pub mod clock;

// Domain modules
pub mod stamp;
pub mod render;
pub mod rewrite;

// Re-export commonly used types
pub use buffer::BoundedBuffer;
pub use clock::{ClockSource, HighResTime};
pub use render::{humanize_offset, render_elapsed, render_timestamp};
pub use rewrite::rewrite_line;
pub use stamp::{FormatRegistry, MatchSpan, ParsedStamp, StampError};

// Constants
pub const MAX_LINE_LEN: usize = 4096;
pub const MAX_TEMPLATE_LEN: usize = 256;
pub const MAX_STAMP_LEN: usize = 256;
