/// Timestamp recognition and parsing.
///
/// - `model.rs`: error and data model shared across the engine
/// - `registry.rs`: the fixed, ordered table of recognized encodings
/// - `parse.rs`: converting a matched substring into an absolute time
/// - `locate.rs`: finding where a timestamp-shaped substring begins
///
/// Parsing and locating are deliberately separate contracts: a line may
/// contain a span that looks like a timestamp yet fails to convert
/// (malformed calendar fields). Callers needing both call both.
pub mod locate;
pub mod model;
pub mod parse;
pub mod registry;

// Re-export commonly used types
pub use model::{MatchSpan, ParseStrategy, ParsedStamp, StampError};
pub use registry::FormatRegistry;
