use grep_regex::{RegexMatcher, RegexMatcherBuilder};

use super::model::{ParseStrategy, StampError};

/// The recognized timestamp encodings, in priority order.
///
/// Position in this table decides which entry wins when several could parse
/// the same text; it does *not* decide which span the locator picks (the
/// locator always takes the leftmost span, see `locate.rs`).
///
/// The >= 10 digit floor on the unix entries keeps short numeric tokens
/// (ports, sizes, counters) from being misread as epoch seconds.
const FORMAT_TABLE: &[(&str, &str, ParseStrategy)] = &[
    // syslog: Dec 22 22:25:23
    (
        "syslog",
        "[A-Za-z]{3} [0-9]{1,2} [0-9]{2}:[0-9]{2}:[0-9]{2}",
        ParseStrategy::Calendar("%b %d %H:%M:%S"),
    ),
    // ISO-8601 date+time prefix: 2025-12-22T22:25:23 (fractional seconds
    // and zone suffix are left behind as trailing text)
    (
        "iso8601",
        "[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}",
        ParseStrategy::Calendar("%Y-%m-%dT%H:%M:%S"),
    ),
    // RFC-ish: 16 Jun 94 07:29:35
    (
        "rfc",
        "[0-9]{1,2} [A-Za-z]{3} [0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}",
        ParseStrategy::Calendar("%d %b %y %H:%M:%S"),
    ),
    // lastlog: Mon Dec 22 22:25 (no seconds)
    (
        "lastlog",
        "[A-Za-z]{3} [A-Za-z]{3} [0-9]{2} [0-9]{2}:[0-9]{2}",
        ParseStrategy::Calendar("%a %b %d %H:%M"),
    ),
    // short: 21 dec 17:05 (lowercase month, no year)
    (
        "short",
        "[0-9]{2} [a-z]{3} [0-9]{2}:[0-9]{2}",
        ParseStrategy::Calendar("%d %b %H:%M"),
    ),
    // short with year: 22 dec/93 17:05:30
    (
        "short_with_year",
        "[0-9]{2} [a-z]{3}/[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}",
        ParseStrategy::Calendar("%d %b/%y %H:%M:%S"),
    ),
    // unix with fractional seconds: 1755921813.027
    (
        "unix_fractional",
        "[0-9]{10,}\\.[0-9]{1,9}",
        ParseStrategy::UnixFractional,
    ),
    // unix: 1755921813
    ("unix", "[0-9]{10,}", ParseStrategy::UnixPlain),
];

/// One compiled registry entry.
pub struct CompiledFormat {
    pub name: &'static str,
    pub strategy: ParseStrategy,
    matcher: RegexMatcher,
}

impl CompiledFormat {
    pub fn matcher(&self) -> &RegexMatcher {
        &self.matcher
    }
}

/// Fixed, ordered table of recognized timestamp encodings.
///
/// The set of formats is closed and versioned with the engine; there is no
/// dynamic registration.
pub struct FormatRegistry {
    entries: Vec<CompiledFormat>,
}

impl FormatRegistry {
    /// Compile every detection pattern. Patterns are matched as substrings
    /// anywhere in a line, case-sensitively, over raw bytes.
    pub fn new() -> Result<Self, StampError> {
        let mut entries = Vec::with_capacity(FORMAT_TABLE.len());
        for &(name, pattern, strategy) in FORMAT_TABLE {
            let matcher = RegexMatcherBuilder::new()
                .multi_line(false)
                .build(pattern)
                .map_err(|e| StampError::Pattern {
                    name,
                    reason: e.to_string(),
                })?;
            entries.push(CompiledFormat {
                name,
                strategy,
                matcher,
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CompiledFormat] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grep_matcher::Matcher;

    fn find(registry: &FormatRegistry, name: &str, line: &[u8]) -> Option<(usize, usize)> {
        let entry = registry
            .entries()
            .iter()
            .find(|e| e.name == name)
            .expect("unknown entry");
        entry
            .matcher()
            .find(line)
            .ok()
            .flatten()
            .map(|m| (m.start(), m.end()))
    }

    #[test]
    fn test_registry_compiles() {
        let registry = FormatRegistry::new().unwrap();
        assert_eq!(registry.entries().len(), 8);
    }

    #[test]
    fn test_priority_order_matches_table() {
        let registry = FormatRegistry::new().unwrap();
        let names: Vec<&str> = registry.entries().iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            [
                "syslog",
                "iso8601",
                "rfc",
                "lastlog",
                "short",
                "short_with_year",
                "unix_fractional",
                "unix",
            ]
        );
    }

    #[test]
    fn test_syslog_pattern() {
        let registry = FormatRegistry::new().unwrap();
        assert_eq!(
            find(&registry, "syslog", b"Dec 22 22:25:23 host su: failed"),
            Some((0, 15))
        );
        // anywhere in the line, not just at the start
        assert_eq!(
            find(&registry, "syslog", b"prefix Dec 2 22:25:23 x"),
            Some((7, 21))
        );
    }

    #[test]
    fn test_iso8601_pattern_leaves_suffix() {
        let registry = FormatRegistry::new().unwrap();
        let line = b"2025-12-22T22:25:23.123Z rest";
        // fractional seconds and zone are not consumed
        assert_eq!(find(&registry, "iso8601", line), Some((0, 19)));
    }

    #[test]
    fn test_rfc_pattern() {
        let registry = FormatRegistry::new().unwrap();
        assert_eq!(
            find(&registry, "rfc", b"16 Jun 94 07:29:35 login"),
            Some((0, 18))
        );
    }

    #[test]
    fn test_lastlog_pattern() {
        let registry = FormatRegistry::new().unwrap();
        assert_eq!(
            find(&registry, "lastlog", b"Mon Dec 22 22:25 tty1"),
            Some((0, 16))
        );
    }

    #[test]
    fn test_short_patterns_need_lowercase_month() {
        let registry = FormatRegistry::new().unwrap();
        assert!(find(&registry, "short", b"21 dec 17:05").is_some());
        assert!(find(&registry, "short", b"21 Dec 17:05").is_none());
        assert!(find(&registry, "short_with_year", b"22 dec/93 17:05:30").is_some());
    }

    #[test]
    fn test_unix_patterns_require_ten_digits() {
        let registry = FormatRegistry::new().unwrap();
        assert!(find(&registry, "unix", b"1755921813").is_some());
        // nine digits: too short to be epoch seconds
        assert!(find(&registry, "unix", b"175592181").is_none());
        assert!(find(&registry, "unix_fractional", b"1755921813.027").is_some());
        assert!(find(&registry, "unix_fractional", b"175592181.027").is_none());
    }
}
