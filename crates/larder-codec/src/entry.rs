//! The one-entry-per-line text format.
//!
//! On-disk format, one entry per line:
//!
//! ```text
//! key="value"
//! ```
//!
//! Parsing splits on the first `=` only and strips one layer of wrapping
//! double quotes from the value side. Neither `=` nor `"` inside a value is
//! escaped, so a value containing `=` does not survive a round trip; callers
//! that need such values must encode them first.

/// A single key/value pair, one line in a backing file.
///
/// The key is kept in its original casing; key comparison rules are the
/// store's concern, not the codec's. The value is the logical (unquoted)
/// string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// The key, original casing preserved.
    pub key: String,
    /// The logical value, without the wire format's wrapping quotes.
    pub value: String,
}

impl Entry {
    /// Create an entry from a key and a logical value.
    ///
    /// Wrapping quotes on the value are stripped so the cached form never
    /// carries the wire convention.
    pub fn new(key: impl Into<String>, value: &str) -> Self {
        Self {
            key: key.into(),
            value: trim_quotes(value).to_string(),
        }
    }
}

/// Strip one layer of wrapping double quotes, if present.
///
/// Only a matched-or-unmatched single leading and trailing quote character
/// is removed; quotes embedded in the middle of the value are untouched.
pub fn trim_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Decode one line into a `(key, value)` pair.
///
/// Splits on the first `=` only; the value side has one quote layer
/// stripped. Returns `None` for lines without a `=` separator -- callers
/// skip such lines, which keeps hydration tolerant of corruption and of
/// future format extensions.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key, trim_quotes(value)))
}

/// Encode a key and logical value as one line, without the trailing newline.
///
/// Any existing wrapping quotes on the value are stripped before the wire
/// quotes are added, so re-encoding an already-encoded value is stable.
pub fn format_line(key: &str, value: &str) -> String {
    format!("{key}=\"{}\"", trim_quotes(value))
}
