#![forbid(unsafe_code)]

//! ANSI escape sequence matching.
//!
//! Escape sequences (colors, SGR attributes, CSI cursor codes) occupy no
//! terminal cells. The grapheme segmenter already measures the introducer
//! (`ESC` or the 8-bit `CSI`) as a zero-width control, so only the printable
//! tail of each sequence has to be taken back out of a width sum.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Match, Regex};

static ESCAPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x1b\x{9b}][\[()#;?]*(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-ORZcf-nqry=><]")
        .expect("escape pattern is a valid regex")
});

/// Iterate over the non-overlapping escape sequences in `text`.
pub fn escape_sequences(text: &str) -> impl Iterator<Item = Match<'_>> {
    ESCAPE_PATTERN.find_iter(text)
}

/// Byte length of all escape sequences in `text`, not counting their
/// introducers.
///
/// Every byte after the introducer is printable ASCII and would otherwise
/// be measured as one cell, so this is also the number of cells the
/// sequences add to a plain width sum.
#[must_use]
pub fn escape_tail_len(text: &str) -> usize {
    if !text.contains(['\x1b', '\u{9b}']) {
        return 0;
    }
    escape_sequences(text)
        .map(|m| {
            let introducer = m.as_str().chars().next().map_or(0, char::len_utf8);
            m.len() - introducer
        })
        .sum()
}

/// Remove every escape sequence from `text`.
#[must_use]
pub fn strip_escapes(text: &str) -> Cow<'_, str> {
    ESCAPE_PATTERN.replace_all(text, "")
}

/// Whether `text` contains at least one escape sequence.
#[must_use]
pub fn has_escapes(text: &str) -> bool {
    ESCAPE_PATTERN.is_match(text)
}
