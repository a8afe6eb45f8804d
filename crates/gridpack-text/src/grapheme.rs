#![forbid(unsafe_code)]

//! Grapheme cluster segmentation with terminal cell widths.
//!
//! Boundaries follow the Unicode extended grapheme cluster rules (via
//! `unicode-segmentation`). On top of those boundaries each cluster gets a
//! display width in terminal cells:
//!
//! - East Asian Wide and Fullwidth code points are 2 cells, controls and
//!   combining marks are 0.
//! - A variation selector 16 (`U+FE0F`) forces the cluster to 2 cells.
//! - A cluster led by an Extended Pictographic code point collapses to 2
//!   cells when anything follows it, or to 1 cell if that is `U+FE0E`.
//! - A regional indicator pair (a flag) is 2 cells.
//! - A leading Hangul jamo absorbs the vowel and trailing jamo after it.
//!
//! Two consumption modes are provided: the resumable single-step function
//! [`first_grapheme`] and the [`Graphemes`] cursor built on top of it.
//!
//! # Example
//! ```
//! use gridpack_text::grapheme::{Graphemes, first_grapheme, SegmentState};
//!
//! let step = first_grapheme("さの.png", SegmentState::default()).unwrap();
//! assert_eq!(step.cluster, "さ");
//! assert_eq!(step.width, 2);
//! assert_eq!(step.rest, "の.png");
//!
//! let widths: Vec<usize> = Graphemes::new("e\u{301}日").map(|g| g.width).collect();
//! assert_eq!(widths, vec![1, 2]);
//! ```

use std::ops::Range;
use std::str::Chars;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

const VS15: char = '\u{FE0E}';
const VS16: char = '\u{FE0F}';

/// Grapheme-relevant property class of a single code point.
///
/// Only the classes that change how a cluster is measured are
/// distinguished; everything else is [`GraphemeProperty::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphemeProperty {
    /// C0/C1 controls, line separators, bidi and format controls.
    Control,
    /// Combining marks, variation selectors, emoji modifiers, tags.
    Extend,
    /// `U+200D ZERO WIDTH JOINER`.
    ZeroWidthJoiner,
    /// `U+1F1E6..=U+1F1FF`.
    RegionalIndicator,
    /// Emoji and other pictographs.
    ExtendedPictographic,
    /// Hangul leading consonant jamo (`L`).
    HangulLeading,
    /// Anything else.
    Other,
}

impl GraphemeProperty {
    /// Classify a code point.
    #[must_use]
    pub fn of(c: char) -> Self {
        let u = c as u32;
        match u {
            0x200D => Self::ZeroWidthJoiner,
            0x1F1E6..=0x1F1FF => Self::RegionalIndicator,
            0x1100..=0x115F | 0xA960..=0xA97C => Self::HangulLeading,
            _ if in_table(CONTROL, u) => Self::Control,
            _ if in_table(EXTEND, u) => Self::Extend,
            _ if in_table(EXTENDED_PICTOGRAPHIC, u) => Self::ExtendedPictographic,
            _ => Self::Other,
        }
    }

    /// Width a code point of this class contributes on its own.
    fn char_width(self, c: char) -> usize {
        match self {
            Self::Control | Self::Extend | Self::ZeroWidthJoiner => 0,
            Self::RegionalIndicator => 2,
            Self::ExtendedPictographic | Self::HangulLeading | Self::Other => {
                c.width().unwrap_or(0)
            }
        }
    }
}

/// Where the segmenter is relative to its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Nothing has been scanned yet.
    #[default]
    Start,
    /// At least one cluster was produced and input remains.
    Resumed,
    /// The input is fully consumed.
    Exhausted,
}

/// Resumable segmenter state.
///
/// Cluster boundaries themselves are recomputed from the text on every
/// step; the state only carries where the scan is and the class of the
/// code point opening the next cluster. `leading` is trusted only in the
/// [`Boundary::Resumed`] state, and an [`Boundary::Exhausted`] state yields
/// no further clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentState {
    /// Boundary transition state.
    pub boundary: Boundary,
    /// Class of the code point that opens the next cluster, if known.
    pub leading: Option<GraphemeProperty>,
}

/// Result of one segmentation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphemeStep<'a> {
    /// The first grapheme cluster of the input.
    pub cluster: &'a str,
    /// The unscanned remainder.
    pub rest: &'a str,
    /// Display width of `cluster` in cells.
    pub width: usize,
    /// State to pass to the next step on `rest`.
    pub state: SegmentState,
}

/// Split off the first grapheme cluster of `text`.
///
/// Returns `None` for empty input or an exhausted state; the caller's
/// state is then left as it was. Pass [`SegmentState::default()`] for a fresh scan and the returned
/// `state` when continuing on `rest`.
#[must_use]
pub fn first_grapheme(text: &str, state: SegmentState) -> Option<GraphemeStep<'_>> {
    if state.boundary == Boundary::Exhausted {
        return None;
    }
    let cluster = text.graphemes(true).next()?;
    let rest = &text[cluster.len()..];

    let mut chars = cluster.chars();
    let first = chars.next()?;
    let leading = match state {
        SegmentState {
            boundary: Boundary::Resumed,
            leading: Some(prop),
        } => prop,
        _ => GraphemeProperty::of(first),
    };
    let width = cluster_width(first, leading, chars);

    let next = SegmentState {
        boundary: if rest.is_empty() {
            Boundary::Exhausted
        } else {
            Boundary::Resumed
        },
        leading: rest.chars().next().map(GraphemeProperty::of),
    };

    Some(GraphemeStep {
        cluster,
        rest,
        width,
        state: next,
    })
}

fn cluster_width(first: char, leading: GraphemeProperty, rest: Chars<'_>) -> usize {
    let mut width = leading.char_width(first);
    for c in rest {
        if c == VS16 {
            width = 2;
            continue;
        }
        match leading {
            GraphemeProperty::ExtendedPictographic => {
                width = if c == VS15 { 1 } else { 2 };
            }
            GraphemeProperty::RegionalIndicator | GraphemeProperty::HangulLeading => {}
            _ => width += GraphemeProperty::of(c).char_width(c),
        }
    }
    width
}

/// Total cell width of `text` as the sum of its cluster widths.
///
/// Escape sequences are not recognised here; see
/// [`crate::width::measure_uncached`] for that.
#[must_use]
pub fn string_width(text: &str) -> usize {
    if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        return text.len();
    }

    let mut width = 0;
    let mut rest = text;
    let mut state = SegmentState::default();
    while let Some(step) = first_grapheme(rest, state) {
        width += step.width;
        rest = step.rest;
        state = step.state;
    }
    width
}

/// One cluster yielded by iterating a [`Graphemes`] cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphemeCluster<'a> {
    /// Cluster text.
    pub text: &'a str,
    /// Byte range into the original string.
    pub range: Range<usize>,
    /// Display width in cells.
    pub width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Before,
    At,
    After,
}

/// Cursor over the grapheme clusters of a string.
///
/// Call [`Graphemes::advance`] before reading the first cluster; it returns
/// `false` once the input is consumed. [`Graphemes::reset`] rewinds to the
/// beginning of the original string.
#[derive(Debug, Clone)]
pub struct Graphemes<'a> {
    original: &'a str,
    remaining: &'a str,
    cluster: &'a str,
    offset: usize,
    width: usize,
    state: SegmentState,
    cursor: Cursor,
}

impl<'a> Graphemes<'a> {
    /// Create a cursor positioned before the first cluster of `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            original: text,
            remaining: text,
            cluster: "",
            offset: 0,
            width: 0,
            state: SegmentState::default(),
            cursor: Cursor::Before,
        }
    }

    /// Move to the next cluster. Returns `false` when none are left.
    pub fn advance(&mut self) -> bool {
        self.offset += self.cluster.len();
        match first_grapheme(self.remaining, self.state) {
            Some(step) => {
                self.cluster = step.cluster;
                self.remaining = step.rest;
                self.width = step.width;
                self.state = step.state;
                self.cursor = Cursor::At;
                true
            }
            None => {
                self.cluster = "";
                self.width = 0;
                self.offset = self.original.len();
                self.state.boundary = Boundary::Exhausted;
                self.cursor = Cursor::After;
                false
            }
        }
    }

    /// Rewind to the state right after construction.
    pub fn reset(&mut self) {
        self.remaining = self.original;
        self.cluster = "";
        self.offset = 0;
        self.width = 0;
        self.state = SegmentState::default();
        self.cursor = Cursor::Before;
    }

    /// Text of the current cluster (empty before the first advance and
    /// after the end).
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.cluster
    }

    /// Code points of the current cluster.
    #[must_use]
    pub fn chars(&self) -> Chars<'a> {
        self.cluster.chars()
    }

    /// Byte interval `from..to` of the current cluster in the original
    /// string. `(0, 0)` before the first advance, `(len, len)` after the end.
    #[must_use]
    pub fn positions(&self) -> (usize, usize) {
        match self.cursor {
            Cursor::Before => (0, 0),
            Cursor::After => (self.original.len(), self.original.len()),
            Cursor::At => (self.offset, self.offset + self.cluster.len()),
        }
    }

    /// Display width of the current cluster (0 when not on a cluster).
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// The string being segmented.
    #[must_use]
    pub fn original(&self) -> &'a str {
        self.original
    }
}

impl<'a> Iterator for Graphemes<'a> {
    type Item = GraphemeCluster<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.advance() {
            return None;
        }
        let (from, to) = self.positions();
        Some(GraphemeCluster {
            text: self.cluster,
            range: from..to,
            width: self.width,
        })
    }
}

// ---------------------------------------------------------------------------
// Property tables (inclusive ranges, sorted, non-overlapping)
// ---------------------------------------------------------------------------

fn in_table(table: &[(u32, u32)], u: u32) -> bool {
    table
        .binary_search_by(|&(lo, hi)| {
            if hi < u {
                std::cmp::Ordering::Less
            } else if lo > u {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

const CONTROL: &[(u32, u32)] = &[
    (0x0000, 0x001F),
    (0x007F, 0x009F),
    (0x00AD, 0x00AD),
    (0x061C, 0x061C),
    (0x180E, 0x180E),
    (0x200B, 0x200B),
    (0x200E, 0x200F),
    (0x2028, 0x202E),
    (0x2060, 0x206F),
    (0xFEFF, 0xFEFF),
    (0xFFF0, 0xFFFB),
    (0x13430, 0x1343F),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0000, 0xE001F),
    (0xE0080, 0xE00FF),
    (0xE01F0, 0xE0FFF),
];

const EXTEND: &[(u32, u32)] = &[
    (0x0300, 0x036F),
    (0x0483, 0x0489),
    (0x0591, 0x05BD),
    (0x05BF, 0x05BF),
    (0x05C1, 0x05C2),
    (0x05C4, 0x05C5),
    (0x05C7, 0x05C7),
    (0x0610, 0x061A),
    (0x064B, 0x065F),
    (0x0670, 0x0670),
    (0x06D6, 0x06DC),
    (0x06DF, 0x06E4),
    (0x06E7, 0x06E8),
    (0x06EA, 0x06ED),
    (0x0711, 0x0711),
    (0x0730, 0x074A),
    (0x07A6, 0x07B0),
    (0x07EB, 0x07F3),
    (0x0816, 0x0819),
    (0x081B, 0x0823),
    (0x0825, 0x0827),
    (0x0829, 0x082D),
    (0x0859, 0x085B),
    (0x08D3, 0x08E1),
    (0x08E3, 0x0902),
    (0x093A, 0x093A),
    (0x093C, 0x093C),
    (0x0941, 0x0948),
    (0x094D, 0x094D),
    (0x0951, 0x0957),
    (0x0962, 0x0963),
    (0x0981, 0x0981),
    (0x09BC, 0x09BC),
    (0x09C1, 0x09C4),
    (0x09CD, 0x09CD),
    (0x0E31, 0x0E31),
    (0x0E34, 0x0E3A),
    (0x0E47, 0x0E4E),
    (0x0EB1, 0x0EB1),
    (0x0EB4, 0x0EBC),
    (0x0EC8, 0x0ECD),
    (0x0F18, 0x0F19),
    (0x0F35, 0x0F35),
    (0x0F37, 0x0F37),
    (0x0F39, 0x0F39),
    (0x0F71, 0x0F7E),
    (0x0F80, 0x0F84),
    (0x0F86, 0x0F87),
    (0x1160, 0x11FF),
    (0x135D, 0x135F),
    (0x1712, 0x1714),
    (0x17B4, 0x17B5),
    (0x17B7, 0x17BD),
    (0x17C6, 0x17C6),
    (0x17C9, 0x17D3),
    (0x180B, 0x180D),
    (0x1AB0, 0x1AFF),
    (0x1DC0, 0x1DFF),
    (0x200C, 0x200C),
    (0x20D0, 0x20FF),
    (0x2CEF, 0x2CF1),
    (0x2DE0, 0x2DFF),
    (0x302A, 0x302F),
    (0x3099, 0x309A),
    (0xA66F, 0xA672),
    (0xA674, 0xA67D),
    (0xA69E, 0xA69F),
    (0xA6F0, 0xA6F1),
    (0xA8E0, 0xA8F1),
    (0xD7B0, 0xD7FB),
    (0xFB1E, 0xFB1E),
    (0xFE00, 0xFE0F),
    (0xFE20, 0xFE2F),
    (0xFF9E, 0xFF9F),
    (0x101FD, 0x101FD),
    (0x1D165, 0x1D169),
    (0x1D16D, 0x1D172),
    (0x1F3FB, 0x1F3FF),
    (0xE0020, 0xE007F),
    (0xE0100, 0xE01EF),
];

const EXTENDED_PICTOGRAPHIC: &[(u32, u32)] = &[
    (0x00A9, 0x00A9),
    (0x00AE, 0x00AE),
    (0x203C, 0x203C),
    (0x2049, 0x2049),
    (0x2122, 0x2122),
    (0x2139, 0x2139),
    (0x2194, 0x2199),
    (0x21A9, 0x21AA),
    (0x231A, 0x231B),
    (0x2328, 0x2328),
    (0x2388, 0x2388),
    (0x23CF, 0x23CF),
    (0x23E9, 0x23F3),
    (0x23F8, 0x23FA),
    (0x24C2, 0x24C2),
    (0x25AA, 0x25AB),
    (0x25B6, 0x25B6),
    (0x25C0, 0x25C0),
    (0x25FB, 0x25FE),
    (0x2600, 0x2605),
    (0x2607, 0x2612),
    (0x2614, 0x2685),
    (0x2690, 0x2705),
    (0x2708, 0x2712),
    (0x2714, 0x2714),
    (0x2716, 0x2716),
    (0x271D, 0x271D),
    (0x2721, 0x2721),
    (0x2728, 0x2728),
    (0x2733, 0x2734),
    (0x2744, 0x2744),
    (0x2747, 0x2747),
    (0x274C, 0x274C),
    (0x274E, 0x274E),
    (0x2753, 0x2755),
    (0x2757, 0x2757),
    (0x2763, 0x2767),
    (0x2795, 0x2797),
    (0x27A1, 0x27A1),
    (0x27B0, 0x27B0),
    (0x27BF, 0x27BF),
    (0x2934, 0x2935),
    (0x2B05, 0x2B07),
    (0x2B1B, 0x2B1C),
    (0x2B50, 0x2B50),
    (0x2B55, 0x2B55),
    (0x3030, 0x3030),
    (0x303D, 0x303D),
    (0x3297, 0x3297),
    (0x3299, 0x3299),
    (0x1F000, 0x1F0FF),
    (0x1F10D, 0x1F10F),
    (0x1F12F, 0x1F12F),
    (0x1F16C, 0x1F171),
    (0x1F17E, 0x1F17F),
    (0x1F18E, 0x1F18E),
    (0x1F191, 0x1F19A),
    (0x1F1AD, 0x1F1E5),
    (0x1F201, 0x1F20F),
    (0x1F21A, 0x1F21A),
    (0x1F22F, 0x1F22F),
    (0x1F232, 0x1F23A),
    (0x1F23C, 0x1F23F),
    (0x1F249, 0x1F3FA),
    (0x1F400, 0x1F53D),
    (0x1F546, 0x1F64F),
    (0x1F680, 0x1F6FF),
    (0x1F774, 0x1F77F),
    (0x1F7D5, 0x1F7FF),
    (0x1F80C, 0x1F80F),
    (0x1F848, 0x1F84F),
    (0x1F85A, 0x1F85F),
    (0x1F888, 0x1F88F),
    (0x1F8AE, 0x1F8FF),
    (0x1F90C, 0x1F93A),
    (0x1F93C, 0x1F945),
    (0x1F947, 0x1FAFF),
    (0x1FC00, 0x1FFFD),
];
