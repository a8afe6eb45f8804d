#![forbid(unsafe_code)]

//! Padding strings to a target visual width.
//!
//! Padding is always plain ASCII spaces and a string is never truncated: if
//! it is already at least as wide as the target it comes back untouched.
//!
//! # Example
//! ```
//! use gridpack_text::{Alignment, WidthEngine};
//!
//! let engine = WidthEngine::default();
//! assert_eq!(Alignment::Left.apply("さの.png", 11, &engine), "さの.png   ");
//! assert_eq!(Alignment::Right.apply("さの.png", 11, &engine), "   さの.png");
//! assert_eq!(Alignment::Center.apply("さの.png", 11, &engine), "  さの.png ");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::width::WidthEngine;

const PAD: &str = " ";

/// How a cell is padded to its column width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Alignment {
    /// Pad on the right.
    Left,
    /// Pad on the left.
    Right,
    /// Pad on both sides, the odd space going to the left.
    Center,
    /// Leave the text as it is.
    #[default]
    None,
}

impl Alignment {
    /// Pad `text` to `width` cells according to this alignment.
    pub fn apply<'a>(self, text: &'a str, width: usize, engine: &WidthEngine) -> Cow<'a, str> {
        match self {
            Self::Left => align_left(text, width, engine),
            Self::Right => align_right(text, width, engine),
            Self::Center => align_center(text, width, engine),
            Self::None => Cow::Borrowed(text),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::None => "none",
        })
    }
}

/// Error returned when parsing an unknown alignment name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAlignmentError(String);

impl fmt::Display for ParseAlignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown alignment {:?} (expected left, right, center or none)",
            self.0
        )
    }
}

impl std::error::Error for ParseAlignmentError {}

impl FromStr for Alignment {
    type Err = ParseAlignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            "center" | "centre" | "c" => Ok(Self::Center),
            "none" | "" => Ok(Self::None),
            _ => Err(ParseAlignmentError(s.to_owned())),
        }
    }
}

/// Number of spaces missing for `text` to reach `width`, if any.
fn shortfall(text: &str, width: usize, engine: &WidthEngine) -> Option<usize> {
    let current = engine.visual_width(text);
    (current < width).then(|| width - current)
}

/// Append spaces until `text` is `width` cells wide.
pub fn align_left<'a>(text: &'a str, width: usize, engine: &WidthEngine) -> Cow<'a, str> {
    match shortfall(text, width, engine) {
        Some(n) => Cow::Owned(format!("{text}{}", PAD.repeat(n))),
        None => Cow::Borrowed(text),
    }
}

/// Prepend spaces until `text` is `width` cells wide.
pub fn align_right<'a>(text: &'a str, width: usize, engine: &WidthEngine) -> Cow<'a, str> {
    match shortfall(text, width, engine) {
        Some(n) => Cow::Owned(format!("{}{text}", PAD.repeat(n))),
        None => Cow::Borrowed(text),
    }
}

/// Surround `text` with spaces until it is `width` cells wide.
///
/// With an odd number of spaces the left side gets the extra one.
pub fn align_center<'a>(text: &'a str, width: usize, engine: &WidthEngine) -> Cow<'a, str> {
    match shortfall(text, width, engine) {
        Some(n) => {
            let left = n.div_ceil(2);
            let right = n - left;
            Cow::Owned(format!("{}{text}{}", PAD.repeat(left), PAD.repeat(right)))
        }
        None => Cow::Borrowed(text),
    }
}
