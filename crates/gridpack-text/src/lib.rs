#![forbid(unsafe_code)]

//! Visual width measurement for GridPack.
//!
//! This crate answers one question: how many terminal cells does a string
//! occupy? It accounts for
//! - grapheme clusters (combining marks, ZWJ emoji, flags),
//! - double-width East Asian characters,
//! - ANSI escape sequences, which occupy no cells at all.
//!
//! Components:
//! - [`grapheme`] - resumable grapheme cluster segmentation with widths
//! - [`ansi`] - escape sequence matching
//! - [`WidthCache`] - LRU cache of measured widths
//! - [`WidthEngine`] - shareable, memoizing width measurement
//! - [`Alignment`] - padding to a target width
//!
//! # Example
//! ```
//! use gridpack_text::{Alignment, WidthEngine};
//!
//! let engine = WidthEngine::default();
//! assert_eq!(engine.visual_width("\x1b[32mいざわ.png\x1b[0m"), 10);
//!
//! let padded = Alignment::Right.apply("42", 5, &engine);
//! assert_eq!(padded, "   42");
//! ```

pub mod align;
pub mod ansi;
pub mod grapheme;
pub mod width;
pub mod width_cache;

pub use align::{Alignment, ParseAlignmentError, align_center, align_left, align_right};
pub use grapheme::{GraphemeCluster, Graphemes, first_grapheme, string_width};
pub use width::{WidthEngine, measure_uncached};
pub use width_cache::{CacheStats, DEFAULT_CACHE_CAPACITY, WidthCache};
