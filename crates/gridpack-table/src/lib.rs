#![forbid(unsafe_code)]

//! Tabular, fixed-width text output for terminal listings.
//!
//! - [`TableSpec`] / [`Column`] describe what is shown and how each column
//!   is aligned.
//! - [`Table`] formats items into cells and tracks the widest cell per
//!   column.
//! - [`Table::merge_rows_horizontal`] and [`Table::merge_rows_vertical`]
//!   pack many short rows side by side within a maximum line width.
//!
//! All widths are visual widths in terminal cells, measured by a shared
//! [`gridpack_text::WidthEngine`].
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use gridpack_table::{Column, PackOptions, Table, TableSpec};
//! use gridpack_text::{Alignment, WidthEngine};
//!
//! struct File {
//!     name: &'static str,
//!     size: u64,
//! }
//!
//! let spec = TableSpec::new()
//!     .with_column(
//!         Column::from_fn("size", |f: &File| f.size.to_string()).with_alignment(Alignment::Right),
//!     )?
//!     .with_column(Column::from_fn("name", |f: &File| f.name.to_owned()))?;
//! let mut table = Table::new(spec, Arc::new(WidthEngine::default()));
//!
//! let files = [
//!     File { name: "さの.png", size: 120 },
//!     File { name: "a.txt", size: 8 },
//!     File { name: "いざわ.png", size: 4096 },
//! ];
//! let mut rows = Vec::new();
//! for file in &files {
//!     rows.push(table.format_item(file)?);
//! }
//!
//! let mut out = Vec::new();
//! let options = PackOptions::new(30).separator("  ").compact(true);
//! table.merge_rows_vertical(&mut out, &rows, &options)?;
//! assert_eq!(
//!     String::from_utf8(out)?,
//!     "120 さの.png  4096 いざわ.png\n  8 a.txt     \n",
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
mod horizontal;
pub mod item;
pub mod pack;
pub mod table;
mod vertical;

pub use error::{FormatError, TableError};
pub use item::{CellValue, FnGetter, FormattedItemList, Getter, TypedGetter};
pub use pack::{DEFAULT_SEPARATOR, Orientation, PackOptions, PackSummary, ParseOrientationError};
pub use table::{Column, INNER_SEPARATOR, MAX_WIDTH, Table, TableSpec};
