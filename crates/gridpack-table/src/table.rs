#![forbid(unsafe_code)]

//! Table schema and column width bookkeeping.
//!
//! A [`TableSpec`] is the ordered list of columns. A [`Table`] pairs a spec
//! with the widest visual width seen so far in each column, which is what
//! header centering, cell alignment and the packer's baseline estimate all
//! work from.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use gridpack_text::ansi::strip_escapes;
use gridpack_text::{Alignment, WidthEngine, align_center};
use rustc_hash::FxHashMap;

use crate::error::TableError;
use crate::item::{FnGetter, Getter};

/// Separator placed between the columns of one item.
pub const INNER_SEPARATOR: &str = " ";

/// Upper bound for any table or line width.
pub const MAX_WIDTH: usize = 65_535;

/// One column of a table over items of type `T`.
pub struct Column<T: ?Sized> {
    name: String,
    title: String,
    alignment: Alignment,
    getter: Arc<dyn Getter<T>>,
}

impl<T: ?Sized> Column<T> {
    /// Column titled with its own name and not padded by
    /// [`Table::align_formatted_item`].
    pub fn new(name: impl Into<String>, getter: impl Getter<T> + 'static) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            alignment: Alignment::None,
            getter: Arc::new(getter),
        }
    }

    /// Column whose cells are rendered by a closure.
    ///
    /// ```
    /// use gridpack_table::Column;
    ///
    /// let column = Column::from_fn("name", |s: &String| s.clone()).with_title("NAME");
    /// assert_eq!(column.title(), "NAME");
    /// ```
    pub fn from_fn<F>(name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self::new(name, FnGetter::new(render))
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn getter(&self) -> &dyn Getter<T> {
        self.getter.as_ref()
    }

    /// Alignment used when packing, where every cell is padded.
    pub(crate) fn packing_alignment(&self) -> Alignment {
        match self.alignment {
            Alignment::None => Alignment::Left,
            other => other,
        }
    }
}

impl<T: ?Sized> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            title: self.title.clone(),
            alignment: self.alignment,
            getter: Arc::clone(&self.getter),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("alignment", &self.alignment)
            .finish_non_exhaustive()
    }
}

/// Ordered set of uniquely named columns.
pub struct TableSpec<T: ?Sized> {
    columns: Vec<Column<T>>,
    by_name: FxHashMap<String, usize>,
}

impl<T: ?Sized> TableSpec<T> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Append a column. Names must be unique.
    pub fn add_column(&mut self, column: Column<T>) -> Result<(), TableError> {
        if self.by_name.contains_key(&column.name) {
            return Err(TableError::DuplicateColumn { name: column.name });
        }
        self.by_name.insert(column.name.clone(), self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    /// Builder form of [`TableSpec::add_column`].
    pub fn with_column(mut self, column: Column<T>) -> Result<Self, TableError> {
        self.add_column(column)?;
        Ok(self)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column<T>> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }
}

impl<T: ?Sized> Default for TableSpec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for TableSpec<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            by_name: self.by_name.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for TableSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.columns).finish()
    }
}

/// A schema plus the widest cell seen so far in each column.
///
/// Widths only ever grow. They are recorded by [`Table::format_item`],
/// [`Table::record_cells`] and [`Table::update_widths`].
///
/// ```
/// use std::sync::Arc;
/// use gridpack_table::{Column, Table, TableSpec};
/// use gridpack_text::WidthEngine;
///
/// let spec = TableSpec::new()
///     .with_column(Column::from_fn("name", |s: &&str| s.to_string()))
///     .unwrap();
/// let mut table = Table::new(spec, Arc::new(WidthEngine::default()));
/// table.format_item(&"いざわ.png").unwrap();
/// assert_eq!(table.width("name"), Some(10));
/// ```
pub struct Table<T: ?Sized> {
    spec: TableSpec<T>,
    widths: Vec<usize>,
    engine: Arc<WidthEngine>,
}

impl<T: ?Sized> Table<T> {
    /// Table with all column widths at zero.
    pub fn new(spec: TableSpec<T>, engine: Arc<WidthEngine>) -> Self {
        let widths = vec![0; spec.column_count()];
        Self {
            spec,
            widths,
            engine,
        }
    }

    pub fn spec(&self) -> &TableSpec<T> {
        &self.spec
    }

    pub fn engine(&self) -> &WidthEngine {
        &self.engine
    }

    pub fn column_count(&self) -> usize {
        self.spec.column_count()
    }

    /// Recorded width of each column, in schema order.
    pub fn column_widths(&self) -> &[usize] {
        &self.widths
    }

    /// Recorded width of the named column.
    pub fn width(&self, name: &str) -> Option<usize> {
        self.spec.column_index(name).map(|i| self.widths[i])
    }

    /// Raise column widths to at least the given values. Unknown column
    /// names are ignored.
    pub fn update_widths<I, S>(&mut self, widths: I)
    where
        I: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        for (name, width) in widths {
            match self.spec.column_index(name.as_ref()) {
                Some(i) => self.widths[i] = self.widths[i].max(width),
                None => {
                    tracing::trace!(column = name.as_ref(), "width for unknown column ignored");
                }
            }
        }
    }

    /// Raise column widths to fit a row of already formatted cells.
    pub fn record_cells(&mut self, cells: &[String]) -> Result<(), TableError> {
        self.check_row(cells.len())?;
        for (width, cell) in self.widths.iter_mut().zip(cells) {
            *width = (*width).max(self.engine.visual_width(cell));
        }
        Ok(())
    }

    /// Format every column of `item` and record the resulting widths.
    pub fn format_item(&mut self, item: &T) -> Result<Vec<String>, TableError> {
        let mut formatted = Vec::with_capacity(self.spec.column_count());
        for (column, width) in self.spec.columns.iter().zip(self.widths.iter_mut()) {
            let getter = column.getter();
            let value = getter.value(item).map_err(|e| e.in_column(&column.name))?;
            let cell = getter
                .format(item, value)
                .map_err(|e| e.in_column(&column.name))?;
            *width = (*width).max(self.engine.visual_width(&cell));
            formatted.push(cell);
        }
        Ok(formatted)
    }

    /// Plain rendering of `item` for non-tabular output: each column's
    /// [`Getter::value_string`] with escape sequences removed, joined by
    /// `sep`. Widths are not touched.
    pub fn format_item_basic(&self, item: &T, sep: &str) -> Result<String, TableError> {
        let mut out = String::new();
        for (i, column) in self.spec.columns.iter().enumerate() {
            let cell = column
                .getter()
                .value_string(&column.name, item)
                .map_err(|e| e.in_column(&column.name))?;
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(&strip_escapes(&cell));
        }
        Ok(out)
    }

    /// Pad each cell to its column width. Columns without an alignment
    /// are left as they are.
    pub fn align_formatted_item(&self, mut cells: Vec<String>) -> Result<Vec<String>, TableError> {
        self.check_row(cells.len())?;
        let columns = self.spec.columns.iter().zip(&self.widths);
        for (cell, (column, &width)) in cells.iter_mut().zip(columns) {
            let padded = match column.alignment.apply(cell, width, &self.engine) {
                Cow::Owned(padded) => Some(padded),
                Cow::Borrowed(_) => None,
            };
            if let Some(padded) = padded {
                *cell = padded;
            }
        }
        Ok(cells)
    }

    /// Header line: every title centered in its column and followed by
    /// `sep`, ending in a newline.
    ///
    /// A column that has no width yet shows its raw title. A title wider
    /// than its column is blanked out.
    pub fn format_header(&self, sep: &str) -> String {
        let mut out = String::new();
        for (column, &width) in self.spec.columns.iter().zip(&self.widths) {
            out.push_str(&self.pad_title(&column.title, width));
            out.push_str(sep);
        }
        out.push('\n');
        out
    }

    fn pad_title<'a>(&self, title: &'a str, width: usize) -> Cow<'a, str> {
        if width == 0 {
            return Cow::Borrowed(title);
        }
        if self.engine.visual_width(title) > width {
            return Cow::Owned(" ".repeat(width));
        }
        align_center(title, width, &self.engine)
    }

    /// Width of one item: all column widths plus `margin` between
    /// adjacent columns, capped at [`MAX_WIDTH`].
    pub fn table_width(&self, margin: usize) -> usize {
        let gaps = margin.saturating_mul(self.widths.len().saturating_sub(1));
        self.widths
            .iter()
            .fold(gaps, |acc, &w| acc.saturating_add(w))
            .min(MAX_WIDTH)
    }

    pub(crate) fn check_row(&self, actual: usize) -> Result<(), TableError> {
        let expected = self.spec.column_count();
        if actual == expected {
            Ok(())
        } else {
            Err(TableError::SchemaMismatch { expected, actual })
        }
    }
}

impl<T: ?Sized> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("spec", &self.spec)
            .field("widths", &self.widths)
            .finish_non_exhaustive()
    }
}
