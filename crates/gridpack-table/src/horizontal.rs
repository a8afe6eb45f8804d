#![forbid(unsafe_code)]

//! Row-major packing: item `i` goes to group `i % G` on line `i / G`.

use std::io::Write;

use crate::error::TableError;
use crate::item::FormattedItemList;
use crate::pack::{GroupLayout, Orientation, PackOptions, PackSummary};
use crate::table::Table;

pub(crate) fn item_index(line: usize, group: usize, group_count: usize) -> usize {
    line * group_count + group
}

impl GroupLayout {
    /// Per-group widths when items are dealt out row by row.
    pub(crate) fn horizontal<T, L>(table: &Table<T>, items: &L, group_count: usize) -> Self
    where
        T: ?Sized,
        L: FormattedItemList + ?Sized,
    {
        let mut layout = Self::zeroed(group_count, table.column_count());
        for index in 0..items.len() {
            layout.fit(table, index % group_count, items.get(index));
        }
        layout
    }
}

impl<T: ?Sized> Table<T> {
    /// Write `items` row-major, as many per line as fit in
    /// `options.max_width()`.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use gridpack_table::{Column, PackOptions, Table, TableSpec};
    /// use gridpack_text::WidthEngine;
    ///
    /// let spec = TableSpec::new()
    ///     .with_column(Column::from_fn("name", |s: &str| s.to_owned()))
    ///     .unwrap();
    /// let mut table = Table::new(spec, Arc::new(WidthEngine::default()));
    /// let items: Vec<Vec<String>> = ["a", "bb", "c", "dd"]
    ///     .iter()
    ///     .map(|s| vec![s.to_string()])
    ///     .collect();
    /// for row in &items {
    ///     table.record_cells(row).unwrap();
    /// }
    ///
    /// let mut out = Vec::new();
    /// table
    ///     .merge_rows_horizontal(&mut out, &items, &PackOptions::new(6))
    ///     .unwrap();
    /// assert_eq!(String::from_utf8(out).unwrap(), "a   bb\nc   dd\n");
    /// ```
    pub fn merge_rows_horizontal<W, L>(
        &self,
        out: &mut W,
        items: &L,
        options: &PackOptions,
    ) -> Result<PackSummary, TableError>
    where
        W: Write + ?Sized,
        L: FormattedItemList + ?Sized,
    {
        self.merge_rows(Orientation::Horizontal, out, items, options)
    }
}
