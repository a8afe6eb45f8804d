#![forbid(unsafe_code)]

//! Column-major packing: items fill each group top to bottom before moving
//! on to the next, so group `g` holds the contiguous block
//! `g * L .. (g + 1) * L` where `L` is the line count.

use std::io::Write;

use crate::error::TableError;
use crate::item::FormattedItemList;
use crate::pack::{GroupLayout, Orientation, PackOptions, PackSummary, line_count};
use crate::table::Table;

pub(crate) fn item_index(line: usize, group: usize, line_count: usize) -> usize {
    group * line_count + line
}

/// Whether splitting `item_count` items into blocks of
/// `ceil(item_count / group_count)` gives every group at least one item.
///
/// Five items in four groups need two lines, which only fills three
/// groups; the fourth would be empty.
pub(crate) fn fills_every_group(item_count: usize, group_count: usize) -> bool {
    if item_count == 0 || group_count == 0 {
        return false;
    }
    let lines = line_count(item_count, group_count);
    (item_count - 1) / lines + 1 == group_count
}

impl GroupLayout {
    /// Per-group widths when items are dealt out in contiguous blocks.
    pub(crate) fn vertical<T, L>(table: &Table<T>, items: &L, group_count: usize) -> Self
    where
        T: ?Sized,
        L: FormattedItemList + ?Sized,
    {
        let mut layout = Self::zeroed(group_count, table.column_count());
        let lines = line_count(items.len(), group_count);
        for index in 0..items.len() {
            layout.fit(table, index / lines, items.get(index));
        }
        layout
    }
}

impl<T: ?Sized> Table<T> {
    /// Write `items` column-major, as many groups per line as fit in
    /// `options.max_width()`.
    ///
    /// Reading the output down each group and then across reproduces the
    /// original item order.
    pub fn merge_rows_vertical<W, L>(
        &self,
        out: &mut W,
        items: &L,
        options: &PackOptions,
    ) -> Result<PackSummary, TableError>
    where
        W: Write + ?Sized,
        L: FormattedItemList + ?Sized,
    {
        self.merge_rows(Orientation::Vertical, out, items, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, TableSpec};
    use gridpack_text::{Alignment, WidthEngine};
    use std::sync::Arc;

    fn rows(names: &[&str]) -> Vec<Vec<String>> {
        names.iter().map(|n| vec![(*n).to_owned()]).collect()
    }

    fn table(items: &[Vec<String>]) -> Table<str> {
        let spec = TableSpec::new()
            .with_column(Column::from_fn("name", |s: &str| s.to_owned()))
            .unwrap();
        let mut table = Table::new(spec, Arc::new(WidthEngine::new(64)));
        for row in items {
            table.record_cells(row).unwrap();
        }
        table
    }

    fn render(
        table: &Table<str>,
        items: &[Vec<String>],
        options: &PackOptions,
    ) -> (String, PackSummary) {
        let mut out = Vec::new();
        let summary = table.merge_rows_vertical(&mut out, items, options).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn index_is_column_major() {
        assert_eq!(item_index(0, 0, 3), 0);
        assert_eq!(item_index(2, 0, 3), 2);
        assert_eq!(item_index(0, 1, 3), 3);
        assert_eq!(item_index(1, 2, 3), 7);
    }

    #[test]
    fn empty_trailing_group_detection() {
        assert!(fills_every_group(5, 3));
        assert!(!fills_every_group(5, 4));
        assert!(fills_every_group(7, 4));
        assert!(!fills_every_group(7, 5));
        assert!(fills_every_group(4, 4));
        assert!(fills_every_group(1, 1));
        assert!(!fills_every_group(0, 1));
    }

    #[test]
    fn layout_measures_blocks() {
        let items = rows(&["a", "bbb", "cc", "d", "eeeee"]);
        let layout = GroupLayout::vertical(&table(&items), &items, 2);
        // three lines: group 0 is a, bbb, cc; group 1 is d, eeeee
        assert_eq!(layout.widths(), [3, 5]);
    }

    #[test]
    fn fills_down_then_across() {
        let items = rows(&["a", "b", "c", "d", "e"]);
        let table = table(&items);
        let (text, summary) = render(&table, &items, &PackOptions::new(7));
        assert_eq!(summary.group_count, 3);
        assert_eq!(summary.line_count, 2);
        assert_eq!(text, "a  c  e\nb  d  \n");
    }

    #[test]
    fn compact_skips_counts_that_leave_a_group_empty() {
        let items = rows(&["aaaaaaaaaa", "b", "c", "d"]);
        let table = table(&items);

        // Two groups fit (12), three would leave a group empty, four fit (16).
        let options = PackOptions::new(20).separator(" ").compact(true);
        let (text, summary) = render(&table, &items, &options);
        assert_eq!(summary.group_count, 4);
        assert!(summary.compact);
        assert_eq!(text, "aaaaaaaaaa b c d\n");

        let options = PackOptions::new(13).separator(" ").compact(true);
        let (text, summary) = render(&table, &items, &options);
        assert_eq!(summary.group_count, 2);
        assert_eq!(text, "aaaaaaaaaa c\nb          d\n");
    }

    #[test]
    fn multi_column_groups_use_inner_separator() {
        let spec = TableSpec::new()
            .with_column(
                Column::from_fn("size", |s: &str| s.to_owned()).with_alignment(Alignment::Right),
            )
            .unwrap()
            .with_column(Column::from_fn("name", |s: &str| s.to_owned()))
            .unwrap();
        let mut table: Table<str> = Table::new(spec, Arc::new(WidthEngine::new(64)));
        let items: Vec<Vec<String>> = [("1", "さの.png"), ("100", "a"), ("20", "いざわ.png")]
            .iter()
            .map(|(size, name)| vec![(*size).to_owned(), (*name).to_owned()])
            .collect();
        for row in &items {
            table.record_cells(row).unwrap();
        }
        assert_eq!(table.table_width(1), 14);

        // Per-group widths: group 0 is (3, 8), group 1 is (2, 10), for a
        // total of 3 + 2 * 1 + 23 = 28.
        let options = PackOptions::new(28).separator(" | ").compact(true);
        let (text, summary) = render(&table, &items, &options);
        assert_eq!(summary.group_count, 2);
        assert_eq!(text, "  1 さの.png | 20 いざわ.png\n100 a        | \n");
    }
}
