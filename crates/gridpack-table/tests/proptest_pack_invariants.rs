//! Property-based invariant tests for the layout packer.
//!
//! These tests verify invariants that must hold for any list of rows:
//!
//! 1. One group per line emits exactly one item per line, in order.
//! 2. Reading vertical output down then across reproduces the item order.
//! 3. Reading horizontal output across then down reproduces the item order.
//! 4. The compact group count never decreases as `max_width` grows.
//! 5. A compact layout with more than one group fits within `max_width`.
//! 6. Compact never chooses fewer groups than the baseline.

use std::sync::Arc;

use gridpack_table::{Column, Orientation, PackOptions, PackSummary, Table, TableSpec};
use gridpack_text::WidthEngine;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Cell text without spaces, so packed output can be split back apart.
fn cell() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["a", "b", "Z", "7", "さ", "の", "中", ".", "\u{1F600}"]),
        1..8,
    )
    .prop_map(|parts| parts.concat())
}

fn items(max: usize) -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(cell().prop_map(|c| vec![c]), 0..max)
}

fn orientation() -> impl Strategy<Value = Orientation> {
    prop::sample::select(vec![Orientation::Horizontal, Orientation::Vertical])
}

fn table_for(items: &[Vec<String>]) -> Table<str> {
    let spec = TableSpec::new()
        .with_column(Column::from_fn("name", |s: &str| s.to_owned()))
        .expect("single column");
    let mut table = Table::new(spec, Arc::new(WidthEngine::new(256)));
    for row in items {
        table.record_cells(row).expect("one cell per row");
    }
    table
}

fn pack(
    table: &Table<str>,
    orientation: Orientation,
    items: &[Vec<String>],
    options: &PackOptions,
) -> (Vec<String>, PackSummary) {
    let mut out = Vec::new();
    let summary = table
        .merge_rows(orientation, &mut out, items, options)
        .expect("packing into a Vec cannot fail");
    let text = String::from_utf8(out).expect("cells are UTF-8");
    let lines = text.lines().map(str::to_owned).collect();
    (lines, summary)
}

/// Split a packed line back into its non-empty cells.
fn cells_of(line: &str) -> Vec<String> {
    line.split(' ')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn flat(items: &[Vec<String>]) -> Vec<String> {
    items.iter().map(|row| row[0].clone()).collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. One group per line
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_group_is_one_item_per_line(
        items in items(30),
        orientation in orientation(),
    ) {
        let table = table_for(&items);
        // Narrower than any item: the baseline floors at one group.
        let options = PackOptions::new(0);
        let (lines, summary) = pack(&table, orientation, &items, &options);
        prop_assert_eq!(lines.len(), items.len());
        if !items.is_empty() {
            prop_assert_eq!(summary.group_count, 1);
        }
        for (line, row) in lines.iter().zip(&items) {
            prop_assert_eq!(line.trim_end(), row[0].as_str());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Vertical reassembly
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn vertical_reads_down_then_across(
        items in items(40),
        max_width in 1usize..120,
        compact in any::<bool>(),
    ) {
        let table = table_for(&items);
        let options = PackOptions::new(max_width).separator(" ").compact(compact);
        let (lines, summary) = pack(&table, Orientation::Vertical, &items, &options);
        prop_assert_eq!(lines.len(), summary.line_count);

        let grid: Vec<Vec<String>> = lines.iter().map(|l| cells_of(l)).collect();
        let mut reassembled = Vec::new();
        for group in 0..summary.group_count {
            for row in &grid {
                if let Some(cell) = row.get(group) {
                    reassembled.push(cell.clone());
                }
            }
        }
        prop_assert_eq!(reassembled, flat(&items));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Horizontal reassembly
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn horizontal_reads_across_then_down(
        items in items(40),
        max_width in 1usize..120,
        compact in any::<bool>(),
    ) {
        let table = table_for(&items);
        let options = PackOptions::new(max_width).separator(" ").compact(compact);
        let (lines, _) = pack(&table, Orientation::Horizontal, &items, &options);
        let reassembled: Vec<String> = lines.iter().flat_map(|l| cells_of(l)).collect();
        prop_assert_eq!(reassembled, flat(&items));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Monotone in max_width
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compact_group_count_is_monotone(
        items in items(40),
        orientation in orientation(),
        narrow in 0usize..100,
        extra in 0usize..60,
    ) {
        let table = table_for(&items);
        let small = PackOptions::new(narrow).compact(true);
        let large = PackOptions::new(narrow + extra).compact(true);
        let (_, a) = pack(&table, orientation, &items, &small);
        let (_, b) = pack(&table, orientation, &items, &large);
        prop_assert!(
            a.group_count <= b.group_count,
            "{} groups at width {}, {} at width {}",
            a.group_count, narrow, b.group_count, narrow + extra
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Compact layouts fit
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compact_lines_fit(
        items in items(40),
        orientation in orientation(),
        max_width in 1usize..120,
    ) {
        let table = table_for(&items);
        let options = PackOptions::new(max_width).separator(" | ").compact(true);
        let (lines, summary) = pack(&table, orientation, &items, &options);
        if summary.compact {
            prop_assert!(summary.group_count > 1);
            for line in &lines {
                let width = table.engine().visual_width(line.trim_end());
                prop_assert!(width <= max_width, "{:?} is {} wide", line, width);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Compact never loses groups
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compact_at_least_baseline(
        items in items(40),
        orientation in orientation(),
        max_width in 0usize..160,
    ) {
        let table = table_for(&items);
        let (_, plain) = pack(&table, orientation, &items, &PackOptions::new(max_width));
        let (_, compact) = pack(
            &table,
            orientation,
            &items,
            &PackOptions::new(max_width).compact(true),
        );
        prop_assert!(compact.group_count >= plain.group_count);
        prop_assert_eq!(compact.compact, compact.group_count > plain.group_count);
    }
}
