#![forbid(unsafe_code)]

//! Packing many short rows into side-by-side column groups.
//!
//! A listing of narrow items wastes most of a wide terminal when printed
//! one item per line. The packer places `G` items on each line, each item
//! forming a *group* of cells, with groups joined by a separator:
//!
//! ```text
//! horizontal (row-major)        vertical (column-major)
//! a  b  c                       a  c  e
//! d  e                          b  d
//! ```
//!
//! # Choosing the group count
//!
//! The baseline assumes every group uses the table's recorded column
//! widths:
//!
//! ```text
//! G = max(1, (max_width + sep) / (table_width(sep) + sep))
//! ```
//!
//! In compact mode the packer then tries `G + 1`, `G + 2`, ... measuring
//! each column only over the items that land in each group. Narrow groups
//! free up space, so more of them may fit. The search keeps the last
//! candidate whose total line width
//!
//! ```text
//! sep * (G - 1) + inner * (columns - 1) * G + sum(per-group widths)
//! ```
//!
//! does not exceed `max_width`, and stops at the first that does. A
//! candidate that would leave a group without items is skipped, and no
//! more groups than items are ever tried.

use std::borrow::Cow;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::TableError;
use crate::item::FormattedItemList;
use crate::table::{INNER_SEPARATOR, MAX_WIDTH, Table};

/// Default separator between groups.
pub const DEFAULT_SEPARATOR: &str = "  ";

/// Order in which items fill the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Row-major: consecutive items go side by side.
    Horizontal,
    /// Column-major: consecutive items go down a group, like `ls`.
    #[default]
    Vertical,
}

impl Orientation {
    /// Index of the item shown in `group` on `line`.
    fn item_index(
        self,
        line: usize,
        group: usize,
        group_count: usize,
        line_count: usize,
    ) -> usize {
        match self {
            Self::Horizontal => crate::horizontal::item_index(line, group, group_count),
            Self::Vertical => crate::vertical::item_index(line, group, line_count),
        }
    }

    /// Per-group column widths for `group_count` groups.
    fn measure<T, L>(self, table: &Table<T>, items: &L, group_count: usize) -> GroupLayout
    where
        T: ?Sized,
        L: FormattedItemList + ?Sized,
    {
        match self {
            Self::Horizontal => GroupLayout::horizontal(table, items, group_count),
            Self::Vertical => GroupLayout::vertical(table, items, group_count),
        }
    }

    /// Whether `group_count` groups can all be given at least one item.
    fn fills_every_group(self, item_count: usize, group_count: usize) -> bool {
        match self {
            Self::Horizontal => group_count <= item_count,
            Self::Vertical => crate::vertical::fills_every_group(item_count, group_count),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        })
    }
}

/// Error returned when parsing an unknown orientation name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOrientationError(String);

impl fmt::Display for ParseOrientationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown orientation {:?} (expected horizontal or vertical)",
            self.0
        )
    }
}

impl std::error::Error for ParseOrientationError {}

impl FromStr for Orientation {
    type Err = ParseOrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" | "across" => Ok(Self::Horizontal),
            "vertical" | "v" | "down" => Ok(Self::Vertical),
            _ => Err(ParseOrientationError(s.to_owned())),
        }
    }
}

/// Output constraints for one packing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOptions {
    max_width: usize,
    separator: String,
    compact: bool,
}

impl PackOptions {
    /// Options for lines of at most `max_width` cells (capped at
    /// [`MAX_WIDTH`]), joined by [`DEFAULT_SEPARATOR`], without compact
    /// refinement.
    #[must_use]
    pub fn new(max_width: usize) -> Self {
        Self {
            max_width: max_width.min(MAX_WIDTH),
            separator: DEFAULT_SEPARATOR.to_owned(),
            compact: false,
        }
    }

    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn max_width(&self) -> usize {
        self.max_width
    }

    pub fn separator_str(&self) -> &str {
        &self.separator
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }
}

/// Layout chosen by a packing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackSummary {
    /// Groups per line, never more than the number of items.
    pub group_count: usize,
    /// Lines written.
    pub line_count: usize,
    /// Whether per-group widths were used.
    pub compact: bool,
}

/// Column widths measured separately for every group.
///
/// The width of column `c` in group `g` is stored at
/// `g * column_count + c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupLayout {
    group_count: usize,
    column_count: usize,
    widths: Vec<usize>,
}

impl GroupLayout {
    /// Layout of `group_count` groups with every width at zero.
    pub(crate) fn zeroed(group_count: usize, column_count: usize) -> Self {
        Self {
            group_count,
            column_count,
            widths: vec![0; group_count * column_count],
        }
    }

    /// Widen the columns of `group` to fit the cells of `row`.
    pub(crate) fn fit<T: ?Sized>(&mut self, table: &Table<T>, group: usize, row: &[String]) {
        let base = group * self.column_count;
        for (slot, cell) in self.widths[base..base + self.column_count].iter_mut().zip(row) {
            *slot = (*slot).max(table.engine().visual_width(cell));
        }
    }

    pub(crate) fn group_count(&self) -> usize {
        self.group_count
    }

    /// Width of `column` within `group`.
    pub(crate) fn width(&self, group: usize, column: usize) -> usize {
        self.widths[group * self.column_count + column]
    }

    #[cfg(test)]
    pub(crate) fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Full line width when every group is present.
    pub(crate) fn total_width(&self, separator_width: usize, inner_width: usize) -> usize {
        let groups = self.group_count();
        let gaps = separator_width * groups.saturating_sub(1)
            + inner_width * self.column_count.saturating_sub(1) * groups;
        gaps + self.widths.iter().sum::<usize>()
    }
}

/// Number of lines needed for `item_count` items in `group_count` groups.
pub(crate) fn line_count(item_count: usize, group_count: usize) -> usize {
    if item_count == 0 {
        0
    } else {
        (item_count - 1) / group_count + 1
    }
}

impl<T: ?Sized> Table<T> {
    /// Pack `items` in the given orientation. See
    /// [`Table::merge_rows_horizontal`] and [`Table::merge_rows_vertical`].
    pub fn merge_rows<W, L>(
        &self,
        orientation: Orientation,
        out: &mut W,
        items: &L,
        options: &PackOptions,
    ) -> Result<PackSummary, TableError>
    where
        W: Write + ?Sized,
        L: FormattedItemList + ?Sized,
    {
        let item_count = items.len();
        let _span = tracing::debug_span!(
            "pack",
            %orientation,
            items = item_count,
            max_width = options.max_width
        )
        .entered();

        for index in 0..item_count {
            self.check_row(items.get(index).len())?;
        }
        if item_count == 0 {
            return Ok(PackSummary::default());
        }

        let engine = self.engine();
        let separator_width = engine.visual_width(&options.separator);
        let baseline = self.baseline_group_count(separator_width, options.max_width, item_count);

        let refined = if options.compact {
            self.compact_search(orientation, items, baseline, separator_width, options.max_width)
        } else {
            None
        };
        let (group_count, layout) = match refined {
            Some((group_count, layout)) => (group_count, Some(layout)),
            None => (baseline, None),
        };
        let line_count = line_count(item_count, group_count);
        tracing::debug!(
            baseline,
            group_count,
            line_count,
            compact = layout.is_some(),
            "group count chosen"
        );

        let columns = self.spec().columns();
        let recorded = self.column_widths();
        let mut groups: Vec<String> = Vec::with_capacity(group_count);
        for line in 0..line_count {
            groups.clear();
            for group in 0..group_count {
                let index = orientation.item_index(line, group, group_count, line_count);
                if index >= item_count {
                    groups.push(String::new());
                    break;
                }
                let row = items.get(index);
                let cells: Vec<Cow<'_, str>> = columns
                    .iter()
                    .enumerate()
                    .map(|(c, column)| {
                        let width = layout.as_ref().map_or(recorded[c], |l| l.width(group, c));
                        column.packing_alignment().apply(&row[c], width, engine)
                    })
                    .collect();
                groups.push(cells.join(INNER_SEPARATOR));
            }
            writeln!(out, "{}", groups.join(options.separator.as_str()))?;
        }

        // A wide line may have room for more groups than there are items;
        // the surplus groups are never filled.
        Ok(PackSummary {
            group_count: group_count.min(item_count),
            line_count,
            compact: layout.is_some(),
        })
    }

    fn baseline_group_count(
        &self,
        separator_width: usize,
        max_width: usize,
        item_count: usize,
    ) -> usize {
        let per_group = self.table_width(separator_width) + separator_width;
        if per_group == 0 {
            return item_count.max(1);
        }
        ((max_width + separator_width) / per_group).max(1)
    }

    /// Try group counts above `baseline` until one no longer fits,
    /// skipping counts that leave a group empty.
    fn compact_search<L>(
        &self,
        orientation: Orientation,
        items: &L,
        baseline: usize,
        separator_width: usize,
        max_width: usize,
    ) -> Option<(usize, GroupLayout)>
    where
        L: FormattedItemList + ?Sized,
    {
        let item_count = items.len();
        let inner_width = self.engine().visual_width(INNER_SEPARATOR);
        let mut best = None;
        for candidate in (baseline + 1)..=item_count {
            if !orientation.fills_every_group(item_count, candidate) {
                tracing::trace!(candidate, "candidate leaves a group empty");
                continue;
            }
            let layout = orientation.measure(self, items, candidate);
            let total = layout.total_width(separator_width, inner_width);
            tracing::trace!(candidate, total, max_width, "candidate measured");
            if total > max_width {
                break;
            }
            best = Some((candidate, layout));
        }
        best
    }
}
