#![forbid(unsafe_code)]

//! Command line front end for GridPack.
//!
//! Reads tab-separated rows from an input stream, one row per line, and
//! packs them into side-by-side groups on the output. Every setting comes
//! from the environment:
//!
//! | Variable                  | Default      | Meaning                                  |
//! |---------------------------|--------------|------------------------------------------|
//! | `GRIDPACK_WIDTH`          | `80`         | maximum line width in cells              |
//! | `GRIDPACK_SEPARATOR`      | two spaces   | text between groups                      |
//! | `GRIDPACK_COMPACT`        | on           | measure widths per group                 |
//! | `GRIDPACK_VERTICAL`       | on           | fill groups top to bottom (`ls` style)   |
//! | `GRIDPACK_ALIGN`          | all left     | comma separated alignment per column     |
//! | `GRIDPACK_CACHE_CAPACITY` | `10000`      | width cache entries                      |
//! | `GRIDPACK_LOG`            | `warn`       | `tracing` filter directives              |

use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use gridpack_table::{
    Column, Orientation, PackOptions, PackSummary, Table, TableError, TableSpec,
};
use gridpack_text::{Alignment, DEFAULT_CACHE_CAPACITY, ParseAlignmentError, WidthEngine};

/// Default maximum line width.
pub const DEFAULT_WIDTH: usize = 80;

/// Settings for one harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub width: usize,
    pub separator: String,
    pub compact: bool,
    pub orientation: Orientation,
    pub alignments: Vec<Alignment>,
    pub cache_capacity: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            separator: gridpack_table::DEFAULT_SEPARATOR.to_owned(),
            compact: true,
            orientation: Orientation::Vertical,
            alignments: Vec::new(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl HarnessConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its
    /// value. Unset, blank or unparsable numbers and flags keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HarnessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let orientation = match env_flag(&lookup, "GRIDPACK_VERTICAL") {
            Some(false) => Orientation::Horizontal,
            Some(true) => Orientation::Vertical,
            None => defaults.orientation,
        };
        let alignments = match env_string(&lookup, "GRIDPACK_ALIGN") {
            Some(spec) => parse_alignments(&spec)?,
            None => defaults.alignments,
        };
        Ok(Self {
            width: env_u64(&lookup, "GRIDPACK_WIDTH")
                .and_then(|w| usize::try_from(w).ok())
                .unwrap_or(defaults.width),
            // The separator is taken verbatim: spaces are meaningful.
            separator: lookup("GRIDPACK_SEPARATOR")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.separator),
            compact: env_flag(&lookup, "GRIDPACK_COMPACT").unwrap_or(defaults.compact),
            orientation,
            alignments,
            cache_capacity: env_u64(&lookup, "GRIDPACK_CACHE_CAPACITY")
                .and_then(|c| usize::try_from(c).ok())
                .unwrap_or(defaults.cache_capacity),
        })
    }

    fn pack_options(&self) -> PackOptions {
        PackOptions::new(self.width)
            .separator(self.separator.clone())
            .compact(self.compact)
    }

    fn alignment(&self, column: usize) -> Alignment {
        self.alignments
            .get(column)
            .copied()
            .unwrap_or(Alignment::Left)
    }
}

fn parse_alignments(spec: &str) -> Result<Vec<Alignment>, HarnessError> {
    spec.split(',')
        .map(|part| part.parse::<Alignment>().map_err(HarnessError::Alignment))
        .collect()
}

fn env_flag<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str) -> Option<bool> {
    let value = lookup(name)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let enabled = matches!(
        trimmed,
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON"
    );
    Some(enabled)
}

fn env_u64<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str) -> Option<u64> {
    lookup(name).and_then(|value| value.trim().parse::<u64>().ok())
}

fn env_string<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Errors from a harness run.
#[derive(Debug)]
pub enum HarnessError {
    /// Reading input or writing output failed.
    Io(io::Error),
    /// `GRIDPACK_ALIGN` names an unknown alignment.
    Alignment(ParseAlignmentError),
    /// Input line `line` (1-based) could not be laid out.
    Row { line: usize, source: TableError },
    /// Packing failed.
    Table(TableError),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Alignment(err) => write!(f, "GRIDPACK_ALIGN: {err}"),
            Self::Row { line, source } => write!(f, "line {line}: {source}"),
            Self::Table(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Alignment(err) => Some(err),
            Self::Row { source, .. } => Some(source),
            Self::Table(err) => Some(err),
        }
    }
}

impl From<io::Error> for HarnessError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<TableError> for HarnessError {
    fn from(err: TableError) -> Self {
        Self::Table(err)
    }
}

/// Read tab-separated rows from `input` and write them packed to `out`.
///
/// Blank lines are skipped. The first row fixes the number of columns;
/// every other row must match it.
///
/// ```
/// use gridpack_harness::{HarnessConfig, run};
///
/// let config = HarnessConfig {
///     width: 5,
///     ..HarnessConfig::default()
/// };
/// let mut out = Vec::new();
/// run("a\nb\nc\nd\n".as_bytes(), &mut out, &config).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "a  c\nb  d\n");
/// ```
pub fn run<R, W>(
    input: R,
    out: &mut W,
    config: &HarnessConfig,
) -> Result<PackSummary, HarnessError>
where
    R: BufRead,
    W: Write + ?Sized,
{
    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        rows.push((index + 1, line.split('\t').map(str::to_owned).collect()));
    }

    let column_count = rows.first().map_or(0, |(_, cells)| cells.len());
    tracing::info!(rows = rows.len(), columns = column_count, "input read");

    let engine = Arc::new(WidthEngine::new(config.cache_capacity));
    let mut table = Table::new(build_spec(column_count, config)?, engine);

    let mut formatted = Vec::with_capacity(rows.len());
    for (line, cells) in &rows {
        if cells.len() != column_count {
            return Err(HarnessError::Row {
                line: *line,
                source: TableError::SchemaMismatch {
                    expected: column_count,
                    actual: cells.len(),
                },
            });
        }
        let row = table
            .format_item(cells.as_slice())
            .map_err(|source| HarnessError::Row {
                line: *line,
                source,
            })?;
        formatted.push(row);
    }

    let options = config.pack_options();
    let summary = table.merge_rows(config.orientation, out, &formatted, &options)?;
    out.flush()?;

    let stats = table.engine().cache_stats();
    tracing::debug!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        hit_rate = stats.hit_rate(),
        "width cache"
    );
    Ok(summary)
}

fn build_spec(
    column_count: usize,
    config: &HarnessConfig,
) -> Result<TableSpec<[String]>, TableError> {
    let mut spec = TableSpec::new();
    for index in 0..column_count {
        let column = Column::from_fn(format!("col{}", index + 1), move |row: &[String]| {
            row.get(index).cloned().unwrap_or_default()
        })
        .with_alignment(config.alignment(index));
        spec.add_column(column)?;
    }
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<HarnessConfig, HarnessError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        HarnessConfig::from_lookup(|name| vars.get(name).cloned())
    }

    fn run_to_string(input: &str, config: &HarnessConfig) -> String {
        let mut out = Vec::new();
        run(input.as_bytes(), &mut out, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.width, 80);
        assert_eq!(config.separator, "  ");
        assert!(config.compact);
        assert_eq!(config.orientation, Orientation::Vertical);
        assert_eq!(config.cache_capacity, 10_000);
    }

    #[test]
    fn environment_overrides() {
        let config = config_from(&[
            ("GRIDPACK_WIDTH", " 120 "),
            ("GRIDPACK_SEPARATOR", " | "),
            ("GRIDPACK_COMPACT", "off"),
            ("GRIDPACK_VERTICAL", "0"),
            ("GRIDPACK_ALIGN", "right, left"),
            ("GRIDPACK_CACHE_CAPACITY", "64"),
        ])
        .unwrap();
        assert_eq!(config.width, 120);
        assert_eq!(config.separator, " | ");
        assert!(!config.compact);
        assert_eq!(config.orientation, Orientation::Horizontal);
        assert_eq!(config.alignments, [Alignment::Right, Alignment::Left]);
        assert_eq!(config.cache_capacity, 64);
    }

    #[test]
    fn unparsable_values_keep_defaults() {
        let config = config_from(&[
            ("GRIDPACK_WIDTH", "wide"),
            ("GRIDPACK_COMPACT", "  "),
            ("GRIDPACK_SEPARATOR", ""),
        ])
        .unwrap();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert!(config.compact);
        assert_eq!(config.separator, "  ");
    }

    #[test]
    fn bad_alignment_is_an_error() {
        let err = config_from(&[("GRIDPACK_ALIGN", "left,diagonal")]).unwrap_err();
        assert!(matches!(err, HarnessError::Alignment(_)));
        assert!(err.to_string().starts_with("GRIDPACK_ALIGN:"));
    }

    #[test]
    fn packs_file_names_down_then_across() {
        let config = HarnessConfig {
            width: 30,
            ..HarnessConfig::default()
        };
        let input = "さの.png\nたき.png\nいざわ.png\nみすぎ.png\nいしざき.png\n";
        // Widest name is 12 cells: (30 + 2) / 14 = 2 groups. Three groups
        // would need 8 + 10 + 12 + 4 = 34 cells, so the recorded width is
        // used for both.
        let expected = [
            "さの.png      みすぎ.png  ",
            "たき.png      いしざき.png",
            "いざわ.png    ",
        ];
        assert_eq!(run_to_string(input, &config), expected.join("\n") + "\n");
    }

    #[test]
    fn tab_separated_columns_are_aligned() {
        let config = HarnessConfig {
            width: 40,
            alignments: vec![Alignment::Right],
            ..HarnessConfig::default()
        };
        let input = "4096\tsrc\n12\tCargo.toml\r\n\n8\tx\n";
        // Three groups fit once measured separately: 2 * 2 + 3 * 1 + 21 = 28.
        assert_eq!(run_to_string(input, &config), "4096 src  12 Cargo.toml  8 x\n");
    }

    #[test]
    fn ragged_rows_report_their_line() {
        let mut out = Vec::new();
        let err = run("a\tb\nc\n".as_bytes(), &mut out, &HarnessConfig::default()).unwrap_err();
        match err {
            HarnessError::Row { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected {other}"),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn empty_input_writes_nothing() {
        assert_eq!(run_to_string("\n\n", &HarnessConfig::default()), "");
    }
}
