//! Benchmarks for the layout packer.
//!
//! Run with: cargo bench -p gridpack-table

use std::hint::black_box;
use std::io;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gridpack_table::{Column, Orientation, PackOptions, Table, TableSpec};
use gridpack_text::{Alignment, WidthEngine};

// =============================================================================
// Test Data
// =============================================================================

/// Rows of (size, name) as a long `ls -s` would produce.
fn listing(count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|i| {
            let name = match i % 4 {
                0 => format!("module_{i}.rs"),
                1 => format!("\x1b[1;34mdir{i}\x1b[0m"),
                2 => format!("いしざき{i}.png"),
                _ => format!("x{i}"),
            };
            vec![(i * 37 % 10_000).to_string(), name]
        })
        .collect()
}

fn table_for(rows: &[Vec<String>]) -> Table<[String]> {
    let spec = TableSpec::new()
        .with_column(
            Column::from_fn("size", |row: &[String]| row[0].clone())
                .with_alignment(Alignment::Right),
        )
        .and_then(|spec| spec.with_column(Column::from_fn("name", |row: &[String]| row[1].clone())))
        .expect("distinct column names");
    let mut table = Table::new(spec, Arc::new(WidthEngine::default()));
    for row in rows {
        table.record_cells(row).expect("two cells per row");
    }
    table
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack");

    for count in [50, 500, 5000] {
        let rows = listing(count);
        let table = table_for(&rows);
        group.throughput(Throughput::Elements(count as u64));

        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            for compact in [false, true] {
                let options = PackOptions::new(160).compact(compact);
                let id = format!("{orientation}/{}", if compact { "compact" } else { "plain" });
                group.bench_with_input(BenchmarkId::new(id, count), &rows, |b, rows| {
                    b.iter(|| {
                        table
                            .merge_rows(orientation, &mut io::sink(), rows, &options)
                            .expect("sink accepts everything")
                    })
                });
            }
        }
    }

    group.finish();
}

fn bench_format_item(c: &mut Criterion) {
    let rows = listing(1000);
    c.bench_function("format_item/1000", |b| {
        b.iter(|| {
            let mut table = table_for(&[]);
            for row in &rows {
                black_box(table.format_item(row.as_slice()).expect("getters never fail"));
            }
        })
    });
}

criterion_group!(benches, bench_pack, bench_format_item);
criterion_main!(benches);
