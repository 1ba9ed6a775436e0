//! Benchmarks for the auto-size pass.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use autosize_grid::measure::TextMeasurer;
use autosize_grid::scanner::{ColumnContentScanner, ScanTarget};
use autosize_grid::telemetry::NoopTelemetry;
use autosize_grid::{
    AutoColumnSizer, AutoSizeOptions, Column, MemoryGrid, MonospaceSurface, Representation,
    RowRecord, SampleWindow,
};

fn make_rows(count: usize, cols: usize) -> Vec<RowRecord> {
    (0..count)
        .map(|r| {
            (0..cols)
                .map(|c| (format!("f{c}"), json!(format!("row {r} value {}", r * c % 97))))
                .collect()
        })
        .collect()
}

fn make_columns(cols: usize) -> Vec<Column> {
    (0..cols)
        .map(|c| {
            let col = Column::new(format!("c{c}"), format!("f{c}"));
            if c % 2 == 0 {
                col.with_formatter(|ctx| {
                    Ok(Representation::Markup(format!(
                        "<span class=\"v\">{}</span>",
                        ctx.value.as_str().unwrap_or_default()
                    )))
                })
            } else {
                col
            }
        })
        .collect()
}

/// Content scan alone, cold cache each iteration.
fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    for cols in [4usize, 16, 64] {
        let columns = make_columns(cols);
        let rows: Vec<Option<RowRecord>> = make_rows(50, cols).into_iter().map(Some).collect();
        let targets: Vec<ScanTarget<'_>> = columns
            .iter()
            .enumerate()
            .map(|(column_index, column)| ScanTarget {
                column_index,
                column,
            })
            .collect();
        let window = SampleWindow { start: 0, end: 50 };

        group.bench_with_input(BenchmarkId::from_parameter(cols), &cols, |b, _| {
            b.iter(|| {
                let mut surface = MonospaceSurface::new(7.0);
                let mut measurer = TextMeasurer::new();
                let report = ColumnContentScanner::new(&mut measurer, &NoopTelemetry, "bench")
                    .scan(&mut surface, black_box(&targets), window, &rows);
                black_box(report)
            })
        });
    }
    group.finish();
}

/// Full render-triggered pass on a fresh grid.
fn bench_auto_size(c: &mut Criterion) {
    let columns = make_columns(16);
    let rows = make_rows(500, 16);
    let sizer = AutoColumnSizer::new(AutoSizeOptions {
        auto_size_on_render: true,
        ..AutoSizeOptions::default()
    });
    sizer.init();

    c.bench_function("auto_size_16x500", |b| {
        b.iter(|| {
            let mut grid = MemoryGrid::new(columns.clone(), rows.clone(), 30);
            let mut surface = MonospaceSurface::new(7.0).with_cell_padding(8.0);
            black_box(sizer.on_post_render(&mut grid, &mut surface))
        })
    });
}

criterion_group!(benches, bench_scan, bench_auto_size);
criterion_main!(benches);
