//! Benchmarks for row operation performance.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rowgrid::{ColumnSpec, GridConfig, GridCore, InsertSpec, MemoryBridge, Record};

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("name", "Name"),
        ColumnSpec::new("qty", "Qty"),
        ColumnSpec::checkbox("active", "Active"),
    ]
}

fn empty_grid() -> GridCore<MemoryBridge> {
    let columns = columns();
    let bridge = MemoryBridge::new(&columns);
    let mut config = GridConfig::new(columns);
    config.init_rows = 0;
    GridCore::new(config, bridge).expect("grid should build")
}

fn records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let mut record = Record::new();
            record.insert("name".to_string(), format!("row {i}").into());
            record.insert("qty".to_string(), i.to_string().into());
            record.insert("active".to_string(), (i % 2).into());
            record
        })
        .collect()
}

/// Benchmark appending blank rows one at a time
fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_blank");
    for &count in &[10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut grid = empty_grid();
                for _ in 0..count {
                    grid.insert_rows(InsertSpec::Blank(1), None, None).unwrap();
                }
                black_box(grid.row_count())
            })
        });
    }
    group.finish();
}

/// Benchmark front insertion, the resync-heavy path
fn bench_front_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("front_insert");
    for &count in &[10usize, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut grid = empty_grid();
                for _ in 0..count {
                    grid.insert_rows(InsertSpec::Blank(1), Some(0), None).unwrap();
                }
                black_box(grid.row_count())
            })
        });
    }
    group.finish();
}

/// Benchmark bulk-loading records
fn bench_load_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_data");
    for &count in &[100usize, 1000] {
        let batch = records(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &batch, |b, batch| {
            b.iter(|| {
                let mut grid = empty_grid();
                grid.load_data(black_box(batch.clone())).unwrap();
                black_box(grid.row_count())
            })
        });
    }
    group.finish();
}

/// Benchmark moving a row from top to bottom via repeated swaps
fn bench_move_down(c: &mut Criterion) {
    c.bench_function("move_down_through_100", |b| {
        let mut grid = empty_grid();
        grid.insert_rows(InsertSpec::Blank(100), None, None).unwrap();
        let first = grid.id_at(0).unwrap();
        b.iter(|| {
            for _ in 0..99 {
                grid.move_down_row(None, Some(first)).unwrap();
            }
            for _ in 0..99 {
                grid.move_up_row(None, Some(first)).unwrap();
            }
            black_box(grid.position_of(first))
        })
    });
}

criterion_group!(
    benches,
    bench_append,
    bench_front_insert,
    bench_load_data,
    bench_move_down
);
criterion_main!(benches);
