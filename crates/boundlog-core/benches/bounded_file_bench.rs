//! Benchmarks for bounded file operations
//!
//! Run with: cargo bench -p boundlog-core
//!
//! These benchmarks establish performance baselines for:
//! - Appending formatted records
//! - Trimming files of various sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use boundlog_core::{BoundedFile, FileLogging, RecordFormat};
use tempfile::TempDir;

// ============================================================================
// Append Benchmarks
// ============================================================================

fn bench_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("log");

    for format in [RecordFormat::Plain, RecordFormat::Json] {
        let temp = TempDir::new().unwrap();
        let logging = FileLogging::builder(temp.path().join("bench.log"))
            .format(format)
            .open()
            .unwrap();
        let mut logger = logging.handler("bench");
        logger.set_metadata("request", "42");

        group.bench_function(BenchmarkId::from_parameter(format!("{:?}", format)), |b| {
            b.iter(|| logger.error(black_box("Benchmark message")))
        });
    }

    group.finish();
}

// ============================================================================
// Truncate Benchmarks
// ============================================================================

fn bench_truncate(c: &mut Criterion) {
    let mut group = c.benchmark_group("truncate");

    for lines in [100usize, 2_000, 20_000] {
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, &lines| {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("bench.log");
            let content = "2026-10-16T09:30:45+0200 info bench : Benchmark message\n".repeat(lines);

            b.iter_batched(
                || {
                    std::fs::write(&path, &content).unwrap();
                    BoundedFile::open(&path, lines + 1).unwrap()
                },
                |file| black_box(file.truncate_to_last(lines / 2).unwrap()),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_log, bench_truncate);
criterion_main!(benches);
