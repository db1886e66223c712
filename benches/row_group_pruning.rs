use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sieve::{
    ColumnChunkMetaData, ColumnStatistics, Expr, HistogramEntry, Pruner, RowGroupMetaData,
    StatisticsOpts,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn create_row_groups(groups: usize, rows_per_group: u64) -> Vec<RowGroupMetaData> {
    let schema = Schema::new(vec![Field::new("id", DataType::Int64, false)]);
    let opts = StatisticsOpts::builder()
        .histogram("id", HistogramEntry::new(0.0, (groups as f64) * 1000.0, 64).unwrap())
        .build(&schema)
        .unwrap();

    (0..groups)
        .map(|g| {
            let base = g as i64 * 1000;
            let mut stats = ColumnStatistics::<i64>::new(opts.column("id"));
            for row in 0..rows_per_group as i64 {
                stats.update(base + row);
            }
            RowGroupMetaData::new(
                rows_per_group,
                vec![ColumnChunkMetaData::new("id", stats.into())],
            )
        })
        .collect()
}

// ============================================================================
// Benchmarks: Scalability
// ============================================================================

fn bench_scalability(c: &mut Criterion) {
    let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
    let pruner = Pruner::try_new(schema).unwrap();

    let mut group = c.benchmark_group("scalability");
    for groups in [10usize, 100, 1000, 10000] {
        let row_groups = create_row_groups(groups, 100);
        let point = Expr::eq("id", (groups as i64 / 2) * 1000 + 5);

        group.throughput(Throughput::Elements(groups as u64));
        group.bench_with_input(
            BenchmarkId::new("point_lookup", groups),
            &row_groups,
            |b, row_groups| {
                b.iter(|| black_box(pruner.prune(row_groups, &point).unwrap()));
            },
        );
    }
    group.finish();
}

// ============================================================================
// Benchmarks: Predicate Shapes
// ============================================================================

fn bench_predicate_shapes(c: &mut Criterion) {
    let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
    let pruner = Pruner::try_new(schema).unwrap();
    let row_groups = create_row_groups(1000, 100);

    let range = Expr::and(vec![
        Expr::gt("id", 500_000i64),
        Expr::lt("id", 500_050i64),
    ]);
    let disjunction = Expr::or(vec![
        Expr::eq("id", 1_005i64),
        Expr::eq("id", 500_005i64),
        Expr::eq("id", 999_005i64),
    ]);
    let negated = Expr::not(Expr::between("id", 0i64, 900_000i64, true));

    let mut group = c.benchmark_group("predicate_shapes");
    for (name, predicate) in [
        ("range", &range),
        ("disjunction", &disjunction),
        ("negated", &negated),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(pruner.prune(&row_groups, predicate).unwrap()));
        });
    }
    group.finish();
}

// ============================================================================
// Benchmarks: Statistics Collection
// ============================================================================

fn bench_statistics_update(c: &mut Criterion) {
    let schema = Schema::new(vec![Field::new("id", DataType::Int64, false)]);
    let opts = StatisticsOpts::builder()
        .histogram("id", HistogramEntry::new(0.0, 100_000.0, 64).unwrap())
        .build(&schema)
        .unwrap();

    let mut group = c.benchmark_group("statistics_update");
    group.throughput(Throughput::Elements(100_000));
    group.bench_function("min_max_only", |b| {
        b.iter(|| {
            let mut stats = ColumnStatistics::<i64>::new(None);
            for v in 0..100_000i64 {
                stats.update(black_box(v));
            }
            black_box(stats)
        });
    });
    group.bench_function("with_histogram", |b| {
        b.iter(|| {
            let mut stats = ColumnStatistics::<i64>::new(opts.column("id"));
            for v in 0..100_000i64 {
                stats.update(black_box(v));
            }
            black_box(stats)
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_scalability,
    bench_predicate_shapes,
    bench_statistics_update
);
criterion_main!(benches);
