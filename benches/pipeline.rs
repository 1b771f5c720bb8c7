//! Benchmarks for the roster pipeline: sequential functions against the parallel engine.

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use roster_pipeline::execution::{CatalogEngine, ExecutionOptions};
use roster_pipeline::processing::{filter, sort, summarize, Criteria, SortDirection, SortKey};
use roster_pipeline::types::{ModelRecord, Pricing, RatingTier, Roster};
use std::hint::black_box;

fn synthetic_roster(n: usize) -> Roster {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let mut r = ModelRecord::new(format!("model_{i}"), RatingTier::ALL[i % 8], ts);
            r.pricing = Pricing::with_rate((i * 7 % 120) as f64);
            r.tags = vec![format!("tag{}", i % 13), format!("tag{}", i % 29)];
            r.recordings = (i * 31 % 200) as u64;
            r.prospect = i % 5 == 0;
            r.auto_record = i % 2 == 0;
            r
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let criteria = Criteria::new().with_tags(["tag3"]).with_min_recordings(20);
    let engine = CatalogEngine::new(ExecutionOptions::default()).unwrap();

    let mut group = c.benchmark_group("filter");
    for n in [1_000usize, 50_000] {
        let roster = synthetic_roster(n);
        group.bench_with_input(BenchmarkId::new("sequential", n), &roster, |b, roster| {
            b.iter(|| filter(black_box(roster), black_box(&criteria)))
        });
        group.bench_with_input(BenchmarkId::new("engine", n), &roster, |b, roster| {
            b.iter(|| engine.filter_parallel(black_box(roster), black_box(&criteria)))
        });
    }
    group.finish();
}

fn bench_summarize(c: &mut Criterion) {
    let engine = CatalogEngine::new(ExecutionOptions::default()).unwrap();

    let mut group = c.benchmark_group("summarize");
    for n in [1_000usize, 50_000] {
        let roster = synthetic_roster(n);
        group.bench_with_input(BenchmarkId::new("sequential", n), &roster, |b, roster| {
            b.iter(|| summarize(black_box(roster)))
        });
        group.bench_with_input(BenchmarkId::new("engine", n), &roster, |b, roster| {
            b.iter(|| engine.summarize_parallel(black_box(roster)))
        });
    }
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let roster = synthetic_roster(50_000);
    let mut group = c.benchmark_group("sort");
    for key in SortKey::ALL {
        group.bench_function(key.label(), |b| {
            b.iter(|| sort(black_box(&roster), key, SortDirection::Descending))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_filter, bench_summarize, bench_sort);
criterion_main!(benches);
