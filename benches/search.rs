//! Insert and search benchmarks for the memory engine.
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench search
//! cargo bench --bench search -- "search"  # specific group
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recalldb::prelude::*;

const DIMENSION: usize = 128;

/// Pre-generate vectors to keep allocation out of timed loops.
fn pregenerate_vectors(count: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (0..DIMENSION).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect()
}

fn populated_db(vectors: &[Vec<f32>]) -> VectorDb {
    let db = VectorDb::builder()
        .dimension(DIMENSION)
        .metric(DistanceMetric::Cosine)
        .open()
        .unwrap();
    for (i, vector) in vectors.iter().enumerate() {
        db.insert(VectorRecord::new(format!("v{:06}", i), vector.clone()))
            .unwrap();
    }
    db
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.throughput(Throughput::Elements(1));

    group.bench_function("single", |b| {
        let vectors = pregenerate_vectors(1, 7);
        let mut i = 0u64;
        let db = VectorDb::builder().dimension(DIMENSION).open().unwrap();
        b.iter(|| {
            i += 1;
            db.insert(VectorRecord::new(format!("k{}", i), vectors[0].clone()))
                .unwrap();
        });
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [100usize, 1_000, 10_000] {
        let vectors = pregenerate_vectors(size, 42);
        let db = populated_db(&vectors);
        let query = vectors[0].clone();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("linear_scan", size), &size, |b, _| {
            b.iter(|| {
                let results = db
                    .search(&SearchOptions::new(black_box(query.clone())).limit(10))
                    .unwrap();
                black_box(results);
            });
        });
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    let vectors = pregenerate_vectors(1_000, 42);
    let db = populated_db(&vectors);

    // warm the cache for the hot key
    db.get("v000000").unwrap();
    group.bench_function("hot_key", |b| {
        b.iter(|| {
            black_box(db.get(black_box("v000000")).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_get);
criterion_main!(benches);
