//! Criterion micro-benchmarks for the CPU-bound search paths.
//!
//! Run all:     `cargo bench`
//! Run subset:  `cargo bench -- distance`
//! Save baseline: `cargo bench -- --save-baseline base`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nanoivf::index::distance::{cosine_similarity, inner_product, l2_distance, score};
use nanoivf::index::{FlatIndex, IvfFlatIndex, KMeans, KMeansParams, SmallestK};
use nanoivf::types::MetricType;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn random_vectors(n: usize, dim: usize) -> Vec<Vec<f32>> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect()
}

fn random_vector(dim: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn build_flat(vectors: &[Vec<f32>], dim: usize) -> FlatIndex {
    let mut flat = FlatIndex::new(vectors.len(), dim);
    flat.batch_add(vectors).unwrap();
    flat
}

// ---------------------------------------------------------------------------
// 1. Distance benchmarks
// ---------------------------------------------------------------------------

fn bench_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance");

    for &dim in &[32, 128, 256, 768, 1536] {
        let a = random_vector(dim);
        let b = random_vector(dim);

        group.throughput(Throughput::Elements(dim as u64));

        group.bench_with_input(BenchmarkId::new("l2", dim), &dim, |bench, _| {
            bench.iter(|| l2_distance(black_box(&a), black_box(&b)));
        });

        group.bench_with_input(BenchmarkId::new("cosine", dim), &dim, |bench, _| {
            bench.iter(|| cosine_similarity(black_box(&a), black_box(&b)));
        });

        group.bench_with_input(BenchmarkId::new("inner_product", dim), &dim, |bench, _| {
            bench.iter(|| inner_product(black_box(&a), black_box(&b)));
        });

        group.bench_with_input(BenchmarkId::new("dispatch", dim), &dim, |bench, _| {
            bench.iter(|| score(black_box(&a), black_box(&b), MetricType::L2));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// 2. Top-k selection benchmarks
// ---------------------------------------------------------------------------

fn bench_topk(c: &mut Criterion) {
    let mut group = c.benchmark_group("topk");
    let n = 100_000;
    let scores: Vec<f32> = random_vector(n);

    for &k in &[1, 10, 100, 1000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("smallest_k", k), &k, |bench, &k| {
            bench.iter(|| {
                let mut heap = SmallestK::new(k).unwrap();
                for (id, &s) in scores.iter().enumerate() {
                    heap.push(s, id);
                }
                black_box(heap.len())
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// 3. Flat search benchmarks
// ---------------------------------------------------------------------------

fn bench_flat_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat_search");
    group.sample_size(20);
    let dim = 128;

    for &n in &[1_000, 10_000, 50_000] {
        let flat = build_flat(&random_vectors(n, dim), dim);
        let query = random_vector(dim);

        group.throughput(Throughput::Elements(n as u64));
        for metric in [MetricType::L2, MetricType::InnerProduct, MetricType::Cosine] {
            group.bench_with_input(
                BenchmarkId::new(metric.to_string(), n),
                &n,
                |bench, _| {
                    bench.iter(|| flat.search(black_box(&query), 10, metric).unwrap());
                },
            );
        }
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// 4. k-means training benchmarks
// ---------------------------------------------------------------------------

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");
    group.sample_size(10);
    let dim = 64;
    let n = 5_000;
    let vectors = random_vectors(n, dim);
    let refs: Vec<&[f32]> = vectors.iter().map(Vec::as_slice).collect();

    for &nlist in &[16, 64, 256] {
        let kmeans = KMeans::new(KMeansParams::new(nlist, 10, 0.01));
        group.bench_with_input(BenchmarkId::new("train", nlist), &nlist, |bench, _| {
            bench.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                kmeans.train(black_box(&refs), dim, &mut rng).unwrap()
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// 5. IVF-Flat search benchmarks
// ---------------------------------------------------------------------------

fn bench_ivf_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("ivf_search");
    group.sample_size(20);
    let dim = 128;
    let n = 20_000;
    let nlist = 64;
    let vectors = random_vectors(n, dim);
    let mut rng = StdRng::seed_from_u64(7);
    let index = IvfFlatIndex::train(
        build_flat(&vectors, dim),
        KMeansParams::new(nlist, 10, 0.01),
        &mut rng,
    )
    .unwrap();
    let query = random_vector(dim);

    for &nprobe in &[1, 4, 16, 64] {
        group.bench_with_input(BenchmarkId::new("nprobe", nprobe), &nprobe, |bench, &nprobe| {
            bench.iter(|| index.search(black_box(&query), 10, nprobe).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_distance,
    bench_topk,
    bench_flat_search,
    bench_kmeans,
    bench_ivf_search
);
criterion_main!(benches);
