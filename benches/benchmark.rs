//! Run with:
//! ```bash
//! RUSTFLAGS="-C target-cpu=native" cargo bench --bench benchmark
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use motiflets::{compute_distance_matrix, search_k_motiflets_elbow, SweepConfig, TimeSeries};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Fixed RNG seed for reproducible benchmarks.
const SEED: u64 = 0xDEAD_BEEF_CAFE_BABE;

/// Build a `d`-channel series of length `n`: a period-`period` sine pattern
/// plus noise, so the distance matrix has real structure to chew on rather
/// than pure noise (which degenerates every k-NN list to `-1`).
fn synthetic_series(d: usize, n: usize, period: usize, seed: u64) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let channels: Vec<Vec<f32>> = (0..d)
        .map(|c| {
            (0..n)
                .map(|i| {
                    let phase = c as f32 * 0.3;
                    (((i % period) as f32 / period as f32) * std::f32::consts::TAU + phase).sin()
                        + rng.gen::<f32>() * 0.05
                })
                .collect()
        })
        .collect();
    TimeSeries::from_channels(channels).unwrap()
}

/// Measures `compute_distance_matrix`: the FFT-seeded, rolled, rayon-
/// parallel `(d, N, N)` tensor build that dominates the pipeline's cost.
fn bench_distance_matrix_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_matrix_build");
    for &n in &[256usize, 512, 1024] {
        let ts = synthetic_series(3, n, 22, SEED);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let (d, knns) = compute_distance_matrix(black_box(&ts), 30, 6, 0.5, false).unwrap();
                black_box((d, knns));
            });
        });
    }
    group.finish();
}

/// Measures the full k-sweep (distance build + per-k motiflet search +
/// elbow detection) at a fixed window length.
fn bench_k_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("k_sweep");
    for &n in &[256usize, 512] {
        let ts = synthetic_series(3, n, 22, SEED + 1);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let result =
                    search_k_motiflets_elbow(black_box(&ts), 30, 10, SweepConfig::default()).unwrap();
                black_box(result);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_distance_matrix_build, bench_k_sweep);
criterion_main!(benches);
