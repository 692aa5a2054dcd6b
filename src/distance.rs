//! DistanceMatrixBuilder: constructs the per-channel `(d, N, N)` z-normed ED
//! matrices and the `(d, N, K)` non-overlapping k-NN table.
//!
//! ### Parallelism
//!
//! Offsets `[0, N)` are split into `P` contiguous bins (`P` = the rayon
//! global thread pool's width). Each bin is handed a disjoint, mutable
//! `(channel, row-range)` view of the backing `DistanceMatrix`/`KnnTable`
//! buffers (`DistanceMatrix::bin_views`) and runs independently — no bin
//! writes outside its own offset range, so no locking is needed. Within a
//! bin the channel loop is sequential: for `sum_dims` mode this is load
//! bearing, not an accident — floating-point summation order must stay
//! fixed for the build to be bit-reproducible (spec's determinism-under-
//! parallelism note).

use log::{debug, trace};
use rayon::prelude::*;

use crate::kernel::{roll_dot_product, sliding_dot_product, sliding_mean_std, z_normalized_distance_row};
use crate::types::{DistanceMatrix, KnnTable, TimeSeries};

/// `build(ts, m, K, slack, sum_dims)` from spec §4.2.
pub fn build(
    ts: &TimeSeries,
    m: usize,
    k: usize,
    slack: f64,
    sum_dims: bool,
) -> (DistanceMatrix, KnnTable) {
    let n = ts.subseq_count(m);
    let out_dims = if sum_dims { 1 } else { ts.d() };
    let mut d = DistanceMatrix::new(out_dims, n);
    let mut knns = KnnTable::new(out_dims, n, k);

    let halve_m = (m as f64 * slack) as usize;

    // Per-channel sliding mean/std/seed-row, computed once, sequentially —
    // cheap (O(n) and O(n log n) respectively) relative to the O(n^2) row
    // computation that follows, and every bin needs all of it.
    let mut means = Vec::with_capacity(ts.d());
    let mut stds = Vec::with_capacity(ts.d());
    let mut dot_first = Vec::with_capacity(ts.d());
    for c in 0..ts.d() {
        let channel = ts.channel(c);
        let (mean, std) = sliding_mean_std(channel, m);
        let seed = sliding_dot_product(&channel[0..m], channel);
        means.push(mean);
        stds.push(std);
        dot_first.push(seed);
    }

    let num_workers = rayon::current_num_threads().max(1);
    let rows_per_bin = (n + num_workers - 1) / num_workers;
    debug!(
        "distance matrix build: d={}, n={}, m={}, k={}, sum_dims={}, bins={}, rows_per_bin={}",
        ts.d(),
        n,
        m,
        k,
        sum_dims,
        num_workers,
        rows_per_bin
    );

    let d_bins = d.bin_views(rows_per_bin);
    let knn_bins = knns.bin_views(rows_per_bin);

    d_bins
        .into_par_iter()
        .zip(knn_bins.into_par_iter())
        .enumerate()
        .for_each(|(bin_idx, (mut d_chans, mut knn_chans))| {
            let start = bin_idx * rows_per_bin;
            let end = (start + rows_per_bin).min(n);
            if start >= end {
                return;
            }
            trace!("bin {bin_idx}: offsets [{start}, {end})");

            // Channel loop is sequential within the bin: see module docs.
            for c in 0..ts.d() {
                let channel = ts.channel(c);
                let out_c = if sum_dims { 0 } else { c };

                let mut dot_prev: Option<Vec<f32>> = None;
                for order in start..end {
                    let dot_row = match &dot_prev {
                        None => sliding_dot_product(&channel[order..order + m], channel),
                        Some(prev) => roll_dot_product(prev, channel, order, m, dot_first[c][order]),
                    };

                    let mut dist_row =
                        z_normalized_distance_row(&dot_row, &means[c], &stds[c], order, m);
                    apply_exclusion_zone(&mut dist_row, order, halve_m, n);

                    let out_row = &mut d_chans[out_c][(order - start) * n..(order - start + 1) * n];
                    if sum_dims {
                        for (acc, v) in out_row.iter_mut().zip(dist_row.iter()) {
                            *acc += v;
                        }
                    } else {
                        out_row.copy_from_slice(&dist_row);
                    }

                    dot_prev = Some(dot_row);
                }
            }

            // Build k-NN lists from the rows just written. For sum_dims mode
            // there's a single logical channel.
            for out_c in 0..d_chans.len() {
                for order in start..end {
                    let row = &d_chans[out_c][(order - start) * n..(order - start + 1) * n];
                    let knn = argknn(row, k, m, slack, f32::INFINITY);
                    let knn_row = &mut knn_chans[out_c][(order - start) * k..(order - start + 1) * k];
                    knn_row.copy_from_slice(&knn);
                }
            }
        });

    (d, knns)
}

/// Sets the trivial-match exclusion band `[order-halve_m, order+halve_m)` to
/// `+inf`, then restores the self-distance `dist_row[order] = 0`.
fn apply_exclusion_zone(dist_row: &mut [f32], order: usize, halve_m: usize, n: usize) {
    let lo = order.saturating_sub(halve_m);
    let hi = (order + halve_m).min(n);
    for v in &mut dist_row[lo..hi] {
        *v = f32::INFINITY;
    }
    dist_row[order] = 0.0;
}

/// Non-overlapping k-NN selection (`argknn`, spec §4.2.1): up to `k`
/// ascending-distance indices from `row`, pairwise non-overlapping under the
/// `halve_m`-radius exclusion zone, `-1`-padded. `bound` enables admissible
/// pruning — candidates strictly above it are rejected.
pub fn argknn(row: &[f32], k: usize, m: usize, slack: f64, bound: f32) -> Vec<i32> {
    let n = row.len();
    let halve_m = (m as f64 * slack) as usize;
    let mut dists = row.to_vec();

    let pool_size = (2 * k).min(n);
    let mut pool: Vec<usize> = (0..n).collect();
    if pool_size > 0 && pool_size < n {
        pool.select_nth_unstable_by(pool_size - 1, |&a, &b| {
            dists[a].partial_cmp(&dists[b]).unwrap_or(std::cmp::Ordering::Equal)
        });
    }
    pool.truncate(pool_size);

    // Frozen extraction order: selection order is fixed by the *original*
    // row values, never re-derived from `dists` after blackening starts —
    // only the accept/reject test looks at the live (blackened) values.
    let mut order_vals: Vec<f32> = pool.iter().map(|&i| dists[i]).collect();

    let mut accepted: Vec<i32> = Vec::with_capacity(k);

    for _ in 0..pool.len() {
        if accepted.len() == k {
            break;
        }
        let (p, _) = order_vals
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .expect("pool is non-empty");
        let pos = pool[p];
        order_vals[p] = f32::INFINITY;

        let v = dists[pos];
        if v.is_finite() && v <= bound {
            accepted.push(pos as i32);
            blacken(&mut dists, pos, halve_m, n);
        }
    }

    while accepted.len() < k {
        let next = dists
            .iter()
            .enumerate()
            .filter(|(_, &v)| v.is_finite() && v <= bound)
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i);
        match next {
            Some(pos) => {
                accepted.push(pos as i32);
                blacken(&mut dists, pos, halve_m, n);
            }
            None => break,
        }
    }

    accepted.resize(k, -1);
    accepted
}

fn blacken(dists: &mut [f32], center: usize, halve_m: usize, n: usize) {
    let lo = center.saturating_sub(halve_m);
    let hi = (center + halve_m).min(n);
    for v in &mut dists[lo..hi] {
        *v = f32::INFINITY;
    }
}
