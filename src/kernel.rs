//! NumericKernel: sliding dot product, sliding mean/std, and the
//! z-normalized distance formula every other module is built on.
//!
//! ### Why FFT-seeded, then O(1) rolled
//!
//! A single sliding dot product of a length-`m` query against a length-`n`
//! series costs `O(n log n)` via FFT convolution. The distance-matrix
//! builder needs one such row *per subsequence position* — naively that is
//! `O(n^2 log n)`. Instead, each worker bin seeds its first row with one FFT
//! call and then *rolls* the dot product forward one position at a time in
//! `O(n)` per row (`roll_dot_product`), using the identity that shifting the
//! query by one sample only changes two terms of every inner product. That
//! brings the whole distance-matrix build down to `O(n^2)`, dominated by the
//! rows themselves rather than by repeated transforms.
//!
//! The roll identity only holds when the query at the new offset is exactly
//! the previous offset's window shifted by one — i.e. within a single
//! worker's contiguous bin. The first row of every bin is always reseeded
//! via FFT.

use realfft::num_complex::Complex;
use realfft::RealFftPlanner;

/// Below this window length the FFT setup cost dominates the direct
/// `O(n*m)` computation; just do the sums by hand. Matches the "fall back to
/// direct computation only for tiny inputs" guidance.
const DIRECT_FALLBACK_THRESHOLD: usize = 32;

/// `sigma` values below this are floored to `1.0`. Policy (not an error):
/// keeps near-constant regions from producing exploding distances.
pub const STD_FLOOR_THRESHOLD: f32 = 0.1;

/// Sliding dot product of `query` (length `m`) against `series` (length
/// `n >= m`): `out[i] = sum_t query[t] * series[i+t]`, for `i` in
/// `0..=n-m`.
pub fn sliding_dot_product(query: &[f32], series: &[f32]) -> Vec<f32> {
    let m = query.len();
    let n = series.len();
    debug_assert!(m <= n);

    if m <= DIRECT_FALLBACK_THRESHOLD {
        return direct_dot_product(query, series);
    }

    // Mirror the even-length padding of the reference FFT convolution: an
    // odd-length series/query is zero-extended by one sample so that both
    // operands share an even transform length.
    let mut ts = series.to_vec();
    let ts_add = if n % 2 == 1 {
        ts.insert(0, 0.0);
        1
    } else {
        0
    };

    let mut q = query.to_vec();
    let q_add = if m % 2 == 1 {
        q.insert(0, 0.0);
        1
    } else {
        0
    };
    q.reverse();

    let total_len = ts.len();
    q.resize(total_len, 0.0);

    let product = fft_convolve(&ts, &q, total_len);

    let trim = m - 1 + ts_add;
    product[trim..].to_vec()
}

/// Direct `O(n*m)` sliding dot product, hand-unrolled 8-wide to match the
/// widest common SIMD lane width, with the remainder handled by safe,
/// bounds-checked code.
fn direct_dot_product(query: &[f32], series: &[f32]) -> Vec<f32> {
    let m = query.len();
    let n = series.len();
    let out_len = n - m + 1;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        out.push(dot_product_unrolled(query, &series[i..i + m]));
    }
    out
}

/// Hand-unrolled dot product of two equal-length slices.
///
/// # Safety
/// The unrolled loop only ever accesses indices `< chunks * 8 <= a.len()`.
/// `chunks = a.len() / 8`, so `chunks * 8 <= a.len()` always holds; the
/// `get_unchecked` calls below are bounds-safe by that arithmetic alone, not
/// by any external invariant.
#[inline]
fn dot_product_unrolled(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let len = a.len();
    let chunks = len / 8;

    let mut acc = [0.0f32; 8];
    // SAFETY: base + 7 < chunks * 8 <= len for every i in 0..chunks.
    unsafe {
        for i in 0..chunks {
            let base = i * 8;
            for lane in 0..8 {
                *acc.get_unchecked_mut(lane) +=
                    a.get_unchecked(base + lane) * b.get_unchecked(base + lane);
            }
        }
    }
    let mut result: f32 = acc.iter().sum();
    for i in (chunks * 8)..len {
        result += a[i] * b[i];
    }
    result
}

/// `O(1)`-per-entry roll of a sliding dot product row from offset
/// `order - 1` to `order`, given the full channel series `x` (length `n`,
/// where `n = N + m - 1` is the raw sample count) and the precomputed
/// "seed" row `dot_first[order]` (the dot product of the offset-0 window
/// against position `order`), which corrects the one entry the rotation
/// trick cannot otherwise produce.
pub fn roll_dot_product(
    prev_row: &[f32],
    x: &[f32],
    order: usize,
    m: usize,
    dot_first_at_order: f32,
) -> Vec<f32> {
    let n = prev_row.len();
    let mut out = vec![0.0f32; n];
    for j in 0..n {
        let prev_idx = if j == 0 { n - 1 } else { j - 1 };
        let add = x[order + m - 1] * x[j + m - 1];
        let sub = x[order - 1] * x[prev_idx];
        out[j] = prev_row[prev_idx] + add - sub;
    }
    out[0] = dot_first_at_order;
    out
}

/// Sliding mean and (floored) standard deviation of `ts` over windows of
/// length `m`, computed in one pass via prefix sums. Returns
/// `(mean, std)`, each of length `n - m + 1`.
pub fn sliding_mean_std(ts: &[f32], m: usize) -> (Vec<f32>, Vec<f32>) {
    let n = ts.len();
    let count = n - m + 1;

    let mut prefix_sum = vec![0.0f64; n + 1];
    let mut prefix_sum_sq = vec![0.0f64; n + 1];
    for i in 0..n {
        prefix_sum[i + 1] = prefix_sum[i] + ts[i] as f64;
        prefix_sum_sq[i + 1] = prefix_sum_sq[i] + (ts[i] as f64) * (ts[i] as f64);
    }

    let mut mean = Vec::with_capacity(count);
    let mut std = Vec::with_capacity(count);
    let m64 = m as f64;
    for i in 0..count {
        let seg_sum = prefix_sum[i + m] - prefix_sum[i];
        let seg_sum_sq = prefix_sum_sq[i + m] - prefix_sum_sq[i];
        let mu = seg_sum / m64;
        let var = (seg_sum_sq / m64 - mu * mu).max(0.0);
        let mut sigma = var.sqrt();
        if sigma.abs() < STD_FLOOR_THRESHOLD as f64 {
            sigma = 1.0;
        }
        mean.push(mu as f32);
        std.push(sigma as f32);
    }
    (mean, std)
}

/// Squared z-normalized Euclidean distance row from a raw dot-product row,
/// given the mean/std pair and the reference position `order`. Does not
/// apply the exclusion zone or the self-distance fixup — that's the
/// distance-matrix builder's job (it owns the `+inf`/`0` bookkeeping).
pub fn z_normalized_distance_row(
    dot_row: &[f32],
    mean: &[f32],
    std: &[f32],
    order: usize,
    m: usize,
) -> Vec<f32> {
    let m_f = m as f32;
    let mu_o = mean[order];
    let sigma_o = std[order];
    dot_row
        .iter()
        .zip(mean.iter())
        .zip(std.iter())
        .map(|((&y, &mu_j), &sigma_j)| {
            let raw = 2.0 * m_f * (1.0 - (y - m_f * mu_o * mu_j) / (m_f * sigma_o * sigma_j));
            raw.max(0.0)
        })
        .collect()
}

/// Real-valued linear convolution of two equal-length (`len`) signals via
/// FFT: `out[t] = sum_i a[i] * b[t-i]`. `len` need not be a power of two —
/// `realfft` plans a mixed-radix transform for whatever length it's given.
fn fft_convolve(a: &[f32], b: &[f32], len: usize) -> Vec<f32> {
    let mut planner = RealFftPlanner::<f32>::new();
    let r2c = planner.plan_fft_forward(len);
    let c2r = planner.plan_fft_inverse(len);

    let mut a_in = a.to_vec();
    let mut b_in = b.to_vec();
    let mut a_spec = r2c.make_output_vec();
    let mut b_spec = r2c.make_output_vec();
    r2c.process(&mut a_in, &mut a_spec).expect("fft forward (a)");
    r2c.process(&mut b_in, &mut b_spec).expect("fft forward (b)");

    let mut prod: Vec<Complex<f32>> = a_spec
        .iter()
        .zip(b_spec.iter())
        .map(|(x, y)| x * y)
        .collect();

    let mut out = c2r.make_output_vec();
    c2r.process(&mut prod, &mut out).expect("fft inverse");
    let scale = 1.0 / len as f32;
    for v in out.iter_mut() {
        *v *= scale;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_sliding_dot(query: &[f32], series: &[f32]) -> Vec<f32> {
        let m = query.len();
        let n = series.len();
        (0..=n - m)
            .map(|i| {
                query
                    .iter()
                    .zip(&series[i..i + m])
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect()
    }

    #[test]
    fn sliding_dot_product_matches_naive_small() {
        let series: Vec<f32> = (0..20).map(|i| (i as f32 * 0.37).sin()).collect();
        let query = series[3..8].to_vec();
        let got = sliding_dot_product(&query, &series);
        let expected = naive_sliding_dot(&query, &series);
        assert_eq!(got.len(), expected.len());
        for (g, e) in got.iter().zip(expected.iter()) {
            assert!((g - e).abs() < 1e-3, "got {g}, expected {e}");
        }
    }

    #[test]
    fn sliding_dot_product_matches_naive_large_uses_fft_path() {
        let series: Vec<f32> = (0..300).map(|i| (i as f32 * 0.05).cos()).collect();
        let m = 50;
        let query = series[10..10 + m].to_vec();
        let got = sliding_dot_product(&query, &series);
        let expected = naive_sliding_dot(&query, &series);
        assert_eq!(got.len(), expected.len());
        for (g, e) in got.iter().zip(expected.iter()) {
            assert!((g - e).abs() < 1e-1, "got {g}, expected {e}");
        }
    }

    #[test]
    fn roll_dot_product_matches_direct_recompute() {
        let series: Vec<f32> = (0..40).map(|i| (i as f32 * 0.2).sin()).collect();
        let m = 6;
        let n = series.len() - m + 1;
        let dot_first = sliding_dot_product(&series[0..m], &series);

        let order0 = 3usize;
        let row_prev = sliding_dot_product(&series[order0..order0 + m], &series);
        let order1 = order0 + 1;
        let rolled = roll_dot_product(&row_prev, &series, order1, m, dot_first[order1]);
        let direct = sliding_dot_product(&series[order1..order1 + m], &series);

        assert_eq!(rolled.len(), n);
        for (g, e) in rolled.iter().zip(direct.iter()) {
            assert!((g - e).abs() < 1e-2, "got {g}, expected {e}");
        }
    }

    #[test]
    fn sliding_mean_std_matches_naive() {
        let ts: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let m = 3;
        let (mean, std) = sliding_mean_std(&ts, m);
        assert_eq!(mean.len(), ts.len() - m + 1);
        for (i, (&mu, &sigma)) in mean.iter().zip(std.iter()).enumerate() {
            let window = &ts[i..i + m];
            let expected_mu = window.iter().sum::<f32>() / m as f32;
            let var = window.iter().map(|v| (v - expected_mu).powi(2)).sum::<f32>() / m as f32;
            assert!((mu - expected_mu).abs() < 1e-4);
            assert!((sigma - var.sqrt()).abs() < 1e-3);
        }
    }

    #[test]
    fn sliding_std_floors_near_constant_region() {
        let ts = vec![5.0f32; 10];
        let (_, std) = sliding_mean_std(&ts, 4);
        assert!(std.iter().all(|&s| s == 1.0));
    }
}
