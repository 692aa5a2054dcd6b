//! DimensionSelector: ranks channels per reference position by how tight
//! that position's k-th non-overlapping neighbor is on each channel.
//!
//! Positions whose k-th neighbor is already close on a given channel are
//! plausible motiflet anchors on that channel — so §4.3 uses exactly that
//! distance as the ranking key.

use crate::types::{DistanceMatrix, KnnTable};

/// For every position `i`, the indices of the `u` channels with the
/// smallest `D[c, i, knn[c, i, k-1]]` — the reference's k-th neighbor
/// distance on channel `c`. Returned as one `Vec<usize>` of length `u` per
/// position (`Δ[i]` in spec notation).
pub fn compute_relevant_dimensions(
    d: &DistanceMatrix,
    knns: &KnnTable,
    k: usize,
    u: usize,
) -> Vec<Vec<usize>> {
    let n = d.n();
    let dims = d.dims();
    let u = u.min(dims);

    (0..n)
        .map(|i| {
            let mut ranked: Vec<(usize, f32)> = (0..dims)
                .map(|c| {
                    let kth = knns.row(c, i)[k - 1];
                    let dist = if kth >= 0 {
                        d.get(c, i, kth as usize)
                    } else {
                        f32::INFINITY
                    };
                    (c, dist)
                })
                .collect();
            ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
            ranked.into_iter().take(u).map(|(c, _)| c).collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::build;
    use crate::types::TimeSeries;

    #[test]
    fn tight_channels_are_ranked_before_loose_ones() {
        // Channel 0 and 2 repeat a clean pattern; channel 1 is near-random
        // noise, so its k-th neighbor distance should be larger everywhere.
        let clean = vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0];
        let noisy = vec![5.0, -3.0, 9.0, -7.0, 2.0, 8.0, -1.0, 4.0, -6.0, 0.5, 3.0, -9.0];
        let ts = TimeSeries::from_channels(vec![clean.clone(), noisy, clean]).unwrap();
        let m = 3;
        let k = 2;
        let (d, knns) = build(&ts, m, k, 0.5, false);
        let delta = compute_relevant_dimensions(&d, &knns, k, 2);
        for ranked in &delta {
            assert_eq!(ranked.len(), 2);
            assert!(
                ranked.contains(&0) && ranked.contains(&2),
                "expected clean channels {{0,2}} ranked ahead of noisy channel 1, got {ranked:?}"
            );
        }
    }
}
