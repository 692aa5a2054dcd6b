//! MotifletSearch: approximate k-motiflet discovery with admissible
//! pruning against a descending upper bound.
//!
//! Per spec §4.4, every reference offset `o` evaluates the same channel
//! subset `S = Δ[o]` — but the *candidate positions* come from a per-channel
//! k-NN list, `nn = κ[d, o, 0..k)`, and that list genuinely differs across
//! `d ∈ S` (κ is per-channel). So this loops over every `d ∈ Δ[o]`, sourcing
//! a fresh candidate-position list from each channel's k-NN row and scoring
//! each against the shared subset `S`, keeping the best over all of them.

use crate::types::{DistanceMatrix, KnnTable, Motiflet};

/// `approx_k_motiflet` (spec §4.4). `dims_by_pos` is `Δ` restricted to the
/// target `k` (i.e. `compute_relevant_dimensions(d, knns, k, u)`).
pub fn approx_k_motiflet(
    k: usize,
    d: &DistanceMatrix,
    knns: &KnnTable,
    dims_by_pos: &[Vec<usize>],
    upper_bound: f32,
) -> Option<Motiflet> {
    let n = d.n();
    let mut best_extent = upper_bound;
    let mut best: Option<Motiflet> = None;

    for o in 0..n {
        let s = &dims_by_pos[o];
        if s.is_empty() {
            continue;
        }

        for &anchor in s {
            let nn = knns.row(anchor, o);
            if nn.len() < k || nn[k - 1] < 0 {
                continue;
            }
            let kth = nn[k - 1] as usize;

            let mean_kth_dist: f32 = s.iter().map(|&c| d.get(c, o, kth)).sum::<f32>() / s.len() as f32;
            if mean_kth_dist > best_extent {
                continue; // admissible prune: the furthest neighbor already dominates U
            }

            let raw_positions = &nn[..k];
            let extent = pairwise_extent(d, raw_positions, s, best_extent);
            if extent <= best_extent {
                best_extent = extent;
                best = Some(Motiflet {
                    positions: raw_positions.iter().map(|&x| x as usize).collect(),
                    dims: s.clone(),
                    extent,
                });
            }
        }
    }

    best
}

/// `E(P, S) = max_{i<j} mean_{c in S} D[c, p_i, p_j]` (spec §4.4.1), with
/// early-exit pruning: as soon as the running max exceeds `upper_bound`, the
/// whole computation returns `+inf` without evaluating the remaining pairs.
/// Takes raw `i32` positions (the `KnnTable` row representation) so a `-1`
/// unfilled-neighbor sentinel anywhere in `positions` is honored directly,
/// per spec: such a candidate is never a valid motiflet.
pub fn pairwise_extent(d: &DistanceMatrix, positions: &[i32], dims: &[usize], upper_bound: f32) -> f32 {
    if positions.iter().any(|&p| p < 0) {
        return f32::INFINITY;
    }
    let mut extent = 0.0f32;
    let k = positions.len();
    for i in 0..k {
        for j in (i + 1)..k {
            let pi = positions[i] as usize;
            let pj = positions[j] as usize;
            let mean = dims.iter().map(|&c| d.get(c, pi, pj)).sum::<f32>() / dims.len() as f32;
            extent = extent.max(mean);
            if extent > upper_bound {
                return f32::INFINITY;
            }
        }
    }
    extent
}
