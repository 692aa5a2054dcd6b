//! OverlapFilter: drops elbow points whose motiflets substantially overlap
//! a larger elbow's motiflet (spec §4.8).

use crate::types::Motiflet;

/// Two motiflets overlap if at least half of the smaller one's positions
/// each land within `m/4` of some position in the larger one.
fn overlaps(smaller: &[usize], larger: &[usize], m: usize) -> bool {
    let threshold = m as f64 / 4.0;
    let mut count = 0usize;
    for &a in smaller {
        if larger.iter().any(|&b| ((a as isize - b as isize).unsigned_abs() as f64) < threshold) {
            count += 1;
        }
        if count as f64 >= smaller.len() as f64 / 2.0 {
            return true;
        }
    }
    false
}

/// Filters `elbows` (ascending `k`) to the subset whose motiflets are not
/// dominated by a larger elbow's overlapping motiflet. `candidates[k]` must
/// be indexable by every `k` in `elbows`.
pub fn filter_unique(elbows: &[usize], candidates: &[Option<Motiflet>], motif_length: usize) -> Vec<usize> {
    let mut kept = Vec::with_capacity(elbows.len());
    for (i, &k_i) in elbows.iter().enumerate() {
        let mut unique = true;
        for &k_j in &elbows[i + 1..] {
            if let (Some(a), Some(b)) = (&candidates[k_i], &candidates[k_j]) {
                if overlaps(&a.positions, &b.positions, motif_length) {
                    unique = false;
                    break;
                }
            }
        }
        if unique {
            kept.push(k_i);
        }
    }
    kept
}
