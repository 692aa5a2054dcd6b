//! ElbowAnalyzer: extracts elbow points from the extent-vs-k curve.
//!
//! ### The monotone-smoothing fix (REDESIGN FLAG, spec §9 open question 1)
//!
//! The reference implementation's smoothing pass is meant to sweep the
//! extent curve descending and enforce `ε[k] <= ε[k-1]`'s complement (i.e.
//! keep the curve non-decreasing by pulling earlier entries down to later
//! minima), but its loop range is degenerate there and never executes. This
//! crate implements the evidently-intended descending scan instead:
//! `smoothen_extent_curve` below, verified against scenario S3 (a flat
//! curve must still resolve to the `{2}` elbow set).

use log::warn;

/// Mutates `extents` (indexed `0..=k_max`) in place: `extents[0]` and
/// `extents[1]` are set equal to the pre-sweep `extents[2]`, then a
/// descending sweep enforces `extents[i-1] = min(extents[i-1], extents[i])`
/// for `i` from `k_max` down to `3`, making the curve non-decreasing from
/// index `2` onward. The sweep can still pull `extents[2]` itself down below
/// what `extents[0]`/`extents[1]` were pinned to — that mirrors the
/// reference two-step process rather than re-deriving a fully self
/// consistent curve.
pub fn smoothen_extent_curve(extents: &mut [f32]) {
    if extents.len() < 3 {
        return;
    }
    extents[0] = extents[2];
    extents[1] = extents[2];
    for i in (3..extents.len()).rev() {
        if extents[i - 1] > extents[i] {
            extents[i - 1] = extents[i];
        }
    }
}

/// `find_elbow_points` (spec §4.7). `extents` is indexed `0..=k_max`
/// (`extents[0]`, `extents[1]` unused by the peak search but present for
/// indexing symmetry with the rest of the sweep).
pub fn find_elbow_points(extents: &[f32], alpha: f32, elbow_deviation: f32) -> Vec<usize> {
    let k_max = extents.len().saturating_sub(1);
    if k_max < 3 {
        return vec![2.min(k_max.max(1))];
    }

    let mut peaks = vec![0.0f32; extents.len()];
    for i in 3..extents.len() - 1 {
        let (prev, cur, next) = (extents[i - 1], extents[i], extents[i + 1]);
        if prev.is_finite() && cur.is_finite() && next.is_finite() {
            let m1 = (next - cur) + 1e-5;
            let mut m2 = (cur - prev) + 1e-5;
            if prev == cur {
                // avoid detecting false elbows on flat plateaus
                m2 = 1.0;
            }
            if cur > 0.0 && next / cur > elbow_deviation {
                peaks[i] = m1 / m2;
            }
        }
    }

    // k=2 is always a seeded baseline elbow (step 1), independent of whether
    // any peak in the curve clears alpha.
    let mut elbows = vec![2];
    loop {
        let (p, &val) = peaks
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap();
        if val > alpha {
            elbows.push(p);
            let lo = p.saturating_sub(1);
            let hi = (p + 2).min(peaks.len());
            for v in &mut peaks[lo..hi] {
                *v = 0.0;
            }
        } else {
            break;
        }
    }

    if elbows.len() == 1 {
        warn!("no elbow peak exceeded alpha={alpha}; falling back to k=2");
    }

    elbows.sort_unstable();
    elbows.dedup();
    elbows
}
