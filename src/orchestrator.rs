//! Orchestrator: ties NumericKernel/DistanceMatrixBuilder/DimensionSelector/
//! MotifletSearch/ElbowAnalyzer/OverlapFilter together into the public API —
//! a k-sweep at fixed `m`, a dimension-sweep at fixed `(k, m)`, and an AU-EF
//! sweep over a range of `m`.

use log::{debug, warn};

use crate::config::{AuEfConfig, SweepConfig};
use crate::dims::compute_relevant_dimensions;
use crate::distance::build;
use crate::elbow::{find_elbow_points, smoothen_extent_curve};
use crate::error::MotifletError;
use crate::motiflet::approx_k_motiflet;
use crate::overlap::filter_unique;
use crate::types::{DistanceMatrix, KnnTable, Motiflet, TimeSeries};

fn validate_window(n: usize, m: usize) -> Result<(), MotifletError> {
    if m < 2 || m >= n {
        return Err(MotifletError::InvalidWindow { m, n });
    }
    Ok(())
}

/// `compute_distance_matrix` (spec §6), re-exported for diagnostic use.
pub fn compute_distance_matrix(
    ts: &TimeSeries,
    m: usize,
    k: usize,
    slack: f64,
    sum_dims: bool,
) -> Result<(DistanceMatrix, KnnTable), MotifletError> {
    validate_window(ts.n(), m)?;
    if k < 2 {
        return Err(MotifletError::InvalidK(k));
    }
    Ok(build(ts, m, k, slack, sum_dims))
}

/// Result of a k-sweep: extents, candidates and elbows indexed by `k` (index
/// `0` and `1` of `extents`/`candidates` are unused placeholders kept for
/// indexing symmetry with the spec's `ε[0..K]` notation).
#[derive(Debug, Clone)]
pub struct KSweepResult {
    pub extents: Vec<f32>,
    pub candidates: Vec<Option<Motiflet>>,
    pub elbows: Vec<usize>,
    pub m: usize,
}

/// `search_k_motiflets_elbow` (spec §6/§4.5).
pub fn search_k_motiflets_elbow(
    ts: &TimeSeries,
    m: usize,
    k_user: usize,
    cfg: SweepConfig,
) -> Result<KSweepResult, MotifletError> {
    validate_window(ts.n(), m)?;
    if k_user < 2 {
        return Err(MotifletError::InvalidK(k_user));
    }
    let d_dims = ts.d();
    let u = cfg.u.unwrap_or(d_dims);
    if u == 0 || u > d_dims {
        return Err(MotifletError::InvalidDimCount { u, d: d_dims });
    }

    let n = ts.subseq_count(m);
    let k_max = 3.max(((n as f64 / (m as f64 * cfg.slack)) as usize).min(k_user));

    let (d, knns) = build(ts, m, k_max, cfg.slack, false);

    let mut extents = vec![f32::INFINITY; k_max + 1];
    let mut candidates: Vec<Option<Motiflet>> = vec![None; k_max + 1];

    let mut bound = f32::INFINITY;
    for test_k in (2..=k_max).rev() {
        let delta = compute_relevant_dimensions(&d, &knns, test_k, u);
        let motif = approx_k_motiflet(test_k, &d, &knns, &delta, bound);
        let extent = motif.as_ref().map(|mo| mo.extent).unwrap_or(f32::INFINITY);
        if !extent.is_finite() {
            warn!("k-sweep: no admissible {test_k}-motiflet found at m={m}");
        }
        extents[test_k] = extent;
        candidates[test_k] = motif;
        bound = bound.min(extent);
    }

    smoothen_extent_curve(&mut extents);

    let mut elbows = find_elbow_points(&extents, cfg.alpha, cfg.elbow_deviation);
    if cfg.filter {
        elbows = filter_unique(&elbows, &candidates, m);
    }

    debug!("k-sweep done: m={m}, k_max={k_max}, elbows={elbows:?}");
    Ok(KSweepResult { extents, candidates, elbows, m })
}

/// Result of a dimension-sweep: extents/candidates indexed by channel count
/// `u` (index `0` unused — `u` ranges `1..=u_max`), with elbow points over
/// that same u-indexed curve (spec §4.6, mirroring the k-sweep's shape).
#[derive(Debug, Clone)]
pub struct DimSweepResult {
    pub extents: Vec<f32>,
    pub candidates: Vec<Option<Motiflet>>,
    pub elbows: Vec<usize>,
    pub k: usize,
    pub m: usize,
}

/// `search_k_motiflets_n_dims_elbow` (spec §6/§4.6). Per spec §9 open
/// question 2, the upper bound is *not* carried across `u` here — each
/// iteration searches with a fresh `+inf` bound, mirroring the reference.
pub fn search_k_motiflets_n_dims_elbow(
    ts: &TimeSeries,
    m: usize,
    k: usize,
    u_max: Option<usize>,
    cfg: SweepConfig,
) -> Result<DimSweepResult, MotifletError> {
    validate_window(ts.n(), m)?;
    if k < 2 {
        return Err(MotifletError::InvalidK(k));
    }
    let d_dims = ts.d();
    let u_max = u_max.unwrap_or(d_dims);
    if u_max == 0 || u_max > d_dims {
        return Err(MotifletError::InvalidDimCount { u: u_max, d: d_dims });
    }

    let (d, knns) = build(ts, m, k, cfg.slack, false);

    let mut extents = vec![f32::INFINITY; u_max + 1];
    let mut candidates: Vec<Option<Motiflet>> = vec![None; u_max + 1];

    for u in (1..=u_max).rev() {
        let delta = compute_relevant_dimensions(&d, &knns, k, u);
        let motif = approx_k_motiflet(k, &d, &knns, &delta, f32::INFINITY);
        extents[u] = motif.as_ref().map(|mo| mo.extent).unwrap_or(f32::INFINITY);
        candidates[u] = motif;
    }

    smoothen_extent_curve(&mut extents);

    let mut elbows = find_elbow_points(&extents, cfg.alpha, cfg.elbow_deviation);
    if cfg.filter {
        elbows = filter_unique(&elbows, &candidates, m);
    }

    debug!("dimension-sweep done: m={m}, k={k}, u_max={u_max}, elbows={elbows:?}");
    Ok(DimSweepResult { extents, candidates, elbows, k, m })
}

fn downsample(ts: &TimeSeries, f: usize) -> TimeSeries {
    if f <= 1 {
        return ts.clone();
    }
    let n = ts.n();
    let new_n = (n + f - 1) / f;
    let channels: Vec<Vec<f32>> = (0..ts.d())
        .map(|c| {
            let full = ts.channel(c);
            (0..new_n).map(|i| full[i * f]).collect()
        })
        .collect();
    TimeSeries::from_channels(channels).expect("downsampled channels share length by construction")
}

/// One window length's result within an AU-EF sweep: its AU-EF score and its
/// k-sweep result, with motiflet positions already rescaled to the original
/// (non-downsampled) index space.
#[derive(Debug, Clone)]
pub struct MSweepEntry {
    pub m: usize,
    pub au_ef: f32,
    pub sweep: KSweepResult,
}

#[derive(Debug, Clone)]
pub struct AuEfResult {
    pub best_m: usize,
    pub local_minima: Vec<usize>,
    pub entries: Vec<MSweepEntry>,
}

/// `find_au_ef_motif_length` (spec §6/§4.9).
pub fn find_au_ef_motif_length(
    ts: &TimeSeries,
    k_user: usize,
    m_range: std::ops::RangeInclusive<usize>,
    cfg: AuEfConfig,
) -> Result<AuEfResult, MotifletError> {
    if k_user < 2 {
        return Err(MotifletError::InvalidK(k_user));
    }
    let (m_lo, m_hi) = (*m_range.start(), *m_range.end());
    if m_lo < 2 || m_lo > m_hi {
        return Err(MotifletError::InvalidMotifLengthRange);
    }

    let f = cfg.subsample.max(1);
    let down = downsample(ts, f);

    let sweep_cfg = SweepConfig {
        slack: cfg.slack,
        u: cfg.u,
        elbow_deviation: cfg.elbow_deviation,
        alpha: cfg.alpha,
        filter: true,
    };

    let mut entries = Vec::new();
    for m_full in (m_lo..=m_hi).rev() {
        let m_down = m_full / f;
        if m_down < 2 || m_down >= down.n() {
            debug!("AU-EF sweep: skipping m={m_full} (downsampled window {m_down} out of range)");
            continue;
        }

        let mut sweep = match search_k_motiflets_elbow(&down, m_down, k_user, sweep_cfg) {
            Ok(s) => s,
            Err(e) => {
                warn!("AU-EF sweep: k-sweep at m={m_full} failed: {e}");
                continue;
            }
        };

        for candidate in sweep.candidates.iter_mut().flatten() {
            for p in candidate.positions.iter_mut() {
                *p *= f;
            }
        }

        let finite: Vec<f32> = sweep.extents.iter().copied().filter(|v| v.is_finite()).collect();
        let au_ef = if finite.is_empty() {
            f32::INFINITY
        } else {
            let lo = finite.iter().copied().fold(f32::INFINITY, f32::min);
            let hi = finite.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            if (hi - lo).abs() < f32::EPSILON {
                1.0
            } else {
                finite.iter().map(|&v| (v - lo) / (hi - lo)).sum::<f32>() / finite.len() as f32
            }
        };

        entries.push(MSweepEntry { m: m_full, au_ef, sweep });
    }

    if entries.is_empty() {
        return Err(MotifletError::InvalidMotifLengthRange);
    }
    entries.sort_by_key(|e| e.m);

    let best_idx = entries
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.au_ef.partial_cmp(&b.au_ef).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .expect("entries is non-empty");
    let best_m = entries[best_idx].m;

    // Order-f discrete local minima: an entry whose AU-EF score is no worse
    // than every other entry within f positions on either side.
    let mut local_minima = Vec::new();
    for (i, e) in entries.iter().enumerate() {
        let lo = i.saturating_sub(f);
        let hi = (i + f).min(entries.len() - 1);
        if (lo..=hi).all(|j| entries[j].au_ef >= e.au_ef) {
            local_minima.push(e.m);
        }
    }

    debug!("AU-EF sweep done: best_m={best_m}, local_minima={local_minima:?}");
    Ok(AuEfResult { best_m, local_minima, entries })
}
