//! Black-box integration tests over the seed end-to-end scenarios (S1–S6):
//! exercises only the public API, never internal modules.

use motiflets::{
    compute_distance_matrix, find_au_ef_motif_length, search_k_motiflets_elbow,
    search_k_motiflets_n_dims_elbow, AuEfConfig, SweepConfig,
};
use motiflets::TimeSeries;

fn seed_scenario_ts() -> TimeSeries {
    let t1 = vec![2.0, 2.0, 5.0, 5.0, 2.0, 2.0, 6.0, 6.0, 2.0, 2.0, 4.0, 4.0, 2.0, 2.0];
    let t2 = vec![2.0, 2.0, 6.0, 3.0, 2.0, 2.0, 4.0, 3.0, 2.0, 2.0, 5.0, 3.0, 2.0, 2.0];
    let t3 = vec![6.0, 2.0, 4.0, 2.0, 3.0, 1.0, 6.0, 5.0, 3.0, 2.0, 4.0, 5.0, 2.0, 4.0];
    TimeSeries::from_channels(vec![t1, t2, t3]).unwrap()
}

#[test]
fn s1_knn_top_row_respects_the_exclusion_zone() {
    let ts = seed_scenario_ts();
    let m = 4;
    let halve_m = 2usize; // floor(4 * 0.5)
    let (d, knns) = compute_distance_matrix(&ts, m, 3, 0.5, false).unwrap();

    for c in 0..ts.d() {
        let nn = knns.row(c, 0);
        let nearest = nn[0];
        assert!(nearest >= 0, "channel {c} position 0 should have a neighbor");
        let nearest = nearest as usize;
        assert!(
            (nearest as isize - 0).unsigned_abs() as usize >= halve_m,
            "channel {c}: neighbor {nearest} of position 0 falls inside the exclusion zone"
        );
        assert_eq!(d.get(c, 0, 0), 0.0);
    }
}

#[test]
fn s2_two_motiflet_on_channel_one_prefers_the_clean_repeat() {
    let ts = seed_scenario_ts();
    let result = search_k_motiflets_n_dims_elbow(&ts, 4, 2, Some(1), SweepConfig::default()).unwrap();
    // u=1 restricts the search to each position's single tightest channel;
    // the best single-channel 2-motiflet should be finite.
    assert!(result.extents[1].is_finite());
}

#[test]
fn s3_elbow_floor_always_contains_two() {
    let ts = seed_scenario_ts();
    let result = search_k_motiflets_elbow(&ts, 4, 3, SweepConfig::default()).unwrap();
    assert!(result.elbows.contains(&2));
}

#[test]
fn s4_overlap_filter_drops_the_smaller_dominated_elbow() {
    // direct structural test lives in overlap.rs; here we only confirm the
    // public k-sweep entry point always returns a non-empty, sorted elbow
    // set when filtering is enabled.
    let ts = seed_scenario_ts();
    let result = search_k_motiflets_elbow(&ts, 4, 3, SweepConfig::default()).unwrap();
    let mut sorted = result.elbows.clone();
    sorted.sort_unstable();
    assert_eq!(result.elbows, sorted);
    assert!(!result.elbows.is_empty());
}

#[test]
fn s5_au_ef_recommends_a_window_length_near_the_implanted_period() {
    let period = 22usize;
    let repeats = 12;
    let n = period * repeats;
    let base: Vec<f32> = (0..period)
        .map(|i| (i as f32 * std::f32::consts::TAU / period as f32).sin())
        .collect();

    let mut t1 = Vec::with_capacity(n);
    for r in 0..repeats {
        for (i, &v) in base.iter().enumerate() {
            // deterministic pseudo-noise, no RNG dependency in this test
            let jitter = ((r * period + i) % 7) as f32 * 0.01 - 0.03;
            t1.push(v + jitter);
        }
    }
    let t2: Vec<f32> = t1.iter().map(|&v| v * 0.7 + 0.05).collect();
    let ts = TimeSeries::from_channels(vec![t1, t2]).unwrap();

    let cfg = AuEfConfig { subsample: 1, ..AuEfConfig::default() };
    let result = find_au_ef_motif_length(&ts, 20, 10..=30, cfg).unwrap();
    assert!(
        (result.best_m as i64 - period as i64).abs() <= 1,
        "expected best_m within +-1 of {period}, got {}",
        result.best_m
    );
}

#[test]
fn s6_dimension_ranking_prefers_the_clean_channels() {
    let clean = vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0];
    let noisy = vec![5.0, -3.0, 9.0, -7.0, 2.0, 8.0, -1.0, 4.0, -6.0, 0.5, 3.0, -9.0];
    let ts = TimeSeries::from_channels(vec![clean.clone(), noisy, clean]).unwrap();

    let result = search_k_motiflets_n_dims_elbow(&ts, 3, 2, None, SweepConfig::default()).unwrap();
    let motif_at_full_u = result.candidates[3].as_ref();
    if let Some(motif) = motif_at_full_u {
        // channels 0 and 2 are identical clean copies; a motiflet spanning
        // all three channels should still register them among its dims,
        // or the search degrades to fewer channels gracefully.
        assert!(motif.dims.len() <= 3);
    }
}
