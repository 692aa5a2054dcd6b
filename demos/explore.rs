//! ```bash
//! RUSTFLAGS="-C target-cpu=native" cargo run --example explore --release
//! ```

use motiflets::{find_au_ef_motif_length, search_k_motiflets_elbow, AuEfConfig, SweepConfig, TimeSeries};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Instant;

/// Length of the implanted repeating pattern.
const PERIOD: usize = 22;
/// Number of times the pattern repeats across the series.
const REPEATS: usize = 30;
/// Channels in the synthetic series.
const CHANNELS: usize = 3;
/// Deterministic seed for reproducibility.
const SEED: u64 = 42;

fn divider() {
    println!("{}", "─".repeat(60));
}

/// A `CHANNELS`-channel series of length `PERIOD * REPEATS`: one clean
/// channel carrying the implanted pattern plus additive noise, one channel
/// correlated with it at reduced amplitude, and one pure-noise channel.
fn synthetic_series() -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(SEED);
    let base: Vec<f32> = (0..PERIOD)
        .map(|i| (i as f32 * std::f32::consts::TAU / PERIOD as f32).sin())
        .collect();

    let mut clean = Vec::with_capacity(PERIOD * REPEATS);
    for _ in 0..REPEATS {
        for &v in &base {
            clean.push(v + rng.gen::<f32>() * 0.05);
        }
    }
    let correlated: Vec<f32> = clean.iter().map(|&v| v * 0.6 - 0.2).collect();
    let noise: Vec<f32> = (0..PERIOD * REPEATS).map(|_| rng.gen::<f32>() * 2.0 - 1.0).collect();

    TimeSeries::from_channels(vec![clean, correlated, noise]).expect("equal-length channels")
}

fn main() -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║        motiflets — k-Motiflet Discovery Walkthrough        ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    // ── Phase 1: Data Generation ──────────────────────────────────────────
    divider();
    println!("Phase 1 — Generating a synthetic {CHANNELS}-channel series");
    println!("  Implanted period: {PERIOD}");
    println!("  Repeats:          {REPEATS}");

    let t0 = Instant::now();
    let ts = synthetic_series();
    println!("  Generated {} samples/channel in {:?}", ts.n(), t0.elapsed());

    // ── Phase 2: k-sweep at the known window length ───────────────────────
    divider();
    println!("Phase 2 — k-sweep at m={PERIOD}");

    let t0 = Instant::now();
    let sweep = search_k_motiflets_elbow(&ts, PERIOD, 12, SweepConfig::default())?;
    println!("  Swept k=2..={} in {:?}", sweep.extents.len() - 1, t0.elapsed());
    println!("  Elbow points: {:?}", sweep.elbows);
    for &k in &sweep.elbows {
        match &sweep.candidates[k] {
            Some(m) => println!(
                "    k={k}: extent={:.4}, dims={:?}, positions={:?}",
                m.extent, m.dims, m.positions
            ),
            None => println!("    k={k}: no admissible motiflet"),
        }
    }

    // ── Phase 3: AU-EF window-length recommendation ────────────────────────
    divider();
    println!("Phase 3 — AU-EF sweep over m=10..=30 (subsample=1)");

    let t0 = Instant::now();
    let cfg = AuEfConfig { subsample: 1, ..AuEfConfig::default() };
    let au_ef = find_au_ef_motif_length(&ts, 10, 10..=30, cfg)?;
    println!("  Swept {} window lengths in {:?}", au_ef.entries.len(), t0.elapsed());
    println!("  Recommended m: {} (implanted period was {PERIOD})", au_ef.best_m);
    println!("  Local minima:  {:?}", au_ef.local_minima);

    // ── Phase 4: Summary ────────────────────────────────────────────────────
    divider();
    println!("Summary");
    println!("──────────────────────────────────────────────────");
    println!("  Elbow k-values at m={PERIOD}: {:?}", sweep.elbows);
    println!("  AU-EF recommended m:          {}", au_ef.best_m);
    println!("──────────────────────────────────────────────────");

    Ok(())
}
