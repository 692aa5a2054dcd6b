//! # motiflets — multivariate k-Motiflet discovery for time series
//!
//! ## Architecture Overview
//!
//! Given a dense, pre-z-scored `(d, n)` multi-channel series, this crate
//! finds, for every motiflet size `k` in a user-bounded range, the `k`
//! non-overlapping subsequences of a fixed window length whose pairwise
//! maximum z-normalized Euclidean distance (the *extent*) is minimal — and
//! the subset of channels on which that motiflet is most coherent. From the
//! resulting extent-vs-k curve it derives *elbow points*, values of `k` that
//! mark structurally meaningful repetition counts, and can additionally
//! sweep window lengths to recommend one via the Area-Under-the-Elbow-
//! Function (AU-EF) criterion.
//!
//! The pipeline is a straight line through seven pieces, leaves first:
//!
//! 1. [`kernel`] — sliding dot product (FFT-seeded, `O(1)`-rolled), sliding
//!    mean/std, the z-normalized distance formula.
//! 2. [`distance`] — builds the per-channel `(d, N, N)` distance tensor and
//!    the `(d, N, K)` non-overlapping k-NN table, data-parallel over offset
//!    bins.
//! 3. [`dims`] — ranks channels per reference position by k-th-neighbor
//!    tightness.
//! 4. [`motiflet`] — admissible-pruning approximate k-motiflet search.
//! 5. [`elbow`] — elbow-point extraction and curve smoothing.
//! 6. [`overlap`] — deduplicates elbows whose motiflets substantially
//!    overlap a larger one.
//! 7. [`orchestrator`] — the k-sweep, dimension-sweep and AU-EF m-sweep
//!    drivers, and the public entry points re-exported at the crate root.
//!
//! ### Memory layout
//!
//! Every tensor in [`types`] is a single flat `Vec`, not a nested
//! `Vec<Vec<_>>` — the distance-matrix build and motif search walk these
//! structures row by row, and a contiguous buffer keeps that walk from
//! chasing pointers across `d * N` separate heap allocations.
//!
//! ### Determinism under parallelism
//!
//! The distance-matrix build fans out over offset bins with rayon, each bin
//! owning a disjoint, mutable row-range slice of the backing buffers — no
//! shared mutable state, no locking. Within a bin the per-channel loop stays
//! sequential because `sum_dims` mode accumulates across channels by
//! floating-point addition, and summation order has to stay fixed for the
//! build to be bit-reproducible.
//!
//! ## Error handling
//!
//! Every public entry point returns `Result<_, Error>`: malformed input
//! (bad window length, bad `K`, empty or ragged channel set) fails fast.
//! Internal numerical degeneracies — a position with too few neighbors, a
//! `test_k` with no admissible motiflet, a near-constant channel — are never
//! errors; they surface in the result data itself (`-1` neighbor slots,
//! `+inf` extents, a floored standard deviation).

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod config;
mod dims;
mod distance;
mod elbow;
mod error;
mod kernel;
mod motiflet;
mod orchestrator;
mod overlap;
mod types;

pub use config::{AuEfConfig, SweepConfig};
pub use error::MotifletError as Error;
pub use orchestrator::{
    compute_distance_matrix, find_au_ef_motif_length, search_k_motiflets_elbow,
    search_k_motiflets_n_dims_elbow, AuEfResult, DimSweepResult, KSweepResult, MSweepEntry,
};
pub use types::{DistanceMatrix, KnnTable, Motiflet, TimeSeries};
