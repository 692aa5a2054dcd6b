//! Precondition failures. The engine fails fast on malformed input and never
//! tries to recover from or translate internal numerical degeneracies —
//! those are represented in the result data itself (`-1` neighbor slots,
//! `+inf` extents), not as errors. See spec §7.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotifletError {
    #[error("window length m={m} must satisfy 2 <= m <= n-1 (n={n})")]
    InvalidWindow { m: usize, n: usize },

    #[error("K must be >= 2, got {0}")]
    InvalidK(usize),

    #[error("time series must have at least one channel")]
    EmptyChannelSet,

    #[error("channels have mismatched lengths: {0:?}")]
    RaggedChannels(Vec<usize>),

    #[error("requested dimension count u={u} exceeds available channels d={d}")]
    InvalidDimCount { u: usize, d: usize },

    #[error("motif length range must be non-empty and every m must satisfy 2 <= m <= n-1")]
    InvalidMotifLengthRange,
}
