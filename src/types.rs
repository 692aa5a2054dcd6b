//! Data model: the dense matrices and small result structs the rest of the
//! crate passes around.
//!
//! ### Memory layout
//!
//! Every per-channel tensor here is a single flat `Vec`, not a `Vec<Vec<_>>`.
//! `TimeSeries` stores channel `c` at `data[c*n .. (c+1)*n]`; `DistanceMatrix`
//! stores channel `c`'s `(N, N)` block at `data[c*n*n .. (c+1)*n*n]` with row
//! `i` at offset `i*n` within that block. One contiguous allocation per
//! tensor avoids the pointer-chasing of a nested `Vec<Vec<f32>>` when the
//! distance-matrix build and the motif search walk these structures row by
//! row.

use crate::Error;

/// A dense, pre-z-scored multi-channel time series of shape `(d, n)`.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    d: usize,
    n: usize,
    data: Vec<f32>,
}

impl TimeSeries {
    /// Build a time series from one equal-length channel per entry.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Result<Self, Error> {
        if channels.is_empty() {
            return Err(Error::EmptyChannelSet);
        }
        let n = channels[0].len();
        let lengths: Vec<usize> = channels.iter().map(Vec::len).collect();
        if lengths.iter().any(|&l| l != n) {
            return Err(Error::RaggedChannels(lengths));
        }
        let d = channels.len();
        let mut data = Vec::with_capacity(d * n);
        for ch in channels {
            data.extend(ch);
        }
        Ok(Self { d, n, data })
    }

    /// Build directly from a flat, row-major `(d, n)` buffer.
    pub fn from_flat(d: usize, n: usize, data: Vec<f32>) -> Result<Self, Error> {
        if d == 0 {
            return Err(Error::EmptyChannelSet);
        }
        if data.len() != d * n {
            return Err(Error::RaggedChannels(vec![data.len(), d * n]));
        }
        Ok(Self { d, n, data })
    }

    #[inline]
    pub fn d(&self) -> usize {
        self.d
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// The raw samples of channel `c`, length `n`.
    #[inline]
    pub fn channel(&self, c: usize) -> &[f32] {
        &self.data[c * self.n..(c + 1) * self.n]
    }

    /// Number of valid subsequence start offsets for window length `m`.
    pub fn subseq_count(&self, m: usize) -> usize {
        self.n - m + 1
    }
}

/// The per-channel `(d, N, N)` z-normalized squared-Euclidean-distance tensor.
///
/// `D[c,i,i] == 0`; entries inside the trivial-match exclusion zone are
/// `+inf`. Symmetric up to floating-point round-off (it is built one row at a
/// time, so symmetry is never relied on internally).
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    dims: usize,
    n: usize,
    data: Vec<f32>,
}

impl DistanceMatrix {
    pub(crate) fn new(dims: usize, n: usize) -> Self {
        Self {
            dims,
            n,
            data: vec![0.0; dims * n * n],
        }
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.dims
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, c: usize, i: usize, j: usize) -> f32 {
        self.data[c * self.n * self.n + i * self.n + j]
    }

    /// Mutable, disjoint `(channel, row-range)` views over `order_bins`
    /// contiguous offset ranges, one slice per channel per bin. Used by the
    /// distance-matrix builder to hand each rayon task a non-overlapping
    /// piece of the backing buffer.
    pub(crate) fn bin_views(&mut self, rows_per_bin: usize) -> Vec<Vec<&mut [f32]>> {
        let block = self.n * self.n;
        let mut per_channel: Vec<std::slice::ChunksMut<'_, f32>> = self
            .data
            .chunks_mut(block)
            .map(|chan| chan.chunks_mut(rows_per_bin * self.n))
            .collect();

        let num_bins = (self.n + rows_per_bin - 1) / rows_per_bin;
        let mut bins: Vec<Vec<&mut [f32]>> = Vec::with_capacity(num_bins);
        for _ in 0..num_bins {
            let row: Vec<&mut [f32]> = per_channel.iter_mut().map(|it| it.next().unwrap()).collect();
            bins.push(row);
        }
        bins
    }
}

/// The `(d, N, K)` non-overlapping k-NN index tensor. Unfilled slots are `-1`.
#[derive(Debug, Clone)]
pub struct KnnTable {
    dims: usize,
    n: usize,
    k: usize,
    data: Vec<i32>,
}

impl KnnTable {
    pub(crate) fn new(dims: usize, n: usize, k: usize) -> Self {
        Self {
            dims,
            n,
            k,
            data: vec![-1; dims * n * k],
        }
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// The k-NN list for channel `c`, position `i`: up to `k` ascending
    /// indices, `-1`-padded.
    #[inline]
    pub fn row(&self, c: usize, i: usize) -> &[i32] {
        let base = c * self.n * self.k + i * self.k;
        &self.data[base..base + self.k]
    }

    pub(crate) fn bin_views(&mut self, rows_per_bin: usize) -> Vec<Vec<&mut [i32]>> {
        let block = self.n * self.k;
        let mut per_channel: Vec<std::slice::ChunksMut<'_, i32>> = self
            .data
            .chunks_mut(block)
            .map(|chan| chan.chunks_mut(rows_per_bin * self.k))
            .collect();

        let num_bins = (self.n + rows_per_bin - 1) / rows_per_bin;
        let mut bins: Vec<Vec<&mut [i32]>> = Vec::with_capacity(num_bins);
        for _ in 0..num_bins {
            let row: Vec<&mut [i32]> = per_channel.iter_mut().map(|it| it.next().unwrap()).collect();
            bins.push(row);
        }
        bins
    }
}

/// A k-motiflet candidate: `k` non-overlapping start offsets, the channel
/// subset it was scored on, and its extent.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Motiflet {
    pub positions: Vec<usize>,
    pub dims: Vec<usize>,
    pub extent: f32,
}

impl Motiflet {
    /// The motiflet's radius: the minimum, over members, of the maximum
    /// distance from that member to the rest of the set. Distinct from
    /// `extent` (the maximum pairwise distance over the whole set); kept as
    /// a read-only diagnostic over an already-found motiflet.
    pub fn radius(&self, d: &DistanceMatrix) -> f32 {
        let k = self.positions.len();
        let mut radius = f32::INFINITY;
        for a in 0..k {
            let i = self.positions[a];
            let mut worst = 0.0f32;
            for b in 0..k {
                if a == b {
                    continue;
                }
                let j = self.positions[b];
                let mean = self.dims.iter().map(|&c| d.get(c, i, j)).sum::<f32>() / self.dims.len() as f32;
                worst = worst.max(mean);
            }
            radius = radius.min(worst);
        }
        radius
    }
}
