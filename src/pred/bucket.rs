//! High-bits bucket index ("idx") for predecessor queries.
//!
//! The key is split into high and low bits. A table over the high-bits
//! space stores, for every bucket value k, the first array position whose
//! key has high bits >= k. A query then binary-searches only inside the
//! two table boundaries of its bucket. With `lo_bits` around log2 of the
//! average gap, buckets hold a handful of elements and queries touch one
//! cache line of the array.

use rayon::prelude::*;

use super::PredResult;
use crate::types::IndexInt;

#[derive(Debug, Clone)]
pub struct BucketPred<I: IndexInt> {
    data: Vec<I>,
    lo_bits: u32,
    hi_index: Vec<I>,
    min: I,
    max: I,
}

impl<I: IndexInt> BucketPred<I> {
    /// Builds the bucket table over a sorted array. Typical `lo_bits`
    /// choices are 7, or floor(log2 tau) - 1 when indexing a synchronizing set of
    /// granularity tau.
    pub fn new(data: Vec<I>, lo_bits: u32) -> Self {
        assert!(!data.is_empty(), "predecessor index over empty array");
        debug_assert!(data.windows(2).all(|w| w[0] <= w[1]));
        let min = data[0];
        let max = data[data.len() - 1];

        let max_key = max.to_usize() >> lo_bits;
        let hi_index: Vec<I> = (0..=max_key + 1)
            .into_par_iter()
            .map(|key| I::from_usize(data.partition_point(|&v| v.to_usize() >> lo_bits < key)))
            .collect();

        Self {
            data,
            lo_bits,
            hi_index,
            min,
            max,
        }
    }

    #[inline]
    pub fn values(&self) -> &[I] {
        &self.data
    }

    #[inline]
    fn hi(&self, x: I) -> usize {
        x.to_usize() >> self.lo_bits
    }

    /// Largest element <= x.
    pub fn predecessor(&self, x: I) -> PredResult {
        if x < self.min {
            return PredResult::NONE;
        }
        if x >= self.max {
            return PredResult::some(self.data.len() - 1);
        }

        let key = self.hi(x);
        let p = self.hi_index[key].to_usize();
        let q = self.hi_index[key + 1].to_usize();
        let offset = self.data[p..q].partition_point(|&v| v <= x);
        PredResult::some(p + offset - 1)
    }

    /// Smallest element >= x.
    pub fn successor(&self, x: I) -> PredResult {
        if x <= self.min {
            return PredResult::some(0);
        }
        if x > self.max {
            return PredResult::NONE;
        }

        let key = self.hi(x);
        let p = self.hi_index[key].to_usize();
        let q = self.hi_index[key + 1].to_usize();
        let offset = self.data[p..q].partition_point(|&v| v < x);
        PredResult::some(p + offset)
    }

    /// Whether x itself is present.
    pub fn contains(&self, x: I) -> bool {
        let succ = self.successor(x);
        succ.exists && self.data[succ.pos] == x
    }
}
