//! Sparse-table RMQ: O(n log n) precomputation, O(1) queries.
//!
//! Level k stores, for every start index, the argmin over a span of
//! 2^(k+1) elements, combined from two overlapping spans of the previous
//! level. A query covers `[l, r]` with the two largest power-of-two spans
//! that fit. Levels are filled in parallel.

use rayon::prelude::*;

use crate::types::IndexInt;

#[derive(Debug, Clone, Default)]
pub struct RmqSparse<K, I = u32> {
    data: Vec<K>,
    levels: Vec<Vec<I>>,
}

impl<K, I> RmqSparse<K, I>
where
    K: Ord + Copy + Send + Sync,
    I: IndexInt,
{
    /// Builds the table over `data`. The array must be non-empty.
    pub fn new(data: Vec<K>) -> Self {
        assert!(!data.is_empty(), "rmq over empty array");
        let n = data.len();
        let num_levels = n.ilog2() as usize;
        let mut levels: Vec<Vec<I>> = Vec::with_capacity(num_levels);

        if num_levels > 0 {
            let first: Vec<I> = (0..n - 1)
                .into_par_iter()
                .map(|i| I::from_usize(if data[i] <= data[i + 1] { i } else { i + 1 }))
                .collect();
            levels.push(first);
        }

        for level in 1..num_levels {
            let span = 1usize << level;
            let size = n - (2 << level) + 1;
            let prev = &levels[level - 1];
            let next: Vec<I> = (0..size)
                .into_par_iter()
                .map(|i| {
                    let left_min = prev[i];
                    let right_min = prev[i + span];
                    if data[left_min.to_usize()] <= data[right_min.to_usize()] {
                        left_min
                    } else {
                        right_min
                    }
                })
                .collect();
            levels.push(next);
        }

        Self { data, levels }
    }

    /// The backing array.
    #[inline]
    pub fn values(&self) -> &[K] {
        &self.data
    }

    /// Index of the minimum of `data[min(i, j)..=max(i, j)]`; ties go to the
    /// smaller index.
    #[inline]
    pub fn rmq(&self, i: usize, j: usize) -> usize {
        if i == j {
            return i;
        }
        self.rmq_lr(i.min(j), i.max(j))
    }

    /// As [`rmq`](Self::rmq), requiring `left < right`.
    pub fn rmq_lr(&self, left: usize, right: usize) -> usize {
        debug_assert!(left < right);
        let interval_log = (right - left + 1).ilog2() as usize;
        let span = 1usize << interval_log;
        let left_min = self.levels[interval_log - 1][left].to_usize();
        let right_min = self.levels[interval_log - 1][right + 1 - span].to_usize();
        if self.data[left_min] <= self.data[right_min] {
            left_min
        } else {
            right_min
        }
    }

    /// Index of the minimum of `data[min(i, j) + 1..=max(i, j)]`.
    ///
    /// This is the query shape LCP lookups need: the entry at index k covers
    /// the pair (k-1, k), so the minimum must span `(a, b]`. The two-element
    /// case is answered directly because the general path needs an interval
    /// of at least two.
    pub fn rmq_shifted(&self, i: usize, j: usize) -> usize {
        debug_assert_ne!(i, j);
        let left = i.min(j) + 1;
        let right = i.max(j);
        if right - left + 1 <= 2 {
            return if self.data[left] <= self.data[right] {
                left
            } else {
                right
            };
        }
        self.rmq_lr(left, right)
    }
}
