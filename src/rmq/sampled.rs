//! Sampled RMQ: linear space on top of block minima.
//!
//! The array is cut into blocks of `B`; a sparse table is kept only over the
//! per-block minima. A query scans the partial head and tail blocks and
//! answers the fully covered middle through the sparse table. Spans up to
//! `3B` are scanned outright, which keeps every path short and guarantees
//! the middle part is non-degenerate when it is used.

use rayon::prelude::*;

use super::sparse::RmqSparse;
use crate::types::IndexInt;

#[derive(Debug, Clone)]
pub struct RmqSampled<K, I = u32, const B: usize = 64> {
    data: Vec<K>,
    sampled_indexes: Vec<I>,
    sampled_rmq: RmqSparse<K, I>,
}

impl<K, I, const B: usize> RmqSampled<K, I, B>
where
    K: Ord + Copy + Send + Sync,
    I: IndexInt,
{
    pub fn new(data: Vec<K>) -> Self {
        assert!(!data.is_empty(), "rmq over empty array");
        let num_blocks = (data.len() - 1) / B + 1;

        let sampled_indexes: Vec<I> = (0..num_blocks)
            .into_par_iter()
            .map(|block| {
                let start = block * B;
                let end = ((block + 1) * B).min(data.len());
                let mut min_index = start;
                for i in start + 1..end {
                    if data[i] < data[min_index] {
                        min_index = i;
                    }
                }
                I::from_usize(min_index)
            })
            .collect();
        let sampled_minima: Vec<K> = sampled_indexes
            .iter()
            .map(|&i| data[i.to_usize()])
            .collect();

        Self {
            data,
            sampled_indexes,
            sampled_rmq: RmqSparse::new(sampled_minima),
        }
    }

    #[inline]
    pub fn values(&self) -> &[K] {
        &self.data
    }

    /// Index of the minimum of `data[min(i, j)..=max(i, j)]`; ties go to the
    /// smaller index.
    #[inline]
    pub fn rmq(&self, i: usize, j: usize) -> usize {
        self.rmq_lr(i.min(j), i.max(j))
    }

    /// As [`rmq`](Self::rmq), requiring `left <= right`.
    pub fn rmq_lr(&self, left: usize, right: usize) -> usize {
        debug_assert!(left <= right);
        let data = &self.data;
        if right - left <= 3 * B {
            let mut min = left;
            for i in left + 1..=right {
                if data[i] < data[min] {
                    min = i;
                }
            }
            return min;
        }

        // head block
        let head_end = (1 + left / B) * B;
        let mut head_min = left;
        for i in left + 1..head_end {
            if data[i] < data[head_min] {
                head_min = i;
            }
        }

        // tail block
        let tail_start = (right / B) * B;
        let mut tail_min = tail_start;
        for i in tail_start + 1..=right {
            if data[i] < data[tail_min] {
                tail_min = i;
            }
        }

        // fully covered middle blocks
        let left_block = left / B + 1;
        let right_block = right / B - 1;
        debug_assert!(left_block < right_block);
        let mid_min =
            self.sampled_indexes[self.sampled_rmq.rmq_lr(left_block, right_block)].to_usize();

        let mut min = head_min;
        if data[mid_min] < data[min] {
            min = mid_min;
        }
        if data[tail_min] < data[min] {
            min = tail_min;
        }
        min
    }

    /// Index of the minimum of `data[min(i, j) + 1..=max(i, j)]`.
    pub fn rmq_shifted(&self, i: usize, j: usize) -> usize {
        debug_assert_ne!(i, j);
        self.rmq_lr(i.min(j) + 1, i.max(j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rmq::RmqNaive;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_data(len: usize, seed: u64) -> Vec<u32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen_range(0..1000)).collect()
    }

    #[test]
    fn test_against_naive_windows() {
        let data = random_data(10_000, 4);
        let naive = RmqNaive::new(data.clone());
        let rmq: RmqSampled<u32> = RmqSampled::new(data);

        for window in [100usize, 1000] {
            for i in 0..rmq.values().len() - window {
                assert_eq!(rmq.rmq(i + window - 1, i), naive.rmq_lr(i, i + window - 1));
            }
        }
    }

    #[test]
    fn test_shifted_against_naive() {
        let data = random_data(10_000, 5);
        let naive = RmqNaive::new(data.clone());
        let rmq: RmqSampled<u32> = RmqSampled::new(data);
        for i in 0..rmq.values().len() - 1000 {
            assert_eq!(rmq.rmq_shifted(i + 999, i), naive.rmq_shifted(i, i + 999));
        }
    }

    #[test]
    fn test_small_block_size() {
        let data = random_data(2000, 6);
        let naive = RmqNaive::new(data.clone());
        let rmq: RmqSampled<u32, u32, 8> = RmqSampled::new(data);
        for i in 0..rmq.values().len() - 300 {
            assert_eq!(rmq.rmq(i, i + 299), naive.rmq_lr(i, i + 299));
        }
    }

    #[test]
    fn test_span_equal_to_array() {
        let data = random_data(700, 7);
        let naive = RmqNaive::new(data.clone());
        let rmq: RmqSampled<u32> = RmqSampled::new(data);
        assert_eq!(rmq.rmq(0, 699), naive.rmq_lr(0, 699));
        assert_eq!(rmq.rmq(699, 0), naive.rmq_lr(0, 699));
        assert_eq!(rmq.rmq(5, 5), 5);
    }
}
