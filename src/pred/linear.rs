//! Piecewise-linear predecessor index ("j" index).
//!
//! The position of a key is approximated by `x / slope` with
//! `slope = max / size`. A construction pass records the largest leftward
//! and rightward deviation of the true positions from that line; a query
//! then binary-searches only the error window around the approximation.
//! Works well when the keys are close to uniformly spaced, as
//! synchronizing-set offsets are.

use rayon::prelude::*;

use super::PredResult;
use crate::types::IndexInt;

#[derive(Debug, Clone)]
pub struct JIndex<I: IndexInt> {
    data: Vec<I>,
    min: I,
    max: I,
    slope: f64,
    max_l_error: i64,
    max_r_error: i64,
}

impl<I: IndexInt> JIndex<I> {
    pub fn new(data: Vec<I>) -> Self {
        assert!(!data.is_empty(), "predecessor index over empty array");
        debug_assert!(data.windows(2).all(|w| w[0] <= w[1]));
        let min = data[0];
        let max = data[data.len() - 1];
        let slope = max.to_usize() as f64 / data.len() as f64;

        let (mut max_l_error, mut max_r_error) = data
            .par_iter()
            .enumerate()
            .map(|(i, &key)| {
                let approx = (key.to_usize() as f64 / slope) as i64;
                let error = i as i64 - approx;
                (error, error)
            })
            .reduce(|| (i64::MAX, i64::MIN), |a, b| (a.0.min(b.0), a.1.max(b.1)));
        max_l_error -= 1;
        max_r_error += 1;

        Self {
            data,
            min,
            max,
            slope,
            max_l_error,
            max_r_error,
        }
    }

    #[inline]
    pub fn values(&self) -> &[I] {
        &self.data
    }

    #[inline]
    fn window(&self, x: I) -> (usize, usize) {
        let approx = (x.to_usize() as f64 / self.slope) as i64;
        let left = (approx + self.max_l_error).max(0) as usize;
        let right = ((approx + self.max_r_error + 1).max(0) as usize).min(self.data.len());
        (left, right)
    }

    /// Largest element <= x.
    pub fn predecessor(&self, x: I) -> PredResult {
        if x < self.min {
            return PredResult::NONE;
        }
        if x >= self.max {
            return PredResult::some(self.data.len() - 1);
        }
        let (left, right) = self.window(x);
        let offset = self.data[left..right].partition_point(|&v| v <= x);
        PredResult::some(left + offset - 1)
    }

    /// Smallest element >= x.
    pub fn successor(&self, x: I) -> PredResult {
        if x <= self.min {
            return PredResult::some(0);
        }
        if x > self.max {
            return PredResult::NONE;
        }
        let (left, right) = self.window(x);
        let offset = self.data[left..right].partition_point(|&v| v < x);
        PredResult::some(left + offset)
    }
}
