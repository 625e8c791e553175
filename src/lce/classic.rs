//! Classic LCE: suffix array + inverse + LCP array + RMQ.
//!
//! `lce(i, j)` is the minimum LCP entry strictly between the suffix-array
//! ranks of i and j, answered in O(1) by a sparse-table RMQ. The LCP array
//! is computed with the PLCP formulation of Kasai's algorithm: walking the
//! text in order, the running LCP drops by at most one per step, so each
//! chunk of positions re-derives its values independently after restarting
//! the running LCP at zero. That makes the pass a plain parallel loop.

use std::borrow::Cow;

use rayon::prelude::*;

use super::naive::lce_scan;
use super::LceIndex;
use crate::rmq::RmqSparse;
use crate::suffix_sort::SuffixSortable;
use crate::types::IndexInt;

pub struct LceClassic<'a, T = u8, I = u32>
where
    T: SuffixSortable,
    I: IndexInt,
{
    text: Cow<'a, [T]>,
    isa: Vec<I>,
    /// RMQ over the LCP array; it owns the LCP values.
    rmq: RmqSparse<I, I>,
}

impl<'a, T, I> LceClassic<'a, T, I>
where
    T: SuffixSortable,
    I: IndexInt,
{
    /// Builds the index over borrowed text.
    pub fn new(text: &'a [T]) -> Self {
        Self::build(Cow::Borrowed(text))
    }

    /// Builds the index over an owned sequence, e.g. a derived rank array.
    pub fn from_owned(text: Vec<T>) -> Self {
        Self::build(Cow::Owned(text))
    }

    fn build(text: Cow<'a, [T]>) -> Self {
        let n = text.len();
        assert!(n > 0, "lce index over empty text");

        let sa: Vec<I> = T::suffix_array(&text);
        debug_assert_eq!(sa.len(), n);

        let mut isa = vec![I::ZERO; n];
        for (rank, &pos) in sa.iter().enumerate() {
            isa[pos.to_usize()] = I::from_usize(rank);
        }

        // PLCP in text order; chunks restart their running LCP at zero
        let chunk = n.div_ceil(rayon::current_num_threads()).max(1);
        let mut plcp = vec![I::ZERO; n];
        plcp.par_chunks_mut(chunk).enumerate().for_each(|(c, out)| {
            let begin = c * chunk;
            let mut current = 0usize;
            for (offset, slot) in out.iter_mut().enumerate() {
                let i = begin + offset;
                let rank = isa[i].to_usize();
                if rank == 0 {
                    current = 0;
                    continue;
                }
                let prev = sa[rank - 1].to_usize();
                current += lce_extend(&text, i + current, prev + current);
                *slot = I::from_usize(current);
                current = current.saturating_sub(1);
            }
        });

        let lcp: Vec<I> = sa.par_iter().map(|&pos| plcp[pos.to_usize()]).collect();

        Self {
            text,
            isa,
            rmq: RmqSparse::new(lcp),
        }
    }

    /// The indexed sequence.
    pub fn text(&self) -> &[T] {
        &self.text
    }

    /// Suffix-array rank of every text position.
    pub fn isa(&self) -> &[I] {
        &self.isa
    }

    /// The LCP array in suffix-array order.
    pub fn lcp(&self) -> &[I] {
        self.rmq.values()
    }
}

/// Scan helper tolerating starts at the text end (where the LCE is 0).
fn lce_extend<T: Eq>(text: &[T], a: usize, b: usize) -> usize {
    if a == b || a >= text.len() || b >= text.len() {
        return 0;
    }
    lce_scan(text, text.len(), a.min(b), a.max(b))
}

impl<T, I> LceIndex for LceClassic<'_, T, I>
where
    T: SuffixSortable,
    I: IndexInt,
{
    type Char = T;

    #[inline]
    fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    fn char_at(&self, pos: usize) -> T {
        self.text[pos]
    }

    fn lce_lr(&self, l: usize, r: usize) -> usize {
        debug_assert!(l < r);
        let a = self.isa[l].to_usize();
        let b = self.isa[r].to_usize();
        self.rmq.values()[self.rmq.rmq_shifted(a, b)].to_usize()
    }
}
