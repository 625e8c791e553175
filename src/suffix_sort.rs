//! Suffix-array construction backends.
//!
//! The classic LCE index treats suffix sorting as a black box behind the
//! [`SuffixSortable`] trait. Byte texts go through the linear-time SA-IS
//! implementation of the `suffix_array` crate; every other element type is
//! sorted with a rayon comparator sort, which is what the rank-reduced
//! sequences of the synchronizing-set index use.

use rayon::prelude::*;
use suffix_array::SuffixArray;

use crate::types::IndexInt;

/// Element types whose texts can be suffix-sorted.
///
/// The returned array is a permutation of `[0, n)` ordering the suffixes
/// lexicographically, a proper prefix sorting before its extensions.
pub trait SuffixSortable: Copy + Ord + Send + Sync {
    fn suffix_array<I: IndexInt>(text: &[Self]) -> Vec<I>;
}

impl SuffixSortable for u8 {
    fn suffix_array<I: IndexInt>(text: &[Self]) -> Vec<I> {
        // SA-IS; the crate prepends the empty suffix, which we drop
        let (_, sa) = SuffixArray::new(text).into_parts();
        sa[1..].iter().map(|&pos| I::from_usize(pos as usize)).collect()
    }
}

macro_rules! impl_comparison_sort {
    ($($ty:ty),*) => {
        $(impl SuffixSortable for $ty {
            fn suffix_array<I: IndexInt>(text: &[Self]) -> Vec<I> {
                let mut sa: Vec<I> = (0..text.len()).map(I::from_usize).collect();
                sa.par_sort_unstable_by(|&a, &b| {
                    text[a.to_usize()..].cmp(&text[b.to_usize()..])
                });
                sa
            }
        })*
    };
}

impl_comparison_sort!(u16, u32, u64, u128);
