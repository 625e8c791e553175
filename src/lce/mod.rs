//! Longest-common-extension indices.
//!
//! Every index answers `lce(i, j)`: the length of the longest common prefix
//! of the suffixes starting at i and j. The variants trade construction
//! cost against query cost:
//!
//! - [`naive`] - no construction, wordwise scan per query
//! - [`classic`] - suffix array + LCP + RMQ, O(1) queries
//! - [`fp`] - in-place fingerprint transform, O(log n) queries
//! - [`sss_naive`] - synchronizing set + fingerprint-block scan
//! - [`sss_rank`] - synchronizing set + rank reduction + classic LCE over
//!   the samples
//!
//! The derived queries (`lce_mismatch`, `is_leq_suffix`, `lce_up_to`) are
//! provided by the [`LceIndex`] trait and behave identically across
//! variants.

pub mod classic;
pub mod fp;
pub mod naive;
mod rank;
pub mod sss_naive;
pub mod sss_rank;

pub use classic::LceClassic;
pub use fp::LceFp;
pub use naive::LceNaive;
pub use sss_naive::LceSssNaive;
pub use sss_rank::LceSssRank;

/// Common query surface of every LCE index.
///
/// Implementors provide the text length, character access and the core
/// `lce_lr`; the derived forms come for free. Query preconditions
/// (`i != j` for `lce_uneq`, `l < r` for `lce_lr`, indices within the text)
/// abort in debug builds and are undefined in release builds; only `lce`
/// itself defines the `i == j` case.
pub trait LceIndex {
    type Char: Copy + Ord;

    /// Length of the indexed text.
    fn len(&self) -> usize;

    /// Character at `pos`.
    fn char_at(&self, pos: usize) -> Self::Char;

    /// Number of common characters of the suffixes at `l` and `r`, with
    /// `l < r`.
    fn lce_lr(&self, l: usize, r: usize) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of common characters of the suffixes at `i` and `j`.
    fn lce(&self, i: usize, j: usize) -> usize {
        if i == j {
            debug_assert!(i < self.len());
            return self.len() - i;
        }
        self.lce_uneq(i, j)
    }

    /// As [`lce`](Self::lce), requiring `i != j`.
    fn lce_uneq(&self, i: usize, j: usize) -> usize {
        debug_assert_ne!(i, j);
        self.lce_lr(i.min(j), i.max(j))
    }

    /// Returns `(mismatch, lce)` where `mismatch` tells whether the common
    /// extension ends at unequal characters rather than at the text end.
    fn lce_mismatch(&self, i: usize, j: usize) -> (bool, usize) {
        if i == j {
            debug_assert!(i < self.len());
            return (false, self.len() - i);
        }
        let (l, r) = (i.min(j), i.max(j));
        let lce = self.lce_lr(l, r);
        (r + lce != self.len(), lce)
    }

    /// Whether the suffix at `i` is lexicographically <= the suffix at `j`,
    /// with the end of the text ordering below every character. Requires
    /// `i != j`.
    fn is_leq_suffix(&self, i: usize, j: usize) -> bool {
        debug_assert_ne!(i, j);
        let lce = self.lce_uneq(i, j);
        i + lce == self.len()
            || (j + lce != self.len() && self.char_at(i + lce) < self.char_at(j + lce))
    }

    /// Bounded form: `(mismatch, lce)` with `lce` capped at `up_to`
    /// characters past `max(i, j)`; `mismatch` tells whether unequal
    /// characters were found before the cap. `i == j` yields
    /// `(false, len - i)` uncapped.
    fn lce_up_to(&self, i: usize, j: usize, up_to: usize) -> (bool, usize) {
        if i == j {
            debug_assert!(i < self.len());
            return (false, self.len() - i);
        }
        let (l, r) = (i.min(j), i.max(j));
        let lce_max = (r + up_to).min(self.len()) - r;
        let lce = self.lce_lr(l, r).min(lce_max);
        (lce < lce_max, lce)
    }
}
