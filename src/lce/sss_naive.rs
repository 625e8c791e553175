//! SSS-based LCE with fingerprint-block comparison.
//!
//! Short extensions (under 3tau characters) are answered by a plain scan.
//! Longer ones jump to the synchronizing positions following l and r; by
//! consistency these sit at the same distance, so the remaining comparison
//! proceeds sample by sample over the stored window fingerprints until a
//! block differs, and a final scan of the mismatching block pins the exact
//! length. When the two successors sit at different distances the positions
//! must be inside runs, and the answer follows from the run structure
//! directly.

use super::naive::lce_scan;
use super::LceIndex;
use crate::pred::BucketPred;
use crate::sss::SyncSet;
use crate::types::IndexInt;

/// Low bits ignored by the successor bucket table.
const PRED_LO_BITS: u32 = 7;

pub struct LceSssNaive<'a, I: IndexInt = u32, const TAU: usize = 1024> {
    text: &'a [u8],
    sss: SyncSet<I, TAU>,
    fps: Vec<u128>,
    pred: BucketPred<I>,
}

impl<'a, I: IndexInt, const TAU: usize> LceSssNaive<'a, I, TAU> {
    /// Builds the index with a random hasher base.
    pub fn new(text: &'a [u8]) -> Self {
        Self::from_set(text, SyncSet::new(text, true))
    }

    /// Builds the index with an explicit hasher base.
    pub fn with_base(text: &'a [u8], base: u128) -> Self {
        Self::from_set(text, SyncSet::with_base(text, base, true))
    }

    fn from_set(text: &'a [u8], mut sss: SyncSet<I, TAU>) -> Self {
        let fps = sss.take_fps().expect("synchronizing set built with fingerprints");
        let pred = BucketPred::new(sss.positions().to_vec(), PRED_LO_BITS);
        Self {
            text,
            sss,
            fps,
            pred,
        }
    }

    pub fn sync_set(&self) -> &SyncSet<I, TAU> {
        &self.sss
    }
}

impl<I: IndexInt, const TAU: usize> LceIndex for LceSssNaive<'_, I, TAU> {
    type Char = u8;

    #[inline]
    fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    fn char_at(&self, pos: usize) -> u8 {
        self.text[pos]
    }

    fn lce_lr(&self, l: usize, r: usize) -> usize {
        debug_assert!(l < r && r < self.text.len());
        let n = self.text.len();
        let lce_max = n - r;

        // head scan of at most 3tau characters
        let head_max = (3 * TAU).min(lce_max);
        let head = lce_scan(self.text, r + head_max, l, r);
        if head < head_max || head == lce_max {
            return head;
        }

        let positions = self.sss.positions();
        let l_succ = self.pred.successor(I::from_usize(l));
        let r_succ = self.pred.successor(I::from_usize(r));
        debug_assert!(l_succ.exists && r_succ.exists);
        let l_dist = positions[l_succ.pos].to_usize() - l;
        let r_dist = positions[r_succ.pos].to_usize() - r;

        // successors at different distances only happen at run ends, where
        // the extension length follows from the run structure
        if l_dist != r_dist {
            return l_dist.min(r_dist) + 2 * TAU - 1;
        }

        // compare whole tau-windows through the member fingerprints
        let mut block = 0usize;
        while l_succ.pos + block < self.fps.len()
            && r_succ.pos + block < self.fps.len()
            && self.fps[l_succ.pos + block] == self.fps[r_succ.pos + block]
        {
            block += 1;
        }
        debug_assert!(block >= 1);

        let l_mismatch = positions[l_succ.pos + block - 1].to_usize();
        let r_mismatch = positions[r_succ.pos + block - 1].to_usize();
        let tail = lce_scan(self.text, n, l_mismatch, r_mismatch);
        (l_mismatch - l) + tail
    }

    fn lce_up_to(&self, i: usize, j: usize, up_to: usize) -> (bool, usize) {
        if i == j {
            debug_assert!(i < self.len());
            return (false, self.len() - i);
        }
        let (l, r) = (i.min(j), i.max(j));
        let lce_max = (self.len() - r).min(up_to);
        let head_max = (3 * TAU).min(lce_max);
        let head = lce_scan(self.text, r + head_max, l, r);
        if head < head_max {
            return (true, head);
        }
        if head == lce_max {
            return (false, head);
        }
        let lce = self.lce_lr(l, r).min(lce_max);
        (lce < lce_max, lce)
    }
}
