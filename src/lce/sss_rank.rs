//! SSS-based LCE over rank-compressed samples.
//!
//! Instead of comparing window fingerprints one by one, the 3tau-infixes at
//! the sampled positions are reduced to small integer ranks and a classic
//! LCE index is built over the rank sequence. A long extension then costs
//! one head scan, one O(1) rank-LCE and one tail scan.
//!
//! The `PREFER_LONG` strategy flag switches the head scan: the default
//! scans up to 3tau characters before touching the successor index; the
//! long-prefer form looks the successors up first and caps the scan at the
//! distance to the synchronizing position, which avoids wasted scanning
//! when extensions are usually long.

use super::classic::LceClassic;
use super::naive::lce_scan;
use super::rank::reduce_ranks;
use super::LceIndex;
use crate::pred::BucketPred;
use crate::sss::SyncSet;
use crate::suffix_sort::SuffixSortable;
use crate::types::IndexInt;

pub struct LceSssRank<'a, I = u32, const TAU: usize = 1024, const PREFER_LONG: bool = false>
where
    I: IndexInt + SuffixSortable,
{
    text: &'a [u8],
    sss: SyncSet<I, TAU>,
    pred: BucketPred<I>,
    rank_lce: LceClassic<'static, I, I>,
}

impl<'a, I, const TAU: usize, const PREFER_LONG: bool> LceSssRank<'a, I, TAU, PREFER_LONG>
where
    I: IndexInt + SuffixSortable,
{
    /// Builds the index with a random hasher base.
    pub fn new(text: &'a [u8]) -> Self {
        Self::from_set(text, SyncSet::new(text, false))
    }

    /// Builds the index with an explicit hasher base.
    pub fn with_base(text: &'a [u8], base: u128) -> Self {
        Self::from_set(text, SyncSet::with_base(text, base, false))
    }

    fn from_set(text: &'a [u8], sss: SyncSet<I, TAU>) -> Self {
        let ranks = reduce_ranks(text, &sss);
        let rank_lce = LceClassic::from_owned(ranks);
        let pred = BucketPred::new(sss.positions().to_vec(), TAU.ilog2());
        Self {
            text,
            sss,
            pred,
            rank_lce,
        }
    }

    pub fn sync_set(&self) -> &SyncSet<I, TAU> {
        &self.sss
    }
}

impl<I, const TAU: usize, const PREFER_LONG: bool> LceIndex for LceSssRank<'_, I, TAU, PREFER_LONG>
where
    I: IndexInt + SuffixSortable,
{
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
        let positions = self.sss.positions();
        let n = self.text.len();
        let lce_max = n - r;

        let (l_succ, r_succ);
        if PREFER_LONG {
            let l_res = self.pred.successor(I::from_usize(l));
            let r_res = self.pred.successor(I::from_usize(r));
            l_succ = l_res.pos;
            r_succ = r_res.pos;

            let mut head_max = (3 * TAU).min(lce_max);
            if l_res.exists && r_res.exists {
                let l_dist = positions[l_succ].to_usize() - l;
                let r_dist = positions[r_succ].to_usize() - r;
                if l_dist == r_dist {
                    head_max = head_max.min(l_dist);
                }
            }
            let head = lce_scan(self.text, r + head_max, l, r);
            if head < head_max || head == lce_max {
                return head;
            }
            debug_assert!(l_res.exists && r_res.exists);
        } else {
            let head_max = (3 * TAU).min(lce_max);
            let head = lce_scan(self.text, r + head_max, l, r);
            if head < head_max || head == lce_max {
                return head;
            }
            let l_res = self.pred.successor(I::from_usize(l));
            let r_res = self.pred.successor(I::from_usize(r));
            debug_assert!(l_res.exists && r_res.exists);
            l_succ = l_res.pos;
            r_succ = r_res.pos;
        }

        let l_dist = positions[l_succ].to_usize() - l;
        let r_dist = positions[r_succ].to_usize() - r;

        // desynchronized successors mean both positions sit at run ends
        if l_dist != r_dist {
            return l_dist.min(r_dist) + 2 * TAU - 1;
        }

        // equal-rank prefix of the two sample sequences
        let block = self.rank_lce.lce_lr(l_succ, r_succ);
        let l_block = l_succ + block;
        let r_block = r_succ + block;
        debug_assert_eq!(
            positions[l_block].to_usize() - l,
            positions[r_block].to_usize() - r
        );

        // mismatching samples: either the mismatch lies within their 3tau
        // window, or both windows run into the next run boundary
        let l_pos = positions[l_block].to_usize();
        let r_pos = positions[r_block].to_usize();
        let tail_lce_max = n - r_pos;
        let tail_max = (3 * TAU).min(tail_lce_max);
        let tail = lce_scan(self.text, r_pos + tail_max, l_pos, r_pos);
        if tail < tail_max || tail == tail_lce_max {
            return (l_pos - l) + tail;
        }

        debug_assert!(r_block + 1 < positions.len());
        let l_next = positions[l_block + 1].to_usize() - l;
        let r_next = positions[r_block + 1].to_usize() - r;
        l_next.min(r_next) + 2 * TAU - 1
    }
}
