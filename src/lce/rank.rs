//! Rank compression of 3tau-infixes at synchronizing positions.
//!
//! The sampled positions are sorted by their 3tau-infix with a parallel
//! comparator sort, positions whose infixes compare equal receive the same
//! rank, and the ranks are scattered back into position order. The
//! resulting sequence is what the classic LCE of the rank variant indexes:
//! equal ranks stand for equal 3tau-infixes, so an LCE over ranks counts how
//! many consecutive samples match.
//!
//! Two positions compare equal only if the full 3tau window matches and their
//! run descriptors agree; a window cut short by the text end orders the
//! shorter suffix first. Comparing the character after a complete window
//! would split classes that the synchronizing-set argument needs intact.

use std::cmp::Ordering;

use rayon::prelude::*;

use super::naive::lce_scan_up_to;
use crate::sss::SyncSet;
use crate::types::IndexInt;

/// Reduces the 3tau-infixes at the sampled positions to ranks, returned in
/// position order.
pub(super) fn reduce_ranks<I: IndexInt, const TAU: usize>(
    text: &[u8],
    sss: &SyncSet<I, TAU>,
) -> Vec<I> {
    let mut sorted: Vec<I> = sss.positions().to_vec();
    sorted.par_sort_unstable_by(|&a, &b| {
        cmp_three_tau(text, sss, a.to_usize(), b.to_usize())
    });

    // class boundaries in parallel, ranks by prefix sum
    let boundary: Vec<u8> = (1..sorted.len())
        .into_par_iter()
        .map(|k| {
            u8::from(!eq_three_tau(
                text,
                sss,
                sorted[k - 1].to_usize(),
                sorted[k].to_usize(),
            ))
        })
        .collect();
    let mut rank = 1usize;
    let mut tuples: Vec<(I, I)> = Vec::with_capacity(sorted.len());
    for (k, &pos) in sorted.iter().enumerate() {
        if k > 0 {
            rank += boundary[k - 1] as usize;
        }
        tuples.push((pos, I::from_usize(rank)));
    }

    tuples.par_sort_unstable_by_key(|&(pos, _)| pos);
    tuples.into_par_iter().map(|(_, rank)| rank).collect()
}

/// Orders two sampled positions by their 3tau-infix, breaking full-window
/// ties by run descriptor.
pub(super) fn cmp_three_tau<I: IndexInt, const TAU: usize>(
    text: &[u8],
    sss: &SyncSet<I, TAU>,
    lhs: usize,
    rhs: usize,
) -> Ordering {
    if lhs == rhs {
        return Ordering::Equal;
    }
    let n = text.len();
    let lce = lce_scan_up_to(text, lhs, rhs, 3 * TAU);
    if lce < 3 * TAU {
        if lhs.max(rhs) + lce == n {
            // one window hit the text end: the shorter suffix is smaller
            return if lhs > rhs {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        if text[lhs + lce] != text[rhs + lce] {
            return text[lhs + lce].cmp(&text[rhs + lce]);
        }
    }
    sss.run_info(lhs).cmp(&sss.run_info(rhs))
}

/// Whether two sampled positions carry the same 3tau-infix and run
/// descriptor.
pub(super) fn eq_three_tau<I: IndexInt, const TAU: usize>(
    text: &[u8],
    sss: &SyncSet<I, TAU>,
    lhs: usize,
    rhs: usize,
) -> bool {
    debug_assert_ne!(lhs, rhs);
    let n = text.len();
    let lce = lce_scan_up_to(text, lhs, rhs, 3 * TAU);
    if lce < 3 * TAU && (lhs.max(rhs) + lce == n || text[lhs + lce] != text[rhs + lce]) {
        return false;
    }
    sss.run_info(lhs) == sss.run_info(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: u128 = 296_819;

    #[test]
    fn test_ranks_respect_infix_order() {
        let text: Vec<u8> =
            b"Lorem ipsum dolor sit amet, consetetur sadipscing elitr, sed diam ".repeat(4);
        let sss: SyncSet<u32, 8> = SyncSet::with_base(&text, BASE, false);
        let ranks = reduce_ranks(&text, &sss);
        assert_eq!(ranks.len(), sss.len());

        let positions = sss.positions();
        for a in 0..positions.len() {
            for b in 0..positions.len() {
                if a == b {
                    continue;
                }
                let (pa, pb) = (positions[a].to_usize(), positions[b].to_usize());
                let by_text = cmp_three_tau(&text, &sss, pa, pb);
                let by_rank = ranks[a].cmp(&ranks[b]);
                if by_text == Ordering::Equal {
                    assert_eq!(by_rank, Ordering::Equal, "{pa} vs {pb}");
                } else {
                    assert_eq!(by_rank, by_text, "{pa} vs {pb}");
                }
            }
        }
    }

    #[test]
    fn test_equal_infixes_equal_ranks() {
        // period-64 text: samples 64 apart share their full 3tau window
        let unit: Vec<u8> = (0..64u8).map(|i| i.wrapping_mul(37)).collect();
        let text: Vec<u8> = unit.repeat(20);
        let sss: SyncSet<u32, 8> = SyncSet::with_base(&text, BASE, false);
        let ranks = reduce_ranks(&text, &sss);
        let positions = sss.positions();
        for a in 0..positions.len() {
            for b in a + 1..positions.len() {
                let (pa, pb) = (positions[a].to_usize(), positions[b].to_usize());
                if pb - pa == 64 && pb + 64 * 4 < text.len() {
                    assert_eq!(ranks[a], ranks[b], "positions {pa} and {pb}");
                }
            }
        }
    }
}
