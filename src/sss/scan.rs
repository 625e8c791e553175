//! Per-slice scanners for synchronizing-set construction.
//!
//! A position i is synchronizing when the minimum fingerprint in the window
//! of tau-infixes `[i, i+tau]` sits at one of the two ends. Each worker streams
//! fingerprints through a ring buffer and tracks the minimum with a pointer
//! that is only recomputed once it expires from the window.
//!
//! The run-aware pass first computes the set Q of intervals that lie inside
//! periodic runs (detected with a tau/4 window: two equal-fingerprint minima
//! within tau/4 positions prove the period) and then repeats the scan while
//! skipping positions excluded by Q.

use super::run_info::RunInfoMap;
use crate::hash::{RingBuffer, RollingHasher};
use crate::types::IndexInt;

const NOT_FOUND: usize = usize::MAX;

fn primed_hasher(text: &[u8], start: usize, tau: usize, base: u128) -> RollingHasher {
    let mut rk = RollingHasher::with_base(tau as u64, base);
    for &c in &text[start..start + tau] {
        rk.roll_in(c);
    }
    rk
}

/// Fingerprint of the tau-window at `pos`, computed from scratch.
pub(super) fn window_fp(text: &[u8], pos: usize, tau: usize, base: u128) -> u128 {
    primed_hasher(text, pos, tau, base).fp()
}

/// Non-repetitive scan over `[from, to)`.
pub(super) fn fill_slice<I: IndexInt, const TAU: usize>(
    text: &[u8],
    from: usize,
    to: usize,
    base: u128,
    keep_fps: bool,
) -> (Vec<I>, Vec<u128>) {
    let mut sss = Vec::new();
    let mut member_fps = Vec::new();
    if from >= to {
        return (sss, member_fps);
    }

    let mut rk = primed_hasher(text, from, TAU, base);
    let mut fps = RingBuffer::new(4 * TAU);
    fps.resize(from);
    fps.push_back(rk.fp());

    let mut first_min = NOT_FOUND;
    for i in from..to {
        while fps.len() <= i + TAU {
            let j = fps.len();
            fps.push_back(rk.roll(text[j - 1], text[j + TAU - 1]));
        }

        if first_min == NOT_FOUND || first_min < i {
            first_min = i;
            for j in i..=i + TAU {
                if fps[j] < fps[first_min] {
                    first_min = j;
                }
            }
        } else if fps[i + TAU] < fps[first_min] {
            first_min = i + TAU;
        }

        if fps[first_min] == fps[i] || fps[first_min] == fps[i + TAU] {
            sss.push(I::from_usize(i));
            if keep_fps {
                member_fps.push(fps[i]);
            }
        }
    }
    (sss, member_fps)
}

/// Run-aware scan over `[from, to)`. Maximal tau-long runs intersecting the
/// slice are computed first; their interiors are excluded from the minimum
/// search, and runs long enough to synchronize suffix comparisons leave a
/// descriptor in `run_info`.
pub(super) fn fill_slice_runs<I: IndexInt, const TAU: usize>(
    text: &[u8],
    from: usize,
    to: usize,
    base: u128,
    keep_fps: bool,
    run_info: &RunInfoMap,
) -> (Vec<I>, Vec<u128>) {
    let mut sss = Vec::new();
    let mut member_fps = Vec::new();
    if from >= to {
        return (sss, member_fps);
    }

    let mut qset = calculate_q::<TAU>(text, from, to, base, run_info);
    qset.push((NOT_FOUND, NOT_FOUND));
    let mut q_cur = 0usize;

    let mut rk = primed_hasher(text, from, TAU, base);
    let mut fps = RingBuffer::new(4 * TAU);
    fps.resize(from);
    fps.push_back(rk.fp());

    let mut first_min = NOT_FOUND;
    let mut i = from;
    while i < to {
        while fps.len() <= i + TAU {
            let j = fps.len();
            fps.push_back(rk.roll(text[j - 1], text[j + TAU - 1]));
        }
        while qset[q_cur].1 < i {
            q_cur += 1;
        }

        if first_min == NOT_FOUND || first_min < i {
            // minimum expired: rescan the window, stepping over Q intervals
            let mut q_scan = q_cur;
            let mut j = i;
            while j <= i + TAU {
                if qset[q_scan].1 < j {
                    q_scan += 1;
                }
                if qset[q_scan].0 <= j {
                    j = qset[q_scan].1 + 1;
                    continue;
                }
                if first_min == NOT_FOUND || first_min < i || fps[j] < fps[first_min] {
                    first_min = j;
                }
                j += 1;
            }
            if first_min == NOT_FOUND || first_min < i {
                // whole window excluded: jump to the first position whose
                // window reaches past the run
                debug_assert!(qset[q_scan].1 != NOT_FOUND);
                i = qset[q_scan].1 - TAU + 1;
                continue;
            }
        } else {
            // known minimum: only the entering position can undercut it
            let mut q_scan = q_cur;
            while qset[q_scan].1 < i + TAU {
                q_scan += 1;
            }
            if qset[q_scan].0 > i + TAU && fps[i + TAU] < fps[first_min] {
                first_min = i + TAU;
            }
        }

        if fps[first_min] == fps[i] || fps[first_min] == fps[i + TAU] {
            sss.push(I::from_usize(i));
            if keep_fps {
                member_fps.push(fps[i]);
            }
        }
        i += 1;
    }
    (sss, member_fps)
}

/// Computes the Q set for `[from, to)`: inclusive intervals
/// `[start, end - tau + 1]` of positions excluded from the synchronizing set
/// because they lie inside a run of length >= tau with period < tau/4.
fn calculate_q<const TAU: usize>(
    text: &[u8],
    from: usize,
    to: usize,
    base: u128,
    run_info: &RunInfoMap,
) -> Vec<(usize, usize)> {
    debug_assert!(TAU >= 8, "run detection needs a tau/4 window of at least 2");
    let n = text.len();
    let small_tau = TAU / 4;
    let mut qset = Vec::new();

    let mut rk = primed_hasher(text, from, small_tau, base);
    let mut fps = RingBuffer::new(4 * TAU);
    fps.resize(from);
    fps.push_back(rk.fp());

    let mut i = from;
    while i < to + TAU {
        while fps.len() < (i + TAU).min(n - small_tau + 1) {
            let j = fps.len();
            fps.push_back(rk.roll(text[j - 1], text[j + small_tau - 1]));
        }

        // first window minimum
        let mut first_min = i;
        for j in i..i + small_tau {
            if fps[j] < fps[first_min] {
                first_min = j;
            }
        }
        // next minimum after it
        let mut next_min = first_min + 1;
        for j in next_min..first_min + small_tau {
            if fps[j] < fps[next_min] {
                next_min = j;
            }
        }

        if fps[next_min] != fps[first_min] {
            i = next_min;
            continue;
        }

        // two equal minima prove a candidate period; extend the run naively
        let period = next_min - first_min;
        let mut run_start = first_min;
        while run_start > from && text[run_start - 1] == text[run_start + period - 1] {
            run_start -= 1;
        }
        let mut run_end = next_min;
        while run_end < to + 2 * TAU - 2 && text[run_end + 1] == text[run_end + 1 - period] {
            run_end += 1;
        }

        if run_end - run_start + 1 < TAU {
            i = next_min;
            continue;
        }

        qset.push((run_start, run_end - TAU + 1));
        let resume = run_end - small_tau + 1;
        record_run_info::<TAU>(text, n, run_start, run_end, period, run_info);
        i = resume;
    }
    qset
}

/// Stores the descriptor of a run long enough to synchronize suffix
/// comparisons (>= 3tau - 1) at the position just before the run. Skipped
/// when the run starts at the text border or extends into the previous
/// slice (that slice is responsible for it). The length test uses the true
/// text-wide run end, never the slice-capped one, so the outcome does not
/// depend on where the slice boundaries fall.
fn record_run_info<const TAU: usize>(
    text: &[u8],
    n: usize,
    run_start: usize,
    mut run_end: usize,
    period: usize,
    run_info: &RunInfoMap,
) {
    if run_start == 0 {
        return;
    }
    if text[run_start - 1] == text[run_start + period - 1] {
        return;
    }
    // the slice-local scan stops early; find the true run end
    while run_end < n - 1 && text[run_end + 1] == text[run_end + 1 - period] {
        run_end += 1;
    }
    if run_end - run_start + 1 < 3 * TAU - 1 {
        return;
    }

    let sss_before = run_start - 1;
    let sss_after = run_end - 2 * TAU + 2;
    let info = (n - sss_after + sss_before) as i64;
    let ascending = run_end + 1 < n && text[run_end + 1] > text[run_end + 1 - period];
    run_info.insert(sss_before, if ascending { info } else { -info });
}
