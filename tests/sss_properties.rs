//! Structural invariants of the string synchronizing set.
//!
//! The checker verifies, against an externally computed suffix array and
//! LCP array: sortedness, the last-position rule, consistency (equal
//! 2tau-infixes sample identically), fingerprint agreement on equal
//! 3tau-infixes, the density bound, and that run descriptors exist exactly
//! at the samples preceding long runs and grow along the suffix-array
//! order.

use lcx::lce::naive::lce_scan_uneq;
use lcx::sss::SyncSet;
use lcx::suffix_sort::SuffixSortable;
use std::collections::HashSet;

const BASE: u128 = 296_819;

fn lorem(repeats: usize) -> Vec<u8> {
    b"Lorem ipsum dolor sit amet, consetetur sadipscing elitr, sed diam \
      nonumy eirmod tempor invidunt ut labore et dolore magna aliquyam erat, \
      sed diam voluptua. At vero eos et accusam et justo duo dolores et ea \
      rebum. Stet clita kasd gubergren, no sea takimata sanctus est Lorem \
      ipsum dolor sit amet. "
        .repeat(repeats)
}

/// Suffix array plus LCP of adjacent suffixes, from the external backend.
fn sa_and_lcp(text: &[u8]) -> (Vec<usize>, Vec<usize>) {
    let sa: Vec<usize> = u8::suffix_array::<u64>(text)
        .into_iter()
        .map(|p| p as usize)
        .collect();
    let mut lcp = vec![0usize; sa.len()];
    for k in 1..sa.len() {
        lcp[k] = lce_scan_uneq(text, sa[k - 1], sa[k]);
    }
    (sa, lcp)
}

fn smallest_period(infix: &[u8]) -> usize {
    (1..infix.len())
        .find(|&p| (p..infix.len()).all(|q| infix[q] == infix[q - p]))
        .unwrap_or(infix.len())
}

fn check_sync_set<const TAU: usize>(text: &[u8], sss: &SyncSet<u32, TAU>) {
    let n = text.len();
    let positions: Vec<usize> = sss.positions().iter().map(|&p| p as usize).collect();

    // sorted, strictly increasing
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "not sorted");

    // last admissible position, or the sentinel for repetitive texts
    let last_admissible = n - 2 * TAU;
    if sss.has_runs() {
        assert_eq!(*positions.last().unwrap(), last_admissible + 1, "sentinel missing");
    } else {
        assert!(*positions.last().unwrap() <= last_admissible, "last position too large");
    }

    let (sa, lcp) = sa_and_lcp(text);
    let member: HashSet<usize> = positions.iter().copied().collect();
    let index_of = |pos: usize| positions.binary_search(&pos).expect("member position");

    // consistency: suffixes sharing a 2tau-prefix sample identically, and
    // members sharing a 3tau-prefix store equal fingerprints
    for k in 1..sa.len() {
        if lcp[k] < 2 * TAU {
            continue;
        }
        let (a, b) = (sa[k - 1], sa[k]);
        assert_eq!(
            member.contains(&a),
            member.contains(&b),
            "consistency violated at {a} / {b}"
        );
        if lcp[k] >= 3 * TAU && member.contains(&a) {
            if let Some(fps) = sss.fps() {
                assert_eq!(
                    fps[index_of(a)],
                    fps[index_of(b)],
                    "fingerprints differ at {a} / {b}"
                );
            }
        }
    }

    // gaps wider than tau only ever follow a sample that records a run
    if sss.has_runs() {
        for w in positions.windows(2) {
            if w[1] - w[0] > TAU {
                assert_ne!(sss.run_info(w[0]), 0, "missing run info at {}", w[0]);
            }
        }
    }

    // run descriptors are monotone along the suffix-array order wherever
    // the LCP keeps reaching 3tau - 1
    let mut last_info = i64::MIN;
    for k in 1..sa.len() {
        if lcp[k] >= 3 * TAU - 1 {
            if sa[k] == 0 {
                continue;
            }
            let info = sss.run_info(sa[k] - 1);
            if info == 0 {
                continue;
            }
            assert!(
                info >= last_info,
                "run info falls along the suffix array: {last_info} then {info}"
            );
            last_info = info;
        } else {
            last_info = i64::MIN;
        }
    }

    // density: a tau-window without samples implies a short-period 3tau infix
    for i in 0..n.saturating_sub(3 * TAU - 1) {
        if (i..i + TAU).any(|p| member.contains(&p)) {
            continue;
        }
        let period = smallest_period(&text[i..i + 3 * TAU - 1]);
        assert!(
            period <= TAU / 3,
            "no sample in [{i}, {}) but period is {period}",
            i + TAU
        );
    }
}

fn check_tau<const TAU: usize>(text: &[u8]) {
    let sss: SyncSet<u32, TAU> = SyncSet::with_base(text, BASE, true);
    // sparse: |S| stays within a constant factor of 2n / (tau + 1)
    let approx = text.len() * 2 / (TAU + 1);
    assert!(sss.len() <= approx.max(1) * 4, "set too dense: {}", sss.len());
    check_sync_set(text, &sss);
}

#[test]
fn test_lorem_small_tau_grid() {
    let text = lorem(1);
    check_tau::<2>(&text);
    check_tau::<4>(&text);
    check_tau::<8>(&text);
    check_tau::<16>(&text);
    check_tau::<32>(&text);
}

#[test]
fn test_lorem_repeated_tau_grid() {
    let text = lorem(4);
    check_tau::<2>(&text);
    check_tau::<4>(&text);
    check_tau::<8>(&text);
    check_tau::<16>(&text);
    check_tau::<32>(&text);
}

#[test]
fn test_repetitive_text() {
    let mut text = b"Lorum ".to_vec();
    text.extend(b"ab".repeat(600));
    text.extend(&lorem(2)[..400]);
    text.extend(b"ab".repeat(500));
    text.extend(b"nonumy eirmod tempor invidunt ut labore.".as_slice());
    text.extend(&lorem(2)[..300]);

    let sss16: SyncSet<u32, 16> = SyncSet::with_base(&text, BASE, true);
    check_sync_set(&text, &sss16);
    let sss32: SyncSet<u32, 32> = SyncSet::with_base(&text, BASE, true);
    check_sync_set(&text, &sss32);

    assert!(sss16.has_runs());
    assert!(sss16.num_runs() >= 2);

    // descriptors bracket the two runs: at position 5 (before the run
    // starting at 6) and at 1605 (before the run starting at 1606)
    let first = sss16.run_info(5);
    let second = sss16.run_info(1605);
    assert_ne!(first, 0);
    assert_ne!(second, 0);
    // first run is followed by ' ' < 'a', second by 'n' > 'a': the
    // descriptors order accordingly and grow along the text
    assert!(first < 0);
    assert!(second > 0);
    assert!(first < second);

    assert!(sss32.has_runs());
    assert_ne!(sss32.run_info(5), 0);
    assert_ne!(sss32.run_info(1605), 0);
    assert!(sss32.run_info(5) < sss32.run_info(1605));
}

#[test]
fn test_iota_text() {
    // long period-256 structure: dense sampling but no short-period runs
    let mut text: Vec<u8> = (0..1000).map(|i| (0x80u8).wrapping_add(i as u8)).collect();
    text.extend_from_within(..);
    let sss: SyncSet<u32, 16> = SyncSet::with_base(&text, BASE, true);
    check_sync_set(&text, &sss);
    let sss32: SyncSet<u32, 32> = SyncSet::with_base(&text, BASE, true);
    check_sync_set(&text, &sss32);
}
