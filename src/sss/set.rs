//! String synchronizing set of granularity tau.
//!
//! The set samples text positions in a locally consistent way: whether a
//! position is kept depends only on the 2tau characters after it, so equal
//! infixes always sample identically (consistency), and outside of
//! short-period runs every tau-long window contains a sample (density). Both
//! properties together let the LCE indices jump from any position to its
//! nearest sample and compare whole blocks at a time.
//!
//! Construction partitions the candidate range `[0, n - 2tau + 1)` into one
//! contiguous slice per worker. A first pass assumes no runs; if the
//! resulting set is denser than 4n/tau the text must contain long periodic
//! regions, and a second, run-aware pass rebuilds the set while recording
//! run descriptors for the comparison tiebreaks downstream.

use rayon::prelude::*;

use super::run_info::RunInfoMap;
use super::scan;
use crate::hash::RollingHasher;
use crate::types::IndexInt;

pub struct SyncSet<I: IndexInt = u32, const TAU: usize = 1024> {
    positions: Vec<I>,
    fps: Option<Vec<u128>>,
    run_info: RunInfoMap,
    runs_detected: bool,
}

impl<I: IndexInt, const TAU: usize> SyncSet<I, TAU> {
    /// Builds the set with a random hasher base.
    ///
    /// `keep_fps` retains the 107-bit window fingerprint of every member;
    /// the fingerprint-block LCE variant needs them, the rank variant does
    /// not.
    pub fn new(text: &[u8], keep_fps: bool) -> Self {
        Self::with_base(text, RollingHasher::<107>::random_base(), keep_fps)
    }

    /// Builds the set with an explicit base for reproducible output.
    pub fn with_base(text: &[u8], base: u128, keep_fps: bool) -> Self {
        let n = text.len();
        assert!(TAU >= 2 && TAU.is_power_of_two(), "tau must be a power of two");
        assert!(n > 5 * TAU, "text of length {n} too small for tau {TAU}");
        let sss_end = n - 2 * TAU + 1;

        let num_slices = rayon::current_num_threads().clamp(1, sss_end);
        let slice_size = sss_end / num_slices;
        let bounds: Vec<(usize, usize)> = (0..num_slices)
            .map(|t| {
                let begin = t * slice_size;
                let end = if t < num_slices - 1 {
                    (t + 1) * slice_size
                } else {
                    sss_end
                };
                (begin, end)
            })
            .collect();

        let mut parts: Vec<(Vec<I>, Vec<u128>)> = bounds
            .par_iter()
            .map(|&(begin, end)| scan::fill_slice::<I, TAU>(text, begin, end, base, keep_fps))
            .collect();

        let size: usize = parts.iter().map(|p| p.0.len()).sum();
        let runs_detected = size > n * 4 / TAU;
        let run_info = RunInfoMap::default();

        if runs_detected {
            parts = bounds
                .par_iter()
                .map(|&(begin, end)| {
                    scan::fill_slice_runs::<I, TAU>(text, begin, end, base, keep_fps, &run_info)
                })
                .collect();
        }

        // prefix-sum the per-slice write offsets, then concatenate in slice
        // order
        let mut write_pos = Vec::with_capacity(parts.len() + 1);
        write_pos.push(0usize);
        for part in &parts {
            write_pos.push(write_pos[write_pos.len() - 1] + part.0.len());
        }
        let merged = write_pos[write_pos.len() - 1];
        let total = merged + usize::from(runs_detected);

        let mut positions = vec![I::ZERO; total];
        par_scatter(&mut positions[..merged], parts.iter().map(|p| p.0.as_slice()));
        let mut fps = keep_fps.then(|| {
            let mut fps = vec![0u128; total];
            par_scatter(&mut fps[..merged], parts.iter().map(|p| p.1.as_slice()));
            fps
        });

        if runs_detected {
            // sentinel so queries inside trailing runs find a next sample
            positions[total - 1] = I::from_usize(sss_end);
            if let Some(fps) = fps.as_mut() {
                fps[total - 1] = scan::window_fp(text, sss_end, TAU, base);
            }
        }

        Self {
            positions,
            fps,
            run_info,
            runs_detected,
        }
    }

    /// Sampled text offsets, strictly increasing.
    #[inline]
    pub fn positions(&self) -> &[I] {
        &self.positions
    }

    /// Text offset of the k-th member.
    #[inline]
    pub fn position(&self, k: usize) -> usize {
        self.positions[k].to_usize()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub const fn tau(&self) -> usize {
        TAU
    }

    /// Window fingerprints of the members, if they were kept.
    #[inline]
    pub fn fps(&self) -> Option<&[u128]> {
        self.fps.as_deref()
    }

    pub fn fps_calculated(&self) -> bool {
        self.fps.is_some()
    }

    /// Moves the fingerprints out, leaving none behind.
    pub fn take_fps(&mut self) -> Option<Vec<u128>> {
        self.fps.take()
    }

    /// Drops the fingerprints once no dependent index needs them.
    pub fn free_fps(&mut self) {
        self.fps = None;
    }

    /// Run descriptor stored at `pos`, or 0 if `pos` precedes no long run.
    ///
    /// The descriptor is `+/-(n - sample_after_run + sample_before_run)`; its
    /// sign orders the suffix entering the run against the run period, so
    /// infix comparisons that exhaust a full 3tau window inside a run can be
    /// decided without scanning the run.
    #[inline]
    pub fn run_info(&self, pos: usize) -> i64 {
        self.run_info.get(pos)
    }

    /// Number of positions carrying a run descriptor.
    pub fn num_runs(&self) -> usize {
        self.run_info.len()
    }

    /// Whether construction switched to the run-aware pass.
    #[inline]
    pub fn has_runs(&self) -> bool {
        self.runs_detected
    }
}

/// Copies per-slice vectors into disjoint regions of `target`, in parallel.
fn par_scatter<'a, T: Copy + Send + Sync + 'a>(
    mut target: &mut [T],
    parts: impl Iterator<Item = &'a [T]>,
) {
    let mut regions = Vec::new();
    for part in parts {
        let (head, tail) = target.split_at_mut(part.len());
        regions.push((head, part));
        target = tail;
    }
    regions
        .into_par_iter()
        .for_each(|(region, part)| region.copy_from_slice(part));
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: u128 = 296_819;

    fn lorem(repeats: usize) -> Vec<u8> {
        b"Lorem ipsum dolor sit amet, consetetur sadipscing elitr, sed diam \
          nonumy eirmod tempor invidunt ut labore et dolore magna aliquyam erat, \
          sed diam voluptua. At vero eos et accusam et justo duo dolores et ea \
          rebum. Stet clita kasd gubergren, no sea takimata sanctus est Lorem \
          ipsum dolor sit amet. "
            .repeat(repeats)
    }

    #[test]
    fn test_sorted_and_bounded() {
        let text = lorem(3);
        let sss: SyncSet<u32, 16> = SyncSet::with_base(&text, BASE, true);
        assert!(sss.positions().windows(2).all(|w| w[0] < w[1]));
        let last = sss.position(sss.len() - 1);
        if sss.has_runs() {
            assert_eq!(last, text.len() - 2 * 16 + 1);
        } else {
            assert!(last <= text.len() - 2 * 16);
        }
    }

    #[test]
    fn test_determinism_with_fixed_base() {
        let text = lorem(3);
        let a: SyncSet<u32, 16> = SyncSet::with_base(&text, BASE, true);
        let b: SyncSet<u32, 16> = SyncSet::with_base(&text, BASE, true);
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.fps(), b.fps());
    }

    #[test]
    fn test_density_approximation() {
        // |S| stays in the ballpark of 2n/(tau+1) on non-repetitive text
        let text = lorem(3);
        let sss: SyncSet<u32, 16> = SyncSet::with_base(&text, BASE, false);
        let approx = text.len() * 2 / 17;
        assert!(sss.len() > approx / 2 && sss.len() < approx * 2);
        assert!(!sss.has_runs());
        assert_eq!(sss.num_runs(), 0);
    }

    #[test]
    fn test_fps_lifecycle() {
        let text = lorem(2);
        let mut sss: SyncSet<u32, 8> = SyncSet::with_base(&text, BASE, true);
        assert!(sss.fps_calculated());
        assert_eq!(sss.fps().map(<[u128]>::len), Some(sss.len()));
        let fps = sss.take_fps();
        assert_eq!(fps.map(|f| f.len()), Some(sss.len()));
        assert!(!sss.fps_calculated());

        let without: SyncSet<u32, 8> = SyncSet::with_base(&text, BASE, false);
        assert!(without.fps().is_none());
    }

    #[test]
    fn test_run_detection_on_periodic_text() {
        let mut text = b"Lorum ".to_vec();
        text.extend(b"ab".repeat(600));
        text.extend(lorem(2));
        let sss: SyncSet<u32, 16> = SyncSet::with_base(&text, BASE, true);
        assert!(sss.has_runs());
        assert!(sss.num_runs() > 0);
        // descriptor sits just before the run start
        assert_ne!(sss.run_info(5), 0);
        assert_eq!(sss.run_info(4), 0);
    }

    #[test]
    #[should_panic(expected = "too small")]
    fn test_rejects_short_text() {
        let text = [7u8; 100];
        let _: SyncSet<u32, 32> = SyncSet::with_base(&text, BASE, false);
    }
}
