//! In-place fingerprint LCE.
//!
//! The byte text is taken over exclusively and reinterpreted as big-endian
//! 64-bit blocks. Each block is overwritten with the Karp-Rabin prefix
//! fingerprint (base 2^64) of the text up to and including that block,
//! reduced modulo the prime p = 2^63 + 29; bit 63 records whether the raw
//! block value was >= p. Because 2p > 2^64, that single carry bit is enough
//! to reconstruct the raw block from two adjacent fingerprints in O(1), so
//! the index needs no memory beyond the text it replaced.
//!
//! A query first scans a small window word by word. If the window is
//! exhausted, it doubles a candidate distance while the prefix fingerprints
//! agree, then binary-searches the mismatch: each halving step re-verifies
//! the invariant `fp(l, l+add) = fp(r, r+add)` with a fresh fingerprint
//! comparison. A final word scan pins the mismatching byte.
//!
//! `reverse_transform` restores the original byte buffer exactly.

use super::LceIndex;
use crate::hash::modular::{mult_mod_u64, pow_mod_u64};

/// The prime: smallest prime above 2^63, so `2^64*p + p` stays within 128
/// bits and raw blocks fit below 2p.
const PRIME: u64 = 0x8000_0000_0000_001d;
const PRIME_WIDE: u128 = PRIME as u128;
const MASK63: u64 = (1 << 63) - 1;
const CARRY: u64 = 1 << 63;

/// Fingerprint LCE index with a head-scan window of `T_NAIVE` characters
/// (a power of two, at least 8).
pub struct LceFp<const T_NAIVE: usize = 32> {
    blocks: Vec<u64>,
    size: usize,
    /// `2^(8 * 2^m) mod p`: the scale factors of every power-of-two
    /// character distance.
    scales: [u64; 64],
}

impl<const T_NAIVE: usize> LceFp<T_NAIVE> {
    const VALID_WINDOW: () = assert!(T_NAIVE >= 8 && T_NAIVE.is_power_of_two());

    /// Consumes the text and transforms it into the fingerprint form.
    pub fn new(text: Vec<u8>) -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::VALID_WINDOW;
        use rayon::prelude::*;

        let size = text.len();

        // typed big-endian block view; the trailing partial block is
        // zero-padded low
        let mut blocks: Vec<u64> = text
            .par_chunks(8)
            .map(|chunk| {
                let mut bytes = [0u8; 8];
                bytes[..chunk.len()].copy_from_slice(chunk);
                u64::from_be_bytes(bytes)
            })
            .collect();
        drop(text);

        // per-slice Horner fingerprints, then a serial prefix pass seeding
        // every slice with the fingerprint of everything before it
        let chunk_len = blocks
            .len()
            .div_ceil(rayon::current_num_threads())
            .max(1);
        let slice_fps: Vec<u64> = blocks
            .par_chunks(chunk_len)
            .map(|slice| {
                let mut fp: u128 = 0;
                for &block in slice {
                    fp = ((fp << 64) + block as u128) % PRIME_WIDE;
                }
                fp as u64
            })
            .collect();

        let two_pow_64 = ((1u128 << 64) % PRIME_WIDE) as u64;
        let mut seeds = vec![0u64; slice_fps.len()];
        let mut running: u64 = 0;
        for (index, slice) in blocks.chunks(chunk_len).enumerate() {
            seeds[index] = running;
            let shift = pow_mod_u64(two_pow_64, slice.len() as u64, PRIME);
            running = ((mult_mod_u64(running, shift, PRIME) as u128 + slice_fps[index] as u128)
                % PRIME_WIDE) as u64;
        }

        // overwrite every block with its prefix fingerprint plus carry bit
        blocks
            .par_chunks_mut(chunk_len)
            .enumerate()
            .for_each(|(index, slice)| {
                let mut fp = seeds[index] as u128;
                for block in slice.iter_mut() {
                    let raw = *block as u128;
                    fp = ((fp << 64) + raw) % PRIME_WIDE;
                    debug_assert!(fp < CARRY as u128);
                    *block = fp as u64 | (u64::from(raw >= PRIME_WIDE) << 63);
                }
            });

        let mut scales = [0u64; 64];
        scales[0] = 1 << 8;
        for m in 1..64 {
            scales[m] = mult_mod_u64(scales[m - 1], scales[m - 1], PRIME);
        }

        Self {
            blocks,
            size,
            scales,
        }
    }

    /// Undoes the transform, returning a buffer byte-equal to the one the
    /// index was built from.
    pub fn reverse_transform(mut self) -> Vec<u8> {
        // high to low, so block i-1 still holds its fingerprint when block i
        // is reconstructed; block 0 loses its carry bit in the process
        for i in (0..self.blocks.len()).rev() {
            self.blocks[i] = self.block_raw(i);
        }
        let mut bytes = Vec::with_capacity(self.blocks.len() * 8);
        for block in &self.blocks {
            bytes.extend_from_slice(&block.to_be_bytes());
        }
        bytes.truncate(self.size);
        bytes
    }

    /// Raw pre-transform value of block `i`, reconstructed from the two
    /// adjacent prefix fingerprints and the carry bit.
    #[inline]
    fn block_raw(&self, i: usize) -> u64 {
        let shifted_prev = if i == 0 {
            0
        } else {
            ((((self.blocks[i - 1] & MASK63) as u128) << 64) % PRIME_WIDE) as u64
        };
        let fp = self.blocks[i] & MASK63;
        let mut raw = ((fp as u128 + PRIME_WIDE - shifted_prev as u128) % PRIME_WIDE) as u128;
        if self.blocks[i] & CARRY != 0 {
            raw += PRIME_WIDE;
        }
        debug_assert!(raw <= u64::MAX as u128);
        raw as u64
    }

    /// Fingerprint of `T[0..=k]`.
    #[inline]
    fn prefix_fp(&self, k: usize) -> u64 {
        let i = k / 8;
        let pad = ((k + 1) % 8) * 8;
        if pad == 0 {
            return self.blocks[i] & MASK63;
        }
        let prev = if i == 0 {
            0u128
        } else {
            (self.blocks[i - 1] & MASK63) as u128
        };
        let head = (self.block_raw(i) >> (64 - pad)) as u128;
        (((prev << pad) + head) % PRIME_WIDE) as u64
    }

    /// Big-endian 64-bit word of `T[pos..pos+8]`, zero-padded past the end.
    #[inline]
    fn word_at(&self, pos: usize) -> u64 {
        let i = pos / 8;
        let offset = pos % 8;
        let first = if i < self.blocks.len() {
            self.block_raw(i)
        } else {
            0
        };
        if offset == 0 {
            return first;
        }
        let second = if i + 1 < self.blocks.len() {
            self.block_raw(i + 1)
        } else {
            0
        };
        (first << (8 * offset)) | (second >> (64 - 8 * offset))
    }

    /// Whether `T[l..l+dist) = T[r..r+dist)` according to the fingerprints;
    /// `scale` must be `2^(8*dist) mod p`.
    #[inline]
    fn fp_eq(&self, l: usize, r: usize, dist: usize, scale: u64) -> bool {
        let fp_l_end = self.prefix_fp(l + dist - 1) as u128;
        let fp_r_end = self.prefix_fp(r + dist - 1) as u128;
        let fp_l_before = if l == 0 { 0 } else { self.prefix_fp(l - 1) };
        let fp_r_before = self.prefix_fp(r - 1);
        let lhs = (fp_l_end + mult_mod_u64(fp_r_before, scale, PRIME) as u128) % PRIME_WIDE;
        let rhs = (fp_r_end + mult_mod_u64(fp_l_before, scale, PRIME) as u128) % PRIME_WIDE;
        lhs == rhs
    }

    /// Scale factor `2^(8*dist) mod p` for a power-of-two `dist`.
    #[inline]
    fn scale_for(&self, dist: usize) -> u64 {
        debug_assert!(dist.is_power_of_two());
        self.scales[dist.ilog2() as usize]
    }

    /// Wordwise scan of at most `cap` characters from `l` and `r`.
    fn scan(&self, l: usize, r: usize, cap: usize) -> usize {
        let mut offset = 0;
        while offset < cap {
            let a = self.word_at(l + offset);
            let b = self.word_at(r + offset);
            if a != b {
                let mismatch = ((a ^ b).leading_zeros() / 8) as usize;
                return (offset + mismatch).min(cap);
            }
            offset += 8;
        }
        cap
    }
}

impl<const T_NAIVE: usize> LceIndex for LceFp<T_NAIVE> {
    type Char = u8;

    #[inline]
    fn len(&self) -> usize {
        self.size
    }

    #[inline]
    fn char_at(&self, pos: usize) -> u8 {
        self.block_raw(pos / 8).to_be_bytes()[pos % 8]
    }

    fn lce_lr(&self, l: usize, r: usize) -> usize {
        debug_assert!(l < r && r < self.size);
        let max_lce = self.size - r;

        let head = self.scan(l, r, T_NAIVE.min(max_lce));
        if head < T_NAIVE.min(max_lce) || head == max_lce {
            return head;
        }

        // exponential phase: double while the prefixes agree
        let mut exp = 1u32;
        while T_NAIVE << exp <= max_lce
            && self.fp_eq(l, r, T_NAIVE << exp, self.scale_for(T_NAIVE << exp))
        {
            exp += 1;
        }

        // binary phase: grow `add` by ever-smaller halves, re-verifying the
        // full prefix at each step
        let mut add = T_NAIVE << (exp - 1);
        let mut scale_add = self.scale_for(add);
        let mut half = add >> 1;
        while half >= 8 {
            let candidate = add + half;
            if candidate <= max_lce {
                let candidate_scale = mult_mod_u64(scale_add, self.scale_for(half), PRIME);
                if self.fp_eq(l, r, candidate, candidate_scale) {
                    add = candidate;
                    scale_add = candidate_scale;
                }
            }
            half >>= 1;
        }

        // the mismatch now sits within one block
        add + self.scan(l + add, r + add, 8.min(max_lce - add))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lce::LceNaive;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn iota_twice(half: usize) -> Vec<u8> {
        let mut text: Vec<u8> = (0..half).map(|i| (0x80u8).wrapping_add(i as u8)).collect();
        text.extend_from_within(..);
        text
    }

    #[test]
    fn test_simple() {
        let text = iota_twice(1000);
        let ds: LceFp = LceFp::new(text);
        assert_eq!(ds.lce(0, 0), 2000);
        assert_eq!(ds.lce(0, 1000), 1000);
        assert_eq!(ds.lce(500, 1000), 0);
        assert_eq!(ds.lce_mismatch(1000, 0), (false, 1000));
        assert_eq!(ds.lce_mismatch(1000, 500), (true, 0));
    }

    #[test]
    fn test_round_trip() {
        let text = iota_twice(1000);
        let ds: LceFp = LceFp::new(text.clone());
        assert_eq!(ds.reverse_transform(), text);
    }

    #[test]
    fn test_round_trip_unaligned_len() {
        let mut rng = StdRng::seed_from_u64(13);
        for len in [1usize, 7, 8, 9, 63, 64, 65, 1003] {
            let text: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let ds: LceFp = LceFp::new(text.clone());
            assert_eq!(ds.reverse_transform(), text, "len {len}");
        }
    }

    #[test]
    fn test_round_trip_after_queries() {
        let text = iota_twice(1000);
        let ds: LceFp = LceFp::new(text.clone());
        let mut checksum = 0usize;
        for i in (0..text.len()).step_by(37) {
            for j in (1..text.len()).step_by(101) {
                if i != j {
                    checksum = checksum.wrapping_add(ds.lce(i, j));
                }
            }
        }
        assert!(checksum > 0);
        assert_eq!(ds.reverse_transform(), text);
    }

    #[test]
    fn test_char_access() {
        let text = iota_twice(500);
        let ds: LceFp = LceFp::new(text.clone());
        for (pos, &expected) in text.iter().enumerate() {
            assert_eq!(ds.char_at(pos), expected);
        }
    }

    #[test]
    fn test_against_naive_random() {
        let mut rng = StdRng::seed_from_u64(14);
        let text: Vec<u8> = (0..4000).map(|_| rng.gen_range(b'a'..=b'c')).collect();
        let naive_text = text.clone();
        let naive = LceNaive::new(&naive_text);
        let ds: LceFp = LceFp::new(text);
        for _ in 0..5000 {
            let i = rng.gen_range(0..naive_text.len());
            let j = rng.gen_range(0..naive_text.len());
            assert_eq!(ds.lce(i, j), naive.lce(i, j), "lce({i}, {j})");
        }
    }

    #[test]
    fn test_scan_windows() {
        // all tested head-scan widths agree
        let text = iota_twice(1000);
        let naive_text = text.clone();
        let naive = LceNaive::new(&naive_text);
        let w16: LceFp<16> = LceFp::new(text.clone());
        let w64: LceFp<64> = LceFp::new(text.clone());
        let w128: LceFp<128> = LceFp::new(text);
        for i in (0..1000).step_by(17) {
            let expect = naive.lce(i, i + 1000);
            assert_eq!(w16.lce(i, i + 1000), expect);
            assert_eq!(w64.lce(i, i + 1000), expect);
            assert_eq!(w128.lce(i, i + 1000), expect);
        }
    }

    #[test]
    fn test_is_leq_suffix() {
        let text = iota_twice(100);
        let ds: LceFp = LceFp::new(text);
        assert!(!ds.is_leq_suffix(50, 150));
        assert!(ds.is_leq_suffix(150, 50));
        assert!(ds.is_leq_suffix(0, 50));
        assert!(!ds.is_leq_suffix(50, 0));
    }

    #[test]
    fn test_long_shared_prefix() {
        // two near-identical megabyte halves force deep exponential search
        let mut half: Vec<u8> = (0..1 << 20).map(|i| (i % 251) as u8).collect();
        let mut text = half.clone();
        half[999_999] ^= 1;
        text.extend_from_slice(&half);
        let ds: LceFp = LceFp::new(text);
        assert_eq!(ds.lce_lr(0, 1 << 20), 999_999);
    }
}
