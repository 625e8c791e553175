//! Karp-Rabin rolling hash over a Mersenne prime.
//!
//! The hasher maintains the fingerprint of a length-tau window and advances it
//! one position at a time in O(1). Shifting out the leading character and
//! shifting in the trailing one collapses into a single table lookup: the
//! 256x256 character-influence table stores `(in - out * b^tau) mod p` for
//! every pair, so a roll is one multiply, one add and one reduction.
//!
//! The fingerprint of a window is never stored here; callers snapshot
//! [`RollingHasher::fp`] when they need it.

use rand::Rng;

use super::modular::pow_mod;

/// Rolling Karp-Rabin hasher with prime `2^E - 1`.
///
/// `E` must be one of 61, 89 or 107 so that `prime * base + prime` cannot
/// overflow 128 bits for any admissible base.
pub struct RollingHasher<const E: u32 = 107> {
    tau: u64,
    base: u128,
    fp: u128,
    influence: Vec<[u128; 256]>,
}

impl<const E: u32> RollingHasher<E> {
    const PRIME: u128 = (1u128 << E) - 1;
    const VALID_EXP: () = assert!(E == 61 || E == 89 || E == 107);

    /// Creates a hasher for windows of length `tau` with a random base.
    ///
    /// The base is drawn uniformly from `[257, max]` where `max` is the
    /// largest value keeping `bit_width(prime) + bit_width(base) <= 127`.
    pub fn new(tau: u64) -> Self {
        Self::with_base(tau, Self::random_base())
    }

    /// Creates a hasher with an explicit base, for reproducible builds.
    pub fn with_base(tau: u64, base: u128) -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::VALID_EXP;
        debug_assert!(base >= 257);
        debug_assert!(128 - Self::PRIME.leading_zeros() + (128 - base.leading_zeros()) <= 127);

        let mut hasher = Self {
            tau,
            base,
            fp: 0,
            influence: Vec::new(),
        };
        hasher.fill_influence_table();
        hasher
    }

    /// Horner step that appends `c` to the window being filled. Used tau times
    /// to prime the hasher on its first window.
    #[inline]
    pub fn roll_in(&mut self, c: u8) -> u128 {
        self.fp = Self::reduce(self.fp * self.base + c as u128);
        self.fp
    }

    /// Advances the window by one position: `out` leaves at the front, `inn`
    /// enters at the back.
    #[inline]
    pub fn roll(&mut self, out: u8, inn: u8) -> u128 {
        self.fp = Self::reduce(self.fp * self.base + self.influence[out as usize][inn as usize]);
        self.fp
    }

    /// Fingerprint of the current window.
    #[inline]
    pub fn fp(&self) -> u128 {
        self.fp
    }

    #[inline]
    pub fn base(&self) -> u128 {
        self.base
    }

    #[inline]
    pub const fn prime() -> u128 {
        Self::PRIME
    }

    /// Reduces `x` modulo the prime. Two folds bring any product formed
    /// here (below 2^127) under 2p, and one subtract finishes.
    #[inline]
    fn reduce(x: u128) -> u128 {
        let p = Self::PRIME;
        let folded = (x & p) + (x >> E);
        let folded = (folded & p) + (folded >> E);
        if folded >= p {
            folded - p
        } else {
            folded
        }
    }

    /// Draws a base uniformly from the admissible range `[257, max]`.
    pub fn random_base() -> u128 {
        let max = if E > 64 {
            (1u64 << (127 - E)) - 1
        } else {
            (Self::PRIME - 1) as u64
        };
        rand::thread_rng().gen_range(257..=max) as u128
    }

    fn fill_influence_table(&mut self) {
        let p = Self::PRIME;
        let base_pow_tau = pow_mod(self.base, self.tau as u128, p);
        let minus_base_pow_tau = (p - base_pow_tau) % p;

        let mut table = vec![[0u128; 256]; 256];
        for j in 1..256 {
            table[0][j] = j as u128;
        }
        for i in 1..256 {
            table[i][0] = Self::reduce(table[i - 1][0] + minus_base_pow_tau);
            for j in 1..256 {
                table[i][j] = Self::reduce(table[i][j - 1] + 1);
            }
        }
        self.influence = table;
    }
}
