//! # LCX - Longest Common Extension Queries
//!
//! LCX answers **LCE queries** on a static byte text: given positions i and
//! j, how many characters do the suffixes starting there have in common?
//! Derived queries (lexicographic suffix comparison, bounded LCE, mismatch
//! indicator) are built on top through the [`lce::LceIndex`] trait.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`lce`] - the LCE indices (naive, classic, fingerprint, two
//!   synchronizing-set variants)
//! - [`sss`] - string synchronizing sets with parallel run-aware
//!   construction
//! - [`hash`] - Karp-Rabin rolling hash, Mersenne arithmetic, ring buffer
//! - [`rmq`] - range-minimum-query indices (sparse table and sampled)
//! - [`pred`] - predecessor/successor indices over sorted offsets
//! - [`suffix_sort`] - pluggable suffix-array backends
//! - [`utils`] - text loading and offset dumps
//!
//! ## Quick start
//!
//! ```
//! use lcx::lce::{LceClassic, LceIndex};
//!
//! let text = b"how can a clam cram in a clean cream can";
//! let lce: LceClassic = LceClassic::new(text);
//!
//! assert_eq!(lce.lce(0, 0), text.len());
//! assert_eq!(lce.lce_mismatch(15, 25), (true, 1));
//! assert!(lce.is_leq_suffix(9, 4));
//! ```
//!
//! ## Picking a variant
//!
//! - [`lce::LceClassic`] - suffix array + LCP + RMQ; O(1) queries, ~9n
//!   bytes of index.
//! - [`lce::LceFp`] - rewrites the text in place into fingerprints; no
//!   extra memory, O(log n) queries.
//! - [`lce::LceSssNaive`] / [`lce::LceSssRank`] - sample the text with a
//!   synchronizing set of granularity tau; O(n/tau) index words and queries
//!   that scan at most O(tau) characters.
//!
//! Construction parallelizes over the rayon global pool; set
//! `RAYON_NUM_THREADS` to pin the fan-out. Queries are single-threaded,
//! allocation-free and safe to issue from any number of threads.

pub mod hash;
pub mod lce;
pub mod pred;
pub mod rmq;
pub mod sss;
pub mod suffix_sort;
pub mod types;
pub mod utils;
