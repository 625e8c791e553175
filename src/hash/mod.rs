//! Rolling-hash machinery.
//!
//! - [`mersenne`] - shift-add-mask arithmetic over Mersenne primes
//! - [`modular`] - generic 64/128-bit modular multiplication and powers
//! - [`rolling`] - the Karp-Rabin windowed hasher
//! - [`ring_buffer`] - power-of-two buffer for streamed fingerprints

pub mod mersenne;
pub mod modular;
pub mod ring_buffer;
pub mod rolling;

pub use ring_buffer::RingBuffer;
pub use rolling::RollingHasher;
