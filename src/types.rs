//! Core types shared across index structures.
//!
//! Every index in this crate is generic over the integer width used to
//! address positions in the indexed text. Texts up to 4 GiB fit `u32`
//! offsets, which halves the memory of the position-heavy structures
//! (synchronizing sets, suffix/LCP arrays); larger texts use `u64`.

use std::fmt::Debug;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Integer type used to index into the text.
///
/// Implemented for `u32` and `u64`. The caller picks the width so that the
/// text length fits; conversions are checked in debug builds.
pub trait IndexInt:
    Copy + Ord + Debug + Send + Sync + 'static + sealed::Sealed
{
    const ZERO: Self;

    fn from_usize(value: usize) -> Self;
    fn to_usize(self) -> usize;
}

impl IndexInt for u32 {
    const ZERO: Self = 0;

    #[inline]
    fn from_usize(value: usize) -> Self {
        debug_assert!(value <= u32::MAX as usize);
        value as u32
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

impl IndexInt for u64 {
    const ZERO: Self = 0;

    #[inline]
    fn from_usize(value: usize) -> Self {
        value as u64
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        assert_eq!(u32::from_usize(12345).to_usize(), 12345);
        assert_eq!(u64::from_usize(1 << 40).to_usize(), 1 << 40);
        assert_eq!(u32::ZERO.to_usize(), 0);
    }
}
