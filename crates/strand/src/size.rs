//! Width selection for stored lengths and offsets.
//!
//! A sequence keeps its live-element count (and, for the middle anchor,
//! the window offset) in a caller-chosen unsigned integer. Sequences of
//! small elements shrink measurably when an 8- or 16-bit count replaces
//! a `usize` field, at the price of a capacity ceiling.

use crate::sealed::Sealed;

/// Unsigned integer type backing a sequence's length and offset fields.
///
/// Implemented for `u8`, `u16`, `u32`, `u64`, and `usize`; the set is
/// closed. The chosen type caps what a sequence can hold: fixed
/// capacities must fit at definition time, and growable storage stops
/// growing at [`SizeType::CEILING`].
pub trait SizeType: Copy + Sealed {
    /// Largest capacity representable in this type on the current target.
    const CEILING: usize;

    /// Bit width, reported in [`SequenceTraits::size_bits`].
    ///
    /// [`SequenceTraits::size_bits`]: crate::config::SequenceTraits::size_bits
    const WIDTH: u32;

    /// Narrows from `usize`. Callers keep `n <= Self::CEILING`.
    fn from_usize(n: usize) -> Self;

    /// Widens back to `usize`.
    fn as_usize(self) -> usize;
}

macro_rules! impl_size_type_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Sealed for $ty {}

            impl SizeType for $ty {
                // Clamped so that a wider-than-usize type (u64 on a
                // 32-bit target) stays addressable.
                const CEILING: usize = {
                    let max = <$ty>::MAX as u128;
                    if max < usize::MAX as u128 {
                        max as usize
                    } else {
                        usize::MAX
                    }
                };

                const WIDTH: u32 = <$ty>::BITS;

                #[inline]
                fn from_usize(n: usize) -> Self {
                    debug_assert!(n <= Self::CEILING);
                    n as $ty
                }

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_size_type_for_unsigned!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceilings_match_type_ranges() {
        assert_eq!(<u8 as SizeType>::CEILING, 255);
        assert_eq!(<u16 as SizeType>::CEILING, 65_535);
        assert_eq!(<u32 as SizeType>::CEILING, u32::MAX as usize);
        assert_eq!(<usize as SizeType>::CEILING, usize::MAX);
    }

    #[test]
    fn widths_match_type_bits() {
        assert_eq!(<u8 as SizeType>::WIDTH, 8);
        assert_eq!(<u16 as SizeType>::WIDTH, 16);
        assert_eq!(<u32 as SizeType>::WIDTH, 32);
        assert_eq!(<u64 as SizeType>::WIDTH, 64);
        assert_eq!(<usize as SizeType>::WIDTH, usize::BITS);
    }

    #[test]
    fn round_trips_within_ceiling() {
        assert_eq!(<u8 as SizeType>::from_usize(200).as_usize(), 200);
        assert_eq!(<u16 as SizeType>::from_usize(60_000).as_usize(), 60_000);
        assert_eq!(<usize as SizeType>::from_usize(0).as_usize(), 0);
    }
}
