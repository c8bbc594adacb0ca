//! Local fixed storage: the buffer lives inside the sequence value.

#![allow(unsafe_code)]

use std::mem::MaybeUninit;
use std::ops::Range;

use crate::config::GrowthRule;
use crate::error::CapacityError;
use crate::sealed::Sealed;
use crate::size::SizeType;
use crate::storage::{Stats, Storage};

/// Fixed-capacity storage holding its `N` slots inline.
///
/// Never touches the allocator, and never relocates an element to
/// another buffer, so it accepts element types that must not move
/// once constructed. A push past `N` fails with
/// [`CapacityError::CapacityExceeded`].
///
/// The whole buffer sits wherever the owning sequence sits, which
/// makes this the only storage usable without a heap.
pub struct Inline<T, const N: usize, S = usize> {
    slots: [MaybeUninit<T>; N],
    len: S,
    stats: Stats,
}

impl<T, const N: usize, S: SizeType> Inline<T, N, S> {
    // Referenced from new(); trips in const evaluation when N cannot
    // be stored in S.
    const CAPACITY_FITS: () = assert!(
        N <= S::CEILING,
        "fixed capacity exceeds the ceiling of the configured size type"
    );
}

impl<T, const N: usize, S> Sealed for Inline<T, N, S> {}

impl<T, const N: usize, S: SizeType> Storage for Inline<T, N, S> {
    type Item = T;
    type Size = S;

    const DYNAMIC: bool = false;
    const VARIABLE: bool = false;
    const DECLARED_CAPACITY: usize = N;
    const GROWTH: Option<GrowthRule> = None;

    fn new() -> Self {
        let () = Self::CAPACITY_FITS;
        Self {
            slots: [const { MaybeUninit::uninit() }; N],
            len: S::from_usize(0),
            stats: Stats::default(),
        }
    }

    fn capacity(&self) -> usize {
        N
    }

    fn len(&self) -> usize {
        self.len.as_usize()
    }

    fn base(&self) -> *const T {
        self.slots.as_ptr().cast()
    }

    fn base_mut(&mut self) -> *mut T {
        self.slots.as_mut_ptr().cast()
    }

    unsafe fn set_len(&mut self, n: usize) {
        self.len = S::from_usize(n);
    }

    unsafe fn try_reserve(
        &mut self,
        _min: usize,
        _window: Range<usize>,
        _dest: impl FnOnce(usize) -> usize,
    ) -> Result<usize, CapacityError> {
        Err(CapacityError::CapacityExceeded { capacity: N })
    }

    fn reallocations(&self) -> usize {
        self.stats.reallocations
    }

    fn relocated_slots(&self) -> usize {
        self.stats.relocated
    }

    fn record_relocated(&mut self, slots: usize) {
        self.stats.relocated += slots;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comes_up_empty_at_full_capacity() {
        let storage: Inline<u32, 8> = Storage::new();
        assert_eq!(storage.capacity(), 8);
        assert_eq!(storage.len(), 0);
        assert_eq!(storage.reallocations(), 0);
    }

    #[test]
    fn reserve_is_a_deterministic_refusal() {
        let mut storage: Inline<u32, 4> = Storage::new();
        // SAFETY: the window is empty.
        let err = unsafe { storage.try_reserve(5, 0..0, |_| 0) }.unwrap_err();
        assert_eq!(err, CapacityError::CapacityExceeded { capacity: 4 });
        assert_eq!(storage.capacity(), 4);
        assert_eq!(storage.reallocations(), 0);
    }

    #[test]
    fn place_and_shift_track_slots_and_counters() {
        let mut storage: Inline<u32, 4, u8> = Storage::new();
        // SAFETY: slots 0 and 1 are in bounds and empty; after the
        // shift, [1, 3) is live and slot 0 is treated as vacated.
        unsafe {
            storage.place(0, 10);
            storage.place(1, 20);
            storage.shift(0..2, 1);
            assert_eq!(storage.base().add(1).read(), 10);
            assert_eq!(storage.base().add(2).read(), 20);
            storage.set_len(0); // u32 needs no destructor
        }
        assert_eq!(storage.relocated_slots(), 2);
    }

    #[test]
    fn zero_capacity_is_usable_and_always_full() {
        let mut storage: Inline<u32, 0> = Storage::new();
        assert_eq!(storage.capacity(), 0);
        // SAFETY: the window is empty.
        let err = unsafe { storage.try_reserve(1, 0..0, |_| 0) }.unwrap_err();
        assert_eq!(err, CapacityError::CapacityExceeded { capacity: 0 });
    }
}
