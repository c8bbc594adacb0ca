//! Dynamic fixed storage: one up-front heap reservation, no growth.

#![allow(unsafe_code)]

use std::ops::Range;
use std::ptr::NonNull;

use crate::config::GrowthRule;
use crate::error::CapacityError;
use crate::raw;
use crate::sealed::Sealed;
use crate::size::SizeType;
use crate::storage::{Stats, Storage};

/// Fixed-capacity storage backed by a single heap allocation of `N`
/// slots, made at construction and held for the storage's lifetime.
///
/// Keeps the sequence value itself small while still refusing to grow:
/// a push past `N` fails with [`CapacityError::CapacityExceeded`]. The
/// buffer never moves, so element types that must not move are
/// accepted. Allocator refusal at construction diverges via
/// `handle_alloc_error`; there is no fallible constructor.
pub struct Reserved<T, const N: usize, S = usize> {
    buf: NonNull<T>,
    len: S,
    stats: Stats,
}

impl<T, const N: usize, S: SizeType> Reserved<T, N, S> {
    const CAPACITY_FITS: () = assert!(
        N <= S::CEILING,
        "fixed capacity exceeds the ceiling of the configured size type"
    );
}

impl<T, const N: usize, S> Sealed for Reserved<T, N, S> {}

impl<T, const N: usize, S: SizeType> Storage for Reserved<T, N, S> {
    type Item = T;
    type Size = S;

    const DYNAMIC: bool = true;
    const VARIABLE: bool = false;
    const DECLARED_CAPACITY: usize = N;
    const GROWTH: Option<GrowthRule> = None;

    fn new() -> Self {
        let () = Self::CAPACITY_FITS;
        Self {
            buf: raw::alloc_array(N),
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
        self.buf.as_ptr()
    }

    fn base_mut(&mut self) -> *mut T {
        self.buf.as_ptr()
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

impl<T, const N: usize, S> Drop for Reserved<T, N, S> {
    fn drop(&mut self) {
        // SAFETY: buf came from alloc_array::<T>(N) in new() and is not
        // used again; element destructors ran in the owning sequence.
        unsafe { raw::dealloc_array(self.buf, N) };
    }
}

// SAFETY: Reserved exclusively owns its buffer; thread capability
// follows the element type.
unsafe impl<T: Send, const N: usize, S: Send> Send for Reserved<T, N, S> {}
// SAFETY: shared access only reads; Sync follows the element type.
unsafe impl<T: Sync, const N: usize, S: Sync> Sync for Reserved<T, N, S> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserves_exactly_n_up_front() {
        let storage: Reserved<u64, 32> = Storage::new();
        assert_eq!(storage.capacity(), 32);
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn reserve_past_n_is_refused_without_side_effects() {
        let mut storage: Reserved<u64, 2, u16> = Storage::new();
        // SAFETY: slots 0 and 1 are in bounds and empty.
        unsafe {
            storage.place(0, 7);
            storage.place(1, 9);
        }
        // SAFETY: [0, 2) is live; the refusal must leave it untouched.
        let err = unsafe { storage.try_reserve(3, 0..2, |_| 0) }.unwrap_err();
        assert_eq!(err, CapacityError::CapacityExceeded { capacity: 2 });
        // SAFETY: both elements are still live where they were placed.
        unsafe {
            assert_eq!(storage.base().read(), 7);
            assert_eq!(storage.base().add(1).read(), 9);
            storage.set_len(0); // u64 needs no destructor
        }
        assert_eq!(storage.reallocations(), 0);
    }

    #[test]
    fn zero_capacity_skips_the_allocator() {
        let storage: Reserved<u64, 0> = Storage::new();
        assert_eq!(storage.capacity(), 0);
        assert_eq!(storage.base(), NonNull::<u64>::dangling().as_ptr().cast_const());
    }
}
