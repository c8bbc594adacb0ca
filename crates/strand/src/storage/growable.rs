//! Dynamic variable storage: pure heap, amortized growth.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::ops::Range;
use std::ptr::{self, NonNull};

use crate::config::GrowthRule;
use crate::error::CapacityError;
use crate::growth::{Growth, VectorLike};
use crate::raw;
use crate::sealed::Sealed;
use crate::size::SizeType;
use crate::storage::{Stats, Storage};

/// Heap storage that starts empty and grows per the policy `G`.
///
/// The classic amortized array: each exhausted buffer is replaced by a
/// larger one sized by [`Growth::next_capacity`], the live window is
/// moved across with one bitwise copy, and the old buffer is released.
/// Growth relocates elements, so the element type must be [`Unpin`];
/// capacity is clamped to the ceiling of the size type `S`.
pub struct Growable<T, G = VectorLike, S = usize> {
    buf: NonNull<T>,
    cap: usize,
    len: S,
    stats: Stats,
    _growth: PhantomData<G>,
}

impl<T, G, S> Sealed for Growable<T, G, S> {}

impl<T: Unpin, G: Growth, S: SizeType> Storage for Growable<T, G, S> {
    type Item = T;
    type Size = S;

    const DYNAMIC: bool = true;
    const VARIABLE: bool = true;
    const DECLARED_CAPACITY: usize = 0;
    const GROWTH: Option<GrowthRule> = Some(G::RULE);

    fn new() -> Self {
        let () = G::VALID;
        Self {
            buf: NonNull::dangling(),
            cap: 0,
            len: S::from_usize(0),
            stats: Stats::default(),
            _growth: PhantomData,
        }
    }

    fn capacity(&self) -> usize {
        self.cap
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
        min: usize,
        window: Range<usize>,
        dest: impl FnOnce(usize) -> usize,
    ) -> Result<usize, CapacityError> {
        debug_assert!(min > self.cap);
        if min > S::CEILING {
            return Err(CapacityError::CapacityExceeded {
                capacity: S::CEILING,
            });
        }
        let target = G::next_capacity(self.cap, min)
            .ok_or(CapacityError::AllocationFailure { requested: min })?
            .min(S::CEILING);
        let new_buf = raw::try_alloc_array::<T>(target)?;
        let start = dest(target);
        debug_assert!(start + window.len() <= target);
        // SAFETY: the window is constructed in the old buffer and the
        // destination range fits the new one; the bitwise copy moves
        // the elements, so the old slots are forgotten, not dropped.
        unsafe {
            ptr::copy_nonoverlapping(
                self.buf.as_ptr().add(window.start),
                new_buf.as_ptr().add(start),
                window.len(),
            );
            raw::dealloc_array(self.buf, self.cap);
        }
        self.buf = new_buf;
        self.cap = target;
        self.stats.reallocations += 1;
        self.stats.relocated += window.len();
        Ok(start)
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

impl<T, G, S> Drop for Growable<T, G, S> {
    fn drop(&mut self) {
        // SAFETY: buf/cap describe the one live allocation (dangling/0
        // before first growth); element destructors ran in the owning
        // sequence.
        unsafe { raw::dealloc_array(self.buf, self.cap) };
    }
}

// SAFETY: Growable exclusively owns its buffer; thread capability
// follows the element type.
unsafe impl<T: Send, G: Send, S: Send> Send for Growable<T, G, S> {}
// SAFETY: shared access only reads; Sync follows the element type.
unsafe impl<T: Sync, G: Sync, S: Sync> Sync for Growable<T, G, S> {}
