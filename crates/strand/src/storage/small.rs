//! Dynamic variable storage with a small-buffer optimization.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::mem::{ManuallyDrop, MaybeUninit};
use std::ops::Range;
use std::ptr::{self, NonNull};

use crate::config::GrowthRule;
use crate::error::CapacityError;
use crate::growth::{Growth, VectorLike};
use crate::raw;
use crate::sealed::Sealed;
use crate::size::SizeType;
use crate::storage::{Stats, Storage};

/// Heap view of the buffer once spilled.
struct HeapBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
}

// Derived Copy would demand T: Copy; the view is a pointer and a count.
impl<T> Clone for HeapBuf<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for HeapBuf<T> {}

union SmallBuf<T, const N: usize> {
    inline: ManuallyDrop<[MaybeUninit<T>; N]>,
    heap: HeapBuf<T>,
}

/// Storage that starts on `N` inline slots and spills to the heap the
/// first time a push needs more, growing per the policy `G` from then
/// on. It never moves back inline.
///
/// Sequences that usually stay at or under `N` elements pay no
/// allocation at all; the spill itself relocates every live element,
/// so the element type must be [`Unpin`]. `N` must be non-zero; use
/// [`Growable`] when no inline buffer is wanted.
///
/// [`Growable`]: crate::storage::Growable
pub struct Small<T, const N: usize, G = VectorLike, S = usize> {
    buf: SmallBuf<T, N>,
    spilled: bool,
    len: S,
    stats: Stats,
    _growth: PhantomData<G>,
}

impl<T, const N: usize, G, S: SizeType> Small<T, N, G, S> {
    const SBO_VALID: () = {
        assert!(N > 0, "small-buffer threshold must be non-zero");
        assert!(
            N <= S::CEILING,
            "small-buffer threshold exceeds the ceiling of the configured size type"
        );
    };
}

impl<T, const N: usize, G, S> Sealed for Small<T, N, G, S> {}

impl<T: Unpin, const N: usize, G: Growth, S: SizeType> Storage for Small<T, N, G, S> {
    type Item = T;
    type Size = S;

    const DYNAMIC: bool = true;
    const VARIABLE: bool = true;
    const DECLARED_CAPACITY: usize = N;
    const GROWTH: Option<GrowthRule> = Some(G::RULE);

    fn new() -> Self {
        let () = Self::SBO_VALID;
        let () = G::VALID;
        Self {
            buf: SmallBuf {
                inline: ManuallyDrop::new([const { MaybeUninit::uninit() }; N]),
            },
            spilled: false,
            len: S::from_usize(0),
            stats: Stats::default(),
            _growth: PhantomData,
        }
    }

    fn capacity(&self) -> usize {
        if self.spilled {
            // SAFETY: the spill flag tracks the active union field.
            unsafe { self.buf.heap.cap }
        } else {
            N
        }
    }

    fn len(&self) -> usize {
        self.len.as_usize()
    }

    fn base(&self) -> *const T {
        if self.spilled {
            // SAFETY: the spill flag tracks the active union field.
            unsafe { self.buf.heap.ptr.as_ptr() }
        } else {
            // SAFETY: inline is the active field until the first spill.
            unsafe { self.buf.inline.as_ptr().cast() }
        }
    }

    fn base_mut(&mut self) -> *mut T {
        if self.spilled {
            // SAFETY: the spill flag tracks the active union field.
            unsafe { self.buf.heap.ptr.as_ptr() }
        } else {
            // SAFETY: inline is the active field until the first spill.
            // The deref is spelled out: rustc refuses to auto-apply
            // DerefMut through a ManuallyDrop union field.
            unsafe { (*self.buf.inline).as_mut_ptr().cast() }
        }
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
        let cap = self.capacity();
        debug_assert!(min > cap);
        if min > S::CEILING {
            return Err(CapacityError::CapacityExceeded {
                capacity: S::CEILING,
            });
        }
        let target = G::next_capacity(cap, min)
            .ok_or(CapacityError::AllocationFailure { requested: min })?
            .min(S::CEILING);
        let new_buf = raw::try_alloc_array::<T>(target)?;
        let start = dest(target);
        debug_assert!(start + window.len() <= target);
        let src = self.base_mut();
        // SAFETY: the window is constructed in the active buffer and
        // the destination range fits the new one; after the copy the
        // old inline slots are stale bytes, or the old heap block is
        // released.
        unsafe {
            ptr::copy_nonoverlapping(
                src.add(window.start),
                new_buf.as_ptr().add(start),
                window.len(),
            );
            if self.spilled {
                let old = self.buf.heap;
                raw::dealloc_array(old.ptr, old.cap);
            }
        }
        self.buf.heap = HeapBuf {
            ptr: new_buf,
            cap: target,
        };
        self.spilled = true;
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

impl<T, const N: usize, G, S> Drop for Small<T, N, G, S> {
    fn drop(&mut self) {
        if self.spilled {
            // SAFETY: heap is the active field once spilled; element
            // destructors ran in the owning sequence.
            unsafe { raw::dealloc_array(self.buf.heap.ptr, self.buf.heap.cap) };
        }
    }
}

// SAFETY: Small exclusively owns its buffer, inline or spilled; thread
// capability follows the element type.
unsafe impl<T: Send, const N: usize, G: Send, S: Send> Send for Small<T, N, G, S> {}
// SAFETY: shared access only reads; Sync follows the element type.
unsafe impl<T: Sync, const N: usize, G: Sync, S: Sync> Sync for Small<T, N, G, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::Linear;

    #[test]
    fn starts_inline_at_the_threshold() {
        let storage: Small<u32, 4> = Storage::new();
        assert_eq!(storage.capacity(), 4);
        assert_eq!(storage.len(), 0);
        assert_eq!(storage.reallocations(), 0);
    }

    #[test]
    fn spill_carries_the_inline_window_to_the_heap() {
        let mut storage: Small<u32, 4, Linear<4>> = Storage::new();
        // SAFETY: slots 0..4 are in bounds and empty.
        unsafe {
            for i in 0..4u32 {
                storage.place(i as usize, i + 100);
            }
        }
        // SAFETY: [0, 4) is live and lands at 0 in the larger buffer.
        let start = unsafe { storage.try_reserve(5, 0..4, |_| 0) }.unwrap();
        assert_eq!(start, 0);
        assert_eq!(storage.capacity(), 8);
        // SAFETY: the four elements moved to the fresh heap buffer.
        unsafe {
            for i in 0..4usize {
                assert_eq!(storage.base().add(i).read(), i as u32 + 100);
            }
            storage.set_len(0); // u32 needs no destructor
        }
        assert_eq!(storage.reallocations(), 1);
        assert_eq!(storage.relocated_slots(), 4);
    }

    #[test]
    fn spilled_storage_keeps_growing_on_the_heap() {
        let mut storage: Small<u32, 2, Linear<2>> = Storage::new();
        // SAFETY: the window is empty.
        unsafe {
            storage.try_reserve(3, 0..0, |_| 0).unwrap();
            assert_eq!(storage.capacity(), 4);
            storage.try_reserve(5, 0..0, |_| 0).unwrap();
        }
        assert_eq!(storage.capacity(), 6);
        assert_eq!(storage.reallocations(), 2);
    }

    #[test]
    fn ceiling_applies_before_any_allocation() {
        let mut storage: Small<u32, 4, Linear<1>, u8> = Storage::new();
        // SAFETY: the window is empty.
        let err = unsafe { storage.try_reserve(300, 0..0, |_| 0) }.unwrap_err();
        assert_eq!(err, CapacityError::CapacityExceeded { capacity: 255 });
        assert_eq!(storage.capacity(), 4);
    }
}
