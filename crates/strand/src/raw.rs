//! Low-level buffer primitives.
//!
//! Every call into the global allocator and every raw relocation of
//! element slots lives in this module, each behind a small function
//! with a mandatory `// SAFETY:` comment at the call site. Zero-sized
//! element types and zero-slot requests follow the dangling-pointer
//! convention and never reach the allocator.

#![allow(unsafe_code)]

use std::alloc::{self, handle_alloc_error, Layout};
use std::mem;
use std::ptr::{self, NonNull};

use crate::error::CapacityError;

/// Allocates an array of `count` element slots, or reports why not.
///
/// Zero-sized requests (ZST element, or `count == 0`) return a dangling
/// pointer without touching the allocator; [`dealloc_array`] mirrors
/// the convention.
pub(crate) fn try_alloc_array<T>(count: usize) -> Result<NonNull<T>, CapacityError> {
    if mem::size_of::<T>() == 0 || count == 0 {
        return Ok(NonNull::dangling());
    }
    let layout = Layout::array::<T>(count)
        .map_err(|_| CapacityError::AllocationFailure { requested: count })?;
    // SAFETY: layout has non-zero size; T is not a ZST and count > 0.
    let ptr = unsafe { alloc::alloc(layout) };
    NonNull::new(ptr.cast()).ok_or(CapacityError::AllocationFailure { requested: count })
}

/// Allocates an array of `count` slots, diverging on failure.
///
/// Construction has no error channel, so allocator refusal goes to
/// [`handle_alloc_error`]; the fallible path is reserved for growth.
pub(crate) fn alloc_array<T>(count: usize) -> NonNull<T> {
    match try_alloc_array(count) {
        Ok(ptr) => ptr,
        Err(_) => match Layout::array::<T>(count) {
            Ok(layout) => handle_alloc_error(layout),
            Err(_) => panic!("sequence capacity overflows the address space"),
        },
    }
}

/// Releases an array previously obtained from [`try_alloc_array`].
///
/// # Safety
///
/// `ptr` must come from `try_alloc_array::<T>` with the same `count`,
/// and must not be used again. Element destructors are the caller's
/// business and must already have run.
pub(crate) unsafe fn dealloc_array<T>(ptr: NonNull<T>, count: usize) {
    if mem::size_of::<T>() == 0 || count == 0 {
        return;
    }
    let layout =
        Layout::array::<T>(count).expect("layout was valid when this buffer was allocated");
    // SAFETY: caller contract; ptr was allocated with exactly this layout.
    unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) };
}

/// Relocates `count` constructed slots starting at `start` by `by`
/// positions within one buffer.
///
/// A bitwise copy is a Rust move: each value becomes live at its
/// destination and dead at its source, so the number of live elements
/// is unchanged. Overlap is fine; `ptr::copy` has memmove semantics.
///
/// # Safety
///
/// `base` must point at the start of one live buffer; slots
/// `[start, start + count)` must hold constructed elements; the
/// destination range must lie within the buffer, and any constructed
/// element it overwrites must be inside the source range.
pub(crate) unsafe fn shift_slots<T>(base: *mut T, start: usize, count: usize, by: isize) {
    let dst = if by < 0 {
        let back = by.unsigned_abs();
        debug_assert!(start >= back);
        start - back
    } else {
        start + by as usize
    };
    // SAFETY: caller keeps both ranges inside the same live buffer.
    unsafe { ptr::copy(base.add(start), base.add(dst), count) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_release_round_trip() {
        let ptr = try_alloc_array::<u64>(16).expect("small allocation");
        // SAFETY: 16 slots were just allocated; write stays in bounds.
        unsafe {
            ptr::write(ptr.as_ptr(), 42);
            assert_eq!(ptr.as_ptr().read(), 42);
            dealloc_array(ptr, 16);
        }
    }

    #[test]
    fn zero_count_never_allocates() {
        let ptr = try_alloc_array::<u64>(0).expect("dangling");
        assert_eq!(ptr, NonNull::dangling());
        // SAFETY: dangling release is a no-op by convention.
        unsafe { dealloc_array(ptr, 0) };
    }

    #[test]
    fn zst_requests_never_allocate() {
        let ptr = try_alloc_array::<()>(1_000_000).expect("dangling");
        assert_eq!(ptr, NonNull::dangling());
        // SAFETY: ZST release is a no-op by convention.
        unsafe { dealloc_array(ptr, 1_000_000) };
    }

    #[test]
    fn layout_overflow_reports_the_request() {
        let huge = usize::MAX / 2;
        let err = try_alloc_array::<u64>(huge).unwrap_err();
        assert_eq!(err, CapacityError::AllocationFailure { requested: huge });
    }

    #[test]
    fn shift_moves_overlapping_ranges_both_ways() {
        let ptr = try_alloc_array::<u32>(8).expect("small allocation");
        let base = ptr.as_ptr();
        // SAFETY: all offsets stay inside the 8-slot buffer; u32 needs
        // no destructor, so overwritten slots are plain bytes.
        unsafe {
            for i in 0..6 {
                ptr::write(base.add(i), i as u32);
            }
            shift_slots(base, 0, 6, 2); // [0..6) -> [2..8)
            for i in 0..6 {
                assert_eq!(base.add(i + 2).read(), i as u32);
            }
            shift_slots(base, 2, 6, -1); // [2..8) -> [1..7)
            for i in 0..6 {
                assert_eq!(base.add(i + 1).read(), i as u32);
            }
            dealloc_array(ptr, 8);
        }
    }
}
