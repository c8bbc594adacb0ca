//! Anchor strategies: where the occupancy window sits.
//!
//! The buffer usually has more slots than live elements, and the anchor
//! decides where the contiguous run of live elements sits inside it.
//! That placement, not the storage, is what makes one end of a sequence
//! cheap to push on: [`Front`] keeps slack after the window (cheap
//! `push_back`), [`Back`] keeps it before (cheap `push_front`), and
//! [`Middle`] keeps the window floating so both ends stay cheap until
//! the slack on one side runs out and the window is re-centered.
//!
//! Anchors own the occupancy invariants. They are the only callers of
//! the unsafe storage primitives, and they pick the destination of the
//! live window whenever a growable storage reallocates.

#![allow(unsafe_code)]

use std::ops::Range;
use std::ptr;

use crate::config::Location;
use crate::error::{CapacityError, PushError};
use crate::sealed::Sealed;
use crate::size::SizeType;
use crate::storage::Storage;

/// Window-placement strategy over a [`Storage`].
///
/// Implemented by [`Front`], [`Middle`], and [`Back`]; the set is
/// closed. The facade drives everything through this trait, so every
/// method here is safe: the unsafe slot arithmetic stays inside the
/// implementations.
pub trait Anchor: Sealed {
    /// The wrapped storage strategy.
    type Storage: Storage;

    /// Window placement as data, reported in
    /// [`SequenceTraits::location`].
    ///
    /// [`SequenceTraits::location`]: crate::config::SequenceTraits::location
    const LOCATION: Location;

    /// Empty state over fresh storage.
    fn new() -> Self;

    /// The underlying storage, for counts and diagnostics.
    fn storage(&self) -> &Self::Storage;

    /// First slot of the occupancy window.
    fn window_start(&self) -> usize;

    /// Inserts at the front of the window.
    fn push_front(
        &mut self,
        value: <Self::Storage as Storage>::Item,
    ) -> Result<(), PushError<<Self::Storage as Storage>::Item>>;

    /// Inserts at the back of the window.
    fn push_back(
        &mut self,
        value: <Self::Storage as Storage>::Item,
    ) -> Result<(), PushError<<Self::Storage as Storage>::Item>>;

    /// Drops every live element and restores the empty window.
    fn clear(&mut self);
}

/// Guarantees one free slot, growing through the anchor's destination
/// rule when the buffer is full. Returns the window's new start when a
/// reallocation happened.
fn ensure_one_more<St: Storage>(
    storage: &mut St,
    window: Range<usize>,
    dest: impl FnOnce(usize) -> usize,
) -> Result<Option<usize>, CapacityError> {
    let len = storage.len();
    if len < storage.capacity() {
        return Ok(None);
    }
    let need = len
        .checked_add(1)
        .ok_or(CapacityError::CapacityExceeded { capacity: len })?;
    // SAFETY: every anchor passes its live occupancy window, and every
    // destination rule keeps start + len within the capacity it is
    // handed.
    let start = unsafe { storage.try_reserve(need, window, dest) }?;
    Ok(Some(start))
}

/// Drops the `len` live elements starting at `start`; the count is
/// zeroed first so a panicking destructor cannot double-drop the rest.
fn clear_window<St: Storage>(storage: &mut St, start: usize) {
    let len = storage.len();
    if len == 0 {
        return;
    }
    // SAFETY: [start, start + len) was the live window; zeroing the
    // count first keeps the accounting ahead of the destructors.
    unsafe {
        storage.set_len(0);
        let head = storage.base_mut().add(start);
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(head, len));
    }
}

/// Window pinned to the low end of the buffer, like `Vec`.
///
/// `push_back` appends in place; `push_front` shifts the whole window
/// up by one slot first, which costs O(len) relocations.
pub struct Front<St> {
    storage: St,
}

impl<St> Sealed for Front<St> {}

impl<St: Storage> Anchor for Front<St> {
    type Storage = St;

    const LOCATION: Location = Location::Front;

    fn new() -> Self {
        Self { storage: St::new() }
    }

    fn storage(&self) -> &St {
        &self.storage
    }

    fn window_start(&self) -> usize {
        0
    }

    fn push_back(&mut self, value: St::Item) -> Result<(), PushError<St::Item>> {
        let len = self.storage.len();
        if let Err(reason) = ensure_one_more(&mut self.storage, 0..len, |_| 0) {
            return Err(PushError::new(value, reason));
        }
        // SAFETY: slot len is within capacity and empty.
        unsafe { self.storage.place(len, value) };
        Ok(())
    }

    fn push_front(&mut self, value: St::Item) -> Result<(), PushError<St::Item>> {
        let len = self.storage.len();
        if let Err(reason) = ensure_one_more(&mut self.storage, 0..len, |_| 0) {
            return Err(PushError::new(value, reason));
        }
        if len > 0 {
            // SAFETY: [0, len) is live and slot len is free.
            unsafe { self.storage.shift(0..len, 1) };
        }
        // SAFETY: slot 0 was vacated, or the window was empty.
        unsafe { self.storage.place(0, value) };
        Ok(())
    }

    fn clear(&mut self) {
        clear_window(&mut self.storage, 0);
    }
}

/// Window pinned to the high end of the buffer; the mirror of
/// [`Front`].
///
/// `push_front` prepends in place; `push_back` shifts the whole window
/// down by one slot first, which costs O(len) relocations.
pub struct Back<St> {
    storage: St,
}

impl<St> Sealed for Back<St> {}

impl<St: Storage> Anchor for Back<St> {
    type Storage = St;

    const LOCATION: Location = Location::Back;

    fn new() -> Self {
        Self { storage: St::new() }
    }

    fn storage(&self) -> &St {
        &self.storage
    }

    fn window_start(&self) -> usize {
        self.storage.capacity() - self.storage.len()
    }

    fn push_front(&mut self, value: St::Item) -> Result<(), PushError<St::Item>> {
        let len = self.storage.len();
        let cap = self.storage.capacity();
        if let Err(reason) = ensure_one_more(&mut self.storage, (cap - len)..cap, move |new_cap| {
            new_cap - len
        }) {
            return Err(PushError::new(value, reason));
        }
        let slot = self.storage.capacity() - len - 1;
        // SAFETY: the slot just below the window is free; capacity
        // exceeds len after the reserve.
        unsafe { self.storage.place(slot, value) };
        Ok(())
    }

    fn push_back(&mut self, value: St::Item) -> Result<(), PushError<St::Item>> {
        let len = self.storage.len();
        let cap = self.storage.capacity();
        if let Err(reason) = ensure_one_more(&mut self.storage, (cap - len)..cap, move |new_cap| {
            new_cap - len
        }) {
            return Err(PushError::new(value, reason));
        }
        let cap = self.storage.capacity();
        if len > 0 {
            // SAFETY: [cap - len, cap) is live and the slot below it is
            // free; the shift vacates cap - 1.
            unsafe { self.storage.shift((cap - len)..cap, -1) };
        }
        // SAFETY: the top slot is free: vacated, or the window was
        // empty.
        unsafe { self.storage.place(cap - 1, value) };
        Ok(())
    }

    fn clear(&mut self) {
        let start = self.window_start();
        clear_window(&mut self.storage, start);
    }
}

/// Window floating near the center of the buffer.
///
/// Both ends are amortized O(1): each push takes the adjacent free
/// slot, and when one side runs out the window slides over half the
/// remaining slack (always at least one slot, so a single free slot
/// still admits the push). Requires [`Unpin`] elements, because
/// re-centering and growth relocate them.
///
/// ```compile_fail
/// use std::marker::PhantomPinned;
/// use strand::{Inline, Middle, Sequence};
///
/// struct Pinned {
///     _pin: PhantomPinned,
/// }
///
/// // Re-centering relocates elements, so !Unpin types are refused.
/// let _: Sequence<Middle<Inline<Pinned, 8>>> = Sequence::new();
/// ```
pub struct Middle<St: Storage> {
    storage: St,
    offset: St::Size,
}

impl<St: Storage> Sealed for Middle<St> {}

impl<St: Storage> Anchor for Middle<St>
where
    St::Item: Unpin,
{
    type Storage = St;

    const LOCATION: Location = Location::Middle;

    fn new() -> Self {
        let storage = St::new();
        let offset = St::Size::from_usize(storage.capacity() / 2);
        Self { storage, offset }
    }

    fn storage(&self) -> &St {
        &self.storage
    }

    fn window_start(&self) -> usize {
        self.offset.as_usize()
    }

    fn push_front(&mut self, value: St::Item) -> Result<(), PushError<St::Item>> {
        let len = self.storage.len();
        let off = self.offset.as_usize();
        match ensure_one_more(&mut self.storage, off..off + len, move |cap| (cap - len) / 2) {
            Ok(Some(start)) => self.offset = St::Size::from_usize(start),
            Ok(None) => {}
            Err(reason) => return Err(PushError::new(value, reason)),
        }
        let mut off = self.offset.as_usize();
        if off == 0 {
            // Slide right over half the slack to open the front slot;
            // clamped to at least one so a single free slot suffices.
            let cap = self.storage.capacity();
            let delta = ((cap - len) / 2).max(1);
            if len > 0 {
                // SAFETY: [0, len) is live and len + delta <= cap.
                unsafe { self.storage.shift(0..len, delta as isize) };
            }
            off = delta - 1;
        } else {
            off -= 1;
        }
        self.offset = St::Size::from_usize(off);
        // SAFETY: slot off is free: vacated by the slide, or just below
        // the previous window start.
        unsafe { self.storage.place(off, value) };
        Ok(())
    }

    fn push_back(&mut self, value: St::Item) -> Result<(), PushError<St::Item>> {
        let len = self.storage.len();
        let off = self.offset.as_usize();
        match ensure_one_more(&mut self.storage, off..off + len, move |cap| (cap - len) / 2) {
            Ok(Some(start)) => self.offset = St::Size::from_usize(start),
            Ok(None) => {}
            Err(reason) => return Err(PushError::new(value, reason)),
        }
        let mut off = self.offset.as_usize();
        let cap = self.storage.capacity();
        if off + len == cap {
            // Mirror slide: all slack sits in front of the window.
            let delta = (off / 2).max(1);
            if len > 0 {
                // SAFETY: [off, off + len) is live and delta <= off.
                unsafe { self.storage.shift(off..off + len, -(delta as isize)) };
            }
            off -= delta;
            self.offset = St::Size::from_usize(off);
        }
        // SAFETY: slot off + len is free after the slide.
        unsafe { self.storage.place(off + len, value) };
        Ok(())
    }

    fn clear(&mut self) {
        let start = self.offset.as_usize();
        clear_window(&mut self.storage, start);
        self.offset = St::Size::from_usize(self.storage.capacity() / 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Growable, Inline};

    #[test]
    fn front_keeps_its_window_at_zero() {
        let mut anchor: Front<Inline<u32, 4>> = Anchor::new();
        anchor.push_back(1).unwrap();
        anchor.push_front(0).unwrap();
        assert_eq!(anchor.window_start(), 0);
        assert_eq!(anchor.storage().len(), 2);
    }

    #[test]
    fn back_keeps_its_window_flush_with_the_top() {
        let mut anchor: Back<Inline<u32, 4>> = Anchor::new();
        anchor.push_front(2).unwrap();
        assert_eq!(anchor.window_start(), 3);
        anchor.push_front(1).unwrap();
        assert_eq!(anchor.window_start(), 2);
        anchor.push_back(3).unwrap();
        assert_eq!(anchor.window_start(), 1);
        assert_eq!(anchor.storage().len(), 3);
    }

    #[test]
    fn middle_starts_centered_and_drifts_with_the_cheap_end() {
        let mut anchor: Middle<Inline<u32, 8>> = Anchor::new();
        assert_eq!(anchor.window_start(), 4);
        anchor.push_back(1).unwrap();
        assert_eq!(anchor.window_start(), 4);
        anchor.push_front(0).unwrap();
        assert_eq!(anchor.window_start(), 3);
        assert_eq!(anchor.storage().relocated_slots(), 0);
    }

    #[test]
    fn middle_single_free_slot_still_admits_a_front_push() {
        let mut anchor: Middle<Inline<u32, 2>> = Anchor::new();
        anchor.push_front(1).unwrap();
        anchor.push_front(2).unwrap();
        assert_eq!(anchor.storage().len(), 2);
        assert_eq!(anchor.window_start(), 0);
        // The second push slid the one live element right by one slot.
        assert_eq!(anchor.storage().relocated_slots(), 1);
    }

    #[test]
    fn middle_single_free_slot_still_admits_a_back_push() {
        let mut anchor: Middle<Inline<u32, 2>> = Anchor::new();
        anchor.push_back(1).unwrap();
        anchor.push_back(2).unwrap();
        assert_eq!(anchor.storage().len(), 2);
        assert_eq!(anchor.window_start(), 0);
        assert_eq!(anchor.storage().relocated_slots(), 1);
    }

    #[test]
    fn clear_resets_the_middle_offset() {
        let mut anchor: Middle<Inline<u32, 8>> = Anchor::new();
        for i in 0..6 {
            anchor.push_back(i).unwrap();
        }
        anchor.clear();
        assert_eq!(anchor.storage().len(), 0);
        assert_eq!(anchor.window_start(), 4);
    }

    #[test]
    fn growable_middle_reallocation_recenters_the_window() {
        let mut anchor: Middle<Growable<u32>> = Anchor::new();
        anchor.push_back(1).unwrap();
        // First reserve lands at (4 - 0) / 2 = 2.
        assert_eq!(anchor.window_start(), 2);
        assert_eq!(anchor.storage().capacity(), 4);
        assert_eq!(anchor.storage().reallocations(), 1);
    }
}
