//! Storage strategies: buffer ownership and growth.
//!
//! Four implementations cover the dynamic/variable axes:
//!
//! | type         | buffer            | capacity         |
//! |--------------|-------------------|------------------|
//! | [`Inline`]   | inside the value  | fixed `N`        |
//! | [`Reserved`] | one heap block    | fixed `N`        |
//! | [`Growable`] | heap              | grows per policy |
//! | [`Small`]    | inline, then heap | grows past `N`   |
//!
//! A storage owns raw element slots and the live count, nothing more.
//! It does not know where the occupancy window sits: anchors drive
//! placement through the unsafe slot primitives and pass a
//! window-destination callback into [`Storage::try_reserve`] when
//! growth relocates the window to a new buffer.

#![allow(unsafe_code)]

mod growable;
mod inline;
mod reserved;
mod small;

pub use growable::Growable;
pub use inline::Inline;
pub use reserved::Reserved;
pub use small::Small;

use std::ops::Range;
use std::ptr;

use crate::config::GrowthRule;
use crate::error::CapacityError;
use crate::raw;
use crate::sealed::Sealed;
use crate::size::SizeType;

/// Raw backing storage for one sequence.
///
/// Implemented by [`Inline`], [`Reserved`], [`Growable`], and
/// [`Small`]; the set is closed. All slot-level methods are unsafe:
/// the anchor layer owns the occupancy invariants and is the only
/// caller.
pub trait Storage: Sealed {
    /// Element type held in the buffer.
    type Item;

    /// Integer type of the stored length (and middle-anchor offset).
    type Size: SizeType;

    /// Whether the buffer may live on the heap.
    const DYNAMIC: bool;

    /// Whether capacity may grow past its initial value.
    const VARIABLE: bool;

    /// Capacity as declared in the configuration: the fixed capacity,
    /// the inline threshold for [`Small`], or 0 for [`Growable`].
    const DECLARED_CAPACITY: usize;

    /// Growth rule as data; `None` for fixed-capacity storage.
    const GROWTH: Option<GrowthRule>;

    /// Fresh, empty storage. Fixed variants come up at full capacity,
    /// [`Small`] at its inline threshold, [`Growable`] at zero.
    fn new() -> Self;

    /// Total slots in the current buffer.
    fn capacity(&self) -> usize;

    /// Constructed elements currently in the buffer.
    fn len(&self) -> usize;

    /// First slot of the buffer.
    fn base(&self) -> *const Self::Item;

    /// First slot of the buffer, mutably.
    fn base_mut(&mut self) -> *mut Self::Item;

    /// Overwrites the live count.
    ///
    /// # Safety
    ///
    /// Exactly `n` constructed elements must be live in the buffer once
    /// the caller's current operation completes.
    unsafe fn set_len(&mut self, n: usize);

    /// Placement-constructs `value` into slot `index` and counts it.
    ///
    /// # Safety
    ///
    /// `index` must be within capacity, the slot must not hold a
    /// constructed element, and `len() < capacity()`.
    unsafe fn place(&mut self, index: usize, value: Self::Item) {
        debug_assert!(index < self.capacity());
        debug_assert!(self.len() < self.capacity());
        // SAFETY: caller guarantees the slot is in bounds and empty.
        unsafe { ptr::write(self.base_mut().add(index), value) };
        let up = self.len() + 1;
        // SAFETY: exactly one more element was just constructed.
        unsafe { self.set_len(up) };
    }

    /// Relocates the live slots `range` by `by` positions and adds the
    /// range length to the relocation counter. Overlap is fine.
    ///
    /// # Safety
    ///
    /// `range` must hold constructed elements; the destination must lie
    /// within the buffer; any constructed element it overwrites must
    /// itself be inside `range`.
    unsafe fn shift(&mut self, range: Range<usize>, by: isize) {
        let count = range.len();
        // SAFETY: forwarded caller contract.
        unsafe { raw::shift_slots(self.base_mut(), range.start, count, by) };
        self.record_relocated(count);
    }

    /// Makes room for at least `min` elements, relocating the live
    /// `window` so that it starts at `dest(new_capacity)` in the new
    /// buffer, and returns that new start.
    ///
    /// All-or-nothing: on error the buffer, the live elements, and the
    /// counters are untouched. Fixed-capacity storage always fails with
    /// [`CapacityError::CapacityExceeded`]; growable storage also fails
    /// that way once `min` passes the size type's ceiling, and with
    /// [`CapacityError::AllocationFailure`] when no buffer can be
    /// obtained.
    ///
    /// # Safety
    ///
    /// `window` must lie within `capacity()` and hold only constructed
    /// elements, since growth moves it bitwise into the new buffer. Any
    /// start `dest` returns must keep the window inside the buffer
    /// whose capacity it is handed: `start + window.len()` at most that
    /// capacity.
    ///
    /// ```compile_fail
    /// use strand::{Growable, Storage};
    ///
    /// // The window is taken on trust, so the call needs unsafe.
    /// let mut storage: Growable<Box<u64>> = Storage::new();
    /// let _ = storage.try_reserve(8, 0..4, |_| 0);
    /// ```
    unsafe fn try_reserve(
        &mut self,
        min: usize,
        window: Range<usize>,
        dest: impl FnOnce(usize) -> usize,
    ) -> Result<usize, CapacityError>;

    /// Buffer growth events so far.
    fn reallocations(&self) -> usize;

    /// Slots relocated by shifts and reallocations so far.
    fn relocated_slots(&self) -> usize;

    /// Bookkeeping hook behind [`Storage::shift`]; adds to the
    /// relocated-slots counter.
    #[doc(hidden)]
    fn record_relocated(&mut self, slots: usize);
}

/// Lifetime event counters.
///
/// Shifts and reallocations are the observable costs that distinguish
/// the placement strategies; every storage keeps the tally and the
/// facade exposes it.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Stats {
    pub(crate) reallocations: usize,
    pub(crate) relocated: usize,
}
