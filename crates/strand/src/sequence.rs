//! The sequence facade.
//!
//! [`Sequence`] is the only type users interact with. It owns the
//! anchor (which owns the storage), keeps the unsafe slot machinery
//! behind a safe surface, and is responsible for element destruction:
//! `clear` and `Drop` run every live destructor exactly once before the
//! storage releases its buffer.

#![allow(unsafe_code)]

use std::fmt;
use std::slice;

use crate::anchor::{Anchor, Front, Middle};
use crate::config::SequenceTraits;
use crate::error::PushError;
use crate::growth::VectorLike;
use crate::size::SizeType;
use crate::storage::{Growable, Inline, Small, Storage};

/// Element type of an anchor's storage.
type ItemOf<A> = <<A as Anchor>::Storage as Storage>::Item;

/// A contiguous sequence whose memory behavior is chosen by its type
/// parameters.
///
/// The anchor parameter selects where the live window sits (and so
/// which end is cheap); its storage parameter selects who owns the
/// buffer and whether it grows. The [`Vector`], [`InplaceVector`],
/// [`SmallVector`], and [`Deque`] aliases name the common corners.
///
/// ```
/// use strand::{Deque, Sequence};
///
/// let mut line: Deque<&str> = Sequence::new();
/// line.push_back("middle").unwrap();
/// line.push_back("late").unwrap();
/// line.push_front("early").unwrap();
/// assert_eq!(line.as_slice(), ["early", "middle", "late"]);
/// ```
pub struct Sequence<A: Anchor> {
    inner: A,
}

impl<A: Anchor> Sequence<A> {
    /// The configuration axes bound into this sequence type, as data.
    ///
    /// Referencing the record also runs the cross-axis validation in
    /// const evaluation, so an invalid configuration fails to compile
    /// at its first use.
    pub const TRAITS: SequenceTraits = SequenceTraits {
        dynamic: <A::Storage as Storage>::DYNAMIC,
        variable: <A::Storage as Storage>::VARIABLE,
        capacity: <A::Storage as Storage>::DECLARED_CAPACITY,
        location: A::LOCATION,
        growth: <A::Storage as Storage>::GROWTH,
        size_bits: <<A::Storage as Storage>::Size as SizeType>::WIDTH,
    }
    .validated();

    /// Creates an empty sequence.
    ///
    /// Fixed configurations come up at their configured capacity,
    /// small-buffer ones at the inline threshold, growable ones at
    /// zero. Nothing is allocated except [`Reserved`]'s one up-front
    /// buffer.
    ///
    /// [`Reserved`]: crate::storage::Reserved
    pub fn new() -> Self {
        let _ = Self::TRAITS;
        Self { inner: A::new() }
    }

    /// The bound configuration, by value.
    pub fn traits(&self) -> SequenceTraits {
        Self::TRAITS
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.inner.storage().len()
    }

    /// True when no elements are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total element slots in the current buffer.
    pub fn capacity(&self) -> usize {
        self.inner.storage().capacity()
    }

    /// Inserts `value` before the first element.
    ///
    /// Cheap on [`Back`](crate::anchor::Back) and [`Middle`] anchors,
    /// O(len) on [`Front`]. On failure nothing has changed and the
    /// error carries `value` back out.
    pub fn push_front(&mut self, value: ItemOf<A>) -> Result<(), PushError<ItemOf<A>>> {
        self.inner.push_front(value)
    }

    /// Inserts `value` after the last element.
    ///
    /// Cheap on [`Front`] and [`Middle`] anchors, O(len) on
    /// [`Back`](crate::anchor::Back). On failure nothing has changed
    /// and the error carries `value` back out.
    pub fn push_back(&mut self, value: ItemOf<A>) -> Result<(), PushError<ItemOf<A>>> {
        self.inner.push_back(value)
    }

    /// The live elements, front to back.
    pub fn as_slice(&self) -> &[ItemOf<A>] {
        let storage = self.inner.storage();
        let len = storage.len();
        // SAFETY: the window [start, start + len) holds constructed
        // elements, and the slice borrow pins `self` for its lifetime.
        unsafe { slice::from_raw_parts(storage.base().add(self.inner.window_start()), len) }
    }

    /// Iterates the live elements, front to back. Restartable: each
    /// call starts a fresh pass.
    pub fn iter(&self) -> slice::Iter<'_, ItemOf<A>> {
        self.as_slice().iter()
    }

    /// Drops every live element, keeping the buffer and its capacity.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Buffer growth events over this sequence's lifetime.
    pub fn reallocations(&self) -> usize {
        self.inner.storage().reallocations()
    }

    /// Element slots relocated by shifts, re-centering, and growth over
    /// this sequence's lifetime.
    pub fn relocated_slots(&self) -> usize {
        self.inner.storage().relocated_slots()
    }
}

impl<A: Anchor> Drop for Sequence<A> {
    fn drop(&mut self) {
        // Element destructors run here; the storage's own drop then
        // releases the buffer.
        self.inner.clear();
    }
}

impl<A: Anchor> Default for Sequence<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Anchor> fmt::Debug for Sequence<A>
where
    ItemOf<A>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, A: Anchor> IntoIterator for &'a Sequence<A> {
    type Item = &'a ItemOf<A>;
    type IntoIter = slice::Iter<'a, ItemOf<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Grows like `Vec`: heap storage, window at the front, growth policy
/// `G` (amortized doubling by default).
pub type Vector<T, G = VectorLike> = Sequence<Front<Growable<T, G>>>;

/// Fixed capacity `N` held inline: never touches the heap, full is
/// full.
pub type InplaceVector<T, const N: usize> = Sequence<Front<Inline<T, N>>>;

/// Starts on `N` inline slots and spills to the heap when they run
/// out.
pub type SmallVector<T, const N: usize, G = VectorLike> = Sequence<Front<Small<T, N, G>>>;

/// Cheap pushes at both ends: growable storage under a floating
/// centered window.
pub type Deque<T, G = VectorLike> = Sequence<Middle<Growable<T, G>>>;
