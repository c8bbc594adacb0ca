//! Sequence containers with per-type storage, placement, and growth
//! policies.
//!
//! A [`Sequence`] is a contiguous container whose memory behavior is
//! chosen by policy type parameters, bound once per container type.
//! The same push/iterate surface covers a `Vec` work-alike, a
//! never-allocates inline vector, a small-buffer vector, and a
//! centered deque-like container, each as a distinct type.
//!
//! # Architecture
//!
//! ```text
//! Sequence<A>                 (facade: pushes, iteration, destruction)
//! └── A: Anchor               (where the live window sits)
//!     ├── Front<St>           window at the low end, cheap push_back
//!     ├── Middle<St>          window floats, both ends cheap
//!     └── Back<St>            window at the high end, cheap push_front
//!         └── St: Storage     (who owns the buffer, whether it grows)
//!             ├── Inline<T, N>      no heap, capacity N
//!             ├── Reserved<T, N>    one heap reservation of N
//!             ├── Growable<T, G>    heap, grows per policy G
//!             └── Small<T, N, G>    inline up to N, then heap
//!                 └── G: Growth     (Linear / Exponential / VectorLike)
//! ```
//!
//! # Quick start
//!
//! ```
//! use strand::{InplaceVector, Sequence, Vector};
//!
//! // Heap-backed, grows like Vec.
//! let mut v: Vector<i32> = Sequence::new();
//! v.push_back(2).unwrap();
//! v.push_front(1).unwrap();
//! assert_eq!(v.as_slice(), [1, 2]);
//!
//! // Inline, never allocates, full is full.
//! let mut small: InplaceVector<i32, 2> = Sequence::new();
//! small.push_back(1).unwrap();
//! small.push_back(2).unwrap();
//! let err = small.push_back(3).unwrap_err();
//! assert_eq!(err.into_value(), 3);
//! assert_eq!(small.as_slice(), [1, 2]);
//! ```
//!
//! # Configuration is definition-time
//!
//! Invalid axis combinations do not produce run-time errors; they
//! produce types that cannot be used. A zero linear increment or an
//! exponential factor of 1.0 fails const evaluation, a fixed capacity
//! too large for the chosen [`SizeType`] fails const evaluation, and
//! element types that must never move (`!Unpin`) are rejected by trait
//! bounds for every configuration that relocates elements.
//!
//! # Failure model
//!
//! Pushes are fallible and atomic: on failure nothing changed and the
//! rejected element rides back in the [`PushError`]. Fixed-capacity
//! storage fails with [`CapacityError::CapacityExceeded`]; growable
//! storage reports allocator refusal as
//! [`CapacityError::AllocationFailure`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod anchor;
pub mod config;
pub mod error;
pub mod growth;
mod raw;
pub mod sequence;
pub mod size;
pub mod storage;

mod sealed {
    /// Marker supertrait keeping the policy traits closed to this crate.
    pub trait Sealed {}
}

// Public re-exports for the primary API surface.
pub use anchor::{Anchor, Back, Front, Middle};
pub use config::{GrowthRule, Location, SequenceTraits};
pub use error::{CapacityError, PushError};
pub use growth::{Exponential, Growth, Linear, VectorLike};
pub use sequence::{Deque, InplaceVector, Sequence, SmallVector, Vector};
pub use size::SizeType;
pub use storage::{Growable, Inline, Reserved, Small, Storage};
