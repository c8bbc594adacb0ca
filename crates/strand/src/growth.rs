//! Capacity growth policies for the growable storages.
//!
//! A policy is pure arithmetic: given the current capacity and the
//! minimum the caller needs, it names the capacity to reallocate to.
//! Storage applies the result; policies never touch memory.
//!
//! Policy constants are validated in const evaluation when a sequence
//! type using the policy is instantiated, so a zero increment or a
//! factor of 1.0 is a compile error, not a run-time surprise.

use crate::config::GrowthRule;
use crate::sealed::Sealed;

/// Sizing rule applied when a growable storage runs out of room.
///
/// Implemented by [`Linear`], [`Exponential`], and [`VectorLike`]; the
/// set is closed.
pub trait Growth: Sealed {
    /// The policy as inspectable data, reported in
    /// [`SequenceTraits::growth`].
    ///
    /// [`SequenceTraits::growth`]: crate::config::SequenceTraits::growth
    const RULE: GrowthRule;

    /// Definition-time validation of the policy constants. Referencing
    /// this const forces the checks during monomorphization.
    const VALID: () = ();

    /// Smallest policy-conforming capacity `>= need`, starting from
    /// `current`. `None` when the arithmetic overflows `usize`; callers
    /// report that as an allocation failure.
    fn next_capacity(current: usize, need: usize) -> Option<usize>;
}

/// Grows by a fixed number of slots per reallocation.
///
/// `STEP` must be non-zero. A linear policy trades reallocation count
/// for tight memory: appending n elements costs O(n²/STEP) relocations.
pub struct Linear<const STEP: usize = 1>;

impl<const STEP: usize> Sealed for Linear<STEP> {}

impl<const STEP: usize> Growth for Linear<STEP> {
    const RULE: GrowthRule = GrowthRule::Linear { increment: STEP };

    const VALID: () = assert!(STEP > 0, "linear growth increment must be non-zero");

    fn next_capacity(current: usize, need: usize) -> Option<usize> {
        let () = Self::VALID;
        let mut cap = current;
        while cap < need {
            cap = cap.checked_add(STEP)?;
        }
        Some(cap)
    }
}

/// Grows geometrically by the rational factor `NUM / DEN`.
///
/// Const parameters cannot be floats on stable Rust, so the factor is a
/// rational; the default `3 / 2` is the conventional 1.5. Integer
/// ceiling arithmetic keeps the progression exact, and a forced `+ 1`
/// per round guarantees progress for factors arbitrarily close to 1.
///
/// `NUM > DEN` is required (the factor must exceed 1.0).
pub struct Exponential<const NUM: usize = 3, const DEN: usize = 2>;

impl<const NUM: usize, const DEN: usize> Sealed for Exponential<NUM, DEN> {}

impl<const NUM: usize, const DEN: usize> Growth for Exponential<NUM, DEN> {
    const RULE: GrowthRule = GrowthRule::Exponential {
        factor: NUM as f32 / DEN as f32,
    };

    const VALID: () = {
        assert!(DEN > 0, "exponential growth denominator must be non-zero");
        assert!(NUM > DEN, "exponential growth factor must exceed 1.0");
    };

    fn next_capacity(current: usize, need: usize) -> Option<usize> {
        let () = Self::VALID;
        let mut cap = current;
        while cap < need {
            let scaled = cap.checked_mul(NUM)?.div_ceil(DEN);
            let bumped = cap.checked_add(1)?;
            cap = if scaled > bumped { scaled } else { bumped };
        }
        Some(cap)
    }
}

/// Grows the way `Vec` grows: amortized doubling with a small floor.
///
/// The exact constants are deliberately unspecified; the contract is
/// amortized O(1) append and a non-decreasing capacity.
pub struct VectorLike;

impl Sealed for VectorLike {}

impl Growth for VectorLike {
    const RULE: GrowthRule = GrowthRule::VectorLike;

    fn next_capacity(current: usize, need: usize) -> Option<usize> {
        const FLOOR: usize = 4;
        Some(current.saturating_mul(2).max(need).max(FLOOR))
    }
}
