//! Sequence configuration as plain data.
//!
//! Every concrete sequence type assembles a [`SequenceTraits`] record
//! from its policy parameters and exposes it as an associated const.
//! The record is descriptive only; behavior is fixed by the type
//! parameters themselves. Cross-axis rules are checked by
//! [`SequenceTraits::validated`] in const evaluation, so a violating
//! combination never exists at run time.

/// Placement of the occupancy window within the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// Window pinned to the low end; cheap `push_back`.
    Front,
    /// Window floats near the center; both ends cheap, amortized.
    Middle,
    /// Window pinned to the high end; cheap `push_front`.
    Back,
}

/// Capacity growth rule, as data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GrowthRule {
    /// Fixed number of slots added per reallocation.
    Linear {
        /// Slots added per step; always non-zero.
        increment: usize,
    },
    /// Geometric growth.
    Exponential {
        /// Multiplier per step; always greater than 1.0.
        factor: f32,
    },
    /// Amortized doubling with implementation-chosen constants.
    VectorLike,
}

/// The configuration axes bound into one sequence type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequenceTraits {
    /// Whether the buffer may live on the heap.
    pub dynamic: bool,
    /// Whether capacity may grow past its initial value.
    pub variable: bool,
    /// Fixed capacity, or the inline threshold for small-buffer
    /// storage; 0 when storage starts empty on the heap.
    pub capacity: usize,
    /// Window placement strategy.
    pub location: Location,
    /// Growth rule for variable configurations, `None` for fixed.
    pub growth: Option<GrowthRule>,
    /// Bit width of the stored length/offset integer.
    pub size_bits: u32,
}

impl SequenceTraits {
    /// Checks the cross-axis rules and returns the record unchanged.
    ///
    /// Runs during const evaluation of each assembled `TRAITS` record;
    /// a violation is a compile error at the point the sequence type is
    /// first used.
    #[must_use]
    pub const fn validated(self) -> Self {
        assert!(
            self.dynamic || !self.variable,
            "a sequence with local storage cannot have variable capacity"
        );
        assert!(
            self.variable == self.growth.is_some(),
            "growth policy presence must match the variable axis"
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline_record() -> SequenceTraits {
        SequenceTraits {
            dynamic: false,
            variable: false,
            capacity: 16,
            location: Location::Front,
            growth: None,
            size_bits: usize::BITS,
        }
    }

    #[test]
    fn valid_records_pass_through_unchanged() {
        let record = inline_record();
        assert_eq!(record.validated(), record);

        let growable = SequenceTraits {
            dynamic: true,
            variable: true,
            capacity: 0,
            growth: Some(GrowthRule::VectorLike),
            ..record
        };
        assert_eq!(growable.validated(), growable);
    }

    #[test]
    #[should_panic(expected = "local storage cannot have variable capacity")]
    fn local_variable_combination_is_rejected() {
        let bad = SequenceTraits {
            variable: true,
            growth: Some(GrowthRule::VectorLike),
            ..inline_record()
        };
        let _ = bad.validated();
    }

    #[test]
    #[should_panic(expected = "growth policy presence must match")]
    fn fixed_record_with_growth_rule_is_rejected() {
        let bad = SequenceTraits {
            growth: Some(GrowthRule::Linear { increment: 1 }),
            ..inline_record()
        };
        let _ = bad.validated();
    }
}
