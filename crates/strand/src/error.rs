//! Push failure types.
//!
//! Only two things can go wrong at run time, both on the push path:
//! fixed storage is full, or a growable storage cannot obtain a larger
//! buffer. Both are reported before anything is modified, and the
//! rejected element is handed back inside the error.
//!
//! Invalid configurations are a third failure class with no runtime
//! representation: cross-axis violations and bad policy constants are
//! rejected in const evaluation, and relocation-unsafe element types by
//! trait bounds, when the sequence type is formed.

use std::error::Error;
use std::fmt;

/// Why storage refused to make room for one more element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapacityError {
    /// Fixed-capacity storage is full, or a growable storage reached
    /// the ceiling of its configured size type.
    CapacityExceeded {
        /// The capacity that cannot be exceeded, in elements.
        capacity: usize,
    },
    /// Growable storage could not obtain a larger buffer: the allocator
    /// refused, or the requested slot count is not representable.
    AllocationFailure {
        /// The element count that was being reserved.
        requested: usize,
    },
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { capacity } => {
                write!(f, "sequence capacity limit of {capacity} elements reached")
            }
            Self::AllocationFailure { requested } => {
                write!(f, "allocation of {requested} element slots failed")
            }
        }
    }
}

impl Error for CapacityError {}

/// A rejected element together with the reason it was rejected.
///
/// Push operations return this instead of dropping the value, so a
/// failed insertion has no effect beyond the error itself:
///
/// ```
/// use strand::{InplaceVector, Sequence};
///
/// let mut v: InplaceVector<String, 1> = Sequence::new();
/// v.push_back("kept".to_owned()).unwrap();
/// let err = v.push_back("bounced".to_owned()).unwrap_err();
/// assert_eq!(err.into_value(), "bounced");
/// ```
#[derive(Debug)]
pub struct PushError<T> {
    value: T,
    reason: CapacityError,
}

impl<T> PushError<T> {
    pub(crate) fn new(value: T, reason: CapacityError) -> Self {
        Self { value, reason }
    }

    /// The element that was not inserted.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Why the push failed.
    pub fn reason(&self) -> CapacityError {
        self.reason
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "push rejected: {}", self.reason)
    }
}

impl<T: fmt::Debug> Error for PushError<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_limit() {
        let err = CapacityError::CapacityExceeded { capacity: 8 };
        assert_eq!(
            err.to_string(),
            "sequence capacity limit of 8 elements reached"
        );
    }

    #[test]
    fn display_names_the_failed_request() {
        let err = CapacityError::AllocationFailure { requested: 512 };
        assert_eq!(err.to_string(), "allocation of 512 element slots failed");
    }

    #[test]
    fn push_error_round_trips_the_value() {
        let err = PushError::new(
            vec![1, 2, 3],
            CapacityError::CapacityExceeded { capacity: 4 },
        );
        assert_eq!(
            err.reason(),
            CapacityError::CapacityExceeded { capacity: 4 }
        );
        assert_eq!(err.to_string(), "push rejected: sequence capacity limit of 4 elements reached");
        assert_eq!(err.into_value(), vec![1, 2, 3]);
    }

    #[test]
    fn push_error_source_is_the_reason() {
        let err = PushError::new(7u32, CapacityError::AllocationFailure { requested: 2 });
        let source = Error::source(&err).expect("source");
        assert_eq!(
            source.to_string(),
            "allocation of 2 element slots failed"
        );
    }
}
