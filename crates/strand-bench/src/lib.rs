//! Benchmark workloads for the strand sequence containers.
//!
//! Push benchmarks are only comparable when every contender replays
//! the same operation stream, so streams are generated up front from a
//! seeded ChaCha8 RNG instead of sampled inside the timing loop.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// One push at a chosen end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndOp {
    /// Insert before the first element.
    Front(u64),
    /// Insert after the last element.
    Back(u64),
}

/// Build a stream of `len` pushes, `front_ratio` of them at the front.
///
/// The same seed always yields the same stream.
pub fn end_ops(seed: u64, len: usize, front_ratio: f64) -> Vec<EndOp> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let value = rng.random::<u64>();
            if rng.random_bool(front_ratio) {
                EndOp::Front(value)
            } else {
                EndOp::Back(value)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_ops_is_deterministic() {
        assert_eq!(end_ops(7, 64, 0.5), end_ops(7, 64, 0.5));
    }

    #[test]
    fn ratio_extremes_pin_the_end() {
        assert!(end_ops(1, 32, 1.0)
            .iter()
            .all(|op| matches!(op, EndOp::Front(_))));
        assert!(end_ops(1, 32, 0.0)
            .iter()
            .all(|op| matches!(op, EndOp::Back(_))));
    }

    #[test]
    fn streams_have_the_requested_length() {
        assert_eq!(end_ops(3, 1000, 0.25).len(), 1000);
    }
}
