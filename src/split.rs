//! Power-of-two splitting of a tick count into an outer and inner counter.
//!
//! This is the lossless baseline the nested-loop search is measured
//! against: `total = outer * 2^bits + inner`, with no instruction overhead.

use crate::error::SolveError;

/// Split `total` into `(outer, inner)` with `inner` holding the low
/// `inner_bits` bits.
pub fn split_cycles(total: u32, inner_bits: u32) -> Result<(u32, u32), SolveError> {
    if inner_bits == 0 || inner_bits >= 32 {
        return Err(SolveError::InvalidParameter {
            name: "inner_bits",
            expected: "in 1..=31",
            value: inner_bits as f64,
        });
    }
    Ok((total >> inner_bits, total & ((1 << inner_bits) - 1)))
}

/// Inverse of [`split_cycles`].
pub fn join_cycles(outer: u32, inner: u32, inner_bits: u32) -> u32 {
    (outer << inner_bits) + inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triple::COUNTER_BITS;

    fn split_default(total: u32) -> (u32, u32) {
        split_cycles(total, COUNTER_BITS).unwrap()
    }

    #[test]
    fn test_boundary_values() {
        assert_eq!(split_default(0), (0, 0));
        assert_eq!(split_default(31), (0, 31));
        assert_eq!(split_default(32), (1, 0));
        assert_eq!(split_default(63), (1, 31));
        assert_eq!(split_default(512), (16, 0));
        assert_eq!(split_default(1023), (31, 31));
    }

    #[test]
    fn test_join_inverts_split() {
        for bits in [1, 5, 8, 16] {
            for total in (0..4096).step_by(30) {
                let (outer, inner) = split_cycles(total, bits).unwrap();
                assert!(inner < 1 << bits);
                assert_eq!(join_cycles(outer, inner, bits), total);
            }
        }
    }

    #[test]
    fn test_rejects_bad_width() {
        assert!(split_cycles(10, 0).is_err());
        assert!(split_cycles(10, 32).is_err());
        assert_eq!(split_cycles(10, 5), Ok((0, 10)));
    }
}
