use std::fmt;

use serde::Serialize;

use crate::error::SolveError;

/// Width of each hardware loop counter in bits.
pub const COUNTER_BITS: u32 = 5;

/// Largest value any counter can hold.
pub const MAX_COUNTER: u8 = (1 << COUNTER_BITS) - 1;

/// Smallest legal inner-loop count on the nested-loop branch.
pub const MIN_INNER: u8 = 1;

/// Outer (`a`), inner (`b`) and remainder (`c`) loop counter values.
///
/// `a == 0` selects the bypass branch: the nested loop is skipped and `b`
/// has no effect on the produced delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CounterTriple {
    pub a: u8,
    pub b: u8,
    pub c: u8,
}

impl CounterTriple {
    pub const fn new(a: u8, b: u8, c: u8) -> Self {
        Self { a, b, c }
    }

    /// Construct a triple, rejecting values the counters cannot hold.
    pub fn checked(a: u32, b: u32, c: u32) -> Result<Self, SolveError> {
        let max = MAX_COUNTER as u32;
        let check = |name: &'static str, value: u32, min: u8| {
            if value < min as u32 || value > max {
                Err(SolveError::CounterOutOfRange {
                    name,
                    value,
                    min,
                    max: MAX_COUNTER,
                })
            } else {
                Ok(value as u8)
            }
        };
        // `b` is only constrained to be non-zero on the nested-loop branch.
        let b_min = if a == 0 { 0 } else { MIN_INNER };
        Ok(Self {
            a: check("a", a, 0)?,
            b: check("b", b, b_min)?,
            c: check("c", c, 0)?,
        })
    }

    /// True when the outer counter is zero and the nested loop is skipped.
    pub fn is_bypass(&self) -> bool {
        self.a == 0
    }

    /// The closed-form delay `a*b + c`.
    pub fn product_sum(&self) -> u32 {
        self.a as u32 * self.b as u32 + self.c as u32
    }

    /// Whether every counter fits the hardware range.
    pub fn in_domain(&self) -> bool {
        self.a <= MAX_COUNTER
            && self.c <= MAX_COUNTER
            && self.b <= MAX_COUNTER
            && (self.is_bypass() || self.b >= MIN_INNER)
    }
}

impl fmt::Display for CounterTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a={} b={} c={}", self.a, self.b, self.c)
    }
}
