use std::ops::RangeInclusive;

use crate::triple::{CounterTriple, MAX_COUNTER, MIN_INNER};

/// Inclusive per-counter ranges the search enumerates.
///
/// Only built through [`Bounds::full`] and [`Bounds::around`], which both
/// produce non-empty ranges, so a search always visits at least one triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub(super) a: RangeInclusive<u8>,
    pub(super) b: RangeInclusive<u8>,
    pub(super) c: RangeInclusive<u8>,
}

impl Bounds {
    /// The whole domain for outer/inner counters capped at `max_val`.
    ///
    /// `max_val` must already be validated to lie in `1..=MAX_COUNTER`.
    pub fn full(max_val: u8) -> Self {
        debug_assert!((MIN_INNER..=MAX_COUNTER).contains(&max_val));
        Self {
            a: 0..=max_val,
            b: MIN_INNER..=max_val,
            c: 0..=MAX_COUNTER,
        }
    }

    /// A cube of half-width `radius` around `center`, clamped to the domain.
    pub fn around(center: CounterTriple, radius: u8, max_val: u8) -> Self {
        let clamp = |v: u8, lo: u8, hi: u8| {
            let lo = v.saturating_sub(radius).max(lo);
            let hi = v.saturating_add(radius).min(hi);
            lo..=hi.max(lo)
        };
        Self {
            a: clamp(center.a, 0, max_val),
            b: clamp(center.b.max(MIN_INNER), MIN_INNER, max_val),
            c: clamp(center.c, 0, MAX_COUNTER),
        }
    }

    /// Number of triples the search would evaluate, counting the bypass
    /// branch as a single `b` value.
    pub fn evaluations(&self) -> usize {
        let len = |r: &RangeInclusive<u8>| (*r.end() as usize + 1).saturating_sub(*r.start() as usize);
        let (a, b, c) = (len(&self.a), len(&self.b), len(&self.c));
        let nested = if *self.a.start() == 0 { a - 1 } else { a };
        let bypass = a - nested;
        (nested * b + bypass) * c
    }

    pub fn contains(&self, t: CounterTriple) -> bool {
        self.a.contains(&t.a) && self.b.contains(&t.b) && self.c.contains(&t.c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_domain() {
        let b = Bounds::full(31);
        assert_eq!(b.a, 0..=31);
        assert_eq!(b.b, 1..=31);
        assert_eq!(b.c, 0..=31);
        // 31 nested outer values * 31 inner + one bypass row, times 32 tails
        assert_eq!(b.evaluations(), (31 * 31 + 1) * 32);
    }

    #[test]
    fn test_around_clamps_low_edge() {
        let b = Bounds::around(CounterTriple::new(2, 1, 0), 5, 31);
        assert_eq!(b.a, 0..=7);
        assert_eq!(b.b, 1..=6);
        assert_eq!(b.c, 0..=5);
    }

    #[test]
    fn test_around_clamps_high_edge() {
        let b = Bounds::around(CounterTriple::new(30, 29, 31), 5, 31);
        assert_eq!(b.a, 25..=31);
        assert_eq!(b.b, 24..=31);
        assert_eq!(b.c, 26..=31);
    }

    #[test]
    fn test_around_respects_max_val() {
        let b = Bounds::around(CounterTriple::new(8, 8, 8), 5, 10);
        assert_eq!(b.a, 3..=10);
        assert_eq!(b.b, 3..=10);
        assert_eq!(b.c, 3..=13);
        assert!(b.contains(CounterTriple::new(10, 10, 13)));
        assert!(!b.contains(CounterTriple::new(11, 10, 13)));
    }

    #[test]
    fn test_around_never_empty() {
        for max_val in [1, 7, 31] {
            for v in [0, 1, 15, 31] {
                for radius in [0, 2, 31] {
                    let center = CounterTriple::new(v.min(max_val), v.clamp(1, max_val), v);
                    let b = Bounds::around(center, radius, max_val);
                    assert!(!b.a.is_empty() && !b.b.is_empty() && !b.c.is_empty());
                    assert!(b.contains(center), "{} r={} max={}", center, radius, max_val);
                    assert!(b.evaluations() >= 1);
                }
            }
        }
    }

    #[test]
    fn test_zero_radius_is_single_point() {
        let b = Bounds::around(CounterTriple::new(4, 6, 9), 0, 31);
        assert_eq!(b.evaluations(), 1);
    }
}
