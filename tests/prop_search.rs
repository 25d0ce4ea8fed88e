//! Property-based tests for the cost model and the decomposition search.

use proptest::prelude::*;

use pio_delay::cost::cost;
use pio_delay::search::{best_triple, Variant};
use pio_delay::triple::CounterTriple;

fn brute_force_min_error(n: u32, max_val: u8) -> u64 {
    let mut best = u64::MAX;
    for a in 0..=max_val {
        for b in 1..=max_val {
            for c in 0..=31u8 {
                best = best.min((cost(a, b, c) as i64 - n as i64).unsigned_abs());
            }
        }
    }
    best
}

proptest! {
    #[test]
    fn prop_cost_within_reachable_range(a in 0u8..=31, b in 1u8..=31, c in 0u8..=31) {
        let t = cost(a, b, c);
        prop_assert!((4..=1090).contains(&t));
    }

    #[test]
    fn prop_cost_strictly_increasing_in_each_counter(a in 1u8..31, b in 1u8..31, c in 0u8..31) {
        let base = cost(a, b, c);
        prop_assert!(cost(a + 1, b, c) > base);
        prop_assert!(cost(a, b + 1, c) > base);
        prop_assert!(cost(a, b, c + 1) > base);
    }

    #[test]
    fn prop_bypass_ignores_inner_counter(b1 in 1u8..=31, b2 in 1u8..=31, c in 0u8..=31) {
        prop_assert_eq!(cost(0, b1, c), cost(0, b2, c));
        prop_assert_eq!(cost(0, b1, c), 4 + c as u32);
    }

    #[test]
    fn prop_cost_model_search_is_optimal(n in 0u32..1400, max_val in 1u32..=8) {
        let r = best_triple(n, max_val, Variant::CostModel).unwrap();
        prop_assert_eq!(r.abs_error(), brute_force_min_error(n, max_val as u8));
    }

    #[test]
    fn prop_results_respect_max_val(n in 0u32..2048, max_val in 1u32..=31, radius in 0u8..=31) {
        for variant in [Variant::CostModel, Variant::ClosedForm, Variant::Hybrid { radius }] {
            let r = best_triple(n, max_val, variant).unwrap();
            prop_assert!(r.triple.in_domain());
            prop_assert!(u32::from(r.triple.a) <= max_val);
            prop_assert!(u32::from(r.triple.b) <= max_val);
        }
    }

    #[test]
    fn prop_checked_accepts_exactly_the_domain(a in 0u32..40, b in 0u32..40, c in 0u32..40) {
        let ok = a <= 31 && c <= 31 && b <= 31 && (b >= 1 || a == 0);
        prop_assert_eq!(CounterTriple::checked(a, b, c).is_ok(), ok);
    }
}
