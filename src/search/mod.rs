//! Decomposition search: find the counter triple whose delay best matches
//! a target tick count.
//!
//! All variants share one enumeration ([`search`]) over a [`Bounds`] cube,
//! in `a`, then `b`, then `c` ascending order. The first triple to reach a
//! strictly lower score wins, and an exact hit stops the walk early. That
//! tie-break is part of the contract: lookup tables built by different
//! implementations only agree if they enumerate in the same order.

pub mod bounds;
pub mod variant;

pub use bounds::Bounds;
pub use variant::{Variant, Weights};

use serde::Serialize;
use tracing::{debug, trace};

use crate::cost::{ClosedFormModel, CostModel, PioCostModel};
use crate::error::SolveError;
use crate::triple::{CounterTriple, MAX_COUNTER, MIN_INNER};

// ---------------------------------------------------------------------------
// SearchResult
// ---------------------------------------------------------------------------

/// Best triple found for a target, with the residual it leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub triple: CounterTriple,
    /// Delay the search's metric assigns to `triple`.
    pub cost: u32,
    /// Signed residual `cost - n`.
    pub error: i64,
}

impl SearchResult {
    pub fn abs_error(&self) -> u64 {
        self.error.unsigned_abs()
    }

    pub fn is_exact(&self) -> bool {
        self.error == 0
    }

    /// The target this result was solved for.
    pub fn target(&self) -> i64 {
        self.cost as i64 - self.error
    }
}

// ---------------------------------------------------------------------------
// Core enumeration
// ---------------------------------------------------------------------------

/// Exhaustively search `bounds` for the triple minimising the weighted
/// distance between `model`'s delay and `n`.
///
/// On the bypass branch (`a == 0`) only the first `b` in range is visited:
/// every other `b` produces the same delay and could never be strictly
/// better, so skipping them leaves the winner unchanged.
pub fn search(n: u32, bounds: &Bounds, model: &dyn CostModel, weights: Weights) -> SearchResult {
    debug_assert!(
        !bounds.a.is_empty() && !bounds.b.is_empty() && !bounds.c.is_empty(),
        "empty search bounds {:?}",
        bounds
    );
    let evaluate = |t: CounterTriple| {
        let cost = model.cycles(t);
        let error = cost as i64 - n as i64;
        let score = weights.score(error.unsigned_abs(), model.footprint(t));
        (score, SearchResult { triple: t, cost, error })
    };

    let b_first = *bounds.b.start();
    let (mut best_score, mut best) = evaluate(CounterTriple::new(
        *bounds.a.start(),
        b_first,
        *bounds.c.start(),
    ));
    if best.is_exact() {
        return best;
    }

    for a in bounds.a.clone() {
        let b_range = if a == 0 {
            b_first..=b_first
        } else {
            bounds.b.clone()
        };
        for b in b_range {
            for c in bounds.c.clone() {
                let (score, result) = evaluate(CounterTriple::new(a, b, c));
                if score < best_score {
                    best_score = score;
                    best = result;
                    if result.is_exact() {
                        return best;
                    }
                }
            }
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// A validated search configuration; queries on it cannot fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Solver {
    max_val: u8,
    variant: Variant,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_val: MAX_COUNTER,
            variant: Variant::CostModel,
        }
    }
}

impl Solver {
    pub fn new(max_val: u32, variant: Variant) -> Result<Self, SolveError> {
        if !(MIN_INNER as u32..=MAX_COUNTER as u32).contains(&max_val) {
            return Err(SolveError::MaxValOutOfRange(max_val));
        }
        variant.validate()?;
        Ok(Self {
            max_val: max_val as u8,
            variant,
        })
    }

    pub fn max_val(&self) -> u8 {
        self.max_val
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Best triple for `n` under this solver's variant.
    pub fn solve(&self, n: u32) -> SearchResult {
        let full = Bounds::full(self.max_val);
        let result = match self.variant {
            Variant::ClosedForm => search(n, &full, &ClosedFormModel, Weights::UNIT),
            Variant::CostModel => search(n, &full, &PioCostModel, Weights::UNIT),
            Variant::Hybrid { radius } => {
                let approx = search(n, &full, &ClosedFormModel, Weights::UNIT);
                let local = Bounds::around(approx.triple, radius, self.max_val);
                debug!(
                    n,
                    center = %approx.triple,
                    evaluations = local.evaluations(),
                    "hybrid neighborhood search"
                );
                search(n, &local, &PioCostModel, Weights::UNIT)
            }
            Variant::Constrained {
                error_weight,
                footprint_weight,
            } => search(
                n,
                &full,
                &PioCostModel,
                Weights {
                    error: error_weight,
                    footprint: footprint_weight,
                },
            ),
        };
        trace!(n, triple = %result.triple, error = result.error, "solved");
        result
    }
}

/// Best triple for target `n` with outer/inner counters capped at `max_val`.
pub fn best_triple(n: u32, max_val: u32, variant: Variant) -> Result<SearchResult, SolveError> {
    Ok(Solver::new(max_val, variant)?.solve(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::cost;

    fn solve(n: u32, variant: Variant) -> SearchResult {
        best_triple(n, 31, variant).unwrap()
    }

    #[test]
    fn test_exact_hit_short_circuits_in_enumeration_order() {
        // cost(0, 1, 27) == 31 is the first exact triple in a, b, c order
        let r = solve(31, Variant::CostModel);
        assert_eq!(r.triple, CounterTriple::new(0, 1, 27));
        assert_eq!(r.cost, 31);
        assert!(r.is_exact());
    }

    #[test]
    fn test_below_minimum_cost_picks_first_triple() {
        for n in 0..4 {
            let r = solve(n, Variant::CostModel);
            assert_eq!(r.triple, CounterTriple::new(0, 1, 0));
            assert_eq!(r.error, 4 - n as i64);
        }
        assert!(solve(4, Variant::CostModel).is_exact());
    }

    #[test]
    fn test_closed_form_uses_c_alone_for_small_targets() {
        for n in 0..=31 {
            let r = solve(n, Variant::ClosedForm);
            assert_eq!(r.triple, CounterTriple::new(0, 1, n as u8));
            assert!(r.is_exact());
        }
    }

    #[test]
    fn test_closed_form_above_reach() {
        // 31*31 + 31 = 992 is the largest closed-form value
        let r = solve(1023, Variant::ClosedForm);
        assert_eq!(r.cost, 992);
        assert_eq!(r.error, -31);
        assert_eq!(r.triple, CounterTriple::new(31, 31, 31));
    }

    #[test]
    fn test_cost_model_above_reach() {
        let r = solve(2000, Variant::CostModel);
        assert_eq!(r.triple, CounterTriple::new(31, 31, 31));
        assert_eq!(r.cost, 1090);
        assert_eq!(r.error, 1090 - 2000);
    }

    #[test]
    fn test_first_minimum_wins_on_equal_distance() {
        // With max_val = 1 the bypass branch reaches 4..=35 and a = 1 reaches
        // 9..=40. Both hit 20 exactly; the bypass triple comes first.
        let r = best_triple(20, 1, Variant::CostModel).unwrap();
        assert_eq!(r.triple, CounterTriple::new(0, 1, 16));
        // 41 is one past both branches' reach; a = 1 gets closer (40)
        let r = best_triple(41, 1, Variant::CostModel).unwrap();
        assert_eq!(r.triple, CounterTriple::new(1, 1, 31));
        assert_eq!(r.error, -1);
    }

    #[test]
    fn test_constrained_unit_weight_matches_cost_model() {
        let constrained = Variant::Constrained {
            error_weight: 1,
            footprint_weight: 3,
        };
        for n in (0..1024).step_by(7) {
            assert_eq!(solve(n, constrained), solve(n, Variant::CostModel), "n={n}");
        }
    }

    #[test]
    fn test_hybrid_reports_cost_model_error() {
        for n in [0u32, 5, 64, 200, 511, 777, 1023] {
            let r = solve(n, Variant::hybrid());
            let t = r.triple;
            assert_eq!(r.cost, cost(t.a, t.b, t.c));
            assert_eq!(r.error, r.cost as i64 - n as i64);
        }
    }

    #[test]
    fn test_hybrid_never_beats_exhaustive() {
        for n in 0..1024 {
            let hybrid = solve(n, Variant::hybrid());
            let exact = solve(n, Variant::CostModel);
            assert!(hybrid.abs_error() >= exact.abs_error(), "n={n}");
        }
    }

    #[test]
    fn test_search_respects_restricted_bounds() {
        let bounds = Bounds {
            a: 2..=3,
            b: 4..=5,
            c: 0..=1,
        };
        let r = search(0, &bounds, &PioCostModel, Weights::UNIT);
        assert_eq!(r.triple, CounterTriple::new(2, 4, 0));
        assert!(bounds.contains(r.triple));
    }

    #[test]
    fn test_hybrid_result_lies_in_its_neighborhood() {
        for max_val in [3u8, 12, 31] {
            for n in (0..1100).step_by(37) {
                let approx = search(n, &Bounds::full(max_val), &ClosedFormModel, Weights::UNIT);
                let local = Bounds::around(approx.triple, 2, max_val);
                let r = Solver::new(max_val as u32, Variant::Hybrid { radius: 2 })
                    .unwrap()
                    .solve(n);
                assert!(local.contains(r.triple), "n={n} max_val={max_val} got {}", r.triple);
            }
        }
    }

    #[test]
    #[should_panic(expected = "empty search bounds")]
    #[cfg(debug_assertions)]
    fn test_empty_bounds_are_rejected() {
        let bounds = Bounds {
            a: 3..=2,
            b: 1..=1,
            c: 0..=0,
        };
        search(10, &bounds, &PioCostModel, Weights::UNIT);
    }

    #[test]
    fn test_rejects_domain_violations() {
        assert_eq!(
            best_triple(10, 32, Variant::CostModel),
            Err(SolveError::MaxValOutOfRange(32))
        );
        assert_eq!(
            best_triple(10, 0, Variant::CostModel),
            Err(SolveError::MaxValOutOfRange(0))
        );
        assert_eq!(
            best_triple(10, 31, Variant::Hybrid { radius: 40 }),
            Err(SolveError::RadiusOutOfRange(40))
        );
        assert_eq!(
            best_triple(
                10,
                31,
                Variant::Constrained {
                    error_weight: 0,
                    footprint_weight: 1
                }
            ),
            Err(SolveError::ZeroErrorWeight)
        );
    }

    #[test]
    fn test_result_target_roundtrip() {
        let r = solve(600, Variant::CostModel);
        assert_eq!(r.target(), 600);
    }
}
