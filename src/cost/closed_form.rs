use super::{CostModel, PioCostModel};
use crate::triple::CounterTriple;

/// The idealised delay `a*b + c`, ignoring instruction overhead.
///
/// Cheap to evaluate and smooth over the domain, so it serves as the first
/// stage of the hybrid search. Its results are not real tick counts.
pub struct ClosedFormModel;

impl CostModel for ClosedFormModel {
    fn cycles(&self, t: CounterTriple) -> u32 {
        t.product_sum()
    }

    fn footprint(&self, _t: CounterTriple) -> u32 {
        PioCostModel::TEMPLATE_WORDS
    }

    fn name(&self) -> &'static str {
        "closed-form"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_form_ignores_overhead() {
        assert_eq!(ClosedFormModel.cycles(CounterTriple::new(0, 9, 4)), 4);
        assert_eq!(ClosedFormModel.cycles(CounterTriple::new(3, 10, 2)), 32);
        assert!(
            ClosedFormModel.cycles(CounterTriple::new(3, 10, 2))
                < PioCostModel.cycles(CounterTriple::new(3, 10, 2))
        );
    }
}
