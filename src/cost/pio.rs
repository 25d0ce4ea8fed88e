use super::CostModel;
use crate::triple::CounterTriple;

// ---------------------------------------------------------------------------
// PioCostModel: cycle accounting for the nested-loop delay template
// ---------------------------------------------------------------------------

/// Exact tick count of the PIO delay program.
///
/// The program loads `a` and branches past the nested loop when it is
/// zero. Each outer iteration reloads the inner counter, spins `b` ticks
/// and then decrements the outer counter. A final load sets up the
/// remainder loop of `c` ticks.
pub struct PioCostModel;

impl PioCostModel {
    /// Outer counter load and the zero test.
    const SETUP: u32 = 3;
    /// Fixed overhead at the top of each outer iteration.
    const OUTER_RELOAD: u32 = 2;
    /// `jmp x--` closing each outer iteration.
    const OUTER_DECREMENT: u32 = 1;
    /// Remainder counter load after the nested loop.
    const TAIL: u32 = 2;
    /// Setup plus tail when the nested loop is skipped.
    const BYPASS: u32 = 4;

    /// Instruction words in the delay template.
    pub const TEMPLATE_WORDS: u32 = 7;
}

impl CostModel for PioCostModel {
    fn cycles(&self, t: CounterTriple) -> u32 {
        let (a, b, c) = (t.a as u32, t.b as u32, t.c as u32);
        if a == 0 {
            return Self::BYPASS + c;
        }
        Self::SETUP + a * (Self::OUTER_RELOAD + b + Self::OUTER_DECREMENT) + Self::TAIL + c
    }

    fn footprint(&self, _t: CounterTriple) -> u32 {
        Self::TEMPLATE_WORDS
    }

    fn name(&self) -> &'static str {
        "pio"
    }
}
