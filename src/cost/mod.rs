//! Cycle cost models for the nested-loop delay program.
//!
//! A cost model maps a [`CounterTriple`] to the number of clock ticks the
//! delay program consumes when loaded with those counter values. The
//! search engine is generic over this trait so the same enumeration serves
//! both the exact instruction model and the closed-form approximation.

pub mod closed_form;
pub mod pio;

pub use closed_form::ClosedFormModel;
pub use pio::PioCostModel;

use crate::triple::CounterTriple;

// ---------------------------------------------------------------------------
// CostModel trait
// ---------------------------------------------------------------------------

/// Target-specific cycle accounting for a counter triple.
pub trait CostModel: Sync {
    /// Clock ticks consumed by the program for this triple.
    fn cycles(&self, triple: CounterTriple) -> u32;

    /// Instruction words the program occupies in instruction memory.
    fn footprint(&self, triple: CounterTriple) -> u32;

    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;
}

/// Ticks consumed by the PIO delay program for counters `(a, b, c)`.
pub fn cost(a: u8, b: u8, c: u8) -> u32 {
    PioCostModel.cycles(CounterTriple::new(a, b, c))
}
