//! Best-fit counter values for a nested-loop PIO delay program.
//!
//! The RP2040 PIO delay used for pulse-position coding is built from three
//! 5-bit loop counters: an outer loop `a`, an inner loop `b` and a tail
//! loop `c`. This crate finds, for a requested tick count, the triple whose
//! real instruction cost comes closest, and precomputes such triples into
//! lookup tables.
//!
//! ```
//! use pio_delay::{best_triple, cost, Variant};
//!
//! let r = best_triple(31, 31, Variant::CostModel).unwrap();
//! assert_eq!(cost(r.triple.a, r.triple.b, r.triple.c), 31);
//! assert!(r.is_exact());
//! ```

pub mod codegen;
pub mod config;
pub mod cost;
pub mod diagnostic;
pub mod error;
pub mod frame;
pub mod report;
pub mod search;
pub mod span;
pub mod split;
pub mod table;
pub mod triple;

pub use codegen::render_program;
pub use cost::cost;
pub use error::SolveError;
pub use search::{best_triple, SearchResult, Solver, Variant};
pub use table::{build_lookup_table, LookupTable};
pub use triple::CounterTriple;
