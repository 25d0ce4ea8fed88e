//! Precomputed best-fit triples for every target in `0..len`.
//!
//! A table is built once, in parallel across targets, and is read-only
//! afterwards. Each entry is produced by an independent [`Solver::solve`]
//! call, so the parallel build is identical to a sequential one.

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::cost::{ClosedFormModel, CostModel, PioCostModel};
use crate::error::SolveError;
use crate::search::{SearchResult, Solver, Variant};
use crate::triple::MAX_COUNTER;

/// Default number of entries: one per 10-bit code.
pub const DEFAULT_TABLE_LEN: u32 = 1024;

/// Upper bound on table size.
pub const MAX_TABLE_LEN: u32 = 1 << 16;

/// Domain tag mixed into table fingerprints.
const FINGERPRINT_TAG: &[u8] = b"pio-delay/lookup-table/v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LookupTable {
    variant: Variant,
    max_val: u8,
    entries: Vec<SearchResult>,
}

impl LookupTable {
    /// Build a table of `len` entries with the full counter range.
    pub fn build(len: u32, variant: Variant) -> Result<Self, SolveError> {
        Self::build_with(&Solver::new(MAX_COUNTER as u32, variant)?, len)
    }

    /// Build in parallel, one independent search per target.
    pub fn build_with(solver: &Solver, len: u32) -> Result<Self, SolveError> {
        check_len(len)?;
        let start = Instant::now();
        let entries: Vec<SearchResult> = (0..len)
            .into_par_iter()
            .map(|n| solver.solve(n))
            .collect();
        let table = Self::from_entries(solver, entries);
        info!(
            len,
            variant = %solver.variant(),
            exact = table.exact_count(),
            max_abs_error = table.max_abs_error(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "lookup table built"
        );
        Ok(table)
    }

    /// Build on the calling thread, in target order.
    pub fn build_sequential(solver: &Solver, len: u32) -> Result<Self, SolveError> {
        check_len(len)?;
        let entries = (0..len).map(|n| solver.solve(n)).collect();
        Ok(Self::from_entries(solver, entries))
    }

    fn from_entries(solver: &Solver, entries: Vec<SearchResult>) -> Self {
        Self {
            variant: solver.variant(),
            max_val: solver.max_val(),
            entries,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn max_val(&self) -> u8 {
        self.max_val
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for target `n`, if the table covers it.
    pub fn get(&self, n: u32) -> Option<&SearchResult> {
        self.entries.get(n as usize)
    }

    pub fn entries(&self) -> &[SearchResult] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.entries.iter()
    }

    pub fn exact_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_exact()).count()
    }

    pub fn max_abs_error(&self) -> u64 {
        self.entries.iter().map(|e| e.abs_error()).max().unwrap_or(0)
    }

    /// Check every entry against the metric it was built with.
    ///
    /// Fails on the first target whose entry is inconsistent.
    pub fn verify(&self) -> Result<(), SolveError> {
        let model: &dyn CostModel = if self.variant.uses_cost_model() {
            &PioCostModel
        } else {
            &ClosedFormModel
        };
        for (n, e) in self.entries.iter().enumerate() {
            let cost = model.cycles(e.triple);
            if cost != e.cost || cost as i64 - n as i64 != e.error || !e.triple.in_domain() {
                debug!(n, triple = %e.triple, cost, error = e.error, "table entry mismatch");
                return Err(SolveError::TableEntryMismatch(n as u32));
            }
        }
        Ok(())
    }

    /// BLAKE3 digest of the table contents.
    ///
    /// Two tables have equal fingerprints iff they hold the same triples
    /// and errors in the same order, which makes it cheap to compare a
    /// table against one produced elsewhere.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(FINGERPRINT_TAG);
        hasher.update(&(self.entries.len() as u64).to_le_bytes());
        for e in &self.entries {
            hasher.update(&[e.triple.a, e.triple.b, e.triple.c]);
            hasher.update(&e.cost.to_le_bytes());
            hasher.update(&e.error.to_le_bytes());
        }
        hasher.finalize()
    }

    /// JSON rendering: `{"variant": ..., "max_val": ..., "entries": [...]}`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a LookupTable {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn check_len(len: u32) -> Result<(), SolveError> {
    if len > MAX_TABLE_LEN {
        return Err(SolveError::TableTooLarge(len));
    }
    Ok(())
}

/// Build a `len`-entry table with the given variant.
pub fn build_lookup_table(len: u32, variant: Variant) -> Result<LookupTable, SolveError> {
    LookupTable::build(len, variant)
}
