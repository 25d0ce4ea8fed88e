//! Sweep reports: solve a contiguous range of targets and summarise the fit.
//!
//! Every row carries its residual. Nothing here clips or rounds a nonzero
//! error; the summary statistics are computed from the raw signed values.

use std::ops::Range;

use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};
use tracing::warn;

use crate::cost::{CostModel, PioCostModel};
use crate::search::{SearchResult, Solver, Variant};
use crate::table::LookupTable;

/// Targets printed in the boundary table: zero, the smallest codes, and
/// both sides of every power-of-two counter boundary.
pub const BOUNDARY_CASES: [u32; 12] = [0, 1, 2, 3, 4, 31, 32, 63, 64, 511, 512, 1023];

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SweepRow {
    pub n: u32,
    #[serde(flatten)]
    pub result: SearchResult,
    /// Closed-form reconstruction `a*b + c`.
    pub product_sum: u32,
    /// Ticks the PIO program actually spends.
    pub pio_cycles: u32,
}

impl SweepRow {
    fn new(n: u32, result: SearchResult) -> Self {
        Self {
            n,
            result,
            product_sum: result.triple.product_sum(),
            pio_cycles: PioCostModel.cycles(result.triple),
        }
    }

    /// Residual of the real program, whatever metric the search used.
    pub fn pio_error(&self) -> i64 {
        self.pio_cycles as i64 - self.n as i64
    }
}

// ---------------------------------------------------------------------------
// Sweep
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sweep {
    variant: Variant,
    start: u32,
    rows: Vec<SweepRow>,
}

impl Sweep {
    /// Solve every target in `range`.
    pub fn run(solver: &Solver, range: Range<u32>) -> Self {
        let start = range.start;
        let rows = range
            .into_par_iter()
            .map(|n| SweepRow::new(n, solver.solve(n)))
            .collect();
        Self {
            variant: solver.variant(),
            start,
            rows,
        }
    }

    /// Rows for a prebuilt table, without re-solving.
    pub fn from_table(table: &LookupTable) -> Self {
        let rows = table
            .iter()
            .enumerate()
            .map(|(n, r)| SweepRow::new(n as u32, *r))
            .collect();
        Self {
            variant: table.variant(),
            start: 0,
            rows,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn rows(&self) -> &[SweepRow] {
        &self.rows
    }

    pub fn row(&self, n: u32) -> Option<&SweepRow> {
        let idx = n.checked_sub(self.start)? as usize;
        self.rows.get(idx)
    }

    pub fn summary(&self) -> Summary {
        Summary::from_errors(self.rows.iter().map(|r| r.result.error))
    }

    /// Boundary-case table followed by the summary.
    pub fn format_report(&self) -> String {
        let mut out = String::new();
        let end = self.start + self.rows.len() as u32;
        out.push_str(&format!(
            "Sweep: {}, n in {}..{}\n",
            self.variant, self.start, end
        ));
        out.push_str(&format!(
            "{:>5} | {:>2} | {:>2} | {:>2} | {:>5} | {:>5} | {:>10} | {:>7}\n",
            "n", "a", "b", "c", "err", "a*b+c", "PIO cycles", "PIO err"
        ));
        let width = 5 + 2 * 3 + 5 + 5 + 10 + 7 + 7 * 3;
        out.push_str(&"-".repeat(width));
        out.push('\n');
        for &n in BOUNDARY_CASES.iter() {
            if let Some(row) = self.row(n) {
                out.push_str(&format_row(row));
            }
        }
        out.push_str(&"-".repeat(width));
        out.push('\n');
        out.push_str(&self.summary().format());
        out
    }

    /// One line per target: `n,a,b,c,cost,error,product_sum,pio_cycles,pio_error`.
    pub fn format_csv(&self) -> String {
        let mut out = String::from("n,a,b,c,cost,error,product_sum,pio_cycles,pio_error\n");
        for r in &self.rows {
            let t = r.result.triple;
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                r.n,
                t.a,
                t.b,
                t.c,
                r.result.cost,
                r.result.error,
                r.product_sum,
                r.pio_cycles,
                r.pio_error()
            ));
        }
        out
    }
}

fn format_row(row: &SweepRow) -> String {
    let t = row.result.triple;
    format!(
        "{:>5} | {:>2} | {:>2} | {:>2} | {:>+5} | {:>5} | {:>10} | {:>+7}\n",
        row.n,
        t.a,
        t.b,
        t.c,
        row.result.error,
        row.product_sum,
        row.pio_cycles,
        row.pio_error()
    )
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub exact: usize,
    pub min_error: i64,
    pub max_error: i64,
    pub max_abs_error: u64,
    pub mean_error: f64,
    /// Population standard deviation of the signed error.
    pub std_dev: f64,
    pub median_abs_error: f64,
}

impl Summary {
    pub fn from_errors(errors: impl Iterator<Item = i64>) -> Self {
        let errors: Vec<i64> = errors.collect();
        if errors.is_empty() {
            return Self {
                count: 0,
                exact: 0,
                min_error: 0,
                max_error: 0,
                max_abs_error: 0,
                mean_error: 0.0,
                std_dev: 0.0,
                median_abs_error: 0.0,
            };
        }
        let signed: Vec<f64> = errors.iter().map(|&e| e as f64).collect();
        let abs: Vec<f64> = signed.iter().map(|e| e.abs()).collect();
        Self {
            count: errors.len(),
            exact: errors.iter().filter(|&&e| e == 0).count(),
            min_error: errors.iter().copied().fold(i64::MAX, i64::min),
            max_error: errors.iter().copied().fold(i64::MIN, i64::max),
            max_abs_error: errors.iter().map(|e| e.unsigned_abs()).fold(0, u64::max),
            mean_error: Statistics::mean(signed.iter()),
            std_dev: Statistics::population_std_dev(signed.iter()),
            median_abs_error: Data::new(abs).median(),
        }
    }

    pub fn format(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Targets:          {}\n", self.count));
        out.push_str(&format!("Exact:            {}\n", self.exact));
        out.push_str(&format!(
            "Error range:      [{:+}, {:+}]\n",
            self.min_error, self.max_error
        ));
        out.push_str(&format!("Mean error:       {:.2}\n", self.mean_error));
        out.push_str(&format!("Std deviation:    {:.2}\n", self.std_dev));
        out.push_str(&format!("Median |error|:   {:.1}\n", self.median_abs_error));
        out.push_str(&format!("Max |error|:      {}\n", self.max_abs_error));
        out
    }
}

// ---------------------------------------------------------------------------
// Variant comparison
// ---------------------------------------------------------------------------

/// A target where two sweeps disagree on the size of the residual.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Divergence {
    pub n: u32,
    pub left: SearchResult,
    pub right: SearchResult,
}

/// Targets both sweeps cover where their `|error|` differs.
///
/// Comparing a hybrid sweep against a cost-model sweep lists exactly the
/// targets where the neighborhood search missed the global optimum.
pub fn compare(left: &Sweep, right: &Sweep) -> Vec<Divergence> {
    let divergences: Vec<Divergence> = left
        .rows
        .iter()
        .filter_map(|l| {
            let r = right.row(l.n)?;
            (l.result.abs_error() != r.result.abs_error()).then_some(Divergence {
                n: l.n,
                left: l.result,
                right: r.result,
            })
        })
        .collect();
    if !divergences.is_empty() {
        warn!(
            left = %left.variant,
            right = %right.variant,
            count = divergences.len(),
            "sweeps disagree on residual size"
        );
    }
    divergences
}

pub fn format_divergences(left: Variant, right: Variant, divergences: &[Divergence]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} targets where {} and {} disagree:\n",
        divergences.len(),
        left,
        right
    ));
    for d in divergences {
        out.push_str(&format!(
            "  n={:<5} {:<18} err {:>+4}   vs   {:<18} err {:>+4}\n",
            d.n,
            d.left.triple.to_string(),
            d.left.error,
            d.right.triple.to_string(),
            d.right.error
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep(variant: Variant, range: Range<u32>) -> Sweep {
        Sweep::run(&Solver::new(31, variant).unwrap(), range)
    }

    #[test]
    fn test_report_small_range() {
        let report = sweep(Variant::CostModel, 0..5).format_report();
        insta::assert_snapshot!(report, @r"
Sweep: cost, n in 0..5
    n |  a |  b |  c |   err | a*b+c | PIO cycles | PIO err
-----------------------------------------------------------
    0 |  0 |  1 |  0 |    +4 |     0 |          4 |      +4
    1 |  0 |  1 |  0 |    +3 |     0 |          4 |      +3
    2 |  0 |  1 |  0 |    +2 |     0 |          4 |      +2
    3 |  0 |  1 |  0 |    +1 |     0 |          4 |      +1
    4 |  0 |  1 |  0 |    +0 |     0 |          4 |      +0
-----------------------------------------------------------
Targets:          5
Exact:            1
Error range:      [+0, +4]
Mean error:       2.00
Std deviation:    1.41
Median |error|:   2.0
Max |error|:      4
");
    }

    #[test]
    fn test_summary_statistics() {
        let s = Summary::from_errors([-2, 0, 0, 4].into_iter());
        assert_eq!(s.count, 4);
        assert_eq!(s.exact, 2);
        assert_eq!(s.min_error, -2);
        assert_eq!(s.max_error, 4);
        assert_eq!(s.max_abs_error, 4);
        assert!((s.mean_error - 0.5).abs() < 1e-12);
        assert!((s.median_abs_error - 1.0).abs() < 1e-12);
        let empty = Summary::from_errors(std::iter::empty());
        assert_eq!(empty.count, 0);
    }

    #[test]
    fn test_closed_form_rows_expose_pio_error() {
        let s = sweep(Variant::ClosedForm, 0..64);
        for row in s.rows() {
            assert_eq!(row.result.error, 0, "closed form is exact below 993");
            assert_eq!(row.product_sum, row.n);
            assert!(row.pio_error() > 0, "program overhead is always positive");
        }
    }

    #[test]
    fn test_from_table_matches_run() {
        let table = LookupTable::build(200, Variant::CostModel).unwrap();
        assert_eq!(Sweep::from_table(&table), sweep(Variant::CostModel, 0..200));
    }

    #[test]
    fn test_offset_range_lookup() {
        let s = sweep(Variant::CostModel, 500..520);
        assert!(s.row(499).is_none());
        assert_eq!(s.row(511).map(|r| r.n), Some(511));
        assert!(s.row(520).is_none());
        assert!(s.format_report().contains("  511 |"));
    }

    #[test]
    fn test_compare_lists_hybrid_misses() {
        let exact = sweep(Variant::CostModel, 0..1024);
        let hybrid = sweep(Variant::hybrid(), 0..1024);
        for d in compare(&hybrid, &exact) {
            assert!(d.left.abs_error() > d.right.abs_error());
        }
        assert!(compare(&exact, &exact).is_empty());
    }

    #[test]
    fn test_csv_has_row_per_target() {
        let csv = sweep(Variant::CostModel, 0..10).format_csv();
        assert_eq!(csv.lines().count(), 11);
        assert_eq!(csv.lines().nth(5), Some("4,0,1,0,4,0,0,4,0"));
    }
}
