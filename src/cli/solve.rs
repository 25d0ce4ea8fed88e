use std::path::PathBuf;
use std::process;

use clap::Args;

use pio_delay::codegen::{instruction_count, render_annotated, render_program};
use pio_delay::cost::{cost, CostModel, PioCostModel};
use pio_delay::search::SearchResult;

use super::{resolve_solver, SolverArgs};

#[derive(Args)]
pub struct SolveArgs {
    /// Target delays in PIO clock ticks
    #[arg(required = true)]
    pub targets: Vec<u32>,
    /// Print one JSON object per target
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub solver: SolverArgs,
}

pub fn cmd_solve(args: SolveArgs) {
    let (_, solver) = resolve_solver(&args.solver);
    for &n in &args.targets {
        let result = solver.solve(n);
        if args.json {
            let line = serde_json::json!({
                "n": n,
                "a": result.triple.a,
                "b": result.triple.b,
                "c": result.triple.c,
                "cost": result.cost,
                "error": result.error,
                "pio_cycles": PioCostModel.cycles(result.triple),
            });
            println!("{}", line);
        } else {
            println!("{}", format_result(n, &result));
        }
    }
}

fn format_result(n: u32, r: &SearchResult) -> String {
    let t = r.triple;
    let pio = cost(t.a, t.b, t.c);
    let mut line = format!(
        "n={:<5} a={:<2} b={:<2} c={:<2} cost={:<5} error={:+}",
        n, t.a, t.b, t.c, r.cost, r.error
    );
    if pio != r.cost {
        line.push_str(&format!("  (PIO {} ticks, {:+})", pio, pio as i64 - n as i64));
    }
    line
}

#[derive(Args)]
pub struct RenderArgs {
    /// Target delay in PIO clock ticks
    pub target: u32,
    /// Write the program here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Omit the header comment with target and residual
    #[arg(long)]
    pub bare: bool,
    #[command(flatten)]
    pub solver: SolverArgs,
}

pub fn cmd_render(args: RenderArgs) {
    let (_, solver) = resolve_solver(&args.solver);
    let result = solver.solve(args.target);
    let program = if args.bare {
        render_program(result.triple)
    } else {
        render_annotated(result.triple, args.target)
    };

    match args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &program) {
                eprintln!("error: cannot write '{}': {}", path.display(), e);
                process::exit(1);
            }
            eprintln!(
                "Wrote {} ({}, {} instructions)",
                path.display(),
                result.triple,
                instruction_count(&program)
            );
        }
        None => print!("{}", program),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pio_delay::triple::CounterTriple;

    #[test]
    fn test_format_exact_result() {
        let r = SearchResult {
            triple: CounterTriple::new(0, 1, 27),
            cost: 31,
            error: 0,
        };
        assert_eq!(
            format_result(31, &r),
            "n=31    a=0  b=1  c=27 cost=31    error=+0"
        );
    }

    #[test]
    fn test_format_shows_pio_residual_for_closed_form() {
        let r = SearchResult {
            triple: CounterTriple::new(3, 10, 2),
            cost: 32,
            error: 0,
        };
        let line = format_result(32, &r);
        assert!(line.ends_with("(PIO 46 ticks, +14)"), "{}", line);
    }
}
