use std::process;

use clap::Args;

use pio_delay::report::{compare, format_divergences, Sweep};
use pio_delay::search::{Solver, Variant};
use pio_delay::table::MAX_TABLE_LEN;

use super::{resolve_solver, SolverArgs};

#[derive(Args)]
pub struct SweepArgs {
    /// First target
    #[arg(long, default_value_t = 0)]
    pub start: u32,
    /// One past the last target
    #[arg(long, default_value_t = 1024)]
    pub end: u32,
    /// Print every row as CSV instead of the boundary report
    #[arg(long)]
    pub csv: bool,
    /// Also sweep with this variant and list where the residuals differ
    #[arg(long, value_name = "VARIANT")]
    pub compare: Option<Variant>,
    #[command(flatten)]
    pub solver: SolverArgs,
}

pub fn cmd_sweep(args: SweepArgs) {
    if args.start >= args.end {
        eprintln!("error: empty range {}..{}", args.start, args.end);
        process::exit(1);
    }
    if args.end - args.start > MAX_TABLE_LEN {
        eprintln!(
            "error: range {}..{} is longer than {} targets",
            args.start, args.end, MAX_TABLE_LEN
        );
        process::exit(1);
    }

    let (config, solver) = resolve_solver(&args.solver);
    let sweep = Sweep::run(&solver, args.start..args.end);
    if args.csv {
        print!("{}", sweep.format_csv());
    } else {
        print!("{}", sweep.format_report());
    }

    if let Some(other) = args.compare {
        let other = config.merge_variant(Some(other), args.solver.flags());
        let other_solver = match Solver::new(solver.max_val() as u32, other) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        };
        let right = Sweep::run(&other_solver, args.start..args.end);
        let divergences = compare(&sweep, &right);
        println!();
        print!(
            "{}",
            format_divergences(sweep.variant(), right.variant(), &divergences)
        );
    }
}
