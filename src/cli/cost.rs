use std::process;

use clap::Args;

use pio_delay::cost::{ClosedFormModel, CostModel, PioCostModel};
use pio_delay::triple::CounterTriple;

#[derive(Args)]
pub struct CostArgs {
    /// Outer loop count (0 bypasses the nested loops)
    pub a: u32,
    /// Inner loop count
    pub b: u32,
    /// Tail loop count
    pub c: u32,
}

pub fn cmd_cost(args: CostArgs) {
    let triple = match CounterTriple::checked(args.a, args.b, args.c) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    let models: [&dyn CostModel; 2] = [&PioCostModel, &ClosedFormModel];
    println!("{}", triple);
    for model in models {
        println!("  {:<12} {:>5} ticks", model.name(), model.cycles(triple));
    }
    if triple.is_bypass() {
        println!("  (outer loop bypassed)");
    }
}
