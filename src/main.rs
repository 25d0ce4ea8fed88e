mod cli;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pio-delay",
    version,
    about = "Counter values for nested-loop PIO delays"
)]
struct Cli {
    /// Log search and table progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the best counter triple for one or more targets
    Solve(cli::solve::SolveArgs),
    /// Emit the PIO program for a target
    Render(cli::solve::RenderArgs),
    /// Build a lookup table for targets 0..len
    Table(cli::table::TableArgs),
    /// Solve a range of targets and report the fit
    Sweep(cli::sweep::SweepArgs),
    /// Tick cost of a given triple
    Cost(cli::cost::CostArgs),
    /// Split tick counts into outer and inner counter values
    Split(cli::split::SplitArgs),
    /// Pulse and frame timing for the laser link
    Frame(cli::frame::FrameArgs),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Solve(args) => cli::solve::cmd_solve(args),
        Command::Render(args) => cli::solve::cmd_render(args),
        Command::Table(args) => cli::table::cmd_table(args),
        Command::Sweep(args) => cli::sweep::cmd_sweep(args),
        Command::Cost(args) => cli::cost::cmd_cost(args),
        Command::Split(args) => cli::split::cmd_split(args),
        Command::Frame(args) => cli::frame::cmd_frame(args),
    }
}

/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "pio_delay=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
