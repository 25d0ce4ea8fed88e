pub mod cost;
pub mod frame;
pub mod solve;
pub mod split;
pub mod sweep;
pub mod table;

use std::path::{Path, PathBuf};
use std::process;

use clap::Args;

use pio_delay::config::{Config, ConfigSource, VariantFlags};
use pio_delay::search::{Solver, Variant};

/// Solver selection shared by every subcommand that searches.
#[derive(Args, Clone, Debug)]
pub struct SolverArgs {
    /// Configuration file (default: ./pio-delay.toml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Search variant: closed, cost, hybrid or constrained
    #[arg(long)]
    pub variant: Option<Variant>,
    /// Upper bound for the outer and inner counters (1..=31)
    #[arg(long)]
    pub max_val: Option<u32>,
    /// Neighborhood radius for the hybrid variant
    #[arg(long)]
    pub radius: Option<u8>,
    /// Error weight for the constrained variant
    #[arg(long)]
    pub error_weight: Option<u32>,
    /// Instruction footprint weight for the constrained variant
    #[arg(long)]
    pub footprint_weight: Option<u32>,
}

impl SolverArgs {
    pub fn flags(&self) -> VariantFlags {
        VariantFlags {
            radius: self.radius,
            error_weight: self.error_weight,
            footprint_weight: self.footprint_weight,
        }
    }
}

/// Load the configuration named on the command line, or the one in the
/// working directory, or the built-in defaults. Exits on parse errors.
///
/// The source is returned alongside so later warnings can quote it.
pub fn load_config(explicit: Option<&Path>) -> (Config, Option<ConfigSource>) {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => Config::discover(Path::new(".")),
    };
    let Some(path) = path else {
        return (Config::default(), None);
    };

    let source = match ConfigSource::read(&path) {
        Ok(s) => s,
        Err(d) => {
            d.render(&path.display().to_string(), "");
            process::exit(1);
        }
    };
    match source.parse() {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            (config, Some(source))
        }
        Err(diagnostics) => {
            source.render(&diagnostics);
            process::exit(1);
        }
    }
}

/// Merge command-line choices into the configured variant: flag, then
/// file, then built-in default.
pub fn resolve_variant(config: &Config, args: &SolverArgs) -> Variant {
    let variant = config.merge_variant(args.variant, args.flags());
    if !matches!(variant, Variant::Hybrid { .. }) && args.radius.is_some() {
        eprintln!("warning: --radius has no effect with variant '{}'", variant);
    }
    if !matches!(variant, Variant::Constrained { .. })
        && (args.error_weight.is_some() || args.footprint_weight.is_some())
    {
        eprintln!("warning: weights have no effect with variant '{}'", variant);
    }
    variant
}

/// Build the solver for a subcommand. Exits on domain violations.
pub fn resolve_solver(args: &SolverArgs) -> (Config, Solver) {
    let (config, source) = load_config(args.config.as_deref());
    let variant = resolve_variant(&config, args);
    if let Some(source) = &source {
        source.render(&config.ignored_keys(variant));
    }
    let max_val = args.max_val.unwrap_or(config.max_val);
    match Solver::new(max_val, variant) {
        Ok(solver) => (config, solver),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
