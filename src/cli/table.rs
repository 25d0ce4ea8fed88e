use std::path::PathBuf;
use std::process;

use clap::{Args, ValueEnum};

use pio_delay::report::Sweep;
use pio_delay::table::LookupTable;

use super::{resolve_solver, SolverArgs};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum TableFormat {
    /// `n a b c cost error` per line
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Args)]
pub struct TableArgs {
    /// Number of entries (default: [table] max_n, else 1024)
    #[arg(long)]
    pub len: Option<u32>,
    /// Output format
    #[arg(long, value_enum, default_value_t = TableFormat::Text)]
    pub format: TableFormat,
    /// Write the table here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Build on one thread
    #[arg(long)]
    pub sequential: bool,
    #[command(flatten)]
    pub solver: SolverArgs,
}

pub fn cmd_table(args: TableArgs) {
    let (config, solver) = resolve_solver(&args.solver);
    let len = args.len.unwrap_or(config.table_len);
    let built = if args.sequential {
        LookupTable::build_sequential(&solver, len)
    } else {
        LookupTable::build_with(&solver, len)
    };
    let table = match built {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = table.verify() {
        eprintln!("error: {}", e);
        process::exit(1);
    }

    let body = match args.format {
        TableFormat::Text => format_text(&table),
        TableFormat::Csv => Sweep::from_table(&table).format_csv(),
        TableFormat::Json => match table.to_json() {
            Ok(json) => json + "\n",
            Err(e) => {
                eprintln!("error: cannot serialize table: {}", e);
                process::exit(1);
            }
        },
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &body) {
                eprintln!("error: cannot write '{}': {}", path.display(), e);
                process::exit(1);
            }
        }
        None => print!("{}", body),
    }

    eprintln!(
        "{} entries ({}), {} exact, max |error| {}",
        table.len(),
        table.variant(),
        table.exact_count(),
        table.max_abs_error()
    );
    eprintln!("fingerprint {}", table.fingerprint().to_hex());
}

fn format_text(table: &LookupTable) -> String {
    let mut out = String::new();
    for (n, r) in table.iter().enumerate() {
        let t = r.triple;
        out.push_str(&format!(
            "{:>5} {:>2} {:>2} {:>2} {:>5} {:>+4}\n",
            n, t.a, t.b, t.c, r.cost, r.error
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pio_delay::search::{Solver, Variant};

    #[test]
    fn test_text_rows() {
        let solver = Solver::new(31, Variant::CostModel).unwrap();
        let table = LookupTable::build_sequential(&solver, 32).unwrap();
        let text = format_text(&table);
        assert_eq!(text.lines().count(), 32);
        assert_eq!(text.lines().next(), Some("    0  0  1  0     4   +4"));
        assert_eq!(text.lines().nth(31), Some("   31  0  1 27    31   +0"));
    }
}
