use std::process;

use clap::Args;

use pio_delay::split::{join_cycles, split_cycles};
use pio_delay::triple::COUNTER_BITS;

#[derive(Args)]
pub struct SplitArgs {
    /// Tick counts to split, or `outer inner` pairs with --join
    #[arg(required = true)]
    pub values: Vec<u32>,
    /// Width of the inner counter in bits
    #[arg(long, default_value_t = COUNTER_BITS)]
    pub bits: u32,
    /// Reassemble tick counts from `outer inner` pairs
    #[arg(long)]
    pub join: bool,
}

pub fn cmd_split(args: SplitArgs) {
    let lines = if args.join {
        join_lines(&args.values, args.bits)
    } else {
        split_lines(&args.values, args.bits)
    };
    match lines {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn split_lines(totals: &[u32], bits: u32) -> Result<Vec<String>, String> {
    totals
        .iter()
        .map(|&total| {
            let (outer, inner) = split_cycles(total, bits).map_err(|e| e.to_string())?;
            Ok(format!("{:<6} = {} * 2^{} + {}", total, outer, bits, inner))
        })
        .collect()
}

fn join_lines(values: &[u32], bits: u32) -> Result<Vec<String>, String> {
    if values.len() % 2 != 0 {
        return Err(format!(
            "--join takes outer/inner pairs, got {} values",
            values.len()
        ));
    }
    // validates the width; the split itself is discarded
    split_cycles(0, bits).map_err(|e| e.to_string())?;
    values
        .chunks(2)
        .map(|pair| {
            let (outer, inner) = (pair[0], pair[1]);
            if inner >> bits != 0 {
                return Err(format!("inner value {} does not fit in {} bits", inner, bits));
            }
            let total = outer
                .checked_mul(1 << bits)
                .map(|_| join_cycles(outer, inner, bits))
                .ok_or_else(|| format!("{} * 2^{} + {} overflows", outer, bits, inner))?;
            Ok(format!("{} * 2^{} + {} = {}", outer, bits, inner, total))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_then_join_lines() {
        let split = split_lines(&[1023, 64], 5).unwrap();
        assert_eq!(split, vec!["1023   = 31 * 2^5 + 31", "64     = 2 * 2^5 + 0"]);
        let joined = join_lines(&[31, 31, 2, 0], 5).unwrap();
        assert_eq!(joined, vec!["31 * 2^5 + 31 = 1023", "2 * 2^5 + 0 = 64"]);
    }

    #[test]
    fn test_join_rejects_bad_input() {
        assert!(join_lines(&[1, 2, 3], 5).is_err());
        assert!(join_lines(&[1, 32], 5).is_err());
        assert!(join_lines(&[1, 0], 0).is_err());
        assert!(join_lines(&[u32::MAX, 0], 5).is_err());
    }
}
