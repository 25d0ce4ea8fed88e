use std::path::PathBuf;
use std::process;

use clap::Args;

use pio_delay::frame::FrameParams;

use super::load_config;

#[derive(Args)]
pub struct FrameArgs {
    /// Maximum emitter duty cycle, as a fraction
    #[arg(long, default_value_t = 0.001)]
    pub duty: f64,
    /// Pulse width in nanoseconds
    #[arg(long, default_value_t = 3.0)]
    pub on_time_ns: f64,
    /// Longest delay code in ticks
    #[arg(long, default_value_t = 1024)]
    pub max_code: u32,
    /// Minimum pause between pulses in microseconds
    #[arg(long, default_value_t = 3.0)]
    pub min_pause_us: f64,
    /// Clock frequency in Hz (default: [clock] frequency_hz)
    #[arg(long)]
    pub clock_hz: Option<f64>,
    /// Configuration file (default: ./pio-delay.toml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Print the figures as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn cmd_frame(args: FrameArgs) {
    let (config, _) = load_config(args.config.as_deref());
    let params = FrameParams {
        clock_hz: args.clock_hz.unwrap_or(config.clock_hz),
        duty_cycle: args.duty,
        on_time_s: args.on_time_ns * 1e-9,
        max_code: args.max_code,
        min_pause_s: args.min_pause_us * 1e-6,
    };
    let timing = match params.compute() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    if args.json {
        match serde_json::to_string_pretty(&timing) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: cannot serialize timing: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", timing.format_report(&params));
    }
}
