//! PIO assembly for a solved delay.
//!
//! The output is a fixed template with the counter values substituted in.
//! Only the substituted values carry meaning; layout is cosmetic.

use crate::cost::{CostModel, PioCostModel};
use crate::triple::CounterTriple;

/// Render the delay program for `t`.
pub fn render_program(t: CounterTriple) -> String {
    let CounterTriple { a, b, c } = t;
    let product = a as u32 * b as u32;
    let mut out = String::new();
    out.push_str(&format!(
        "; Delay {}*{}+{} = {} cycles\n",
        a,
        b,
        c,
        product + c as u32
    ));
    out.push_str(&format!(".program delay_{}_{}_{}\n", a, b, c));
    out.push_str(".wrap_target\n");
    out.push_str(&format!("    set x, {}       ; Outer loop counter\n", a));
    out.push_str("    jmp !x, skip_outer ; Skip outer loop when a=0\n");
    out.push_str("outer_loop:\n");
    out.push_str(&format!("    set y, {}       ; Inner loop counter\n", b));
    out.push_str("inner_loop:\n");
    out.push_str("    jmp y--, inner_loop ; Inner loop (b iterations)\n");
    out.push_str("    jmp x--, outer_loop ; Outer loop (a iterations)\n");
    out.push_str("skip_outer:\n");
    out.push_str(&format!("    set x, {}       ; Remainder counter\n", c));
    out.push_str("extra_delay:\n");
    out.push_str("    jmp x--, extra_delay ; Remainder delay (c ticks)\n");
    out.push_str(".wrap\n");
    out
}

/// The program preceded by a comment giving its modelled tick count.
pub fn render_annotated(t: CounterTriple, target: u32) -> String {
    let cycles = PioCostModel.cycles(t);
    let error = cycles as i64 - target as i64;
    format!(
        "; target {} ticks, PIO cost {} ticks, error {:+}\n{}",
        target,
        cycles,
        error,
        render_program(t)
    )
}

/// Number of instructions in a rendered program (labels and directives
/// excluded).
pub fn instruction_count(program: &str) -> usize {
    program
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with(';') && !l.starts_with('.') && !l.ends_with(':'))
        .count()
}
