//! Pulse and frame timing for a pulse-position-modulated laser link.
//!
//! Derives the minimum spacing between pulses and frames from the duty
//! cycle limit of the emitter and the longest code the PIO delay can
//! encode. Shares only the clock frequency with the delay solver.

use serde::Serialize;

use crate::error::SolveError;

/// System clock of the RP2040 in the reference board configuration.
pub const DEFAULT_CLOCK_HZ: f64 = 133_000_000.0;

/// Inputs to the frame timing calculation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FrameParams {
    pub clock_hz: f64,
    /// Maximum fraction of time the emitter may be on, in `(0, 1]`.
    pub duty_cycle: f64,
    /// Width of one laser pulse in seconds.
    pub on_time_s: f64,
    /// Longest delay code in clock ticks.
    pub max_code: u32,
    /// Minimum pause between pulses in seconds.
    pub min_pause_s: f64,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            clock_hz: DEFAULT_CLOCK_HZ,
            duty_cycle: 0.001,
            on_time_s: 3e-9,
            max_code: 1024,
            min_pause_s: 3e-6,
        }
    }
}

/// Derived timing figures, all in seconds unless named otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FrameTiming {
    pub total_period_s: f64,
    pub time_between_pulses_s: f64,
    pub tick_s: f64,
    pub pulse_duration_s: f64,
    pub min_frame_duration_s: f64,
    pub frame_rate_hz: f64,
    pub min_pause_ticks: u32,
}

impl FrameParams {
    pub fn validate(&self) -> Result<(), SolveError> {
        let positive = |name: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SolveError::InvalidParameter {
                    name,
                    expected: "positive",
                    value,
                })
            }
        };
        positive("clock_hz", self.clock_hz)?;
        positive("on_time_s", self.on_time_s)?;
        if !(self.min_pause_s.is_finite() && self.min_pause_s >= 0.0) {
            return Err(SolveError::InvalidParameter {
                name: "min_pause_s",
                expected: "non-negative",
                value: self.min_pause_s,
            });
        }
        if !(self.duty_cycle > 0.0 && self.duty_cycle <= 1.0) {
            return Err(SolveError::InvalidParameter {
                name: "duty_cycle",
                expected: "in (0, 1]",
                value: self.duty_cycle,
            });
        }
        Ok(())
    }

    pub fn compute(&self) -> Result<FrameTiming, SolveError> {
        self.validate()?;
        let total_period_s = self.on_time_s / self.duty_cycle;
        let time_between_pulses_s = total_period_s - self.on_time_s;
        let tick_s = 1.0 / self.clock_hz;
        let pulse_duration_s = tick_s * self.max_code as f64;
        let min_frame_duration_s = time_between_pulses_s + pulse_duration_s + time_between_pulses_s;
        Ok(FrameTiming {
            total_period_s,
            time_between_pulses_s,
            tick_s,
            pulse_duration_s,
            min_frame_duration_s,
            frame_rate_hz: 1.0 / min_frame_duration_s,
            min_pause_ticks: (self.min_pause_s * self.clock_hz).floor() as u32,
        })
    }
}

impl FrameTiming {
    pub fn format_report(&self, params: &FrameParams) -> String {
        let ns = |s: f64| s * 1e9;
        let us = |s: f64| s * 1e6;
        let mut out = String::new();
        out.push_str(&format!("Pulse width:              {:.0} ns\n", ns(params.on_time_s)));
        out.push_str(&format!("Duty cycle:               {}%\n", params.duty_cycle * 100.0));
        out.push_str(&format!(
            "Total period:             {:.0} ns ({:.3} us)\n",
            ns(self.total_period_s),
            us(self.total_period_s)
        ));
        out.push_str(&format!(
            "Min time between pulses:  {:.0} ns ({:.3} us)\n",
            ns(self.time_between_pulses_s),
            us(self.time_between_pulses_s)
        ));
        out.push_str(&format!(
            "Max code duration:        {:.0} ns\n",
            ns(self.pulse_duration_s)
        ));
        out.push_str(&format!(
            "Min frame duration:       {:.0} ns ({:.3} us)\n",
            ns(self.min_frame_duration_s),
            us(self.min_frame_duration_s)
        ));
        out.push_str(&format!("Frame rate:               {:.3} Hz\n", self.frame_rate_hz));
        out.push_str(&format!("Clock tick:               {:.2} ns\n", ns(self.tick_s)));
        out.push_str(&format!(
            "Min pause:                {} ticks ({} us)\n",
            self.min_pause_ticks,
            us(params.min_pause_s)
        ));
        out
    }
}
