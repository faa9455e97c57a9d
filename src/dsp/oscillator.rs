//! Tone generators for pitched notes and the pitched parts of drums.

use std::f64::consts::TAU;

/// Shape of one oscillator cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Value at `cycle` in `[0, 1)`; `step` is the per-sample advance, used to
    /// band-limit the sawtooth reset.
    fn value(self, cycle: f64, step: f64) -> f64 {
        match self {
            Waveform::Sine => (TAU * cycle).sin(),
            // 0 → +1 at a quarter, → -1 at three quarters, back to 0
            Waveform::Triangle => {
                let folded = (cycle + 0.75).fract();
                4.0 * (folded - 0.5).abs() - 1.0
            }
            Waveform::Sawtooth => 2.0 * cycle - 1.0 - blep_residual(cycle, step),
        }
    }
}

/// Two-sample polynomial correction around a unit downward step at cycle 0.
fn blep_residual(cycle: f64, step: f64) -> f64 {
    let step = step.min(0.5);
    if step <= 0.0 {
        0.0
    } else if cycle < step {
        let x = cycle / step;
        2.0 * x - x * x - 1.0
    } else if cycle > 1.0 - step {
        let x = (cycle - 1.0) / step;
        x * x + 2.0 * x + 1.0
    } else {
        0.0
    }
}

/// Free-running oscillator. `frequency_hz` may be changed between samples.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub shape: Waveform,
    pub frequency_hz: f64,
    cycle: f64,
    sample_period: f64,
}

impl Oscillator {
    pub fn new(shape: Waveform, frequency_hz: f64, sample_rate: f64) -> Self {
        Oscillator {
            shape,
            frequency_hz,
            cycle: 0.0,
            sample_period: 1.0 / sample_rate,
        }
    }

    fn step(&self) -> f64 {
        self.frequency_hz * self.sample_period
    }

    /// Current sample, then advance one sample period.
    pub fn next_sample(&mut self) -> f64 {
        let step = self.step();
        let out = self.shape.value(self.cycle, step);
        self.cycle = (self.cycle + step).fract();
        out
    }
}
