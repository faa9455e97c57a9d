//! Second-order high-pass filter, RBJ Audio EQ Cookbook coefficients.
//!
//! The drum kit uses it to thin the snare rattle (1 kHz) and to leave only
//! the top of the hi-hat noise (7 kHz).

use std::f64::consts::{FRAC_1_SQRT_2, TAU};

/// Butterworth Q.
pub const DEFAULT_Q: f64 = FRAC_1_SQRT_2;

/// Highest usable cutoff as a fraction of the sample rate.
const MAX_CUTOFF_RATIO: f64 = 0.45;

/// Biquad high-pass in transposed direct form II.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    /// Effective cutoff after limiting to the usable band.
    pub cutoff: f64,
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    s1: f64,
    s2: f64,
}

impl BiquadFilter {
    /// High-pass at `cutoff` Hz. The cutoff is pulled below Nyquist, so the
    /// coefficients stay stable at any positive sample rate.
    pub fn new(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let cutoff = cutoff.max(1.0).min(sample_rate * MAX_CUTOFF_RATIO);
        let omega = TAU * cutoff / sample_rate;
        let (sin, cos) = omega.sin_cos();
        let alpha = sin / (2.0 * q);
        let norm = 1.0 / (1.0 + alpha);
        let edge = (1.0 + cos) * 0.5 * norm;

        BiquadFilter {
            cutoff,
            b0: edge,
            b1: -2.0 * edge,
            b2: edge,
            a1: -2.0 * cos * norm,
            a2: (1.0 - alpha) * norm,
            s1: 0.0,
            s2: 0.0,
        }
    }

    /// Butterworth high-pass.
    pub fn highpass(cutoff: f64, sample_rate: f64) -> Self {
        Self::new(cutoff, DEFAULT_Q, sample_rate)
    }

    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.s1;
        self.s1 = self.b1 * x - self.a1 * y + self.s2;
        self.s2 = self.b2 * x - self.a2 * y;
        y
    }

    /// Filter a buffer in place.
    pub fn process_block(&mut self, buffer: &mut [f64]) {
        for s in buffer.iter_mut() {
            *s = self.process(*s);
        }
    }
}
