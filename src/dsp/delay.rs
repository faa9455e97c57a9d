//! Delay send — single-tap delay line with feedback.

/// A feedback delay producing the wet signal only.
///
/// The line holds `input + feedback * delayed`; the output is the delayed
/// value, so an impulse comes back after `delay_time`, then scaled by
/// `feedback` on every further repeat.
#[derive(Debug, Clone)]
pub struct Delay {
    buffer: Vec<f64>,
    write_pos: usize,
    /// Feedback amount, clamped below 1.
    pub feedback: f64,
}

impl Delay {
    /// Create a delay of `delay_time` seconds.
    pub fn new(sample_rate: f64, delay_time: f64, feedback: f64) -> Self {
        let delay_samples = ((delay_time * sample_rate).round() as usize).max(1);
        Self {
            buffer: vec![0.0; delay_samples],
            write_pos: 0,
            feedback: feedback.clamp(0.0, 0.99),
        }
    }

    /// Delay length in samples.
    pub fn delay_samples(&self) -> usize {
        self.buffer.len()
    }

    /// Push one input sample, returning the delayed output.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let delayed = self.buffer[self.write_pos];
        self.buffer[self.write_pos] = input + delayed * self.feedback;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        delayed
    }
}
