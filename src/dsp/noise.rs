//! White noise from an instance-local PCG32 stream.

use rand::Rng;
use rand_pcg::Pcg32;

/// Uniform white noise in [-1, 1].
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    rng: Pcg32,
}

impl NoiseGenerator {
    pub fn new(rng: Pcg32) -> Self {
        NoiseGenerator { rng }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        self.rng.gen_range(-1.0..=1.0)
    }

    /// Fill `buffer` with fresh noise.
    pub fn fill(&mut self, buffer: &mut [f64]) {
        for s in buffer.iter_mut() {
            *s = self.next_sample();
        }
    }

    /// A new buffer of `len` noise samples.
    pub fn burst(&mut self, len: usize) -> Vec<f64> {
        let mut buffer = vec![0.0; len];
        self.fill(&mut buffer);
        buffer
    }
}
