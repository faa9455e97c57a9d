//! Reverb send — convolution with a synthetic impulse response.
//!
//! The impulse is two channels of noise under a `(1 - t/length)^decay`
//! envelope. Convolution uses FFT overlap-add: the impulse spectrum is
//! computed once per channel and the input is processed in blocks.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use super::noise::NoiseGenerator;

/// Smallest input block for overlap-add; longer impulses use longer blocks.
const MIN_BLOCK_SIZE: usize = 4096;

/// Two-channel impulse response.
#[derive(Debug, Clone)]
pub struct ImpulseResponse {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl ImpulseResponse {
    /// Decaying noise burst of `length_seconds`.
    pub fn synthesize(
        sample_rate: f64,
        length_seconds: f64,
        decay: f64,
        noise: &mut NoiseGenerator,
    ) -> Self {
        let length = ((sample_rate * length_seconds).round() as usize).max(1);
        let mut channel = || -> Vec<f64> {
            (0..length)
                .map(|i| noise.next_sample() * (1.0 - i as f64 / length as f64).powf(decay))
                .collect()
        };
        let left = channel();
        let right = channel();
        ImpulseResponse { left, right }
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Overlap-add convolver for one impulse channel.
struct Convolver {
    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,
    kernel: Vec<Complex<f64>>,
    block_size: usize,
    fft_size: usize,
}

impl Convolver {
    fn new(planner: &mut FftPlanner<f64>, impulse: &[f64]) -> Self {
        let block_size = impulse.len().next_power_of_two().max(MIN_BLOCK_SIZE);
        let fft_size = (block_size + impulse.len() - 1).next_power_of_two();
        let fft = planner.plan_fft_forward(fft_size);
        let ifft = planner.plan_fft_inverse(fft_size);

        let mut kernel: Vec<Complex<f64>> = impulse.iter().map(|&s| Complex::new(s, 0.0)).collect();
        kernel.resize(fft_size, Complex::new(0.0, 0.0));
        fft.process(&mut kernel);

        Convolver {
            fft,
            ifft,
            kernel,
            block_size,
            fft_size,
        }
    }

    /// Add `gain` times the convolution of `input` into `output`, truncated
    /// to `output.len()`.
    fn convolve_into(&self, input: &[f64], output: &mut [f64], gain: f64) {
        let scale = gain / self.fft_size as f64;
        let mut scratch = vec![Complex::new(0.0, 0.0); self.fft_size];

        for (block_index, block) in input.chunks(self.block_size).enumerate() {
            let offset = block_index * self.block_size;
            if offset >= output.len() {
                break;
            }
            if block.iter().all(|&s| s == 0.0) {
                continue;
            }

            scratch.fill(Complex::new(0.0, 0.0));
            for (dst, &src) in scratch.iter_mut().zip(block) {
                dst.re = src;
            }
            self.fft.process(&mut scratch);
            for (bin, k) in scratch.iter_mut().zip(&self.kernel) {
                *bin = *bin * *k;
            }
            self.ifft.process(&mut scratch);

            let tail = (output.len() - offset).min(self.fft_size);
            for (dst, bin) in output[offset..offset + tail].iter_mut().zip(&scratch) {
                *dst += bin.re * scale;
            }
        }
    }
}

/// Stereo convolution reverb.
pub struct ConvolutionReverb {
    left: Convolver,
    right: Convolver,
}

impl ConvolutionReverb {
    pub fn new(impulse: &ImpulseResponse) -> Self {
        let mut planner = FftPlanner::new();
        let left = Convolver::new(&mut planner, &impulse.left);
        let right = Convolver::new(&mut planner, &impulse.right);
        ConvolutionReverb { left, right }
    }

    /// Add the wet stereo signal for a mono `input`, scaled by `gain`, onto
    /// `left` and `right`.
    pub fn mix_into(&self, input: &[f64], left: &mut [f64], right: &mut [f64], gain: f64) {
        self.left.convolve_into(input, left, gain);
        self.right.convolve_into(input, right, gain);
    }
}
