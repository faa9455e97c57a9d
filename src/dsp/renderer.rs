//! Rendered output — the interleaved stereo buffer handed to the caller.

use crate::error::{EngineError, EngineResult};

use super::mixer::soft_clip;

/// Number of interleaved channels in a [`RenderedTrack`].
pub const CHANNELS: usize = 2;

/// A finished render: interleaved stereo `f32` at `sample_rate`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTrack {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl RenderedTrack {
    /// Interleave and soft-clip left/right channels.
    ///
    /// The output buffer is reserved fallibly; failure is reported as
    /// [`EngineError::Allocation`].
    pub fn from_channels(left: &[f64], right: &[f64], sample_rate: u32) -> EngineResult<Self> {
        debug_assert_eq!(left.len(), right.len());
        let frames = left.len().min(right.len());
        let len = frames
            .checked_mul(CHANNELS)
            .ok_or(EngineError::Allocation { frames })?;
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(len)
            .map_err(|_| EngineError::Allocation { frames })?;
        for (&l, &r) in left.iter().zip(right) {
            samples.push(soft_clip(l) as f32);
            samples.push(soft_clip(r) as f32);
        }
        Ok(RenderedTrack {
            samples,
            sample_rate,
        })
    }

    /// Interleaved L/R samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Give up ownership of the interleaved samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / CHANNELS
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Copy of one channel (0 = left, 1 = right).
    pub fn channel(&self, index: usize) -> Vec<f32> {
        self.samples.iter().skip(index).step_by(CHANNELS).copied().collect()
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |m, &s| m.max(s.abs()))
    }
}
