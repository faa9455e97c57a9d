//! Mixer — per-part bus buffers summed into a master with fixed gains.

use crate::config::BusGains;
use crate::error::{EngineError, EngineResult};
use crate::schedule::Bus;

/// One mono accumulation buffer per [`Bus`].
#[derive(Debug, Clone)]
pub struct BusMixer {
    frames: usize,
    buses: [Vec<f64>; 4],
}

/// Reserve a zeroed buffer, reporting allocation failure instead of aborting.
pub fn try_zeroed(frames: usize) -> EngineResult<Vec<f64>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(frames)
        .map_err(|_| EngineError::Allocation { frames })?;
    buffer.resize(frames, 0.0);
    Ok(buffer)
}

/// Fallible copy of `source`.
pub fn try_copy(source: &[f64]) -> EngineResult<Vec<f64>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(source.len())
        .map_err(|_| EngineError::Allocation { frames: source.len() })?;
    buffer.extend_from_slice(source);
    Ok(buffer)
}

impl BusMixer {
    /// Allocate `frames` samples for every bus.
    pub fn new(frames: usize) -> EngineResult<Self> {
        Ok(BusMixer {
            frames,
            buses: [
                try_zeroed(frames)?,
                try_zeroed(frames)?,
                try_zeroed(frames)?,
                try_zeroed(frames)?,
            ],
        })
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    fn slot(bus: Bus) -> usize {
        match bus {
            Bus::Drums => 0,
            Bus::Bass => 1,
            Bus::Chords => 2,
            Bus::Melody => 3,
        }
    }

    /// Mutable access to one bus buffer.
    pub fn bus_mut(&mut self, bus: Bus) -> &mut [f64] {
        &mut self.buses[Self::slot(bus)]
    }

    pub fn bus(&self, bus: Bus) -> &[f64] {
        &self.buses[Self::slot(bus)]
    }

    /// Sum all buses with their gains, then apply the master gain.
    pub fn mixdown(&self, gains: &BusGains, master_gain: f64) -> EngineResult<Vec<f64>> {
        let mut master = try_zeroed(self.frames)?;
        for bus in Bus::ALL {
            let gain = gains.gain(bus) * master_gain;
            for (m, &s) in master.iter_mut().zip(self.bus(bus)) {
                *m += s * gain;
            }
        }
        Ok(master)
    }
}

/// Soft clipper using tanh to prevent harsh digital clipping.
pub fn soft_clip(x: f64) -> f64 {
    x.tanh()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mix_is_silent() {
        let mixer = BusMixer::new(128).unwrap();
        let out = mixer.mixdown(&BusGains::default(), 0.8).unwrap();
        assert_eq!(out.len(), 128);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn bus_gains_and_master_apply() {
        let mut mixer = BusMixer::new(4).unwrap();
        mixer.bus_mut(Bus::Drums)[0] = 1.0;
        mixer.bus_mut(Bus::Bass)[1] = 1.0;
        mixer.bus_mut(Bus::Chords)[2] = 1.0;
        mixer.bus_mut(Bus::Melody)[3] = 1.0;
        mixer.bus_mut(Bus::Melody)[0] = 1.0;

        let out = mixer.mixdown(&BusGains::default(), 0.8).unwrap();
        assert!((out[0] - (0.7 + 0.4) * 0.8).abs() < 1e-12);
        assert!((out[1] - 0.5 * 0.8).abs() < 1e-12);
        assert!((out[2] - 0.3 * 0.8).abs() < 1e-12);
        assert!((out[3] - 0.4 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn buses_are_independent() {
        let mut mixer = BusMixer::new(2).unwrap();
        mixer.bus_mut(Bus::Chords)[1] = 0.5;
        assert_eq!(mixer.bus(Bus::Chords), &[0.0, 0.5]);
        assert_eq!(mixer.bus(Bus::Bass), &[0.0, 0.0]);
    }

    #[test]
    fn soft_clip_bounds_output() {
        assert!(soft_clip(100.0) <= 1.0);
        assert!(soft_clip(-100.0) >= -1.0);
        assert!((soft_clip(0.01) - 0.01).abs() < 1e-5);
    }

    #[test]
    fn copy_matches_source() {
        let source = [0.25, -0.5, 1.0];
        assert_eq!(try_copy(&source).unwrap(), source.to_vec());
        assert!(try_copy(&[]).unwrap().is_empty());
    }

    #[test]
    fn huge_allocation_fails_cleanly() {
        let err = try_zeroed(usize::MAX).unwrap_err();
        assert!(matches!(err, EngineError::Allocation { frames } if frames == usize::MAX));
    }
}
