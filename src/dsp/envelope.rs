//! Amplitude and pitch shaping curves.
//!
//! Two shapes are needed:
//!
//! - [`NoteEnvelope`]: linear fade in and fade out around a sustained level,
//!   used for every pitched note to avoid clicks.
//! - [`ExpRamp`]: exponential glide from one value to another, then hold,
//!   used for drum decays and the kick's pitch drop.

/// Shortest attack or release, in seconds.
pub const MIN_RAMP_SECONDS: f64 = 0.01;

/// Fraction of the note spent in each ramp when that exceeds the minimum.
pub const RAMP_FRACTION: f64 = 0.01;

/// Linear attack/release envelope for a note of known length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEnvelope {
    /// Peak level reached after the attack.
    pub amplitude: f64,
    /// Total note length in seconds.
    pub duration: f64,
    /// Attack time in seconds.
    pub attack: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl NoteEnvelope {
    /// Ramps of `max(1% of duration, 10 ms)`. If both ramps do not fit, they
    /// shrink to half the note each.
    pub fn new(amplitude: f64, duration: f64) -> Self {
        let ramp = (duration * RAMP_FRACTION).max(MIN_RAMP_SECONDS);
        let ramp = ramp.min(duration / 2.0);
        NoteEnvelope {
            amplitude,
            duration,
            attack: ramp,
            release: ramp,
        }
    }

    /// Level at `t` seconds after note start. Zero outside the note.
    pub fn level_at(&self, t: f64) -> f64 {
        if t < 0.0 || t >= self.duration {
            return 0.0;
        }
        let release_start = self.duration - self.release;
        if t < self.attack {
            self.amplitude * t / self.attack
        } else if t > release_start {
            self.amplitude * (self.duration - t) / self.release
        } else {
            self.amplitude
        }
    }
}

/// Exponential glide from `start` to `end` over `time` seconds, then hold.
///
/// Both endpoints must be non-zero and of the same sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpRamp {
    pub start: f64,
    pub end: f64,
    pub time: f64,
}

impl ExpRamp {
    pub fn new(start: f64, end: f64, time: f64) -> Self {
        debug_assert!(start * end > 0.0, "exponential ramp needs same-sign non-zero ends");
        ExpRamp { start, end, time }
    }

    /// Value at `t` seconds after the ramp starts.
    pub fn value_at(&self, t: f64) -> f64 {
        if t <= 0.0 {
            self.start
        } else if t >= self.time {
            self.end
        } else {
            self.start * (self.end / self.start).powf(t / self.time)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_note_uses_minimum_ramp() {
        let env = NoteEnvelope::new(0.5, 0.4);
        assert_eq!(env.attack, 0.01);
        assert_eq!(env.release, 0.01);
    }

    #[test]
    fn long_note_uses_one_percent() {
        let env = NoteEnvelope::new(0.5, 3.0);
        assert!((env.attack - 0.03).abs() < 1e-12);
        assert!((env.release - 0.03).abs() < 1e-12);
    }

    #[test]
    fn very_short_note_ramps_meet() {
        let env = NoteEnvelope::new(1.0, 0.012);
        assert!((env.attack - 0.006).abs() < 1e-12);
        assert!((env.level_at(0.006) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn envelope_shape() {
        let env = NoteEnvelope::new(0.8, 1.0);
        assert_eq!(env.level_at(0.0), 0.0);
        assert!((env.level_at(0.005) - 0.4).abs() < 1e-9);
        assert_eq!(env.level_at(0.5), 0.8);
        assert!((env.level_at(0.995) - 0.4).abs() < 1e-9);
        assert_eq!(env.level_at(1.0), 0.0);
        assert_eq!(env.level_at(-0.1), 0.0);
    }

    #[test]
    fn envelope_never_exceeds_amplitude() {
        let env = NoteEnvelope::new(0.3, 0.25);
        for i in 0..1000 {
            let l = env.level_at(i as f64 * 0.00025);
            assert!((0.0..=0.3).contains(&l), "level {l} out of range");
        }
    }

    #[test]
    fn exp_ramp_endpoints() {
        let ramp = ExpRamp::new(150.0, 50.0, 0.15);
        assert_eq!(ramp.value_at(0.0), 150.0);
        assert_eq!(ramp.value_at(0.15), 50.0);
        assert_eq!(ramp.value_at(1.0), 50.0);
    }

    #[test]
    fn exp_ramp_is_geometric() {
        let ramp = ExpRamp::new(1.0, 0.001, 0.2);
        // halfway in time is the geometric mean
        assert!((ramp.value_at(0.1) - 0.001_f64.sqrt()).abs() < 1e-12);
        // monotonic
        let mut prev = f64::MAX;
        for i in 0..=200 {
            let v = ramp.value_at(i as f64 * 0.001);
            assert!(v <= prev);
            prev = v;
        }
    }
}
