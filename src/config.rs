//! Render configuration.
//!
//! Everything the render graph needs that is not part of a track's musical
//! parameters: sample rate, playback cap, bus and master gains, effect
//! settings, and the seed for the noise source. Defaults reproduce the
//! stock mix; a host may override any field from JSON.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::schedule::Bus;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Lowest accepted sample rate in Hz. Below this the drum filters have no
/// usable band under Nyquist.
pub const MIN_SAMPLE_RATE: u32 = 1000;

/// Longest buffer a render produces, in seconds.
pub const MAX_RENDER_SECONDS: f64 = 60.0;

/// Configuration for the feedback delay send.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Delay time in seconds.
    pub time: f64,
    /// Feedback amount (0.0 to <1.0).
    pub feedback: f64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            time: 0.3,
            feedback: 0.4,
        }
    }
}

/// Configuration for the convolution reverb send.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverbConfig {
    /// Impulse response length in seconds.
    pub length_seconds: f64,
    /// Exponent of the `(1 - t/length)^decay` envelope.
    pub decay: f64,
}

impl Default for ReverbConfig {
    fn default() -> Self {
        Self {
            length_seconds: 2.0,
            decay: 3.0,
        }
    }
}

/// Fixed gain per bus before summing into the master.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusGains {
    pub drums: f64,
    pub bass: f64,
    pub chords: f64,
    pub melody: f64,
}

impl BusGains {
    pub fn gain(&self, bus: Bus) -> f64 {
        match bus {
            Bus::Drums => self.drums,
            Bus::Bass => self.bass,
            Bus::Chords => self.chords,
            Bus::Melody => self.melody,
        }
    }
}

impl Default for BusGains {
    fn default() -> Self {
        Self {
            drums: 0.7,
            bass: 0.5,
            chords: 0.3,
            melody: 0.4,
        }
    }
}

/// Full render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub sample_rate: u32,
    /// Cap applied to a track's duration before allocating the buffer.
    pub max_duration_seconds: f64,
    pub master_gain: f64,
    pub bus_gains: BusGains,
    pub reverb: ReverbConfig,
    pub delay: DelayConfig,
    /// Seed for drum noise and the reverb impulse.
    pub noise_seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_duration_seconds: MAX_RENDER_SECONDS,
            master_gain: 0.8,
            bus_gains: BusGains::default(),
            reverb: ReverbConfig::default(),
            delay: DelayConfig::default(),
            noise_seed: 0x5EED_0F_7AC5,
        }
    }
}

impl RenderConfig {
    /// Default configuration at a different sample rate.
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields fall back to defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Duration actually rendered for a track of `duration_seconds`.
    pub fn capped_duration(&self, duration_seconds: f64) -> f64 {
        duration_seconds.min(self.max_duration_seconds)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.sample_rate < MIN_SAMPLE_RATE {
            return Err(EngineError::invalid_config(
                "sample_rate",
                format!("must be at least {MIN_SAMPLE_RATE} Hz, got {}", self.sample_rate),
            ));
        }
        if !(self.max_duration_seconds.is_finite() && self.max_duration_seconds > 0.0) {
            return Err(EngineError::invalid_config(
                "max_duration_seconds",
                format!("must be positive, got {}", self.max_duration_seconds),
            ));
        }
        if !(self.master_gain.is_finite() && self.master_gain >= 0.0) {
            return Err(EngineError::invalid_config(
                "master_gain",
                format!("must be non-negative, got {}", self.master_gain),
            ));
        }
        if !(self.reverb.length_seconds.is_finite() && self.reverb.length_seconds > 0.0) {
            return Err(EngineError::invalid_config(
                "reverb.length_seconds",
                format!("must be positive, got {}", self.reverb.length_seconds),
            ));
        }
        if !(self.reverb.decay.is_finite() && self.reverb.decay >= 0.0) {
            return Err(EngineError::invalid_config(
                "reverb.decay",
                format!("must be non-negative, got {}", self.reverb.decay),
            ));
        }
        if !(self.delay.time.is_finite() && self.delay.time > 0.0) {
            return Err(EngineError::invalid_config(
                "delay.time",
                format!("must be positive, got {}", self.delay.time),
            ));
        }
        if !(0.0..1.0).contains(&self.delay.feedback) {
            return Err(EngineError::invalid_config(
                "delay.feedback",
                format!("must be within [0, 1), got {}", self.delay.feedback),
            ));
        }
        Ok(())
    }
}
