//! Audio Engine — renders a track's parameters to a stereo buffer.
//!
//! A render runs in one pass:
//!
//! 1. all pattern generators schedule events over the full track duration;
//! 2. bus buffers are allocated for the capped duration;
//! 3. every event that starts inside the buffer is synthesized onto its bus;
//! 4. buses are summed into a mono master with bus and master gains;
//! 5. reverb and delay sends are computed from the master and added back;
//! 6. the result is soft-clipped and interleaved.
//!
//! The engine keeps no state between renders. Random sources are created
//! per call from the configured seed, so one engine can be shared across
//! threads and renders are reproducible.

use crate::catalog::TrackParameters;
use crate::config::{MIN_SAMPLE_RATE, RenderConfig};
use crate::error::{EngineError, EngineResult};
use crate::pattern;
use crate::rng::{create_rng, derive_seed};

use super::delay::Delay;
use super::mixer::{BusMixer, try_copy};
use super::noise::NoiseGenerator;
use super::renderer::RenderedTrack;
use super::reverb::{ConvolutionReverb, ImpulseResponse};
use super::voice::render_event;

/// The offline render engine.
#[derive(Debug, Clone)]
pub struct AudioEngine {
    config: RenderConfig,
}

impl AudioEngine {
    /// Create an engine, rejecting an out-of-range configuration.
    pub fn new(config: RenderConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(AudioEngine { config })
    }

    /// Render a track, capping its duration at the configured maximum.
    pub fn render(&self, params: &TrackParameters) -> EngineResult<RenderedTrack> {
        let capped = self.config.capped_duration(params.duration_seconds);
        if capped < params.duration_seconds {
            log::warn!(
                "track duration {:.1}s capped to {:.1}s",
                params.duration_seconds,
                capped
            );
        }
        self.render_span(params, self.config.sample_rate, capped)
    }

    /// Render `capped_duration` seconds of a track at `sample_rate`.
    ///
    /// Events are scheduled over the full parameter duration; those starting
    /// at or after the end of the buffer are dropped.
    pub fn render_span(
        &self,
        params: &TrackParameters,
        sample_rate: u32,
        capped_duration: f64,
    ) -> EngineResult<RenderedTrack> {
        params.validate()?;
        if sample_rate < MIN_SAMPLE_RATE {
            return Err(EngineError::invalid_config(
                "sample_rate",
                format!("must be at least {MIN_SAMPLE_RATE} Hz, got {sample_rate}"),
            ));
        }
        if !(capped_duration.is_finite() && capped_duration > 0.0) {
            return Err(EngineError::invalid_config(
                "capped_duration",
                format!("must be positive, got {capped_duration}"),
            ));
        }

        let sr = sample_rate as f64;
        let frames = (capped_duration * sr).round() as usize;
        log::info!(
            "rendering {frames} frames at {sample_rate} Hz ({capped_duration:.2}s of {:.2}s)",
            params.duration_seconds
        );

        let scheduler = pattern::generate_all(params);
        let mut mixer = BusMixer::new(frames)?;
        let mut noise = NoiseGenerator::new(create_rng(derive_seed(self.config.noise_seed, "drums")));

        let mut rendered = 0usize;
        let mut dropped = 0usize;
        for (bus, events) in scheduler.into_buses() {
            let buffer = mixer.bus_mut(bus);
            for event in &events {
                if render_event(event, buffer, sr, &mut noise) {
                    rendered += 1;
                } else {
                    dropped += 1;
                }
            }
        }
        log::debug!("rendered {rendered} events, dropped {dropped} past the end");

        let master = mixer.mixdown(&self.config.bus_gains, self.config.master_gain)?;
        drop(mixer);

        let mut left = try_copy(&master)?;
        let mut right = try_copy(&master)?;

        let reverb_mix = params.effects.reverb_mix;
        if reverb_mix > 0.0 {
            let mut impulse_noise =
                NoiseGenerator::new(create_rng(derive_seed(self.config.noise_seed, "reverb")));
            let impulse = ImpulseResponse::synthesize(
                sr,
                self.config.reverb.length_seconds,
                self.config.reverb.decay,
                &mut impulse_noise,
            );
            ConvolutionReverb::new(&impulse).mix_into(&master, &mut left, &mut right, reverb_mix);
        }

        let delay_mix = params.effects.delay_mix;
        if delay_mix > 0.0 {
            let mut delay = Delay::new(sr, self.config.delay.time, self.config.delay.feedback);
            for ((l, r), &x) in left.iter_mut().zip(right.iter_mut()).zip(&master) {
                let echo = delay.process(x) * delay_mix;
                *l += echo;
                *r += echo;
            }
        }

        let track = RenderedTrack::from_channels(&left, &right, sample_rate)?;
        log::info!("render complete: {:.2}s, peak {:.3}", track.duration_seconds(), track.peak());
        Ok(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EffectMix;
    use crate::pattern::test_fixture;

    fn engine(sample_rate: u32) -> AudioEngine {
        AudioEngine::new(RenderConfig::with_sample_rate(sample_rate)).unwrap()
    }

    fn dry(mut params: TrackParameters) -> TrackParameters {
        params.effects = EffectMix {
            reverb_mix: 0.0,
            delay_mix: 0.0,
        };
        params
    }

    #[test]
    fn render_length_is_exact() {
        let params = test_fixture::params(3.0);
        let track = engine(8000).render(&params).unwrap();
        assert_eq!(track.frames(), 24000);
        assert_eq!(track.samples().len(), 48000);
        assert_eq!(track.sample_rate(), 8000);
    }

    #[test]
    fn render_is_capped() {
        let config = RenderConfig {
            sample_rate: 8000,
            max_duration_seconds: 2.0,
            ..RenderConfig::default()
        };
        let track = AudioEngine::new(config).unwrap().render(&test_fixture::params(30.0)).unwrap();
        assert_eq!(track.frames(), 16000);
    }

    #[test]
    fn render_produces_output() {
        let track = engine(8000).render(&test_fixture::params(2.0)).unwrap();
        assert!(track.peak() > 0.05, "peak {}", track.peak());
        assert!(track.peak() <= 1.0);
        assert!(track.samples().iter().all(|s| s.is_finite()));
    }

    #[test]
    fn render_is_deterministic() {
        let params = test_fixture::params(2.0);
        let a = engine(8000).render(&params).unwrap();
        let b = engine(8000).render(&params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn dry_render_is_mono() {
        let track = engine(8000).render(&dry(test_fixture::params(1.0))).unwrap();
        assert_eq!(track.channel(0), track.channel(1));
    }

    #[test]
    fn reverb_widens_the_image() {
        let mut params = dry(test_fixture::params(1.0));
        params.effects.reverb_mix = 0.5;
        let track = engine(8000).render(&params).unwrap();
        assert_ne!(track.channel(0), track.channel(1));
    }

    #[test]
    fn delay_adds_echo_to_silence_gap() {
        // Only a bass note at t=0, then nothing until the next step at 0.5 s.
        let mut params = dry(test_fixture::params(0.5));
        params.bass_pattern = vec![0];
        params.tempo_bpm = 60.0;
        let quiet = engine(8000).render(&params).unwrap();

        params.effects.delay_mix = 1.0;
        let echoed = engine(8000).render(&params).unwrap();

        assert_eq!(quiet.frames(), echoed.frames());
        assert_ne!(quiet, echoed);
    }

    #[test]
    fn invalid_parameters_fail_fast() {
        let mut params = test_fixture::params(1.0);
        params.melody_notes.clear();
        let err = engine(8000).render(&params).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameters { field: "melody_notes", .. }));
    }

    #[test]
    fn render_span_rejects_bad_arguments() {
        let params = test_fixture::params(1.0);
        assert!(engine(8000).render_span(&params, 0, 1.0).is_err());
        assert!(engine(8000).render_span(&params, 2, 1.0).is_err());
        assert!(engine(8000).render_span(&params, 8000, 0.0).is_err());
    }

    #[test]
    fn engine_rejects_bad_config() {
        let config = RenderConfig {
            sample_rate: 0,
            ..RenderConfig::default()
        };
        assert!(AudioEngine::new(config).is_err());
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AudioEngine>();
    }
}
