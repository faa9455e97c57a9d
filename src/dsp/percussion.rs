//! Synthesized drum voices: kick, snare and hi-hat.
//!
//! Each voice writes (adds) into a destination buffer starting at a frame
//! offset; anything past the end of the buffer is dropped.

use super::envelope::ExpRamp;
use super::filter::BiquadFilter;
use super::noise::NoiseGenerator;
use super::oscillator::{Oscillator, Waveform};

/// Level every drum decays towards.
const DECAY_FLOOR: f64 = 0.001;

const KICK_START_HZ: f64 = 150.0;
const KICK_END_HZ: f64 = 50.0;
const KICK_SWEEP_SECONDS: f64 = 0.15;
const KICK_SECONDS: f64 = 0.2;

const SNARE_TONE_HZ: f64 = 200.0;
const SNARE_SECONDS: f64 = 0.1;
const SNARE_NOISE_MIX: f64 = 0.8;
const SNARE_NOISE_HIGHPASS_HZ: f64 = 1000.0;

const HIHAT_HIGHPASS_HZ: f64 = 7000.0;
const HIHAT_SECONDS: f64 = 0.05;

/// Frames available from `start` for a sound of `seconds`.
fn span(start: usize, seconds: f64, sample_rate: f64, buffer_len: usize) -> usize {
    let frames = (seconds * sample_rate).round() as usize;
    frames.min(buffer_len.saturating_sub(start))
}

/// Sine with an exponential pitch drop 150 → 50 Hz and a 200 ms decay.
pub fn kick(out: &mut [f64], start: usize, amplitude: f64, sample_rate: f64) {
    let frames = span(start, KICK_SECONDS, sample_rate, out.len());
    let pitch = ExpRamp::new(KICK_START_HZ, KICK_END_HZ, KICK_SWEEP_SECONDS);
    let gain = ExpRamp::new(amplitude, DECAY_FLOOR, KICK_SECONDS);
    let mut osc = Oscillator::new(Waveform::Sine, KICK_START_HZ, sample_rate);

    for (i, sample) in out[start..start + frames].iter_mut().enumerate() {
        let t = i as f64 / sample_rate;
        osc.frequency_hz = pitch.value_at(t);
        *sample += osc.next_sample() * gain.value_at(t);
    }
}

/// 200 Hz triangle body plus high-passed noise, both decaying over 100 ms.
pub fn snare(
    out: &mut [f64],
    start: usize,
    amplitude: f64,
    sample_rate: f64,
    noise: &mut NoiseGenerator,
) {
    let frames = span(start, SNARE_SECONDS, sample_rate, out.len());
    let tone_gain = ExpRamp::new(amplitude, DECAY_FLOOR, SNARE_SECONDS);
    let noise_gain = ExpRamp::new(amplitude * SNARE_NOISE_MIX, DECAY_FLOOR, SNARE_SECONDS);
    let mut osc = Oscillator::new(Waveform::Triangle, SNARE_TONE_HZ, sample_rate);

    let mut rattle = noise.burst(frames);
    BiquadFilter::highpass(SNARE_NOISE_HIGHPASS_HZ, sample_rate).process_block(&mut rattle);

    for (i, sample) in out[start..start + frames].iter_mut().enumerate() {
        let t = i as f64 / sample_rate;
        *sample += osc.next_sample() * tone_gain.value_at(t) + rattle[i] * noise_gain.value_at(t);
    }
}

/// Noise through a 7 kHz high-pass, 50 ms decay.
pub fn hihat(
    out: &mut [f64],
    start: usize,
    amplitude: f64,
    sample_rate: f64,
    noise: &mut NoiseGenerator,
) {
    let frames = span(start, HIHAT_SECONDS, sample_rate, out.len());
    let gain = ExpRamp::new(amplitude, DECAY_FLOOR, HIHAT_SECONDS);

    let mut hiss = noise.burst(frames);
    BiquadFilter::highpass(HIHAT_HIGHPASS_HZ, sample_rate).process_block(&mut hiss);

    for (i, sample) in out[start..start + frames].iter_mut().enumerate() {
        *sample += hiss[i] * gain.value_at(i as f64 / sample_rate);
    }
}
