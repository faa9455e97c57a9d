//! Voice — realizes one [`ScheduledEvent`] as samples on a bus buffer.

use crate::schedule::{ScheduledEvent, Timbre};

use super::envelope::NoteEnvelope;
use super::noise::NoiseGenerator;
use super::oscillator::{Oscillator, Waveform};
use super::percussion;

/// Frame index of a time in seconds.
pub fn frame_at(seconds: f64, sample_rate: f64) -> usize {
    (seconds * sample_rate).round() as usize
}

/// Add `event` into `bus`. Returns false if it starts past the buffer end.
pub fn render_event(
    event: &ScheduledEvent,
    bus: &mut [f64],
    sample_rate: f64,
    noise: &mut NoiseGenerator,
) -> bool {
    let start = frame_at(event.start_time_seconds, sample_rate);
    if start >= bus.len() {
        return false;
    }

    match event.timbre {
        Timbre::Sine => render_note(event, Waveform::Sine, start, bus, sample_rate),
        Timbre::Triangle => render_note(event, Waveform::Triangle, start, bus, sample_rate),
        Timbre::Sawtooth => render_note(event, Waveform::Sawtooth, start, bus, sample_rate),
        Timbre::Kick => percussion::kick(bus, start, event.amplitude, sample_rate),
        Timbre::Snare => percussion::snare(bus, start, event.amplitude, sample_rate, noise),
        Timbre::HiHat => percussion::hihat(bus, start, event.amplitude, sample_rate, noise),
    }
    true
}

/// Oscillator shaped by the linear attack/release envelope.
fn render_note(
    event: &ScheduledEvent,
    shape: Waveform,
    start: usize,
    bus: &mut [f64],
    sample_rate: f64,
) {
    let envelope = NoteEnvelope::new(event.amplitude, event.duration_seconds);
    let frames = frame_at(event.duration_seconds, sample_rate).min(bus.len() - start);
    let mut osc = Oscillator::new(shape, event.frequency_hz, sample_rate);

    for (i, sample) in bus[start..start + frames].iter_mut().enumerate() {
        let t = i as f64 / sample_rate;
        *sample += osc.next_sample() * envelope.level_at(t);
    }
}
