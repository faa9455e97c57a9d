//! Melody generator — 16 seeded steps per bar over the current chord root.
//!
//! Every step draws a gate value first. Only gated steps draw the note
//! index and then the duration, so the draw order is fixed:
//! gate, [note, duration], gate, [note, duration], ...
//! Changing that order changes every melody.

use crate::catalog::TrackParameters;
use crate::rng::MelodyRng;
use crate::schedule::{Bus, Scheduler, Timbre, calculate_frequency};

use super::bar_count;

pub const STEPS: usize = 16;

const GATE_THRESHOLD: f64 = 0.6;
const AMPLITUDE: f64 = 0.3;

pub fn generate(params: &TrackParameters, rng: &mut MelodyRng, scheduler: &mut Scheduler) {
    let beat = params.beat_duration();
    let bar_duration = beat * STEPS as f64;
    let bars = bar_count(params.duration_seconds, bar_duration);
    let notes = &params.melody_notes;

    for bar in 0..bars {
        let root = params.chord_for_bar(bar)[0];
        for step in 0..STEPS {
            if rng.next_f64() >= GATE_THRESHOLD {
                continue;
            }
            let time = bar as f64 * bar_duration + step as f64 * beat;
            let index = ((rng.next_f64() * notes.len() as f64).floor() as usize).min(notes.len() - 1);
            let note = notes[index] + root;
            let duration = beat * (rng.next_f64() * 0.8 + 0.3);
            scheduler.schedule_note(
                calculate_frequency(params.base_frequency_hz, note as f64),
                time,
                duration,
                AMPLITUDE,
                Timbre::Triangle,
                Bus::Melody,
            );
        }
    }
    log::debug!("melody: {bars} bars, {} notes", scheduler.events(Bus::Melody).len());
}
