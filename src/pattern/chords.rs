//! Chord generator — stacked sine notes gated by the rhythm pattern.

use crate::catalog::TrackParameters;
use crate::schedule::{Bus, Scheduler, Timbre, calculate_frequency};

use super::bar_count;

pub const STEPS: usize = 8;

const GATE: f64 = 0.7;
// notes stack, so each one is quiet
const AMPLITUDE: f64 = 0.15;

pub fn generate(params: &TrackParameters, scheduler: &mut Scheduler) {
    let beat = params.beat_duration();
    let bar_duration = beat * STEPS as f64;
    let bars = bar_count(params.duration_seconds, bar_duration);

    for bar in 0..bars {
        let chord = params.chord_for_bar(bar);
        for step in 0..STEPS {
            if params.rhythm_pattern[step % params.rhythm_pattern.len()] != 1 {
                continue;
            }
            let time = bar as f64 * bar_duration + step as f64 * beat;
            for &note in chord {
                scheduler.schedule_note(
                    calculate_frequency(params.base_frequency_hz, note as f64),
                    time,
                    beat * GATE,
                    AMPLITUDE,
                    Timbre::Sine,
                    Bus::Chords,
                );
            }
        }
    }
    log::debug!("chords: {bars} bars, {} notes", scheduler.events(Bus::Chords).len());
}
