//! Bass generator — one sawtooth note per pattern step, an octave below
//! base, following the chord root of each bar.

use crate::catalog::TrackParameters;
use crate::schedule::{Bus, Scheduler, Timbre, calculate_frequency};

use super::bar_count;

const GATE: f64 = 0.8;
const AMPLITUDE: f64 = 0.7;

pub fn generate(params: &TrackParameters, scheduler: &mut Scheduler) {
    let beat = params.beat_duration();
    let steps = params.bass_pattern.len();
    let bar_duration = beat * steps as f64;
    let bars = bar_count(params.duration_seconds, bar_duration);
    let bass_base = params.base_frequency_hz / 2.0;

    for bar in 0..bars {
        let root = params.chord_for_bar(bar)[0];
        for (step, &offset) in params.bass_pattern.iter().enumerate() {
            let time = bar as f64 * bar_duration + step as f64 * beat;
            let note = root + offset;
            scheduler.schedule_note(
                calculate_frequency(bass_base, note as f64),
                time,
                beat * GATE,
                AMPLITUDE,
                Timbre::Sawtooth,
                Bus::Bass,
            );
        }
    }
    log::debug!("bass: {bars} bars, {} notes", scheduler.events(Bus::Bass).len());
}
