//! Drum generator — fixed kick/snare/hi-hat grid, one bar per 8 steps.

use crate::catalog::TrackParameters;
use crate::schedule::{Bus, Scheduler, Timbre};

use super::bar_count;

pub const STEPS: usize = 8;

pub const KICK: [u8; STEPS] = [1, 0, 0, 0, 1, 0, 0, 0];
pub const SNARE: [u8; STEPS] = [0, 0, 1, 0, 0, 0, 1, 0];
pub const HIHAT: [u8; STEPS] = [0, 1, 0, 1, 0, 1, 0, 1];

/// One row of the kit: its gate pattern and the event it schedules.
struct DrumVoice {
    pattern: &'static [u8; STEPS],
    timbre: Timbre,
    frequency_hz: f64,
    duration_seconds: f64,
    level: f64,
}

const KIT: [DrumVoice; 3] = [
    DrumVoice {
        pattern: &KICK,
        timbre: Timbre::Kick,
        frequency_hz: 150.0,
        duration_seconds: 0.2,
        level: 1.0,
    },
    DrumVoice {
        pattern: &SNARE,
        timbre: Timbre::Snare,
        frequency_hz: 200.0,
        duration_seconds: 0.1,
        level: 1.0,
    },
    DrumVoice {
        pattern: &HIHAT,
        timbre: Timbre::HiHat,
        frequency_hz: 7000.0,
        duration_seconds: 0.05,
        level: 0.2,
    },
];

pub fn generate(params: &TrackParameters, scheduler: &mut Scheduler) {
    let beat = params.beat_duration();
    let bar_duration = beat * STEPS as f64;
    let bars = bar_count(params.duration_seconds, bar_duration);

    for bar in 0..bars {
        for step in 0..STEPS {
            let time = bar as f64 * bar_duration + step as f64 * beat;
            for voice in KIT.iter().filter(|v| v.pattern[step] == 1) {
                scheduler.schedule_note(
                    voice.frequency_hz,
                    time,
                    voice.duration_seconds,
                    voice.level,
                    voice.timbre,
                    Bus::Drums,
                );
            }
        }
    }
    log::debug!("drums: {bars} bars, {} hits", scheduler.events(Bus::Drums).len());
}
