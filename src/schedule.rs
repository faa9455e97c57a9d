//! Event scheduler — turns musical positions into absolute-time events.
//!
//! Pattern generators append [`ScheduledEvent`]s here for the whole track
//! before rendering begins. Events on the same bus may overlap; the renderer
//! sums them.

use serde::{Deserialize, Serialize};

/// Sound source used to realize an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timbre {
    Sine,
    Triangle,
    Sawtooth,
    Kick,
    Snare,
    HiHat,
}

impl Timbre {
    /// Drum timbres ignore the note envelope and use their own decays.
    pub fn is_percussion(self) -> bool {
        matches!(self, Timbre::Kick | Timbre::Snare | Timbre::HiHat)
    }
}

/// Accumulation channel for one musical part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bus {
    Drums,
    Bass,
    Chords,
    Melody,
}

impl Bus {
    pub const ALL: [Bus; 4] = [Bus::Drums, Bus::Bass, Bus::Chords, Bus::Melody];

    fn index(self) -> usize {
        match self {
            Bus::Drums => 0,
            Bus::Bass => 1,
            Bus::Chords => 2,
            Bus::Melody => 3,
        }
    }
}

/// One note or drum hit at an absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub start_time_seconds: f64,
    pub duration_seconds: f64,
    pub frequency_hz: f64,
    /// Peak level [0, 1].
    pub amplitude: f64,
    pub timbre: Timbre,
    pub bus: Bus,
}

impl ScheduledEvent {
    pub fn end_time_seconds(&self) -> f64 {
        self.start_time_seconds + self.duration_seconds
    }
}

/// Equal-tempered pitch: `base * 2^(semitones / 12)`.
pub fn calculate_frequency(base_frequency_hz: f64, semitone_offset: f64) -> f64 {
    base_frequency_hz * (semitone_offset / 12.0).exp2()
}

/// Per-bus event lists for one render.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    buses: [Vec<ScheduledEvent>; 4],
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event.
    pub fn schedule_note(
        &mut self,
        frequency_hz: f64,
        start_time_seconds: f64,
        duration_seconds: f64,
        amplitude: f64,
        timbre: Timbre,
        bus: Bus,
    ) {
        debug_assert!(start_time_seconds >= 0.0, "negative start time {start_time_seconds}");
        debug_assert!(duration_seconds > 0.0, "non-positive duration {duration_seconds}");
        debug_assert!(frequency_hz > 0.0, "non-positive frequency {frequency_hz}");
        debug_assert!(
            (0.0..=1.0).contains(&amplitude),
            "amplitude {amplitude} outside [0, 1]"
        );
        self.buses[bus.index()].push(ScheduledEvent {
            start_time_seconds,
            duration_seconds,
            frequency_hz,
            amplitude,
            timbre,
            bus,
        });
    }

    /// Events on one bus, in scheduling order.
    pub fn events(&self, bus: Bus) -> &[ScheduledEvent] {
        &self.buses[bus.index()]
    }

    /// All events, bus by bus.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.buses.iter().flatten()
    }

    /// Number of events with the given timbre.
    pub fn count(&self, timbre: Timbre) -> usize {
        self.iter().filter(|e| e.timbre == timbre).count()
    }

    pub fn len(&self) -> usize {
        self.buses.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.iter().all(Vec::is_empty)
    }

    /// Consume the scheduler, yielding the per-bus lists.
    pub fn into_buses(self) -> impl Iterator<Item = (Bus, Vec<ScheduledEvent>)> {
        Bus::ALL.into_iter().zip(self.buses)
    }
}
