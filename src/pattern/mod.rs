//! Pattern generators — drums, bass, chords and melody.
//!
//! Each generator walks the same beat grid (`60 / tempo` seconds per step)
//! but uses its own bar length, derived from its own step count. All of them
//! cover the full parameter duration; the renderer truncates to the cap.

pub mod bass;
pub mod chords;
pub mod drums;
pub mod melody;

use crate::catalog::TrackParameters;
use crate::rng::MelodyRng;
use crate::schedule::Scheduler;

/// Bars needed to cover `duration_seconds`.
pub fn bar_count(duration_seconds: f64, bar_duration: f64) -> usize {
    (duration_seconds / bar_duration).ceil() as usize
}

/// Run all four generators into a fresh scheduler.
///
/// The melody generator gets its own [`MelodyRng`], created here so that no
/// generator state outlives the call.
pub fn generate_all(params: &TrackParameters) -> Scheduler {
    let mut scheduler = Scheduler::new();
    drums::generate(params, &mut scheduler);
    bass::generate(params, &mut scheduler);
    chords::generate(params, &mut scheduler);
    let mut rng = MelodyRng::from_base_frequency(params.base_frequency_hz);
    melody::generate(params, &mut rng, &mut scheduler);
    log::debug!("scheduled {} events", scheduler.len());
    scheduler
}
