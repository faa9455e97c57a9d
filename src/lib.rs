pub mod catalog;
pub mod config;
pub mod dsp;
pub mod error;
pub mod pattern;
pub mod rng;
pub mod schedule;
pub mod transport;

use crate::catalog::{Catalog, TrackEntry, TrackId, TrackInfo, TrackParameters};
use crate::config::RenderConfig;
use crate::dsp::engine::AudioEngine;
use crate::dsp::renderer::RenderedTrack;
use crate::error::{EngineError, EngineResult};
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the tracksynth-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Resolve an identifier against the shared catalog.
fn catalog_entry(id: TrackId) -> EngineResult<&'static TrackEntry> {
    Catalog::global()?.get(id).ok_or_else(|| EngineError::UnknownTrack {
        id: id.to_string(),
    })
}

/// Musical parameters for a track identifier, or `None` if it is unknown.
pub fn get_track_parameters(track_id: &str) -> Option<TrackParameters> {
    Catalog::global().ok()?.lookup(track_id).map(|entry| entry.parameters.clone())
}

/// Display metadata for a track identifier, or `None` if it is unknown.
pub fn get_track_info(track_id: &str) -> Option<TrackInfo> {
    Catalog::global().ok()?.lookup(track_id).map(|entry| entry.info.clone())
}

/// Render a catalog track with the default configuration.
pub fn render_track(track_id: &str) -> EngineResult<RenderedTrack> {
    render_track_with_config(track_id, &RenderConfig::default())
}

/// Render a catalog track with an explicit configuration.
///
/// The identifier is resolved before anything is allocated.
pub fn render_track_with_config(track_id: &str, config: &RenderConfig) -> EngineResult<RenderedTrack> {
    let id: TrackId = track_id.parse()?;
    let entry = catalog_entry(id)?;
    let engine = AudioEngine::new(config.clone())?;
    log::info!("rendering track '{id}'");
    engine.render(&entry.parameters)
}

/// Render on tokio's blocking pool, resolving once the buffer is complete.
#[cfg(feature = "async")]
pub async fn render_track_async(track_id: &str, config: RenderConfig) -> EngineResult<RenderedTrack> {
    let id: TrackId = track_id.parse()?;
    tokio::task::spawn_blocking(move || render_track_with_config(id.as_str(), &config)).await?
}

/// WASM-exposed: identifiers of every catalog track.
#[wasm_bindgen]
pub fn track_ids() -> Result<Vec<String>, JsValue> {
    let catalog = Catalog::global().map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(catalog.entries().iter().map(|entry| entry.info.id.to_string()).collect())
}

/// WASM-exposed: track metadata as a JS object.
#[wasm_bindgen]
pub fn track_info(track_id: &str) -> Result<JsValue, JsValue> {
    let entry = track_id
        .parse::<TrackId>()
        .and_then(catalog_entry)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&entry.info).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: render a track to interleaved stereo f32 samples.
/// Returns the raw audio buffer for AudioWorklet playback.
#[wasm_bindgen]
pub fn render_track_samples(track_id: &str, sample_rate: u32) -> Result<Vec<f32>, JsValue> {
    let config = RenderConfig::with_sample_rate(sample_rate);
    render_track_with_config(track_id, &config)
        .map(RenderedTrack::into_samples)
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}
