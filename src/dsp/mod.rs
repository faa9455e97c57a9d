//! DSP Engine — pure Rust synthesis, effects and mixdown.
//!
//! Everything here runs offline: a render computes the whole buffer before
//! returning, and the same code serves native callers and the WASM exports.

pub mod delay;
pub mod engine;
pub mod envelope;
pub mod filter;
pub mod mixer;
pub mod noise;
pub mod oscillator;
pub mod percussion;
pub mod renderer;
pub mod reverb;
pub mod voice;
