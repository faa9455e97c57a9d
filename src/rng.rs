//! Deterministic random sources.
//!
//! Two generators are used during a render and both are created per render,
//! never shared:
//!
//! - [`MelodyRng`]: the small linear-congruential generator that drives the
//!   melody. Its sequence is part of the track's identity, so the constants
//!   are fixed.
//! - PCG32 (via [`create_rng`]): noise for snares, hi-hats and the reverb
//!   impulse response.

use rand::SeedableRng;
use rand_pcg::Pcg32;

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233280;

/// Linear-congruential generator producing values in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct MelodyRng {
    value: u64,
}

impl MelodyRng {
    pub fn new(seed: u64) -> Self {
        MelodyRng {
            value: seed % LCG_MODULUS,
        }
    }

    /// Seed derived from a base frequency: `floor(base * 1000) mod 10000`.
    pub fn from_base_frequency(base_frequency_hz: f64) -> Self {
        Self::new(melody_seed(base_frequency_hz))
    }

    /// Advance and return the next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.value = (self.value * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.value as f64 / LCG_MODULUS as f64
    }
}

/// Melody seed for a base frequency.
pub fn melody_seed(base_frequency_hz: f64) -> u64 {
    ((base_frequency_hz * 1000.0).floor() as i64).rem_euclid(10_000) as u64
}

/// Creates a PCG32 generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Derives an independent seed for a named noise consumer.
///
/// FNV-1a over the key, folded into the base seed, so "reverb" and "drums"
/// never share a stream.
pub fn derive_seed(base_seed: u64, key: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in key.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    base_seed ^ hash
}
