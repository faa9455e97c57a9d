//! Track catalog — the static table of track identifiers, metadata and
//! musical parameters.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

// ── Track identifiers ───────────────────────────────────────

/// Every track the engine knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackId {
    Bedrock,
    Amplify,
    Lambda,
    Workers,
    Humanity,
}

impl TrackId {
    /// All identifiers in catalog order.
    pub const ALL: [TrackId; 5] = [
        TrackId::Bedrock,
        TrackId::Amplify,
        TrackId::Lambda,
        TrackId::Workers,
        TrackId::Humanity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrackId::Bedrock => "bedrock",
            TrackId::Amplify => "amplify",
            TrackId::Lambda => "lambda",
            TrackId::Workers => "workers",
            TrackId::Humanity => "humanity",
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| EngineError::UnknownTrack { id: s.to_string() })
    }
}

// ── Parameter records ───────────────────────────────────────

/// A chord: semitone offsets from the base frequency, root first.
pub type Chord = Vec<i32>;

/// Per-track effect send levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectMix {
    /// Reverb send level [0, 1].
    pub reverb_mix: f64,
    /// Delay send level [0, 1].
    pub delay_mix: f64,
}

/// The musical description of one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackParameters {
    pub tempo_bpm: f64,
    pub base_frequency_hz: f64,
    /// Allowed pitch space. Not read by the generators.
    pub scale_degrees: Vec<i32>,
    /// Cycled once per bar.
    pub chord_progression: Vec<Chord>,
    /// Semitone offsets above the current chord root, one per step.
    pub bass_pattern: Vec<i32>,
    /// Chord gate per step (0 or 1).
    pub rhythm_pattern: Vec<u8>,
    /// Candidate melody offsets above the current chord root.
    pub melody_notes: Vec<i32>,
    pub effects: EffectMix,
    pub duration_seconds: f64,
}

impl TrackParameters {
    /// Seconds per beat at this tempo.
    pub fn beat_duration(&self) -> f64 {
        60.0 / self.tempo_bpm
    }

    /// Chord for a bar, rotating through the progression.
    pub fn chord_for_bar(&self, bar: usize) -> &[i32] {
        &self.chord_progression[bar % self.chord_progression.len()]
    }

    /// Check the contract every generator relies on.
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.tempo_bpm.is_finite() && self.tempo_bpm > 0.0) {
            return Err(EngineError::invalid_param(
                "tempo_bpm",
                format!("must be positive, got {}", self.tempo_bpm),
            ));
        }
        if !(self.base_frequency_hz.is_finite() && self.base_frequency_hz > 0.0) {
            return Err(EngineError::invalid_param(
                "base_frequency_hz",
                format!("must be positive, got {}", self.base_frequency_hz),
            ));
        }
        if !(self.duration_seconds.is_finite() && self.duration_seconds > 0.0) {
            return Err(EngineError::invalid_param(
                "duration_seconds",
                format!("must be positive, got {}", self.duration_seconds),
            ));
        }
        if self.scale_degrees.is_empty() {
            return Err(EngineError::invalid_param("scale_degrees", "must not be empty"));
        }
        if self.chord_progression.is_empty() {
            return Err(EngineError::invalid_param("chord_progression", "must not be empty"));
        }
        if let Some(bar) = self.chord_progression.iter().position(|c| c.is_empty()) {
            return Err(EngineError::invalid_param(
                "chord_progression",
                format!("chord {bar} is empty"),
            ));
        }
        if self.bass_pattern.is_empty() {
            return Err(EngineError::invalid_param("bass_pattern", "must not be empty"));
        }
        if self.rhythm_pattern.is_empty() {
            return Err(EngineError::invalid_param("rhythm_pattern", "must not be empty"));
        }
        if let Some(&gate) = self.rhythm_pattern.iter().find(|&&g| g > 1) {
            return Err(EngineError::invalid_param(
                "rhythm_pattern",
                format!("gates must be 0 or 1, got {gate}"),
            ));
        }
        if self.melody_notes.is_empty() {
            return Err(EngineError::invalid_param("melody_notes", "must not be empty"));
        }
        for (field, mix) in [
            ("effects.reverb_mix", self.effects.reverb_mix),
            ("effects.delay_mix", self.effects.delay_mix),
        ] {
            if !(0.0..=1.0).contains(&mix) {
                return Err(EngineError::invalid_param(
                    field,
                    format!("must be within [0, 1], got {mix}"),
                ));
            }
        }
        Ok(())
    }
}

/// Display metadata for a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub id: TrackId,
    pub title: String,
    pub theme: String,
    /// Cover-art reference.
    pub image: String,
}

/// A catalog entry: metadata plus parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEntry {
    pub info: TrackInfo,
    pub parameters: TrackParameters,
}

// ── Static table ────────────────────────────────────────────

/// Metadata for a track.
pub(crate) fn track_info(id: TrackId) -> TrackInfo {
    let (title, theme) = match id {
        TrackId::Bedrock => ("Bedrock Harmony", "Amazon Bedrock"),
        TrackId::Amplify => ("Amplify Wave", "AWS Amplify"),
        TrackId::Lambda => ("Lambda Function", "AWS Lambda"),
        TrackId::Workers => ("社畜ファイターズ", "全世界の社畜たちを応援"),
        TrackId::Humanity => ("人間という存在", "人間という生き物について"),
    };
    TrackInfo {
        id,
        title: title.to_string(),
        theme: theme.to_string(),
        image: format!("images/{}.svg", id.as_str()),
    }
}

/// Musical parameters for a track.
pub(crate) fn track_parameters(id: TrackId) -> TrackParameters {
    match id {
        TrackId::Bedrock => TrackParameters {
            tempo_bpm: 110.0,
            base_frequency_hz: 220.0,
            // major pentatonic
            scale_degrees: vec![0, 2, 4, 7, 9],
            chord_progression: vec![
                vec![0, 4, 7],
                vec![5, 9, 12],
                vec![7, 11, 14],
                vec![0, 4, 7],
            ],
            bass_pattern: vec![0, 0, 7, 7, 5, 5, 3, 3],
            rhythm_pattern: vec![1, 0, 1, 0, 1, 1, 0, 1],
            melody_notes: vec![0, 2, 4, 7, 9, 12, 14, 16],
            effects: EffectMix {
                reverb_mix: 0.3,
                delay_mix: 0.2,
            },
            duration_seconds: 180.0,
        },
        TrackId::Amplify => TrackParameters {
            tempo_bpm: 125.0,
            base_frequency_hz: 261.63,
            // minor pentatonic
            scale_degrees: vec![0, 2, 3, 7, 10],
            chord_progression: vec![
                vec![0, 3, 7],
                vec![5, 8, 12],
                vec![7, 10, 14],
                vec![3, 7, 10],
            ],
            bass_pattern: vec![0, 0, 5, 5, 7, 7, 3, 3],
            rhythm_pattern: vec![1, 1, 0, 1, 0, 1, 1, 0],
            melody_notes: vec![0, 3, 7, 10, 12, 15, 19, 22],
            effects: EffectMix {
                reverb_mix: 0.4,
                delay_mix: 0.3,
            },
            duration_seconds: 180.0,
        },
        TrackId::Lambda => TrackParameters {
            tempo_bpm: 140.0,
            base_frequency_hz: 329.63,
            // major
            scale_degrees: vec![0, 2, 4, 5, 7, 9, 11],
            chord_progression: vec![
                vec![0, 4, 7],
                vec![2, 6, 9],
                vec![4, 7, 11],
                vec![5, 9, 12],
            ],
            bass_pattern: vec![0, 7, 5, 7, 0, 7, 5, 9],
            rhythm_pattern: vec![1, 0, 1, 1, 0, 1, 0, 1],
            melody_notes: vec![0, 4, 7, 12, 16, 19, 24, 28],
            effects: EffectMix {
                reverb_mix: 0.2,
                delay_mix: 0.4,
            },
            duration_seconds: 180.0,
        },
        TrackId::Workers => TrackParameters {
            tempo_bpm: 118.0,
            base_frequency_hz: 196.0,
            scale_degrees: vec![0, 2, 4, 7, 9, 11],
            chord_progression: vec![
                vec![0, 4, 7],
                vec![5, 9, 12],
                vec![7, 11, 14],
                vec![2, 5, 9],
            ],
            bass_pattern: vec![0, 0, 5, 5, 7, 7, 2, 2],
            rhythm_pattern: vec![1, 1, 1, 0, 1, 0, 1, 0],
            melody_notes: vec![0, 2, 4, 7, 9, 12, 14, 16],
            effects: EffectMix {
                reverb_mix: 0.3,
                delay_mix: 0.1,
            },
            duration_seconds: 180.0,
        },
        TrackId::Humanity => TrackParameters {
            tempo_bpm: 90.0,
            base_frequency_hz: 246.94,
            // natural minor
            scale_degrees: vec![0, 2, 3, 5, 7, 8, 10],
            chord_progression: vec![
                vec![0, 3, 7],
                vec![5, 8, 12],
                vec![7, 10, 14],
                vec![2, 5, 9],
            ],
            bass_pattern: vec![0, 7, 3, 7, 5, 7, 3, 0],
            rhythm_pattern: vec![0, 1, 0, 1, 0, 1, 1, 1],
            melody_notes: vec![0, 3, 7, 10, 12, 15, 19, 22],
            effects: EffectMix {
                reverb_mix: 0.5,
                delay_mix: 0.3,
            },
            duration_seconds: 180.0,
        },
    }
}

/// Process-wide catalog, loaded on first use.
static CATALOG: LazyLock<EngineResult<Catalog>> = LazyLock::new(Catalog::load);

/// The in-memory catalog, built and validated once.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<TrackEntry>,
}

impl Catalog {
    /// Build the table and validate every entry.
    pub fn load() -> EngineResult<Self> {
        let mut entries = Vec::with_capacity(TrackId::ALL.len());
        for id in TrackId::ALL {
            let parameters = track_parameters(id);
            parameters.validate().map_err(|e| {
                log::error!("catalog entry '{id}' failed validation: {e}");
                e
            })?;
            entries.push(TrackEntry {
                info: track_info(id),
                parameters,
            });
        }
        log::debug!("catalog loaded with {} tracks", entries.len());
        Ok(Catalog { entries })
    }

    /// The shared catalog, loading and validating it on the first call.
    ///
    /// A failed load is reported on every call.
    pub fn global() -> EngineResult<&'static Catalog> {
        match &*CATALOG {
            Ok(catalog) => Ok(catalog),
            Err(EngineError::InvalidParameters { field, reason }) => {
                Err(EngineError::invalid_param(field, reason.clone()))
            }
            Err(other) => Err(EngineError::invalid_param("catalog", other.to_string())),
        }
    }

    pub fn get(&self, id: TrackId) -> Option<&TrackEntry> {
        self.entries.iter().find(|e| e.info.id == id)
    }

    /// Look up by string identifier.
    pub fn lookup(&self, id: &str) -> Option<&TrackEntry> {
        let id = id.parse::<TrackId>().ok()?;
        self.get(id)
    }

    pub fn entries(&self) -> &[TrackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_ids() {
        for id in TrackId::ALL {
            assert_eq!(id.as_str().parse::<TrackId>().unwrap(), id);
        }
    }

    #[test]
    fn parse_unknown_id() {
        let err = "nonexistent".parse::<TrackId>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownTrack { ref id } if id == "nonexistent"));
    }

    #[test]
    fn catalog_loads_all_tracks() {
        let catalog = Catalog::load().expect("catalog should validate");
        assert_eq!(catalog.len(), 5);
        for entry in catalog.entries() {
            assert!(entry.parameters.validate().is_ok());
        }
    }

    #[test]
    fn global_catalog_is_loaded_once() {
        let first = Catalog::global().unwrap();
        let second = Catalog::global().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.entries(), Catalog::load().unwrap().entries());
    }

    #[test]
    fn lookup_by_string() {
        let catalog = Catalog::load().unwrap();
        let entry = catalog.lookup("lambda").unwrap();
        assert_eq!(entry.parameters.tempo_bpm, 140.0);
        assert_eq!(entry.info.title, "Lambda Function");
        assert_eq!(entry.info.image, "images/lambda.svg");
        assert!(catalog.lookup("nonexistent").is_none());
    }

    #[test]
    fn chord_rotation_wraps() {
        let params = track_parameters(TrackId::Bedrock);
        assert_eq!(params.chord_for_bar(4), params.chord_progression[0].as_slice());
        assert_eq!(params.chord_for_bar(6), params.chord_progression[2].as_slice());
    }

    #[test]
    fn validate_rejects_empty_patterns() {
        let mut params = track_parameters(TrackId::Amplify);
        params.bass_pattern.clear();
        assert!(matches!(
            params.validate(),
            Err(EngineError::InvalidParameters { field: "bass_pattern", .. })
        ));

        let mut params = track_parameters(TrackId::Amplify);
        params.chord_progression[1].clear();
        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_numbers() {
        let mut params = track_parameters(TrackId::Workers);
        params.duration_seconds = 0.0;
        assert!(params.validate().is_err());

        let mut params = track_parameters(TrackId::Workers);
        params.tempo_bpm = -1.0;
        assert!(params.validate().is_err());

        let mut params = track_parameters(TrackId::Workers);
        params.effects.reverb_mix = 1.5;
        assert!(params.validate().is_err());

        let mut params = track_parameters(TrackId::Workers);
        params.rhythm_pattern[0] = 2;
        assert!(params.validate().is_err());
    }

    #[test]
    fn track_info_serializes_lowercase_id() {
        let info = track_info(TrackId::Humanity);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["id"], "humanity");
    }
}
