use pretty_assertions::assert_eq;

use tracksynth_core::catalog::{Catalog, TrackId};
use tracksynth_core::config::RenderConfig;
use tracksynth_core::error::EngineError;
use tracksynth_core::pattern::generate_all;
use tracksynth_core::schedule::{Bus, Timbre, calculate_frequency};
use tracksynth_core::{get_track_parameters, render_track, render_track_with_config};

fn low_rate(sample_rate: u32, max_duration_seconds: f64) -> RenderConfig {
    RenderConfig {
        sample_rate,
        max_duration_seconds,
        ..RenderConfig::default()
    }
}

#[test]
fn every_track_renders_capped_length() {
    let config = RenderConfig::with_sample_rate(2000);
    for id in TrackId::ALL {
        let track = render_track_with_config(id.as_str(), &config).unwrap();
        let params = get_track_parameters(id.as_str()).unwrap();
        let expected = (params.duration_seconds.min(60.0) * 2000.0).round() as usize;
        assert_eq!(track.frames(), expected, "{id}");
        assert_eq!(track.samples().len(), expected * 2, "{id}");
        assert!(track.samples().iter().all(|s| s.is_finite() && s.abs() <= 1.0), "{id}");
    }
}

#[test]
fn renders_are_bit_identical() {
    let config = low_rate(8000, 3.0);
    let a = render_track_with_config("workers", &config).unwrap();
    let b = render_track_with_config("workers", &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn noise_seed_changes_only_noise() {
    let a = render_track_with_config("bedrock", &low_rate(8000, 1.0)).unwrap();
    let mut other = low_rate(8000, 1.0);
    other.noise_seed = 1;
    let b = render_track_with_config("bedrock", &other).unwrap();
    assert_eq!(a.frames(), b.frames());
    assert!(a != b);
}

#[test]
fn melody_schedules_repeat_across_generations() {
    let params = get_track_parameters("lambda").unwrap();
    let first = generate_all(&params);
    let second = generate_all(&params);
    assert_eq!(first.events(Bus::Melody), second.events(Bus::Melody));
}

#[test]
fn bedrock_drum_counts() {
    let params = get_track_parameters("bedrock").unwrap();
    let events = generate_all(&params);
    assert_eq!(events.count(Timbre::Kick), 84);
    assert_eq!(events.count(Timbre::Snare), 84);
    assert_eq!(events.count(Timbre::HiHat), 168);
}

#[test]
fn octave_relationship() {
    for f in [55.0, 220.0, 261.63, 1000.0] {
        assert!((calculate_frequency(f, 12.0) / (2.0 * f) - 1.0).abs() < 1e-9);
        assert!((calculate_frequency(f, -12.0) / (f / 2.0) - 1.0).abs() < 1e-9);
    }
}

#[test]
fn unknown_track_is_rejected() {
    assert!(get_track_parameters("nonexistent").is_none());
    match render_track("nonexistent") {
        Err(EngineError::UnknownTrack { id }) => assert_eq!(id, "nonexistent"),
        other => panic!("expected UnknownTrack, got {other:?}"),
    }
}

#[test]
fn catalog_loads_all_tracks() {
    let catalog = Catalog::load().unwrap();
    assert_eq!(catalog.len(), 5);
    for id in TrackId::ALL {
        let entry = catalog.get(id).unwrap();
        assert_eq!(entry.info.id, id);
        assert_eq!(entry.info.image, format!("images/{id}.svg"));
    }
}

#[test]
fn invalid_config_is_rejected() {
    let err = render_track_with_config("bedrock", &low_rate(0, 1.0)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig { field: "sample_rate", .. }));

    let err = RenderConfig::from_json("{\"sample_rate\": \"fast\"}").unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
}

#[test]
fn tiny_sample_rate_is_an_error() {
    for rate in [1, 2, 500] {
        let err = render_track_with_config("bedrock", &low_rate(rate, 1.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { field: "sample_rate", .. }), "{rate}");
    }
}

#[test]
fn concurrent_renders_match_serial() {
    let config = low_rate(4000, 1.0);
    let serial = render_track_with_config("amplify", &config).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = config.clone();
            std::thread::spawn(move || render_track_with_config("amplify", &config).unwrap())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap() == serial);
    }
}

#[test]
fn shared_engine_renders_identically_across_threads() {
    use std::sync::Arc;
    use tracksynth_core::dsp::engine::AudioEngine;

    let engine = Arc::new(AudioEngine::new(low_rate(4000, 1.0)).unwrap());
    let params = Arc::new(get_track_parameters("lambda").unwrap());
    let serial = engine.render(&params).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let params = Arc::clone(&params);
            std::thread::spawn(move || engine.render(&params).unwrap())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap() == serial);
    }
}
