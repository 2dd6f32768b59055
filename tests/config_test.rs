//! Integration tests for loading and saving the settings file.

use std::fs;

use seqshot_lib::config::{self, Config};
use seqshot_lib::Region;

fn sample() -> Config {
    Config {
        output_path: "/home/someone/Pictures/shots".into(),
        prefix: "IMG_".into(),
        suffix: "-final".into(),
        region: Region::new(-1920, 120, 800, 600),
    }
}

// ── Round trip ──────────────────────────────────────────────────────

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    config::save(&sample(), &path).expect("save failed");
    assert_eq!(config::load(&path), sample());
}

#[test]
fn round_trips_unicode_and_empty_strings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let original = Config {
        output_path: dir.path().join("Bildschirmfotos é"),
        prefix: String::new(),
        suffix: " ✓".into(),
        region: Region::new(0, 0, 1, 1),
    };

    config::save(&original, &path).unwrap();
    assert_eq!(config::load(&path), original);
}

#[test]
fn save_overwrites_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "x".repeat(10_000)).unwrap();

    config::save(&sample(), &path).unwrap();
    assert_eq!(config::load(&path), sample());
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("config.json");

    config::save(&sample(), &path).unwrap();
    assert!(path.is_file());
}

#[test]
fn save_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should go cannot be overwritten
    let path = dir.path().join("config.json");
    fs::create_dir(&path).unwrap();

    assert!(config::save(&sample(), &path).is_err());
}

// ── Fallbacks ───────────────────────────────────────────────────────

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = config::load(&dir.path().join("absent.json"));
    assert_eq!(loaded, Config::default());
    assert_eq!(loaded.region, Region::new(0, 0, 2560, 1440));
}

#[test]
fn corrupt_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    for garbage in ["", "{not json", "[1, 2, 3]", "\"just a string\"", "null"] {
        fs::write(&path, garbage).unwrap();
        assert_eq!(config::load(&path), Config::default(), "input: {:?}", garbage);
    }
}

#[test]
fn hand_edited_partial_file_keeps_valid_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "prefix": "Shot-", "region": { "left": 5, "width": 640, "height": "tall" } }"#,
    )
    .unwrap();

    let loaded = config::load(&path);
    let defaults = Config::default();
    assert_eq!(loaded.output_path, defaults.output_path);
    assert_eq!(loaded.prefix, "Shot-");
    assert_eq!(loaded.suffix, "");
    assert_eq!(loaded.region, Region::new(5, 0, 640, 1440));
}

#[test]
fn saved_file_is_readable_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    config::save(&sample(), &path).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["prefix"], "IMG_");
    assert_eq!(value["region"]["left"], -1920);
    assert_eq!(value["region"]["height"], 600);
}
