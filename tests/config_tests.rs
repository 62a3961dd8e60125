// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use std::path::Path;
use tilecam::Config;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(config.divide.file_suffix, ".bmp");
    assert_eq!(config.capture.file_prefix, "IMG");
    assert_eq!(config.finder.target_label, "target");
    assert!(config.validate().is_ok(), "Defaults should be valid");
}

#[test]
fn test_config_finder_window() {
    // Default finder window is 32x32 with a hop of 10
    let spec = Config::default().finder.window_spec().unwrap();
    assert_eq!(spec.window_width(), 32);
    assert_eq!(spec.window_height(), 32);
    assert_eq!(spec.hop(), 10);
}

#[test]
fn test_config_missing_explicit_file() {
    let result = Config::load(Some(Path::new("/nonexistent/tilecam/config.json")));
    assert!(result.is_err(), "An explicit missing config should fail");
}

#[test]
fn test_config_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"capture": {"file_prefix": "SNAP", "file_suffix": ".png"}}"#)
        .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.capture.file_prefix, "SNAP");
    assert_eq!(config.capture.file_suffix, ".png");
    assert_eq!(config.finder, Config::default().finder);
}

#[test]
fn test_config_rejects_zero_hop() {
    let result = Config::from_json(r#"{"finder": {"hop": 0}}"#);
    assert!(result.is_err(), "A zero hop should be rejected");
}
