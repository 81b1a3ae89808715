use std::fs;

use tempfile::tempdir;

use super::{DisplaySettings, SettingsError, load_settings, save_settings};

#[test]
fn defaults_match_display_conventions() {
    let settings = DisplaySettings::default();
    assert!(settings.use_color_luts);
    assert_eq!(settings.saturation, 0.01);
    assert_eq!(settings.histogram_bins, 1024);
    assert_eq!(settings.seed_timeout().as_secs(), 30);
    assert!(settings.validate().is_ok());
}

#[test]
fn yaml_settings_round_trip() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("display.yaml");
    let settings = DisplaySettings {
        use_color_luts: false,
        saturation: 0.005,
        clip_to_allowed: true,
        ..DisplaySettings::default()
    };
    save_settings(&path, &settings).expect("save");
    assert!(fs::read_to_string(&path).expect("read").contains("clip_to_allowed: true"));
    assert_eq!(load_settings(&path).expect("load"), settings);
}

#[test]
fn partial_json_fills_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("display.json");
    fs::write(&path, r#"{"histogram_bins": 256}"#).expect("write");
    let settings = load_settings(&path).expect("load");
    assert_eq!(settings.histogram_bins, 256);
    assert!(settings.persist_state);
}

#[test]
fn invalid_settings_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("display.yml");
    fs::write(&path, "histogram_bins: 1\n").expect("write");
    assert!(matches!(load_settings(&path), Err(SettingsError::Invalid(_))));

    let settings = DisplaySettings {
        saturation: f64::NAN,
        ..DisplaySettings::default()
    };
    assert!(save_settings(dir.path().join("bad.json"), &settings).is_err());
}
