//! Configuration file loading

use std::io::Write;

use cw_paddle_keyer::config::{find_param, KeyerConfig};
use cw_paddle_keyer::ConfigError;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "wpm = 25").unwrap();
    writeln!(file, "frequency_hz = 700").unwrap();

    let config = KeyerConfig::load(file.path()).unwrap();
    assert_eq!(config.wpm, 25);
    assert_eq!(config.frequency_hz, 700);
    assert_eq!(config.poll_interval_ms, 100);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = KeyerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_bad_toml_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "wpm = \"fast\"").unwrap();

    let err = KeyerConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_param_ranges_match_clamping() {
    let wpm = find_param("wpm").unwrap();
    let clamped = KeyerConfig {
        wpm: 1,
        ..Default::default()
    }
    .clamped();
    assert_eq!(clamped.wpm as u64, wpm.min);
    assert!(wpm.in_range(20));
    assert!(!wpm.in_range(51));
}
