//! Module: config
//!
//! Purpose: Keyer configuration.
//!
//! Architecture:
//! - `KeyerConfig`: speed, sidetone frequency, decoder poll period
//! - Optional TOML file, every field defaulted
//! - `params`: descriptor table used by the console `set`/`show` commands
//!
//! Ranges are enforced here, by the collaborator that accepts user input.
//! The keyer core trusts the values it is given.

pub mod params;

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::timing::{Timing, WPM_MAX, WPM_MIN};

pub use params::{find_param, find_params_matching, param_names, ParamDescriptor, PARAMS};

pub const FREQUENCY_MIN_HZ: u32 = 200;
pub const FREQUENCY_MAX_HZ: u32 = 1000;

pub const POLL_INTERVAL_MIN_MS: u64 = 10;
pub const POLL_INTERVAL_MAX_MS: u64 = 1000;

/// Keyer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyerConfig {
    /// Speed in words per minute (PARIS timing).
    pub wpm: u32,
    /// Sidetone frequency handed to audio sinks.
    pub frequency_hz: u32,
    /// Decoder gap poll period.
    pub poll_interval_ms: u64,
}

impl Default for KeyerConfig {
    fn default() -> Self {
        Self {
            wpm: 20,
            frequency_hz: 500,
            poll_interval_ms: 100,
        }
    }
}

impl KeyerConfig {
    /// Load from a TOML file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Copy with every field pulled into its supported range.
    pub fn clamped(self) -> Self {
        Self {
            wpm: self.wpm.clamp(WPM_MIN, WPM_MAX),
            frequency_hz: self.frequency_hz.clamp(FREQUENCY_MIN_HZ, FREQUENCY_MAX_HZ),
            poll_interval_ms: self
                .poll_interval_ms
                .clamp(POLL_INTERVAL_MIN_MS, POLL_INTERVAL_MAX_MS),
        }
    }

    /// Timing for the configured speed.
    #[inline]
    pub fn timing(&self) -> Timing {
        Timing::new(self.wpm)
    }

    /// Decoder poll period in microseconds.
    #[inline]
    pub fn poll_interval_us(&self) -> i64 {
        self.poll_interval_ms as i64 * 1_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = KeyerConfig::default();
        assert_eq!(c.wpm, 20);
        assert_eq!(c.frequency_hz, 500);
        assert_eq!(c.poll_interval_us(), 100_000);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let c = KeyerConfig::from_toml("wpm = 30\n").unwrap();
        assert_eq!(c.wpm, 30);
        assert_eq!(c.frequency_hz, 500);
    }

    #[test]
    fn test_clamped() {
        let c = KeyerConfig {
            wpm: 99,
            frequency_hz: 50,
            poll_interval_ms: 0,
        }
        .clamped();
        assert_eq!(c.wpm, 50);
        assert_eq!(c.frequency_hz, 200);
        assert_eq!(c.poll_interval_ms, 10);
    }
}
