//! Console-visible parameters.
//!
//! One descriptor per `KeyerConfig` field, with its range and accessors.

use super::{
    KeyerConfig, FREQUENCY_MAX_HZ, FREQUENCY_MIN_HZ, POLL_INTERVAL_MAX_MS, POLL_INTERVAL_MIN_MS,
};
use crate::timing::{WPM_MAX, WPM_MIN};

/// Parameter descriptor.
pub struct ParamDescriptor {
    pub name: &'static str,
    pub brief: &'static str,
    pub min: u64,
    pub max: u64,
    pub get: fn(&KeyerConfig) -> u64,
    pub set: fn(&mut KeyerConfig, u64),
}

impl ParamDescriptor {
    /// True if `value` is inside the supported range.
    #[inline]
    pub fn in_range(&self, value: u64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl core::fmt::Debug for ParamDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParamDescriptor")
            .field("name", &self.name)
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}

/// All parameters.
pub static PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor {
        name: "wpm",
        brief: "Keying speed (words per minute)",
        min: WPM_MIN as u64,
        max: WPM_MAX as u64,
        get: get_wpm,
        set: set_wpm,
    },
    ParamDescriptor {
        name: "frequency",
        brief: "Sidetone frequency (Hz)",
        min: FREQUENCY_MIN_HZ as u64,
        max: FREQUENCY_MAX_HZ as u64,
        get: get_frequency,
        set: set_frequency,
    },
    ParamDescriptor {
        name: "poll_interval",
        brief: "Decoder poll period (ms)",
        min: POLL_INTERVAL_MIN_MS,
        max: POLL_INTERVAL_MAX_MS,
        get: get_poll_interval,
        set: set_poll_interval,
    },
];

fn get_wpm(c: &KeyerConfig) -> u64 {
    c.wpm as u64
}

fn set_wpm(c: &mut KeyerConfig, v: u64) {
    c.wpm = v as u32;
}

fn get_frequency(c: &KeyerConfig) -> u64 {
    c.frequency_hz as u64
}

fn set_frequency(c: &mut KeyerConfig, v: u64) {
    c.frequency_hz = v as u32;
}

fn get_poll_interval(c: &KeyerConfig) -> u64 {
    c.poll_interval_ms
}

fn set_poll_interval(c: &mut KeyerConfig, v: u64) {
    c.poll_interval_ms = v;
}

/// Find a parameter by exact name.
pub fn find_param(name: &str) -> Option<&'static ParamDescriptor> {
    PARAMS.iter().find(|p| p.name == name)
}

/// Parameters whose name starts with `pattern` minus a trailing `*`.
pub fn find_params_matching(pattern: &str) -> impl Iterator<Item = &'static ParamDescriptor> + '_ {
    let prefix = pattern.strip_suffix('*').unwrap_or(pattern);
    PARAMS.iter().filter(move |p| p.name.starts_with(prefix))
}

/// All parameter names.
pub fn param_names() -> impl Iterator<Item = &'static str> {
    PARAMS.iter().map(|p| p.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_param() {
        assert_eq!(find_param("wpm").map(|p| p.max), Some(50));
        assert!(find_param("speed").is_none());
    }

    #[test]
    fn test_wildcard() {
        let names: Vec<_> = find_params_matching("p*").map(|p| p.name).collect();
        assert_eq!(names, vec!["poll_interval"]);
        assert_eq!(find_params_matching("*").count(), PARAMS.len());
    }

    #[test]
    fn test_accessors_round_trip_config() {
        let mut config = KeyerConfig::default();
        let p = find_param("frequency").unwrap();
        (p.set)(&mut config, 750);
        assert_eq!(config.frequency_hz, 750);
        assert_eq!((p.get)(&config), 750);
    }
}
