//! PARIS timing model.
//!
//! Every duration and gap threshold is a multiple of one unit,
//! `unit = 1.2 / wpm` seconds. Values are derived on demand from the
//! current speed; nothing is cached, so a speed change only affects
//! decisions made after it.

use crate::element::Element;

/// Slowest supported speed.
pub const WPM_MIN: u32 = 5;

/// Fastest supported speed.
pub const WPM_MAX: u32 = 50;

/// Microseconds in one PARIS unit at 1 WPM.
const UNIT_AT_1_WPM_US: i64 = 1_200_000;

/// Timing derived from a words-per-minute setting.
///
/// The caller keeps `wpm` inside [`WPM_MIN`]..=[`WPM_MAX`]; the model does
/// not re-validate it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    wpm: u32,
}

impl Timing {
    /// Create timing for the given speed.
    #[inline]
    pub const fn new(wpm: u32) -> Self {
        Self { wpm }
    }

    /// Speed this timing was derived from.
    #[inline]
    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    /// Unit duration in seconds (`1.2 / wpm`).
    #[inline]
    pub fn unit_secs(&self) -> f64 {
        1.2 / self.wpm as f64
    }

    /// Unit duration in microseconds.
    #[inline]
    pub fn unit_us(&self) -> i64 {
        UNIT_AT_1_WPM_US / self.wpm as i64
    }

    /// Dit duration in microseconds (1 unit).
    #[inline]
    pub fn dit_us(&self) -> i64 {
        self.unit_us()
    }

    /// Dah duration in microseconds (3 units).
    #[inline]
    pub fn dah_us(&self) -> i64 {
        self.unit_us() * 3
    }

    /// Silence after which the current character is finalized (4 units).
    #[inline]
    pub fn char_gap_us(&self) -> i64 {
        self.unit_us() * 4
    }

    /// Silence after which a word break is recorded (12 units).
    #[inline]
    pub fn word_gap_us(&self) -> i64 {
        self.unit_us() * 12
    }

    /// Silence after which the operator is considered idle (20 units).
    #[inline]
    pub fn idle_gap_us(&self) -> i64 {
        self.unit_us() * 20
    }

    /// Keyed duration of `element` in microseconds.
    #[inline]
    pub fn element_us(&self, element: Element) -> i64 {
        match element {
            Element::Dit => self.dit_us(),
            Element::Dah => self.dah_us(),
        }
    }

    /// Keyed duration of `element` in seconds, as handed to output sinks.
    #[inline]
    pub fn element_secs(&self, element: Element) -> f64 {
        match element {
            Element::Dit => self.unit_secs(),
            Element::Dah => self.unit_secs() * 3.0,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(20)
    }
}
