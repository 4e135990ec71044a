//! Gap-based Morse decoder.
//!
//! Symbols enter the buffer when an element has finished sounding. A
//! periodic poll measures the silence since the last symbol and closes the
//! current character, records a word break, or marks the operator idle.
//!
//! ```text
//!   gap >= 20u   finalize, append "<|>" once, go dormant
//!   gap >= 12u   finalize, append " " once
//!   gap >=  4u   finalize
//! ```
//!
//! Thresholds are checked from the largest down, and only one band acts per
//! poll.

use crate::element::Element;
use crate::morse;
use crate::timing::Timing;

/// Appended when the operator has been silent for the idle gap.
pub const IDLE_MARKER: &str = "<|>";

/// Appended on a word gap.
pub const WORD_SEPARATOR: char = ' ';

/// Which threshold band a poll fell into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// Character gap: the buffered character was closed.
    Character,
    /// Word gap.
    Word,
    /// Idle gap. The decoder is dormant until the next symbol.
    Idle,
}

/// Decoder state.
#[derive(Debug, Clone)]
pub struct Decoder {
    morse_buffer: String,
    decoded_text: String,
    /// `None` once idle has fired (the "infinitely far" timestamp).
    last_symbol_us: Option<i64>,
}

impl Decoder {
    /// Create a decoder whose silence is measured from `now_us`.
    pub fn new(now_us: i64) -> Self {
        Self {
            morse_buffer: String::new(),
            decoded_text: String::new(),
            last_symbol_us: Some(now_us),
        }
    }

    /// Symbols of the character being keyed.
    pub fn morse_buffer(&self) -> &str {
        &self.morse_buffer
    }

    /// Everything decoded so far.
    pub fn decoded_text(&self) -> &str {
        &self.decoded_text
    }

    /// Time of the last input, or `None` while dormant.
    pub fn last_symbol_us(&self) -> Option<i64> {
        self.last_symbol_us
    }

    pub fn is_dormant(&self) -> bool {
        self.last_symbol_us.is_none()
    }

    /// Restart silence measurement at `now_us`.
    #[inline]
    pub fn touch(&mut self, now_us: i64) {
        self.last_symbol_us = Some(now_us);
    }

    /// Append a finished element and restart silence measurement.
    pub fn push_symbol(&mut self, element: Element, now_us: i64) {
        self.morse_buffer.push(element.symbol());
        self.touch(now_us);
    }

    /// Check the current silence against the thresholds of `timing`.
    pub fn poll(&mut self, now_us: i64, timing: Timing) -> Option<Boundary> {
        let gap = now_us - self.last_symbol_us?;

        if gap >= timing.idle_gap_us() {
            self.finalize_character();
            if !self.decoded_text.ends_with(IDLE_MARKER) {
                self.decoded_text.push_str(IDLE_MARKER);
                tracing::info!(text = %self.decoded_text, "operator idle");
            }
            self.last_symbol_us = None;
            Some(Boundary::Idle)
        } else if gap >= timing.word_gap_us() {
            self.finalize_character();
            if !self.decoded_text.ends_with(WORD_SEPARATOR) {
                self.decoded_text.push(WORD_SEPARATOR);
            }
            Some(Boundary::Word)
        } else if gap >= timing.char_gap_us() {
            self.finalize_character();
            Some(Boundary::Character)
        } else {
            None
        }
    }

    /// Decode and clear the buffer. Returns the appended character.
    pub fn finalize_character(&mut self) -> Option<char> {
        if self.morse_buffer.is_empty() {
            return None;
        }
        let ch = morse::decode(&self.morse_buffer);
        tracing::debug!(symbols = %self.morse_buffer, decoded = %ch, "character");
        self.decoded_text.push(ch);
        self.morse_buffer.clear();
        Some(ch)
    }

    /// Discard the buffer and the decoded text.
    pub fn clear(&mut self) {
        self.morse_buffer.clear();
        self.decoded_text.clear();
    }
}
