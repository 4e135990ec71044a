//! Gap decoder: character, word and idle boundaries

use cw_paddle_keyer::timing::Timing;
use cw_paddle_keyer::{
    Boundary, Decoder, Element, KeyerConfig, RecordingSink, Session, IDLE_MARKER, UNKNOWN_GLYPH,
};

const T: Timing = Timing::new(20);

fn session() -> Session<RecordingSink> {
    Session::new(KeyerConfig::default(), RecordingSink::new(), 0)
}

fn tap(s: &mut Session<RecordingSink>, element: Element, at_us: i64) {
    s.press(element, at_us);
    s.release(element, at_us);
}

/// Key "..-." starting at zero; the last symbol completes at 540ms.
fn key_f(s: &mut Session<RecordingSink>) {
    tap(s, Element::Dit, 0);
    tap(s, Element::Dit, 120_000);
    tap(s, Element::Dah, 240_000);
    tap(s, Element::Dit, 480_000);
}

#[test]
fn test_character_gap_finalizes_without_separator() {
    let mut s = session();
    key_f(&mut s);
    assert_eq!(s.sink().symbols(), "..-.");

    s.run_until(700_000);
    assert_eq!(s.decoded_text(), "");
    assert_eq!(s.morse_buffer(), "..-.");

    s.run_until(1_000_000);
    assert_eq!(s.decoded_text(), "F");
    assert_eq!(s.morse_buffer(), "");
}

#[test]
fn test_word_gap_appends_one_space() {
    let mut s = session();
    key_f(&mut s);

    s.run_until(1_250_000);
    assert_eq!(s.decoded_text(), "F");

    // Polled several times inside the word band
    s.run_until(1_700_000);
    assert_eq!(s.decoded_text(), "F ");
}

#[test]
fn test_idle_gap_fires_once_until_new_input() {
    let mut s = session();
    key_f(&mut s);

    s.run_until(1_800_000);
    assert_eq!(s.decoded_text(), "F <|>");
    assert!(s.decoder().is_dormant());

    s.run_until(10_000_000);
    assert_eq!(s.decoded_text(), "F <|>");

    // New input wakes the decoder
    tap(&mut s, Element::Dah, 10_000_000);
    assert!(!s.decoder().is_dormant());
    s.run_until(10_500_000);
    assert_eq!(s.decoded_text(), "F <|>T");
}

#[test]
fn test_unused_session_goes_dormant() {
    let mut s = session();
    s.run_until(5_000_000);
    assert_eq!(s.decoded_text().matches(IDLE_MARKER).count(), 1);
    assert!(s.decoder().is_dormant());
}

#[test]
fn test_unknown_pattern_decodes_to_glyph() {
    let mut d = Decoder::new(0);
    for _ in 0..6 {
        d.push_symbol(Element::Dit, 60_000);
    }
    assert_eq!(d.poll(60_000 + T.char_gap_us(), T), Some(Boundary::Character));
    assert_eq!(d.decoded_text(), UNKNOWN_GLYPH.to_string());
}

#[test]
fn test_largest_band_wins() {
    let mut d = Decoder::new(0);
    d.push_symbol(Element::Dah, 0);

    // First poll lands straight in the idle band
    assert_eq!(d.poll(T.idle_gap_us(), T), Some(Boundary::Idle));
    assert_eq!(d.decoded_text(), "T<|>");
    assert_eq!(d.poll(T.idle_gap_us() * 2, T), None);
}

#[test]
fn test_clear_discards_text_and_buffer() {
    let mut s = session();
    key_f(&mut s);
    s.run_until(1_000_000);
    tap(&mut s, Element::Dit, 1_000_000);
    s.run_until(1_100_000);
    assert_eq!(s.morse_buffer(), ".");

    s.clear();
    assert_eq!(s.decoded_text(), "");
    assert_eq!(s.morse_buffer(), "");
}
