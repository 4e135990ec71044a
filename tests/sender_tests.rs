//! Text sending through a session

use cw_paddle_keyer::{Element, KeyerConfig, KeyerError, RecordingSink, Session};

fn session() -> Session<RecordingSink> {
    Session::new(KeyerConfig::default(), RecordingSink::new(), 0)
}

#[test]
fn test_send_plays_text_with_standard_spacing() {
    let mut s = session();
    s.send_text("EE", 0).unwrap();
    assert_eq!(s.sink().symbols(), ".");

    // dit (1 unit) + character gap (3 units)
    s.advance_to(239_999);
    assert_eq!(s.sink().symbols(), ".");
    s.advance_to(240_000);
    assert_eq!(s.sink().symbols(), "..");

    s.run_until(1_000_000);
    assert!(!s.is_sending());
}

#[test]
fn test_word_gap_is_seven_units() {
    let mut s = session();
    s.send_text("e t", 0).unwrap();

    s.advance_to(479_999);
    assert_eq!(s.sink().symbols(), ".");
    s.advance_to(480_000);
    assert_eq!(s.sink().symbols(), ".-");
    assert!((s.sink().emissions()[1].duration_secs - 0.18).abs() < 1e-9);
}

#[test]
fn test_sos() {
    let mut s = session();
    s.send_text("SOS", 0).unwrap();
    s.run_until(5_000_000);
    assert_eq!(s.sink().symbols(), "...---...");
    assert_eq!(s.stats().elements, 9);
}

#[test]
fn test_nothing_to_send() {
    let mut s = session();
    assert!(matches!(s.send_text("", 0), Err(KeyerError::NothingToSend)));
    assert!(matches!(s.send_text("~~ ##", 0), Err(KeyerError::NothingToSend)));
    assert!(!s.is_sending());
}

#[test]
fn test_second_send_is_busy() {
    let mut s = session();
    s.send_text("TEST", 0).unwrap();
    assert!(matches!(s.send_text("E", 1_000), Err(KeyerError::Busy)));
}

#[test]
fn test_sent_elements_are_not_decoded() {
    let mut s = session();
    s.send_text("E", 0).unwrap();
    s.run_until(5_000_000);
    assert_eq!(s.sink().symbols(), ".");
    assert!(!s.decoded_text().contains('E'));
}

#[test]
fn test_paddle_during_send_follows_it() {
    let mut s = session();
    s.send_text("T", 0).unwrap();
    s.press(Element::Dit, 50_000);
    s.release(Element::Dit, 60_000);
    assert_eq!(s.sink().symbols(), "-");

    s.run_until(2_000_000);
    assert_eq!(s.sink().symbols(), "-.");
    assert!(!s.is_keying());
    assert_eq!(s.decoded_text().chars().next(), Some('E'));
}

#[test]
fn test_reset_aborts_send() {
    let mut s = session();
    s.send_text("SOS", 0).unwrap();
    s.reset(10_000);
    s.run_until(5_000_000);
    assert_eq!(s.sink().symbols(), ".");
    assert!(!s.is_sending());
}
