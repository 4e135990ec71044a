//! Real-time runtime on a paused tokio clock

use std::time::Duration;

use cw_paddle_keyer::config::find_param;
use cw_paddle_keyer::console::{self, ConsoleError, KeyerControl};
use cw_paddle_keyer::{Element, KeyerConfig, KeyerError, NullSink, Runtime};

#[tokio::test(start_paused = true)]
async fn test_tap_is_decoded() {
    let (handle, task) = Runtime::spawn(KeyerConfig::default(), NullSink);

    handle.press(Element::Dit).unwrap();
    handle.release(Element::Dit).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.decoded_text, "E");
    assert_eq!(snapshot.stats.elements, 1);
    assert!(!snapshot.keying);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_send_completes() {
    let (mut handle, task) = Runtime::spawn(KeyerConfig::default(), NullSink);

    handle.send("SOS").await.unwrap();
    assert!(handle.snapshot().sending);

    handle.wait_send_complete().await.unwrap();
    let snapshot = handle.snapshot();
    assert!(!snapshot.sending);
    assert_eq!(snapshot.stats.elements, 9);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_send_while_keying_is_busy() {
    let (handle, task) = Runtime::spawn(KeyerConfig::default(), NullSink);

    handle.press(Element::Dah).unwrap();
    let result = handle.send("E").await;
    assert!(matches!(result, Err(KeyerError::Busy)));

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_configure_is_published() {
    let (mut handle, task) = Runtime::spawn(KeyerConfig::default(), NullSink);

    handle.set_param(find_param("wpm").unwrap(), 30).unwrap();
    while handle.snapshot().config.wpm != 30 {
        handle.changed().await.unwrap();
    }
    assert_eq!(handle.snapshot().config.frequency_hz, 500);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_stopped_runtime_rejects_commands() {
    let (handle, task) = Runtime::spawn(KeyerConfig::default(), NullSink);
    handle.shutdown();
    task.await.unwrap();

    assert!(matches!(handle.press(Element::Dit), Err(KeyerError::RuntimeStopped)));
    assert!(matches!(handle.send("E").await, Err(KeyerError::RuntimeStopped)));
}

#[tokio::test(start_paused = true)]
async fn test_console_wait_is_unsupported_in_real_time() {
    let (mut handle, task) = Runtime::spawn(KeyerConfig::default(), NullSink);

    assert_eq!(KeyerControl::wait(&mut handle, 100), Err(ConsoleError::Unsupported));

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_back_to_back_sets_both_apply() {
    let (mut handle, task) = Runtime::spawn(KeyerConfig::default(), NullSink);

    // No await in between: the task has not published either change yet
    let mut out = String::new();
    console::run_line("set wpm 30", &mut handle, &mut out).unwrap();
    console::run_line("set frequency 700", &mut handle, &mut out).unwrap();
    assert_eq!(out, "wpm=30\nfrequency=700\n");

    tokio::time::sleep(Duration::from_millis(10)).await;
    let config = handle.snapshot().config;
    assert_eq!(config.wpm, 30);
    assert_eq!(config.frequency_hz, 700);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_console_send_while_keying_reports_busy() {
    let (mut handle, task) = Runtime::spawn(KeyerConfig::default(), NullSink);

    let mut out = String::new();
    console::run_line("press dah", &mut handle, &mut out).unwrap();

    let mut console_handle = handle.clone();
    let (result, out) = tokio::task::spawn_blocking(move || {
        let mut out = String::new();
        let result = console::run_line("send E", &mut console_handle, &mut out);
        (result, out)
    })
    .await
    .unwrap();

    assert_eq!(result, Err(ConsoleError::Busy));
    assert!(out.is_empty());
    assert!(!handle.snapshot().sending);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_console_send_when_idle_is_accepted() {
    let (mut handle, task) = Runtime::spawn(KeyerConfig::default(), NullSink);

    let mut console_handle = handle.clone();
    let (result, out) = tokio::task::spawn_blocking(move || {
        let mut out = String::new();
        let result = console::run_line("send e", &mut console_handle, &mut out);
        (result, out)
    })
    .await
    .unwrap();

    assert_eq!(result, Ok(()));
    assert_eq!(out, "sending: E\n");
    handle.wait_send_complete().await.unwrap();
    assert_eq!(handle.snapshot().stats.elements, 1);

    handle.shutdown();
    task.await.unwrap();
}
