//! Keyer session: the single owner of all keying and decoding state.
//!
//! # Architecture
//!
//! ```text
//! press/release ──▶ IambicKeyer ──▶ Scheduler ──▶ OutputSink
//!                                      │
//!                                      ├──▶ SymbolComplete ──▶ Decoder
//!                                      └──▶ DecoderPoll ─────▶ Decoder
//! ```
//!
//! Every mutation goes through `&mut Session`, so paddle edges, chain
//! steps and decoder polls are serialized by ownership. Whoever drives the
//! session (the real-time [`Runtime`](crate::runtime::Runtime), a script,
//! or a test) supplies the current time.
//!
//! # Logical time
//!
//! Events are handled at their scheduled deadline, not at the moment the
//! driver got round to them. A late wake-up therefore never stretches the
//! following elements; it only shows up in [`TimingStats`].

use crate::config::{KeyerConfig, ParamDescriptor};
use crate::decoder::{Boundary, Decoder};
use crate::element::Element;
use crate::error::KeyerError;
use crate::keyer::IambicKeyer;
use crate::scheduler::{Fired, Scheduler, SessionToken};
use crate::sender::TextSender;
use crate::sink::OutputSink;
use crate::stats::TimingStats;
use crate::timing::Timing;

/// Scheduled work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Next step of a paddle chain.
    ChainStep(SessionToken),
    /// An element finished sounding and becomes decodable.
    SymbolComplete(Element),
    /// Periodic decoder gap check.
    DecoderPoll,
    /// Next element of a text send.
    SendStep(SessionToken),
}

/// Read-only view of session state for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub decoded_text: String,
    pub morse_buffer: String,
    pub config: KeyerConfig,
    pub keying: bool,
    pub sending: bool,
    pub stats: TimingStats,
}

/// Keyer session.
pub struct Session<S> {
    config: KeyerConfig,
    keyer: IambicKeyer,
    decoder: Decoder,
    sender: TextSender,
    scheduler: Scheduler<Event>,
    sink: S,
    stats: TimingStats,
    now_us: i64,
}

impl<S: OutputSink> Session<S> {
    /// Start a session at `now_us`. The decoder poll is armed immediately.
    pub fn new(config: KeyerConfig, mut sink: S, now_us: i64) -> Self {
        sink.set_frequency(config.frequency_hz);

        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(now_us, config.poll_interval_us(), Event::DecoderPoll);

        tracing::info!(
            wpm = config.wpm,
            frequency_hz = config.frequency_hz,
            "session started"
        );

        Self {
            config,
            keyer: IambicKeyer::new(),
            decoder: Decoder::new(now_us),
            sender: TextSender::new(),
            scheduler,
            sink,
            stats: TimingStats::new(),
            now_us,
        }
    }

    // --- Input ---

    /// Paddle press edge at `now_us`. Returns `false` for a repeated press.
    pub fn press(&mut self, element: Element, now_us: i64) -> bool {
        self.advance_to(now_us);
        let edge = self
            .keyer
            .on_press(element, now_us, &mut self.scheduler, &mut self.decoder);
        self.advance_to(now_us);
        edge
    }

    /// Paddle release edge at `now_us`.
    pub fn release(&mut self, element: Element, now_us: i64) {
        self.advance_to(now_us);
        self.keyer.on_release(element, now_us, &mut self.scheduler);
        self.advance_to(now_us);
    }

    /// Play `text` through the sink.
    pub fn send_text(&mut self, text: &str, now_us: i64) -> Result<(), KeyerError> {
        self.advance_to(now_us);
        self.sender.start(text, now_us, &mut self.scheduler)?;
        self.advance_to(now_us);
        Ok(())
    }

    // --- Configuration ---

    /// Change speed. Elements already scheduled keep their timing.
    pub fn set_wpm(&mut self, wpm: u32) {
        self.configure(KeyerConfig { wpm, ..self.config });
    }

    /// Change the sidetone frequency passed to the sink.
    pub fn set_frequency(&mut self, frequency_hz: u32) {
        self.configure(KeyerConfig {
            frequency_hz,
            ..self.config
        });
    }

    /// Replace the configuration. A new poll period applies from the next poll.
    pub fn configure(&mut self, config: KeyerConfig) {
        if config.frequency_hz != self.config.frequency_hz {
            self.sink.set_frequency(config.frequency_hz);
        }
        if config != self.config {
            tracing::info!(
                wpm = config.wpm,
                frequency_hz = config.frequency_hz,
                poll_interval_ms = config.poll_interval_ms,
                "configuration changed"
            );
        }
        self.config = config;
    }

    /// Change one parameter of the current configuration.
    pub fn set_param(&mut self, param: &ParamDescriptor, value: u64) {
        let mut config = self.config;
        (param.set)(&mut config, value);
        self.configure(config);
    }

    // --- Control ---

    /// Discard decoded text and the pending character.
    pub fn clear(&mut self) {
        self.decoder.clear();
    }

    /// Release the paddles and cancel any chain or send in progress.
    pub fn reset(&mut self, now_us: i64) {
        self.advance_to(now_us);
        self.keyer.reset(&mut self.scheduler);
        self.sender.cancel(&mut self.scheduler);
    }

    /// Handle every event due at or before `now_us`, in deadline order.
    ///
    /// Returns the number of events handled.
    pub fn advance_to(&mut self, now_us: i64) -> usize {
        let mut handled = 0;
        while let Some(fired) = self.scheduler.pop_due(now_us) {
            if self.stats.record_firing(fired.deadline_us, now_us) {
                tracing::warn!(
                    event = ?fired.event,
                    late_us = now_us - fired.deadline_us,
                    "timer fired late"
                );
            }
            self.handle(fired);
            handled += 1;
        }
        self.now_us = self.now_us.max(now_us);
        handled
    }

    /// Step through time deadline by deadline up to `until_us`.
    ///
    /// Unlike [`advance_to`](Self::advance_to), every event is handled as if
    /// the driver woke exactly on time. Used for virtual-time driving.
    pub fn run_until(&mut self, until_us: i64) -> usize {
        let mut handled = 0;
        while let Some(deadline) = self.scheduler.next_deadline().filter(|d| *d <= until_us) {
            handled += self.advance_to(deadline.max(self.now_us));
        }
        self.now_us = self.now_us.max(until_us);
        handled
    }

    // --- State ---

    pub fn config(&self) -> &KeyerConfig {
        &self.config
    }

    /// Timing for the current speed.
    pub fn timing(&self) -> Timing {
        self.config.timing()
    }

    pub fn decoded_text(&self) -> &str {
        self.decoder.decoded_text()
    }

    pub fn morse_buffer(&self) -> &str {
        self.decoder.morse_buffer()
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn keyer(&self) -> &IambicKeyer {
        &self.keyer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn stats(&self) -> &TimingStats {
        &self.stats
    }

    /// True while a paddle chain is running.
    pub fn is_keying(&self) -> bool {
        self.keyer.is_keying(&self.scheduler)
    }

    /// True while a text send is running.
    pub fn is_sending(&self) -> bool {
        self.sender.is_sending(&self.scheduler)
    }

    /// Deadline of the next scheduled event.
    pub fn next_deadline(&self) -> Option<i64> {
        self.scheduler.next_deadline()
    }

    /// Latest time the session has been advanced to.
    pub fn now_us(&self) -> i64 {
        self.now_us
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            decoded_text: self.decoded_text().to_string(),
            morse_buffer: self.morse_buffer().to_string(),
            config: self.config,
            keying: self.is_keying(),
            sending: self.is_sending(),
            stats: self.stats,
        }
    }

    // --- Private methods ---

    fn handle(&mut self, fired: Fired<Event>) {
        let now_us = fired.deadline_us;
        // Fresh on every decision so speed changes apply to the next element
        let timing = self.config.timing();

        match fired.event {
            Event::ChainStep(token) => {
                if !self.scheduler.is_live(token) {
                    self.stats.stale_steps += 1;
                    return;
                }
                let emitted =
                    self.keyer
                        .step(token, now_us, timing, &mut self.scheduler, &mut self.sink);
                if emitted.is_some() {
                    self.stats.elements += 1;
                }
            }
            Event::SymbolComplete(element) => {
                self.decoder.push_symbol(element, now_us);
            }
            Event::DecoderPoll => {
                if let Some(Boundary::Word) = self.decoder.poll(now_us, timing) {
                    tracing::trace!(text = %self.decoder.decoded_text(), "word gap");
                }
                self.scheduler
                    .schedule_once(now_us, self.config.poll_interval_us(), Event::DecoderPoll);
            }
            Event::SendStep(token) => {
                if !self.scheduler.is_live(token) {
                    self.stats.stale_steps += 1;
                    return;
                }
                let emitted =
                    self.sender
                        .step(token, now_us, timing, &mut self.scheduler, &mut self.sink);
                match emitted {
                    Some(_) => self.stats.elements += 1,
                    // Paddles pressed during the send take over now
                    None => {
                        self.keyer.ensure_chain_running(now_us, &mut self.scheduler);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;

    fn session(wpm: u32) -> Session<RecordingSink> {
        let config = KeyerConfig {
            wpm,
            ..Default::default()
        };
        Session::new(config, RecordingSink::new(), 0)
    }

    #[test]
    fn test_first_element_fires_on_press() {
        let mut s = session(20);
        s.press(Element::Dah, 1_000);
        assert_eq!(s.sink().symbols(), "-");
        assert!(s.is_keying());
    }

    #[test]
    fn test_frequency_reaches_sink() {
        let mut s = session(20);
        s.set_frequency(650);
        s.press(Element::Dit, 0);
        assert_eq!(s.sink().emissions()[0].frequency_hz, 650);
    }

    #[test]
    fn test_send_blocks_keyer_until_done() {
        let mut s = session(20);
        s.send_text("E", 0).unwrap();
        assert!(s.is_sending());

        // Paddle during the send is held back
        s.press(Element::Dah, 10_000);
        s.release(Element::Dah, 20_000);
        assert_eq!(s.sink().symbols(), ".");

        s.run_until(1_000_000);
        assert_eq!(s.sink().symbols(), ".-");
        assert!(!s.is_sending());
        assert!(!s.is_keying());
    }

    #[test]
    fn test_send_while_keying_is_busy() {
        let mut s = session(20);
        s.press(Element::Dit, 0);
        assert!(matches!(s.send_text("E", 10), Err(KeyerError::Busy)));
    }

    #[test]
    fn test_poll_rearms() {
        let mut s = session(20);
        s.run_until(1_000_000);
        assert_eq!(s.next_deadline(), Some(1_100_000));
    }
}
