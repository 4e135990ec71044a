//! What console commands can drive.
//!
//! Two drivers exist: [`ScriptSession`] owns a [`Session`] on a virtual
//! clock, [`RuntimeHandle`] talks to the real-time task.

use super::ConsoleError;
use crate::config::{KeyerConfig, ParamDescriptor};
use crate::element::Element;
use crate::runtime::RuntimeHandle;
use crate::session::{Session, Snapshot};
use crate::sink::OutputSink;

/// Keyer operations available to console commands.
pub trait KeyerControl {
    fn press(&mut self, element: Element) -> Result<(), ConsoleError>;
    fn release(&mut self, element: Element) -> Result<(), ConsoleError>;
    /// Let `ms` milliseconds pass.
    fn wait(&mut self, ms: u64) -> Result<(), ConsoleError>;
    /// Set one parameter; `value` is already range checked.
    fn set_param(&mut self, param: &'static ParamDescriptor, value: u64) -> Result<(), ConsoleError>;
    fn send_text(&mut self, text: &str) -> Result<(), ConsoleError>;
    fn clear(&mut self) -> Result<(), ConsoleError>;
    fn snapshot(&self) -> Snapshot;
}

/// Longest single `wait` a script may ask for.
pub const WAIT_MAX_MS: u64 = 3_600_000;

/// A session driven by console commands in virtual time.
///
/// Time only moves on `wait`, so a script produces the same output on
/// every run regardless of host load.
pub struct ScriptSession<S> {
    session: Session<S>,
    now_us: i64,
}

impl<S: OutputSink> ScriptSession<S> {
    /// Start at logical time zero.
    pub fn new(config: KeyerConfig, sink: S) -> Self {
        Self {
            session: Session::new(config, sink, 0),
            now_us: 0,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn now_us(&self) -> i64 {
        self.now_us
    }

    /// Release both paddles and run until nothing but the decoder poll is
    /// left, then long enough for the decoder to report the idle gap.
    pub fn finish(&mut self) {
        for element in [Element::Dit, Element::Dah] {
            if self.session.keyer().is_pressed(element) {
                self.session.release(element, self.now_us);
            }
        }
        while self.session.is_keying() || self.session.is_sending() {
            let Some(next) = self.session.next_deadline() else {
                break;
            };
            self.advance(next.max(self.now_us));
        }
        let settle = self.session.timing().idle_gap_us()
            + 2 * self.session.config().poll_interval_us();
        self.advance(self.now_us + settle);
    }

    fn advance(&mut self, until_us: i64) {
        self.session.run_until(until_us);
        self.now_us = until_us;
    }
}

impl<S: OutputSink> KeyerControl for ScriptSession<S> {
    fn press(&mut self, element: Element) -> Result<(), ConsoleError> {
        self.session.press(element, self.now_us);
        Ok(())
    }

    fn release(&mut self, element: Element) -> Result<(), ConsoleError> {
        self.session.release(element, self.now_us);
        Ok(())
    }

    fn wait(&mut self, ms: u64) -> Result<(), ConsoleError> {
        if ms > WAIT_MAX_MS {
            return Err(ConsoleError::OutOfRange);
        }
        let until = i64::try_from(ms)
            .ok()
            .and_then(|ms| ms.checked_mul(1_000))
            .and_then(|us| self.now_us.checked_add(us))
            .ok_or(ConsoleError::OutOfRange)?;
        self.advance(until);
        Ok(())
    }

    fn set_param(&mut self, param: &'static ParamDescriptor, value: u64) -> Result<(), ConsoleError> {
        self.session.set_param(param, value);
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.session.send_text(text, self.now_us)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ConsoleError> {
        self.session.clear();
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }
}

impl KeyerControl for RuntimeHandle {
    fn press(&mut self, element: Element) -> Result<(), ConsoleError> {
        Ok(RuntimeHandle::press(self, element)?)
    }

    fn release(&mut self, element: Element) -> Result<(), ConsoleError> {
        Ok(RuntimeHandle::release(self, element)?)
    }

    /// Real time passes on its own.
    fn wait(&mut self, _ms: u64) -> Result<(), ConsoleError> {
        Err(ConsoleError::Unsupported)
    }

    fn set_param(&mut self, param: &'static ParamDescriptor, value: u64) -> Result<(), ConsoleError> {
        Ok(RuntimeHandle::set_param(self, param, value)?)
    }

    /// Blocks until the runtime answers, so call from a blocking thread.
    fn send_text(&mut self, text: &str) -> Result<(), ConsoleError> {
        Ok(RuntimeHandle::send_blocking(self, text)?)
    }

    fn clear(&mut self) -> Result<(), ConsoleError> {
        Ok(RuntimeHandle::clear(self)?)
    }

    fn snapshot(&self) -> Snapshot {
        RuntimeHandle::snapshot(self)
    }
}
