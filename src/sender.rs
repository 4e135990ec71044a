//! Text sender.
//!
//! Plays a string as Morse through the output sink with standard spacing:
//! one unit between elements, three between characters, seven between
//! words. A send holds the session token, so it never overlaps a paddle
//! chain.

use std::collections::VecDeque;

use crate::element::Element;
use crate::error::KeyerError;
use crate::morse;
use crate::scheduler::{Scheduler, SessionToken};
use crate::session::Event;
use crate::sink::OutputSink;
use crate::timing::Timing;

const ELEMENT_GAP_UNITS: i64 = 1;
const CHAR_GAP_UNITS: i64 = 3;
const WORD_GAP_UNITS: i64 = 7;

/// One element to send and the silence that follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keyed {
    pub element: Element,
    /// Silence after the element, in units.
    pub gap_units: i64,
}

/// Encode `text` into timed elements.
///
/// Characters missing from the Morse table are skipped. Words left empty
/// by that are dropped. The last element has no trailing gap.
pub fn encode_text(text: &str) -> Vec<Keyed> {
    let words: Vec<Vec<&'static str>> = text
        .split_whitespace()
        .map(|word| word.chars().filter_map(morse::encode).collect::<Vec<_>>())
        .filter(|codes| !codes.is_empty())
        .collect();

    let mut out = Vec::new();
    for (w, codes) in words.iter().enumerate() {
        for (c, code) in codes.iter().enumerate() {
            let symbols: Vec<Element> = code.chars().filter_map(Element::from_symbol).collect();
            for (s, element) in symbols.iter().enumerate() {
                let gap_units = if s + 1 < symbols.len() {
                    ELEMENT_GAP_UNITS
                } else if c + 1 < codes.len() {
                    CHAR_GAP_UNITS
                } else if w + 1 < words.len() {
                    WORD_GAP_UNITS
                } else {
                    0
                };
                out.push(Keyed {
                    element: *element,
                    gap_units,
                });
            }
        }
    }
    out
}

/// Sender state.
#[derive(Debug, Default, Clone)]
pub struct TextSender {
    pending: VecDeque<Keyed>,
    active: Option<SessionToken>,
}

impl TextSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a send holds the live token.
    pub fn is_sending(&self, scheduler: &Scheduler<Event>) -> bool {
        self.active.map_or(false, |t| scheduler.is_live(t))
    }

    /// Start sending `text` at `now_us`.
    pub fn start(
        &mut self,
        text: &str,
        now_us: i64,
        scheduler: &mut Scheduler<Event>,
    ) -> Result<SessionToken, KeyerError> {
        if scheduler.live().is_some() {
            return Err(KeyerError::Busy);
        }
        let plan = encode_text(text);
        if plan.is_empty() {
            return Err(KeyerError::NothingToSend);
        }

        let token = scheduler.mint();
        self.pending = plan.into();
        self.active = Some(token);
        scheduler.schedule_for(token, now_us, 0, Event::SendStep(token));

        tracing::info!(elements = self.pending.len(), text, "send started");
        Ok(token)
    }

    /// Emit the next element, or retire the token once everything is sent.
    pub fn step(
        &mut self,
        token: SessionToken,
        now_us: i64,
        timing: Timing,
        scheduler: &mut Scheduler<Event>,
        sink: &mut dyn OutputSink,
    ) -> Option<Element> {
        if !scheduler.is_live(token) {
            return None;
        }

        let Some(keyed) = self.pending.pop_front() else {
            scheduler.retire(token);
            self.active = None;
            tracing::info!("send complete");
            return None;
        };

        let duration_us = timing.element_us(keyed.element);
        sink.emit(keyed.element, timing.element_secs(keyed.element));
        scheduler.schedule_for(
            token,
            now_us,
            duration_us + keyed.gap_units * timing.unit_us(),
            Event::SendStep(token),
        );
        Some(keyed.element)
    }

    /// Abort the current send.
    pub fn cancel(&mut self, scheduler: &mut Scheduler<Event>) {
        self.pending.clear();
        if let Some(token) = self.active.take() {
            scheduler.cancel_all(token);
        }
    }
}
