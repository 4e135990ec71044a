//! Iambic paddle keyer.
//!
//! Converts press/release edges into a self-rescheduling chain of timed
//! elements. Pure logic: time comes in as `now_us`, elements go out through
//! an [`OutputSink`], and every delay is a scheduled [`Event`].
//!
//! # Chain
//!
//! ```text
//! press ──▶ ensure_chain_running ──▶ ChainStep(t) ──▶ emit ──▶ ChainStep(t) ...
//!                                        │
//!                                        └──▶ SymbolComplete  (after the element)
//! ```
//!
//! Each step picks the next element from the queue, then from paddle
//! state. The chain ends when both paddles are up and the queue is empty.
//! A step carrying a superseded token does nothing.

use std::collections::VecDeque;

use crate::decoder::Decoder;
use crate::element::Element;
use crate::scheduler::{Scheduler, SessionToken};
use crate::session::Event;
use crate::sink::OutputSink;
use crate::timing::Timing;

/// Iambic keyer state.
///
/// # Example
///
/// ```
/// use cw_paddle_keyer::{Element, KeyerConfig, RecordingSink, Session};
///
/// let config = KeyerConfig { wpm: 20, ..Default::default() };
/// let mut session = Session::new(config, RecordingSink::new(), 0);
///
/// // Tap the dit paddle
/// session.press(Element::Dit, 0);
/// session.release(Element::Dit, 1_000);
/// session.advance_to(500_000);
///
/// assert_eq!(session.sink().symbols(), ".");
/// ```
#[derive(Debug, Clone)]
pub struct IambicKeyer {
    // Paddle state
    dit_pressed: bool,
    dah_pressed: bool,

    // Elements from press edges not yet sent
    queue: VecDeque<Element>,

    // Squeeze alternation memory
    last_element: Element,

    // Token of the chain this keyer started
    chain: Option<SessionToken>,
}

impl IambicKeyer {
    /// Create an idle keyer with both paddles up.
    pub fn new() -> Self {
        Self {
            dit_pressed: false,
            dah_pressed: false,
            queue: VecDeque::new(),
            last_element: Element::Dah,
            chain: None,
        }
    }

    /// Check if a paddle is held.
    #[inline]
    pub fn is_pressed(&self, element: Element) -> bool {
        match element {
            Element::Dit => self.dit_pressed,
            Element::Dah => self.dah_pressed,
        }
    }

    /// Elements queued by press edges and not yet sent.
    pub fn queued(&self) -> impl Iterator<Item = Element> + '_ {
        self.queue.iter().copied()
    }

    /// Last element emitted.
    #[inline]
    pub fn last_element(&self) -> Element {
        self.last_element
    }

    /// True while this keyer's chain holds the live token.
    pub fn is_keying(&self, scheduler: &Scheduler<Event>) -> bool {
        self.chain.map_or(false, |t| scheduler.is_live(t))
    }

    /// Paddle press edge.
    ///
    /// A repeated press of a held paddle is ignored. Otherwise the element
    /// is queued, the decoder's silence clock restarts, and a chain is
    /// started if none is running.
    pub fn on_press(
        &mut self,
        element: Element,
        now_us: i64,
        scheduler: &mut Scheduler<Event>,
        decoder: &mut Decoder,
    ) -> bool {
        if self.is_pressed(element) {
            return false;
        }
        self.set_pressed(element, true);
        self.queue.push_back(element);
        decoder.touch(now_us);
        tracing::debug!(%element, queued = self.queue.len(), "paddle down");

        self.ensure_chain_running(now_us, scheduler);
        true
    }

    /// Paddle release edge. Idempotent; never starts a chain by itself
    /// unless elements are still queued.
    pub fn on_release(&mut self, element: Element, now_us: i64, scheduler: &mut Scheduler<Event>) {
        if self.is_pressed(element) {
            tracing::debug!(%element, "paddle up");
        }
        self.set_pressed(element, false);
        self.ensure_chain_running(now_us, scheduler);
    }

    /// Start a chain if there is work and no token is live.
    ///
    /// Always safe to call again; returns the new token if a chain started.
    pub fn ensure_chain_running(
        &mut self,
        now_us: i64,
        scheduler: &mut Scheduler<Event>,
    ) -> Option<SessionToken> {
        let has_work = self.dit_pressed || self.dah_pressed || !self.queue.is_empty();
        if !has_work || scheduler.live().is_some() {
            return None;
        }

        let token = scheduler.mint();
        self.chain = Some(token);
        // Seeded so a squeeze at chain start leads with a dit
        self.last_element = Element::Dah;
        scheduler.schedule_for(token, now_us, 0, Event::ChainStep(token));

        tracing::debug!(generation = token.generation(), "chain started");
        Some(token)
    }

    /// Run one chain step at `now_us`.
    ///
    /// Returns the element emitted, or `None` if the step was stale or the
    /// chain ended.
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

        let Some(next) = self.decide_next_element() else {
            scheduler.retire(token);
            self.chain = None;
            tracing::debug!(generation = token.generation(), "chain ended");
            return None;
        };

        self.last_element = next;
        let duration_us = timing.element_us(next);

        sink.emit(next, timing.element_secs(next));
        tracing::debug!(element = %next, duration_us, "element");

        // Decodable only once it has finished sounding
        scheduler.schedule_once(now_us, duration_us, Event::SymbolComplete(next));
        scheduler.schedule_for(
            token,
            now_us,
            duration_us + timing.unit_us(),
            Event::ChainStep(token),
        );

        Some(next)
    }

    /// Release both paddles, drop queued elements, and cancel the chain.
    pub fn reset(&mut self, scheduler: &mut Scheduler<Event>) {
        self.dit_pressed = false;
        self.dah_pressed = false;
        self.queue.clear();
        if let Some(token) = self.chain.take() {
            scheduler.cancel_all(token);
        }
    }

    // --- Private methods ---

    fn set_pressed(&mut self, element: Element, pressed: bool) {
        match element {
            Element::Dit => self.dit_pressed = pressed,
            Element::Dah => self.dah_pressed = pressed,
        }
    }

    fn decide_next_element(&mut self) -> Option<Element> {
        // Priority 1: elements queued by press edges
        if let Some(element) = self.queue.pop_front() {
            return Some(element);
        }

        // Priority 2: current paddle state
        match (self.dit_pressed, self.dah_pressed) {
            // Squeeze: alternate from last element
            (true, true) => Some(self.last_element.opposite()),
            (true, false) => Some(Element::Dit),
            (false, true) => Some(Element::Dah),
            (false, false) => None,
        }
    }
}

impl Default for IambicKeyer {
    fn default() -> Self {
        Self::new()
    }
}
