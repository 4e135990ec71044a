//! One-shot timer queue with generation tokens.
//!
//! The scheduler stores typed events instead of closures. Nothing fires on
//! its own: the owner drains due events with [`Scheduler::pop_due`] from a
//! single execution context, so handlers never race each other.
//!
//! # Tokens
//!
//! A [`SessionToken`] identifies one chain of self-rescheduling work. At
//! most one token is live at a time. Minting a new token supersedes the
//! previous one; events carrying a stale token are still delivered, and the
//! handler drops them after checking [`Scheduler::is_live`]. This makes late
//! firings harmless without synchronous cancellation.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Generation token of a chain of scheduled work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionToken(u32);

impl SessionToken {
    /// Raw generation number (for logging).
    pub fn generation(self) -> u32 {
        self.0
    }
}

/// Handle of one scheduled event, usable with [`Scheduler::cancel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// An event whose deadline has been reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<E> {
    /// Deadline the event was scheduled for (logical firing time).
    pub deadline_us: i64,
    /// Token the event was scheduled under, if any.
    pub token: Option<SessionToken>,
    pub event: E,
}

struct Entry<E> {
    deadline_us: i64,
    seq: u64,
    token: Option<SessionToken>,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline_us == other.deadline_us && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    // BinaryHeap is a max-heap: reverse so the earliest deadline pops first,
    // and equal deadlines pop in scheduling order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline_us
            .cmp(&self.deadline_us)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Deadline-ordered queue of one-shot events.
pub struct Scheduler<E> {
    queue: BinaryHeap<Entry<E>>,
    next_seq: u64,
    next_generation: u32,
    live: Option<SessionToken>,
}

impl<E> Scheduler<E> {
    /// Create an empty scheduler with no live token.
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
            next_generation: 1,
            live: None,
        }
    }

    /// Schedule `event` to fire `delay_us` after `now_us`.
    ///
    /// Negative delays fire at `now_us`.
    pub fn schedule_once(&mut self, now_us: i64, delay_us: i64, event: E) -> TimerHandle {
        self.push(now_us + delay_us.max(0), None, event)
    }

    /// Schedule `event` under `token` so [`cancel_all`](Self::cancel_all) can drop it.
    pub fn schedule_for(
        &mut self,
        token: SessionToken,
        now_us: i64,
        delay_us: i64,
        event: E,
    ) -> TimerHandle {
        self.push(now_us + delay_us.max(0), Some(token), event)
    }

    fn push(&mut self, deadline_us: i64, token: Option<SessionToken>, event: E) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            deadline_us,
            seq,
            token,
            event,
        });
        TimerHandle(seq)
    }

    /// Mint a new token and make it the live one, superseding any other.
    pub fn mint(&mut self) -> SessionToken {
        let token = SessionToken(self.next_generation);
        self.next_generation = self.next_generation.wrapping_add(1);
        self.live = Some(token);
        token
    }

    /// True if `token` is the live token.
    #[inline]
    pub fn is_live(&self, token: SessionToken) -> bool {
        self.live == Some(token)
    }

    /// The live token, if any chain is running.
    #[inline]
    pub fn live(&self) -> Option<SessionToken> {
        self.live
    }

    /// Retire `token` if it is live. Pending events stay queued and become no-ops.
    pub fn retire(&mut self, token: SessionToken) {
        if self.live == Some(token) {
            self.live = None;
        }
    }

    /// Retire `token` and drop every pending event scheduled under it.
    ///
    /// Returns the number of events dropped.
    pub fn cancel_all(&mut self, token: SessionToken) -> usize {
        self.retire(token);
        let before = self.queue.len();
        self.queue.retain(|e| e.token != Some(token));
        before - self.queue.len()
    }

    /// Drop one pending event. Returns `false` if it already fired.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|e| e.seq != handle.0);
        before != self.queue.len()
    }

    /// Deadline of the earliest pending event.
    #[inline]
    pub fn next_deadline(&self) -> Option<i64> {
        self.queue.peek().map(|e| e.deadline_us)
    }

    /// Pop the earliest event if its deadline is at or before `now_us`.
    pub fn pop_due(&mut self, now_us: i64) -> Option<Fired<E>> {
        if self.next_deadline()? > now_us {
            return None;
        }
        self.queue.pop().map(|e| Fired {
            deadline_us: e.deadline_us,
            token: e.token,
            event: e.event,
        })
    }

    /// Number of pending events.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule_once(0, 30, "c");
        s.schedule_once(0, 10, "a");
        s.schedule_once(0, 20, "b");

        assert_eq!(s.pop_due(5), None);
        assert_eq!(s.pop_due(100).map(|f| f.event), Some("a"));
        assert_eq!(s.pop_due(100).map(|f| f.event), Some("b"));
        assert_eq!(s.pop_due(100).map(|f| f.event), Some("c"));
        assert!(s.is_empty());
    }

    #[test]
    fn test_equal_deadlines_are_fifo() {
        let mut s = Scheduler::new();
        for i in 0..5 {
            s.schedule_once(100, 0, i);
        }
        let order: Vec<_> = core::iter::from_fn(|| s.pop_due(100).map(|f| f.event)).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_mint_supersedes() {
        let mut s: Scheduler<()> = Scheduler::new();
        let a = s.mint();
        assert!(s.is_live(a));
        let b = s.mint();
        assert!(!s.is_live(a));
        assert!(s.is_live(b));

        s.retire(a); // stale retire is ignored
        assert!(s.is_live(b));
        s.retire(b);
        assert_eq!(s.live(), None);
    }

    #[test]
    fn test_cancel_all_only_drops_tagged() {
        let mut s = Scheduler::new();
        let t = s.mint();
        s.schedule_for(t, 0, 10, 1);
        s.schedule_once(0, 10, 2);
        s.schedule_for(t, 0, 20, 3);

        assert_eq!(s.cancel_all(t), 2);
        assert!(!s.is_live(t));
        assert_eq!(s.pop_due(100).map(|f| f.event), Some(2));
        assert!(s.is_empty());
    }

    #[test]
    fn test_cancel_handle() {
        let mut s = Scheduler::new();
        let h = s.schedule_once(0, 10, 'x');
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert_eq!(s.next_deadline(), None);
    }
}
