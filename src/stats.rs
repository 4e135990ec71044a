//! Timer fidelity statistics.
//!
//! Events are handled at their scheduled (logical) time, so a late wake-up
//! never shifts later elements. Lateness still degrades what the operator
//! hears, and is tracked here for diagnostics. It is never a fault: state
//! stays correct however late a timer fires.

/// Default lateness above which a firing counts as late.
pub const DEFAULT_LATE_THRESHOLD_US: i64 = 5_000;

/// Counters for scheduled event handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingStats {
    /// Events handled.
    pub fired: u64,
    /// Events handled more than the threshold after their deadline.
    pub late: u64,
    /// Worst lateness seen, in microseconds.
    pub max_lateness_us: i64,
    /// Chain steps dropped because their token was superseded.
    pub stale_steps: u64,
    /// Elements emitted by the keyer and the sender.
    pub elements: u64,
    late_threshold_us: i64,
}

impl TimingStats {
    pub const fn new() -> Self {
        Self::with_threshold(DEFAULT_LATE_THRESHOLD_US)
    }

    pub const fn with_threshold(late_threshold_us: i64) -> Self {
        Self {
            fired: 0,
            late: 0,
            max_lateness_us: 0,
            stale_steps: 0,
            elements: 0,
            late_threshold_us,
        }
    }

    /// Record one handled event. Returns `true` if it was late.
    pub fn record_firing(&mut self, deadline_us: i64, actual_us: i64) -> bool {
        self.fired += 1;
        let lateness = actual_us - deadline_us;
        if lateness > self.max_lateness_us {
            self.max_lateness_us = lateness;
        }
        if lateness > self.late_threshold_us {
            self.late += 1;
            return true;
        }
        false
    }

    /// Late firings as a fraction of all firings.
    pub fn late_ratio(&self) -> f64 {
        if self.fired == 0 {
            0.0
        } else {
            self.late as f64 / self.fired as f64
        }
    }
}

impl Default for TimingStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_time_firing() {
        let mut stats = TimingStats::new();
        assert!(!stats.record_firing(1_000, 1_000));
        assert_eq!(stats.fired, 1);
        assert_eq!(stats.late, 0);
    }

    #[test]
    fn test_late_firings_accumulate() {
        let mut stats = TimingStats::with_threshold(100);

        stats.record_firing(0, 50);
        assert!(stats.record_firing(0, 500));
        assert!(stats.record_firing(0, 300));

        assert_eq!(stats.late, 2);
        assert_eq!(stats.max_lateness_us, 500);
        assert!((stats.late_ratio() - 2.0 / 3.0).abs() < 1e-9);
    }
}
