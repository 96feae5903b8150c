// Copyright (c) 2025 - Cowboy AI, Inc.
//! Clocks
//!
//! Time-based combinators read "now" through the `Clock` trait instead of
//! the ambient wall clock, so tests can drive time explicitly.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use crate::frp::Time;

/// Source of the current time, in milliseconds since the Unix epoch
pub trait Clock: Send + Sync {
    /// The current time
    fn now(&self) -> Time;
}

/// Wall clock
///
/// UTC wall time may step backwards when the system clock is adjusted.
/// `rate_limit` treats a backwards step as the interval having elapsed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Clock starting at `start`
    pub fn new(start: Time) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, time: Time) {
        self.now.store(time, Ordering::SeqCst);
    }

    /// Move forward by `delta`
    pub fn advance(&self, delta: Duration) {
        self.now.fetch_add(millis(delta), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Time {
        self.now.load(Ordering::SeqCst)
    }
}

/// Convert a duration to clock units, saturating on overflow
pub fn millis(duration: Duration) -> Time {
    Time::try_from(duration.as_millis()).unwrap_or(Time::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_moves_only_when_told() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now(), 1_000);

        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.now(), 1_500);

        clock.set(10);
        assert_eq!(clock.now(), 10);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2024-01-01T00:00:00Z
        assert!(SystemClock.now() > 1_704_067_200_000);
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_secs(2)), 2_000);
        assert_eq!(millis(Duration::MAX), Time::MAX);
    }
}
