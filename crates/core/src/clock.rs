//! Time source seam.
//!
//! The orchestrator reads time through `Clock` so cadence behavior is
//! testable with fixed or advancing instants instead of the wall clock.

use std::sync::Mutex;

use time::OffsetDateTime;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// The wall clock, in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A settable clock for tests. `set` moves time for every holder of the
/// same instance, so multi-invocation scenarios can advance between calls.
pub struct FixedClock(Mutex<OffsetDateTime>);

impl FixedClock {
    pub fn new(now: OffsetDateTime) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: OffsetDateTime) {
        match self.0.lock() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        match self.0.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn fixed_clock_returns_what_was_set() {
        let clock = FixedClock::new(datetime!(2026-08-26 10:00 UTC));
        assert_eq!(clock.now(), datetime!(2026-08-26 10:00 UTC));
        clock.set(datetime!(2026-08-27 10:00 UTC));
        assert_eq!(clock.now(), datetime!(2026-08-27 10:00 UTC));
    }
}
