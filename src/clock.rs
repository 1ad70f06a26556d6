//! Wall-clock source for every timestamp the collection writes.
//!
//! Timestamps are whole unix seconds. The store never asks SQLite for the
//! current time, so tests can drive time through [`ManualClock`].

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};

pub trait Clock: Send + Sync {
    /// Current time in whole seconds. Must never go backwards.
    fn now(&self) -> DateTime<Utc>;
}

/// System time, guarded so that a clock step backwards is never observed
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp();
        let prev = self.last.fetch_max(wall, Ordering::SeqCst);
        from_unix(prev.max(wall))
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            secs: AtomicI64::new(start.timestamp()),
        }
    }

    pub fn at_unix(secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
        }
    }

    /// Move the clock forward. Negative durations are ignored.
    pub fn advance(&self, by: Duration) {
        let step = by.num_seconds().max(0);
        self.secs.fetch_add(step, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        from_unix(self.secs.load(Ordering::SeqCst))
    }
}

/// Convert stored unix seconds back into a UTC timestamp
pub fn from_unix(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or_default()
}
