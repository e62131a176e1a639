use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

pub type Timestamp = DateTime<Utc>;

/// A source of "now" for the engine. Every expiry decision is made against
/// the value returned here, captured once per operation.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Reads the wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used to simulate the passage of time.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self { now: start.into() }
    }

    /// Starts the clock at the current wall time
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

/// Returns true if something stamped at `since` has outlived `ttl` at `now`.
pub fn is_expired(since: Timestamp, now: Timestamp, ttl: Duration) -> bool {
    now - since > ttl
}
