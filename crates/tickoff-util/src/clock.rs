//! Clock abstraction
//!
//! Token validity is decided by wall-clock comparison, so every
//! time-sensitive component takes a `Clock` rather than calling
//! `Local::now()` directly. Tests inject a `ManualClock` to control
//! time deterministically; production code uses `SystemClock`.
//!
//! Wall-clock semantics are deliberate: a system clock change moves
//! expiry with it, which matches simple cooldown use cases.

use chrono::{DateTime, Local};
use std::sync::Mutex;

/// Supplies the current wall-clock instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to. For tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Jump to an absolute instant (may move backwards).
    pub fn set(&self, to: DateTime<Local>) {
        *self.now.lock().unwrap() = to;
    }

    /// Advance the clock by the given span.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}
