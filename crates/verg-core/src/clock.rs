//! Injectable wall clock.
//!
//! Streak arithmetic and the timer engine are pure in `now`; components that
//! need the current instant take it from a [`Clock`] collaborator so tests
//! can pin or step time deterministically.

use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
