//! Countdown timer engine.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads or a run loop - the host calls `tick()` at whatever cadence suits
//! its display and `resync()` whenever it regains the foreground.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!        Complete -> (reset) -> Idle
//! ```
//!
//! Remaining time is always recomputed from a fixed target end instant,
//! never decremented per tick. A suspension of any length between two ticks
//! therefore cannot make the display drift from wall-clock truth: the next
//! tick (or an explicit resync) lands on the correct value, clamped at zero.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Complete,
}

/// Countdown timer state machine.
///
/// Serializable so a host may persist it across process suspensions; on
/// reload a single `resync()` restores the true remaining time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    state: TimerState,
    total_ms: u64,
    remaining_ms: u64,
    /// Fixed end instant while Running; `None` otherwise.
    #[serde(default)]
    target_end: Option<DateTime<Utc>>,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            total_ms: 0,
            remaining_ms: 0,
            target_end: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_complete(&self) -> bool {
        self.state == TimerState::Complete
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Fraction of the session still to run, from 1.0 (full) to 0.0 (done).
    ///
    /// Defined as 1.0 when the total duration is zero.
    pub fn progress(&self) -> f64 {
        if self.total_ms == 0 {
            return 1.0;
        }
        (self.remaining_ms as f64 / self.total_ms as f64).clamp(0.0, 1.0)
    }

    /// Remaining time as M:SS (e.g., "9:05").
    pub fn formatted_time(&self) -> String {
        let secs = self.remaining_ms / 1000;
        format!("{}:{:02}", secs / 60, secs % 60)
    }

    /// Remaining time as MM:SS (e.g., "09:05").
    pub fn formatted_time_full(&self) -> String {
        let secs = self.remaining_ms / 1000;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            state: self.state,
            remaining_ms: self.remaining_ms,
            total_ms: self.total_ms,
            progress: self.progress(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a countdown from any state.
    ///
    /// A non-positive duration completes immediately with zero remaining;
    /// it is not an error.
    pub fn start(&mut self, duration_secs: i64, now: DateTime<Utc>) -> Event {
        let total_ms = (duration_secs.max(0) as u64).saturating_mul(1000);
        self.total_ms = total_ms;
        if total_ms == 0 {
            self.remaining_ms = 0;
            self.target_end = None;
            self.state = TimerState::Complete;
            return Event::TimerCompleted {
                duration_secs: 0,
                at: now,
            };
        }
        self.remaining_ms = total_ms;
        self.target_end = Some(target_after(now, total_ms));
        self.state = TimerState::Running;
        Event::TimerStarted {
            duration_secs: duration_secs as u64,
            at: now,
        }
    }

    /// Recompute remaining time from the target instant. Running only.
    ///
    /// Returns the completion event when the target has passed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let target = self.target_end?;
        let left = target.signed_duration_since(now).num_milliseconds();
        if left <= 0 {
            self.remaining_ms = 0;
            self.target_end = None;
            self.state = TimerState::Complete;
            return Some(Event::TimerCompleted {
                duration_secs: self.total_ms / 1000,
                at: now,
            });
        }
        self.remaining_ms = left as u64;
        None
    }

    /// Foreground-regained hook: identical to a tick.
    ///
    /// Hosts call this whenever execution resumes after a suspension so the
    /// displayed remaining time matches the wall clock before the next
    /// scheduled sample.
    pub fn resync(&mut self, now: DateTime<Utc>) -> Option<Event> {
        self.tick(now)
    }

    /// Pause, retaining remaining time as of `now`. No-op unless Running.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        if let Some(event) = self.tick(now) {
            // Already expired; the completion wins over the pause.
            return Some(event);
        }
        self.state = TimerState::Paused;
        self.target_end = None;
        Some(Event::TimerPaused {
            remaining_ms: self.remaining_ms,
            at: now,
        })
    }

    /// Resume from Paused with the remaining time captured at pause.
    ///
    /// The pause length does not matter: the target instant is recomputed
    /// from `now`, so no paused time is ever lost.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Paused || self.remaining_ms == 0 {
            return None;
        }
        self.target_end = Some(target_after(now, self.remaining_ms));
        self.state = TimerState::Running;
        Some(Event::TimerResumed {
            remaining_ms: self.remaining_ms,
            at: now,
        })
    }

    /// Return to Idle with the full duration restored. Idempotent.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Event {
        self.state = TimerState::Idle;
        self.remaining_ms = self.total_ms;
        self.target_end = None;
        Event::TimerReset { at: now }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Target instant `remaining_ms` after `now`, pinned at the calendar
/// maximum instead of overflowing for absurd durations.
fn target_after(now: DateTime<Utc>, remaining_ms: u64) -> DateTime<Utc> {
    let millis = remaining_ms.min(i64::MAX as u64) as i64;
    now.checked_add_signed(Duration::milliseconds(millis))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
