//! State-change events.
//!
//! Every command on the timer engine or the journal produces an `Event`.
//! Hosts consume these to refresh their display and to drive sound and
//! notifications; the core itself knows nothing about presentation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::TimerState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        remaining_ms: u64,
        total_ms: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
    SessionRecorded {
        id: Uuid,
        occurred_on: NaiveDate,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    SessionDeleted {
        id: Uuid,
        at: DateTime<Utc>,
    },
}
