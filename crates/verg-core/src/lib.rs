//! # Verg Core Library
//!
//! Core business logic for Verg, a paper-journaling companion: a countdown
//! timer nudges the user to write on paper, completed sessions build a daily
//! streak, and a free-session gate fronts the subscription paywall. All
//! operations are available through the standalone CLI binary; any GUI host
//! is a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a wall-clock-based state machine; the host ticks it
//!   periodically and resyncs it on foreground, so remaining time never
//!   drifts across suspensions
//! - **Streak/Stats**: pure calendar-day streak arithmetic over the session
//!   log
//! - **Gate**: total decision functions for the free-session allowance
//! - **Storage**: atomic JSON session log plus flat page-image files, and
//!   TOML settings
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: countdown state machine
//! - [`Journal`]: session log, streaks, and gating behind one surface
//! - [`Settings`]: user preferences and the entitlement snapshot

pub mod clock;
pub mod error;
pub mod events;
pub mod gate;
pub mod journal;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, SystemClock};
pub use error::{CoreError, Result, SettingsError, StorageError};
pub use events::Event;
pub use gate::{can_start, remaining_free, FreeSessions, GateDecision, FREE_SESSION_LIMIT};
pub use journal::Journal;
pub use session::SessionRecord;
pub use stats::UserStats;
pub use storage::{JsonStore, MemoryStore, SessionStore, Settings, DURATION_PRESETS};
pub use timer::{TimerEngine, TimerState};
