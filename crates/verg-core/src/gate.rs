//! Free-session gating.
//!
//! Pure decision functions in front of the paywall: premium users always
//! pass, free users get a fixed lifetime allowance. Counts are signed and
//! the functions are total, so negative inputs are defined (and permissive)
//! rather than guarded.

use serde::{Deserialize, Serialize};

/// Lifetime free-session allowance for non-subscribers.
pub const FREE_SESSION_LIMIT: i64 = 3;

/// Whether a new session may start.
pub fn can_start(is_premium: bool, completed_sessions: i64, free_limit: i64) -> bool {
    if is_premium {
        return true;
    }
    completed_sessions < free_limit
}

/// Free sessions still available to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreeSessions {
    /// Premium: no limit applies.
    Unlimited,
    Remaining(i64),
}

/// Remaining allowance; [`FreeSessions::Unlimited`] when premium, otherwise
/// clamped at zero.
pub fn remaining_free(is_premium: bool, completed_sessions: i64, free_limit: i64) -> FreeSessions {
    if is_premium {
        FreeSessions::Unlimited
    } else {
        FreeSessions::Remaining(free_limit.saturating_sub(completed_sessions).max(0))
    }
}

/// Snapshot decision handed to the host when a session start is attempted.
///
/// The gate never caches or polls: callers pass the entitlement and the
/// completed-session count as observed at the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    pub allowed: bool,
    pub remaining: FreeSessions,
}

impl GateDecision {
    pub fn evaluate(is_premium: bool, completed_sessions: i64, free_limit: i64) -> Self {
        Self {
            allowed: can_start(is_premium, completed_sessions, free_limit),
            remaining: remaining_free(is_premium, completed_sessions, free_limit),
        }
    }

    /// Hosts surface the paywall exactly when the start is refused.
    pub fn should_show_paywall(&self) -> bool {
        !self.allowed
    }
}
