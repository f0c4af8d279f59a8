//! User statistics and streak arithmetic.
//!
//! Streaks count consecutive calendar days with at least one completed
//! session. All comparisons are calendar-day equality, never 24-hour
//! windows; every operation takes `now` explicitly so the rules stay pure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate user statistics, persisted alongside the session log.
///
/// Invariant after every operation: `longest_streak >= current_streak`.
/// `total_sessions` is a lifetime count; streak logic never decrements it,
/// and neither does session deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub last_session_date: Option<DateTime<Utc>>,
}

impl UserStats {
    /// Whether a session was already completed on `now`'s calendar day.
    pub fn has_written_today(&self, now: DateTime<Utc>) -> bool {
        self.last_session_date
            .is_some_and(|last| last.date_naive() == now.date_naive())
    }

    /// Whether the last session fell on the day immediately before `now`.
    pub fn wrote_yesterday(&self, now: DateTime<Utc>) -> bool {
        self.last_session_date.is_some_and(|last| {
            now.date_naive()
                .signed_duration_since(last.date_naive())
                .num_days()
                == 1
        })
    }

    /// Update stats after completing a session.
    ///
    /// `total_sessions` always increments; the streak moves at most once
    /// per calendar day.
    pub fn record_session(&mut self, now: DateTime<Utc>) {
        self.total_sessions += 1;

        if !self.has_written_today(now) {
            if self.wrote_yesterday(now) || self.last_session_date.is_none() {
                self.current_streak += 1;
            } else {
                self.current_streak = 1;
            }
            self.longest_streak = self.longest_streak.max(self.current_streak);
        }

        self.last_session_date = Some(now);
    }

    /// Validate the streak at process start; zero it when the last session
    /// is neither today nor yesterday. Longest streak and totals untouched.
    pub fn validate_streak(&mut self, now: DateTime<Utc>) {
        if self.last_session_date.is_none()
            || (!self.has_written_today(now) && !self.wrote_yesterday(now))
        {
            self.current_streak = 0;
        }
    }

    /// Streak broken tomorrow unless the user writes today.
    pub fn streak_at_risk(&self, now: DateTime<Utc>) -> bool {
        !self.has_written_today(now) && self.current_streak > 0
    }

    /// Days left before the streak lapses.
    pub fn days_until_streak_breaks(&self, now: DateTime<Utc>) -> u32 {
        if self.has_written_today(now) {
            2
        } else {
            1
        }
    }

    /// Formatted streak text.
    pub fn streak_text(&self) -> String {
        match self.current_streak {
            0 => "Start your streak!".to_string(),
            1 => "1 day streak".to_string(),
            n => format!("{n} day streak"),
        }
    }

    /// Streak text with the fire marker used on the home screen.
    pub fn streak_display_text(&self) -> String {
        if self.current_streak == 0 {
            "Start your streak today!".to_string()
        } else {
            format!("\u{1F525} {}", self.streak_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn first_session_starts_streak() {
        let mut stats = UserStats::default();
        stats.record_session(at(2024, 1, 15, 20));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.total_sessions, 1);
        assert!(stats.has_written_today(at(2024, 1, 15, 23)));
    }

    #[test]
    fn same_day_sessions_count_once_toward_streak() {
        let mut stats = UserStats::default();
        stats.record_session(at(2024, 1, 15, 8));
        stats.record_session(at(2024, 1, 15, 21));
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn yesterday_continues_streak() {
        let mut stats = UserStats::default();
        stats.record_session(at(2024, 1, 15, 20));
        stats.record_session(at(2024, 1, 16, 7));
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn calendar_day_not_24h_window() {
        let mut stats = UserStats::default();
        // 23:59 then 00:01 the next day is a continuation even though
        // almost no wall time passed.
        stats.record_session(at(2024, 1, 15, 23));
        stats.record_session(Utc.with_ymd_and_hms(2024, 1, 16, 0, 1, 0).unwrap());
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn gap_resets_streak_to_one() {
        let mut stats = UserStats::default();
        stats.record_session(at(2024, 1, 10, 20));
        stats.record_session(at(2024, 1, 11, 20));
        stats.record_session(at(2024, 1, 14, 20)); // 3 days later
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn longest_streak_never_decreases() {
        let mut stats = UserStats::default();
        let mut day = at(2024, 1, 1, 12);
        let mut longest = 0;
        for gap in [1, 1, 1, 5, 1, 3, 1, 1, 7] {
            stats.record_session(day);
            assert!(stats.longest_streak >= longest);
            assert!(stats.longest_streak >= stats.current_streak);
            longest = stats.longest_streak;
            day += Duration::days(gap);
        }
        assert_eq!(stats.longest_streak, 4);
    }

    #[test]
    fn validate_zeroes_lapsed_streak() {
        let mut stats = UserStats::default();
        stats.record_session(at(2024, 1, 10, 20));
        stats.record_session(at(2024, 1, 11, 20));

        // Relaunch the next day: still valid.
        let mut next_day = stats;
        next_day.validate_streak(at(2024, 1, 12, 9));
        assert_eq!(next_day.current_streak, 2);

        // Relaunch three days later: lapsed.
        let mut later = stats;
        later.validate_streak(at(2024, 1, 14, 9));
        assert_eq!(later.current_streak, 0);
        assert_eq!(later.longest_streak, 2);
        assert_eq!(later.total_sessions, 2);
    }

    #[test]
    fn validate_with_no_sessions_forces_zero() {
        let mut stats = UserStats {
            current_streak: 9,
            longest_streak: 9,
            ..Default::default()
        };
        stats.validate_streak(at(2024, 1, 15, 9));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 9);
    }

    #[test]
    fn at_risk_flag() {
        let mut stats = UserStats::default();
        stats.record_session(at(2024, 1, 15, 20));
        assert!(!stats.streak_at_risk(at(2024, 1, 15, 22)));
        assert!(stats.streak_at_risk(at(2024, 1, 16, 9)));
        assert_eq!(stats.days_until_streak_breaks(at(2024, 1, 15, 22)), 2);
        assert_eq!(stats.days_until_streak_breaks(at(2024, 1, 16, 9)), 1);
    }

    #[test]
    fn streak_text_forms() {
        let mut stats = UserStats::default();
        assert_eq!(stats.streak_text(), "Start your streak!");
        stats.record_session(at(2024, 1, 15, 20));
        assert_eq!(stats.streak_text(), "1 day streak");
        stats.record_session(at(2024, 1, 16, 20));
        assert_eq!(stats.streak_text(), "2 day streak");
        assert!(stats.streak_display_text().contains("2 day streak"));
    }
}
