//! Completed writing sessions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed writing session.
///
/// Records are immutable once created. The page image is an opaque file name
/// owned by the store's image directory; `None` when the user skipped the
/// photo (skipped sessions still count).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    /// Calendar day the session counts toward. Attributed from the
    /// completion timestamp, not the day the timer started.
    pub occurred_on: NaiveDate,
    pub duration_secs: u64,
    #[serde(default)]
    pub image: Option<String>,
    /// Creation instant, used for display ordering only.
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(now: DateTime<Utc>, duration_secs: u64, image: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_on: now.date_naive(),
            duration_secs,
            image,
            created_at: now,
        }
    }

    /// Formatted duration string (e.g., "10 min").
    pub fn formatted_duration(&self) -> String {
        format!("{} min", self.duration_secs / 60)
    }

    /// Formatted date string (e.g., "Jan 15, 2024").
    pub fn formatted_date(&self) -> String {
        self.occurred_on.format("%b %-d, %Y").to_string()
    }

    /// Formatted creation time (e.g., "8:30 PM").
    pub fn formatted_time(&self) -> String {
        self.created_at.format("%-I:%M %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn counts_toward_day_of_its_timestamp() {
        // A session completing exactly at midnight belongs to the new day.
        let midnight = Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap();
        let record = SessionRecord::new(midnight, 600, None);
        assert_eq!(
            record.occurred_on,
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
        );
    }

    #[test]
    fn display_helpers() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 20, 30, 0).unwrap();
        let record = SessionRecord::new(at, 600, Some("page.jpg".into()));
        assert_eq!(record.formatted_duration(), "10 min");
        assert_eq!(record.formatted_date(), "Jan 15, 2024");
        assert_eq!(record.formatted_time(), "8:30 PM");
    }
}
