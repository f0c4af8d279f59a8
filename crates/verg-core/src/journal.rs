//! Journal service.
//!
//! Wires the session store, streak stats, and gate together behind one
//! surface. Collaborators are injected: the store by value, the clock as a
//! trait object, entitlement and limits as plain arguments at the call
//! site. No ambient globals anywhere.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::StorageError;
use crate::events::Event;
use crate::gate::GateDecision;
use crate::session::SessionRecord;
use crate::stats::UserStats;
use crate::storage::SessionStore;

pub struct Journal<S: SessionStore> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: SessionStore> Journal<S> {
    /// Open the journal and validate the streak once, persisting the result
    /// when it changed (the streak may have lapsed while the app was closed).
    pub fn open(store: S, clock: Box<dyn Clock>) -> Result<Self, StorageError> {
        let mut journal = Self { store, clock };
        journal.refresh_streak()?;
        Ok(journal)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // ── Gating ───────────────────────────────────────────────────────

    /// Gate decision from the entitlement snapshot and the current log
    /// length. Evaluated fresh on every attempt, never cached.
    pub fn gate(&self, is_premium: bool, free_limit: i64) -> GateDecision {
        GateDecision::evaluate(is_premium, self.store.all().len() as i64, free_limit)
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Record a completed writing session.
    ///
    /// Appends the record and the recomputed stats in one durable step; a
    /// persistence failure leaves both in-memory halves unchanged. The
    /// session counts toward the calendar day of the completion instant.
    /// `image` is `None` when the photo was skipped; the session counts
    /// either way.
    pub fn complete_session(
        &mut self,
        duration_secs: u64,
        image: Option<String>,
    ) -> Result<(SessionRecord, Event), StorageError> {
        let now = self.clock.now();
        let record = SessionRecord::new(now, duration_secs, image);

        let mut stats = self.store.load_stats();
        stats.record_session(now);
        self.store.append_with_stats(record.clone(), stats)?;

        let event = Event::SessionRecorded {
            id: record.id,
            occurred_on: record.occurred_on,
            duration_secs,
            at: now,
        };
        Ok((record, event))
    }

    /// Delete a session and release its page image.
    ///
    /// Stats are untouched: `total_sessions` keeps counting the deleted
    /// session for the lifetime tally, while the gate (which reads the log
    /// length) sees the slot freed.
    pub fn delete_session(&mut self, id: Uuid) -> Result<Event, StorageError> {
        self.store.delete(id)?;
        Ok(Event::SessionDeleted {
            id,
            at: self.clock.now(),
        })
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        self.store.all()
    }

    pub fn get_session(&self, id: Uuid) -> Option<&SessionRecord> {
        self.store.get(id)
    }

    // ── Stats ────────────────────────────────────────────────────────

    pub fn stats(&self) -> UserStats {
        self.store.load_stats()
    }

    /// Re-validate the streak against the current day and persist when it
    /// lapsed. Called once at open; hosts may call it again on foreground.
    pub fn refresh_streak(&mut self) -> Result<(), StorageError> {
        let now = self.clock.now();
        let mut stats = self.store.load_stats();
        let before = stats;
        stats.validate_streak(now);
        if stats != before {
            self.store.save_stats(stats)?;
        }
        Ok(())
    }

    pub fn has_written_today(&self) -> bool {
        self.stats().has_written_today(self.clock.now())
    }

    // ── Calendar queries ─────────────────────────────────────────────

    pub fn sessions_on(&self, date: NaiveDate) -> Vec<&SessionRecord> {
        self.store
            .all()
            .iter()
            .filter(|s| s.occurred_on == date)
            .collect()
    }

    /// Days with at least one session, for calendar highlighting.
    pub fn dates_with_sessions(&self) -> BTreeSet<NaiveDate> {
        self.store.all().iter().map(|s| s.occurred_on).collect()
    }

    /// Session counts per day, for calendar badges.
    pub fn session_counts_by_date(&self) -> BTreeMap<NaiveDate, usize> {
        let mut counts = BTreeMap::new();
        for session in self.store.all() {
            *counts.entry(session.occurred_on).or_insert(0) += 1;
        }
        counts
    }

    pub fn sessions_in_month(&self, year: i32, month: u32) -> usize {
        self.store
            .all()
            .iter()
            .filter(|s| s.occurred_on.year() == year && s.occurred_on.month() == month)
            .count()
    }

    /// Average sessions per week since the first session; zero until there
    /// is more than one session.
    pub fn average_sessions_per_week(&self) -> f64 {
        let sessions = self.store.all();
        if sessions.len() < 2 {
            return 0.0;
        }
        // Newest first, so the oldest session is last.
        let first = &sessions[sessions.len() - 1];
        let days = self
            .clock
            .now()
            .date_naive()
            .signed_duration_since(first.occurred_on)
            .num_days();
        let weeks = (days as f64 / 7.0).max(1.0);
        sessions.len() as f64 / weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{FreeSessions, FREE_SESSION_LIMIT};
    use crate::storage::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock whose instant the test moves by hand.
    #[derive(Clone)]
    struct ManualClock(Rc<Cell<DateTime<Utc>>>);

    impl ManualClock {
        fn at(y: i32, m: u32, d: u32, h: u32) -> Self {
            Self(Rc::new(Cell::new(
                Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            )))
        }

        fn set(&self, y: i32, m: u32, d: u32, h: u32) {
            self.0.set(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap());
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.0.get()
        }
    }

    fn journal_at(clock: &ManualClock) -> Journal<MemoryStore> {
        Journal::open(MemoryStore::new(), Box::new(clock.clone())).unwrap()
    }

    #[test]
    fn completing_updates_log_and_streak() {
        let clock = ManualClock::at(2024, 1, 15, 20);
        let mut journal = journal_at(&clock);

        let (record, _) = journal.complete_session(600, None).unwrap();
        assert_eq!(record.occurred_on, clock.now().date_naive());
        assert_eq!(journal.sessions().len(), 1);
        assert_eq!(journal.stats().current_streak, 1);
        assert!(journal.has_written_today());

        clock.set(2024, 1, 16, 7);
        journal.complete_session(900, Some("page.jpg".into())).unwrap();
        assert_eq!(journal.stats().current_streak, 2);
        assert_eq!(journal.stats().total_sessions, 2);
    }

    #[test]
    fn gate_blocks_fourth_free_session() {
        let clock = ManualClock::at(2024, 1, 15, 8);
        let mut journal = journal_at(&clock);

        for day in 15..18 {
            clock.set(2024, 1, day, 20);
            assert!(journal.gate(false, FREE_SESSION_LIMIT).allowed);
            journal.complete_session(600, None).unwrap();
        }

        let decision = journal.gate(false, FREE_SESSION_LIMIT);
        assert!(!decision.allowed);
        assert!(decision.should_show_paywall());
        assert_eq!(decision.remaining, FreeSessions::Remaining(0));
        assert!(journal.gate(true, FREE_SESSION_LIMIT).allowed);
    }

    #[test]
    fn deletion_frees_gate_slot_but_not_lifetime_total() {
        let clock = ManualClock::at(2024, 1, 15, 20);
        let mut journal = journal_at(&clock);

        let mut ids = Vec::new();
        for _ in 0..3 {
            let (record, _) = journal.complete_session(600, None).unwrap();
            ids.push(record.id);
        }
        assert!(!journal.gate(false, FREE_SESSION_LIMIT).allowed);

        journal.delete_session(ids[0]).unwrap();
        // The gate counts the log, so a slot opens up again...
        assert!(journal.gate(false, FREE_SESSION_LIMIT).allowed);
        // ...while the lifetime tally keeps the deleted session.
        assert_eq!(journal.stats().total_sessions, 3);
    }

    #[test]
    fn delete_unknown_id_fails() {
        let clock = ManualClock::at(2024, 1, 15, 20);
        let mut journal = journal_at(&clock);
        assert!(journal.delete_session(Uuid::new_v4()).is_err());
    }

    #[test]
    fn open_validates_a_lapsed_streak() {
        let clock = ManualClock::at(2024, 1, 15, 20);
        let mut store = MemoryStore::new();
        let mut stats = UserStats::default();
        stats.record_session(Utc.with_ymd_and_hms(2024, 1, 10, 20, 0, 0).unwrap());
        stats.record_session(Utc.with_ymd_and_hms(2024, 1, 11, 20, 0, 0).unwrap());
        store.save_stats(stats).unwrap();

        let journal = Journal::open(store, Box::new(clock)).unwrap();
        assert_eq!(journal.stats().current_streak, 0);
        assert_eq!(journal.stats().longest_streak, 2);
        assert_eq!(journal.stats().total_sessions, 2);
    }

    #[test]
    fn calendar_queries() {
        let clock = ManualClock::at(2024, 1, 15, 8);
        let mut journal = journal_at(&clock);

        journal.complete_session(600, None).unwrap();
        clock.set(2024, 1, 15, 21);
        journal.complete_session(600, None).unwrap();
        clock.set(2024, 2, 1, 9);
        journal.complete_session(600, None).unwrap();

        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(journal.sessions_on(jan15).len(), 2);
        assert_eq!(journal.dates_with_sessions().len(), 2);
        assert_eq!(journal.session_counts_by_date()[&jan15], 2);
        assert_eq!(journal.sessions_in_month(2024, 1), 2);
        assert_eq!(journal.sessions_in_month(2024, 2), 1);
    }

    #[test]
    fn average_per_week_needs_history() {
        let clock = ManualClock::at(2024, 1, 1, 8);
        let mut journal = journal_at(&clock);
        assert_eq!(journal.average_sessions_per_week(), 0.0);

        journal.complete_session(600, None).unwrap();
        assert_eq!(journal.average_sessions_per_week(), 0.0);

        clock.set(2024, 1, 15, 8);
        journal.complete_session(600, None).unwrap();
        // 2 sessions over 14 days.
        assert!((journal.average_sessions_per_week() - 1.0).abs() < 1e-9);
    }
}
