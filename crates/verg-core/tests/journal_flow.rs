//! End-to-end flow over the durable store: gate, timer, session log,
//! streaks, all driven by a hand-stepped clock against a tempdir journal.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use verg_core::{
    Clock, Event, FreeSessions, Journal, JsonStore, SessionStore, TimerEngine, TimerState,
    FREE_SESSION_LIMIT,
};

#[derive(Clone)]
struct ManualClock(Rc<Cell<DateTime<Utc>>>);

impl ManualClock {
    fn starting(at: DateTime<Utc>) -> Self {
        Self(Rc::new(Cell::new(at)))
    }

    fn advance_days(&self, days: i64) {
        self.0.set(self.0.get() + Duration::days(days));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

fn evening(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 20, 0, 0).unwrap()
}

#[test]
fn full_writing_flow_until_paywall() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::starting(evening(2024, 1, 15));

    let store = JsonStore::open_at(dir.path()).unwrap();
    let mut journal = Journal::open(store, Box::new(clock.clone())).unwrap();

    // Three free sessions on consecutive evenings, each run through the
    // timer to completion.
    for day in 0..3 {
        let decision = journal.gate(false, FREE_SESSION_LIMIT);
        assert!(decision.allowed, "free session {day} should be allowed");

        let mut engine = TimerEngine::new();
        engine.start(600, clock.now());
        let done = engine.tick(clock.now() + Duration::seconds(600));
        assert!(matches!(done, Some(Event::TimerCompleted { .. })));
        assert_eq!(engine.state(), TimerState::Complete);

        journal
            .complete_session(600, Some(format!("page-{day}.jpg")))
            .unwrap();
        clock.advance_days(1);
    }

    let stats = journal.stats();
    assert_eq!(stats.total_sessions, 3);
    assert_eq!(stats.current_streak, 3);
    assert_eq!(stats.longest_streak, 3);

    // Fourth attempt hits the paywall.
    let decision = journal.gate(false, FREE_SESSION_LIMIT);
    assert!(decision.should_show_paywall());
    assert_eq!(decision.remaining, FreeSessions::Remaining(0));

    // Subscribing lifts it.
    let premium = journal.gate(true, FREE_SESSION_LIMIT);
    assert!(premium.allowed);
    assert_eq!(premium.remaining, FreeSessions::Unlimited);
}

#[test]
fn streak_survives_restart_but_not_a_gap() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::starting(evening(2024, 1, 15));

    {
        let store = JsonStore::open_at(dir.path()).unwrap();
        let mut journal = Journal::open(store, Box::new(clock.clone())).unwrap();
        journal.complete_session(600, None).unwrap();
        clock.advance_days(1);
        journal.complete_session(600, None).unwrap();
    }

    // Relaunch the next day: the streak holds.
    clock.advance_days(1);
    {
        let store = JsonStore::open_at(dir.path()).unwrap();
        let journal = Journal::open(store, Box::new(clock.clone())).unwrap();
        assert_eq!(journal.stats().current_streak, 2);
    }

    // Relaunch after skipping two more days: lapsed, history intact.
    clock.advance_days(2);
    let store = JsonStore::open_at(dir.path()).unwrap();
    let journal = Journal::open(store, Box::new(clock.clone())).unwrap();
    let stats = journal.stats();
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.longest_streak, 2);
    assert_eq!(stats.total_sessions, 2);

    // The persisted lapse survives yet another reload.
    let reloaded = JsonStore::open_at(dir.path()).unwrap();
    assert_eq!(reloaded.load_stats().current_streak, 0);
}

#[test]
fn timer_state_persists_across_processes() {
    let dir = tempfile::tempdir().unwrap();
    let start = evening(2024, 1, 15);
    let state_path = dir.path().join("timer.json");

    // Process one starts a 10-minute timer and exits.
    {
        let mut engine = TimerEngine::new();
        engine.start(600, start);
        std::fs::write(&state_path, serde_json::to_string(&engine).unwrap()).unwrap();
    }

    // Process two wakes up 12 minutes later and resyncs.
    let json = std::fs::read_to_string(&state_path).unwrap();
    let mut engine: TimerEngine = serde_json::from_str(&json).unwrap();
    let event = engine.resync(start + Duration::seconds(720));
    assert!(matches!(event, Some(Event::TimerCompleted { .. })));
    assert_eq!(engine.remaining_ms(), 0);
    assert_eq!(engine.state(), TimerState::Complete);
}
