//! Writing-timer subcommands.
//!
//! The engine is persisted as JSON between invocations and resynced from
//! its stored target instant on every load, so `status` shows the true
//! remaining time no matter how long ago `start` ran.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use verg_core::storage::data_dir;
use verg_core::{Clock, Journal, JsonStore, Settings, SystemClock, TimerEngine};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a writing session (gate-checked)
    Start {
        /// Duration in minutes; defaults to the configured preset
        #[arg(long)]
        minutes: Option<u64>,
    },
    /// Pause the running timer
    Pause,
    /// Resume a paused timer
    Resume,
    /// Reset to idle
    Reset,
    /// Print current timer state as JSON
    Status,
}

fn engine_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(data_dir()?.join("timer.json"))
}

fn load_engine() -> TimerEngine {
    if let Ok(path) = engine_path() {
        if let Ok(json) = std::fs::read_to_string(path) {
            if let Ok(engine) = serde_json::from_str::<TimerEngine>(&json) {
                return engine;
            }
        }
    }
    TimerEngine::new()
}

fn save_engine(engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    std::fs::write(engine_path()?, json)?;
    Ok(())
}

fn print_event(event: &verg_core::Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let now: DateTime<Utc> = SystemClock.now();
    let mut engine = load_engine();

    // Catch up with wall-clock truth before acting; a completion that
    // happened while no process was running surfaces here.
    if let Some(event) = engine.resync(now) {
        print_event(&event)?;
    }

    match action {
        TimerAction::Start { minutes } => {
            let settings = Settings::load_or_default();
            let store = JsonStore::open()?;
            let journal = Journal::open(store, Box::new(SystemClock))?;
            let decision = journal.gate(settings.is_subscribed, settings.free_session_limit);
            if decision.should_show_paywall() {
                eprintln!("free sessions used up: subscribe to keep writing");
                std::process::exit(1);
            }
            let duration_secs = minutes
                .map(|m| m.saturating_mul(60))
                .unwrap_or(settings.timer.duration_secs);
            let event = engine.start(duration_secs as i64, now);
            print_event(&event)?;
        }
        TimerAction::Pause => {
            if let Some(event) = engine.pause(now) {
                print_event(&event)?;
            } else {
                print_event(&engine.snapshot(now))?;
            }
        }
        TimerAction::Resume => {
            if let Some(event) = engine.resume(now) {
                print_event(&event)?;
            } else {
                print_event(&engine.snapshot(now))?;
            }
        }
        TimerAction::Reset => {
            let event = engine.reset(now);
            print_event(&event)?;
        }
        TimerAction::Status => {
            print_event(&engine.snapshot(now))?;
        }
    }

    save_engine(&engine)?;
    Ok(())
}
