//! Streak and session statistics.

use clap::Subcommand;
use verg_core::{Clock, Journal, JsonStore, Settings, SystemClock};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Streak, totals, and remaining free sessions
    Show,
    /// Per-day session counts
    Calendar,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonStore::open()?;
    let journal = Journal::open(store, Box::new(SystemClock))?;

    match action {
        StatsAction::Show => {
            let settings = Settings::load_or_default();
            let stats = journal.stats();
            let decision = journal.gate(settings.is_subscribed, settings.free_session_limit);
            let now = SystemClock.now();

            eprintln!("{}", stats.streak_display_text());
            let summary = serde_json::json!({
                "current_streak": stats.current_streak,
                "longest_streak": stats.longest_streak,
                "total_sessions": stats.total_sessions,
                "has_written_today": stats.has_written_today(now),
                "streak_at_risk": stats.streak_at_risk(now),
                "sessions_this_month": journal.sessions_in_month(
                    chrono::Datelike::year(&now.date_naive()),
                    chrono::Datelike::month(&now.date_naive()),
                ),
                "average_sessions_per_week": journal.average_sessions_per_week(),
                "remaining_free_sessions": decision.remaining,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Calendar => {
            let counts = journal.session_counts_by_date();
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
    }
    Ok(())
}
