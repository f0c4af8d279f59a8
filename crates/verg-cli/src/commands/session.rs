//! Session-log subcommands.

use std::path::PathBuf;

use clap::Subcommand;
use uuid::Uuid;
use verg_core::{Journal, JsonStore, Settings, SystemClock};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Record a completed writing session (gate-checked)
    Record {
        /// Minutes spent writing
        #[arg(long)]
        minutes: u64,
        /// Photo of the written page to import; omit if skipped
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// List sessions, newest first
    List {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a session and its page image
    Delete {
        /// Session id
        id: Uuid,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default();
    let store = JsonStore::open()?;

    match action {
        SessionAction::Record { minutes, image } => {
            let mut journal = Journal::open(store, Box::new(SystemClock))?;

            // Gate before touching the image dir so a refused attempt
            // imports nothing.
            let decision = journal.gate(settings.is_subscribed, settings.free_session_limit);
            if decision.should_show_paywall() {
                eprintln!("free sessions used up: subscribe to keep writing");
                std::process::exit(1);
            }

            let image_name = image
                .map(|path| journal.store().import_image(&path))
                .transpose()?;
            match journal.complete_session(minutes.saturating_mul(60), image_name.clone()) {
                Ok((_, event)) => println!("{}", serde_json::to_string_pretty(&event)?),
                Err(e) => {
                    // The append failed; don't leave the imported copy
                    // orphaned in the image dir.
                    if let Some(name) = image_name {
                        let _ = std::fs::remove_file(journal.store().image_path(&name));
                    }
                    return Err(e.into());
                }
            }
        }
        SessionAction::List { json } => {
            let journal = Journal::open(store, Box::new(SystemClock))?;
            if json {
                println!("{}", serde_json::to_string_pretty(journal.sessions())?);
            } else {
                for session in journal.sessions() {
                    println!(
                        "{}  {}  {}  {}",
                        session.id,
                        session.formatted_date(),
                        session.formatted_time(),
                        session.formatted_duration(),
                    );
                }
            }
        }
        SessionAction::Delete { id } => {
            let mut journal = Journal::open(store, Box::new(SystemClock))?;
            let event = journal.delete_session(id)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
