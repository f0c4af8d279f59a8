//! Settings subcommands.

use clap::Subcommand;
use verg_core::Settings;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Dot-path key (e.g. "timer.duration_secs", "sound_enabled")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Dot-path key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings as JSON
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let settings = Settings::load_or_default();
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load_or_default();
            settings.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let settings = Settings::load_or_default();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Reset => {
            let settings = Settings::default();
            settings.save()?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
