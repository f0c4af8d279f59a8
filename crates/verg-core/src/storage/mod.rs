mod settings;
mod store;

pub use settings::{NotificationSettings, Settings, TimerSettings, DURATION_PRESETS};
pub use store::{JsonStore, MemoryStore, SessionStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/verg[-dev]/` based on VERG_ENV.
///
/// Set VERG_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("VERG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("verg-dev")
    } else {
        base_dir.join("verg")
    };

    std::fs::create_dir_all(&dir).map_err(StorageError::DataDir)?;
    Ok(dir)
}
