//! TOML-based user settings.
//!
//! Stores the writing-timer duration preset, sound and reminder toggles,
//! onboarding state, and the local subscription-entitlement snapshot the
//! session gate reads. Stored at `~/.config/verg/settings.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::SettingsError;
use crate::gate::FREE_SESSION_LIMIT;

/// Selectable writing durations, in seconds (5 to 30 minutes).
pub const DURATION_PRESETS: [u64; 5] = [300, 600, 900, 1200, 1800];

/// Timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
}

/// Daily reminder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_notification_hour")]
    pub hour: u8,
    #[serde(default)]
    pub minute: u8,
}

/// Application settings.
///
/// Serialized to/from TOML at `~/.config/verg/settings.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub timer: TimerSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default)]
    pub has_seen_onboarding: bool,
    /// Entitlement snapshot; refreshed by the purchase collaborator, only
    /// read here.
    #[serde(default)]
    pub is_subscribed: bool,
    #[serde(default = "default_free_limit")]
    pub free_session_limit: i64,
}

fn default_duration_secs() -> u64 {
    600
}
fn default_notification_hour() -> u8 {
    20
}
fn default_true() -> bool {
    true
}
fn default_free_limit() -> i64 {
    FREE_SESSION_LIMIT
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            hour: default_notification_hour(),
            minute: 0,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer: TimerSettings::default(),
            notifications: NotificationSettings::default(),
            sound_enabled: true,
            has_seen_onboarding: false,
            is_subscribed: false,
            free_session_limit: FREE_SESSION_LIMIT,
        }
    }
}

impl Settings {
    fn path() -> Result<PathBuf, SettingsError> {
        let dir = data_dir().map_err(|e| SettingsError::LoadFailed {
            path: PathBuf::from("~/.config/verg"),
            message: e.to_string(),
        })?;
        Ok(dir.join("settings.toml"))
    }

    /// Load from disk, or write and return the defaults when no settings
    /// file exists yet.
    ///
    /// # Errors
    /// Returns an error if the settings file exists but cannot be read or
    /// parsed, or if the defaults cannot be written. Only a missing file
    /// triggers the write-defaults branch; any other read failure leaves
    /// the file untouched.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::path()?)
    }

    fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let load_failed = |message: String| SettingsError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| load_failed(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save_to(path)?;
                Ok(settings)
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::path()?)
    }

    fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let save_failed = |message: String| SettingsError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Snap an arbitrary duration to the nearest preset.
    pub fn nearest_preset(duration_secs: u64) -> u64 {
        *DURATION_PRESETS
            .iter()
            .min_by_key(|&&p| p.abs_diff(duration_secs))
            .unwrap_or(&default_duration_secs())
    }

    /// Set the timer duration, snapping to the preset list.
    pub fn set_duration_secs(&mut self, duration_secs: u64) {
        self.timer.duration_secs = Self::nearest_preset(duration_secs);
    }

    /// Get a settings value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a settings value by dot-separated key and persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// to the field's type, or the file cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let invalid = |message: String| SettingsError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        if key == "timer.duration_secs" {
            self.set_duration_secs(self.timer.duration_secs);
        }
        self.save()
    }
}

fn get_json_value_by_path<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_json_value_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), SettingsError> {
    let unknown = || SettingsError::UnknownKey(key.to_string());
    let invalid = |message: String| SettingsError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(unknown());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<i64>() {
                        serde_json::Value::Number(n.into())
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current.get_mut(part).ok_or_else(unknown)?;
    }

    Err(unknown())
}
