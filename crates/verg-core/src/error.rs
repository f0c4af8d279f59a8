//! Core error types for verg-core.
//!
//! All failures surface as result values. The gate and streak functions are
//! total and never appear here; the error surface is storage and settings.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Core error type for verg-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Settings-related errors
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session-store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read or write the journal file
    #[error("Failed to access journal at {path}: {source}")]
    JournalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Journal file exists but cannot be decoded
    #[error("Failed to decode journal at {path}: {source}")]
    JournalDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Journal state cannot be encoded for persistence
    #[error("Failed to encode journal: {0}")]
    JournalEncode(#[source] serde_json::Error),

    /// No session with the given id exists
    #[error("No session with id {0}")]
    SessionNotFound(Uuid),

    /// A page image could not be imported into the image directory
    #[error("Failed to import page image from {path}: {source}")]
    ImageImport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data directory cannot be determined or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(#[source] std::io::Error),
}

/// Settings-file errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to load settings
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save settings
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Value cannot be parsed for the given key
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
