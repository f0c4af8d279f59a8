//! Session-log persistence.
//!
//! The journal document holds the session log and aggregate stats together
//! and is written in one atomic step (temp file + rename), so an append or
//! delete can never leave the two halves inconsistent. Page images live as
//! one file per session under `pages/`, named by UUID; the log stores only
//! the file name.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_dir;
use crate::error::StorageError;
use crate::session::SessionRecord;
use crate::stats::UserStats;

/// Storage collaborator contract for the session log and stats.
///
/// Implementations keep the log ordered newest-first and must leave
/// in-memory state unchanged when a write fails.
pub trait SessionStore {
    /// Append a completed session to the log.
    fn append(&mut self, record: SessionRecord) -> Result<(), StorageError>;

    /// Append a session and persist updated stats in one durable step.
    fn append_with_stats(
        &mut self,
        record: SessionRecord,
        stats: UserStats,
    ) -> Result<(), StorageError> {
        self.append(record)?;
        self.save_stats(stats)
    }

    /// All sessions, newest first.
    fn all(&self) -> &[SessionRecord];

    fn get(&self, id: Uuid) -> Option<&SessionRecord>;

    /// Remove a session and release its page image.
    fn delete(&mut self, id: Uuid) -> Result<SessionRecord, StorageError>;

    fn load_stats(&self) -> UserStats;

    fn save_stats(&mut self, stats: UserStats) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JournalDoc {
    #[serde(default)]
    sessions: Vec<SessionRecord>,
    #[serde(default)]
    stats: UserStats,
}

/// Durable store backed by a single JSON document plus flat image files.
///
/// Layout under the data directory:
/// - `journal.json` — session log and stats
/// - `pages/<uuid>.<ext>` — one captured page image per session
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    images_dir: PathBuf,
    doc: JournalDoc,
}

impl JsonStore {
    /// Open the journal at `~/.config/verg/journal.json`, creating an empty
    /// one if none exists.
    pub fn open() -> Result<Self, StorageError> {
        let dir = data_dir()?;
        Self::open_at(&dir)
    }

    /// Open a journal rooted at an explicit directory (tests use a tempdir).
    pub fn open_at(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join("journal.json");
        let images_dir = dir.join("pages");
        fs::create_dir_all(&images_dir).map_err(StorageError::DataDir)?;

        let doc = match fs::read_to_string(&path) {
            Ok(content) => {
                let mut doc: JournalDoc =
                    serde_json::from_str(&content).map_err(|source| {
                        StorageError::JournalDecode {
                            path: path.clone(),
                            source,
                        }
                    })?;
                doc.sessions
                    .sort_by(|a, b| b.created_at.cmp(&a.created_at));
                doc
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => JournalDoc::default(),
            Err(source) => {
                return Err(StorageError::JournalIo {
                    path: path.clone(),
                    source,
                })
            }
        };

        Ok(Self {
            path,
            images_dir,
            doc,
        })
    }

    /// Copy a page image into the store, returning the stored file name.
    pub fn import_image(&self, source: &Path) -> Result<String, StorageError> {
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg");
        let name = format!("{}.{ext}", Uuid::new_v4());
        fs::copy(source, self.images_dir.join(&name)).map_err(|e| StorageError::ImageImport {
            path: source.to_path_buf(),
            source: e,
        })?;
        Ok(name)
    }

    /// Absolute path of a stored page image.
    pub fn image_path(&self, name: &str) -> PathBuf {
        self.images_dir.join(name)
    }

    /// Write the document atomically: temp file in the same directory,
    /// then rename over the target.
    fn persist(&self, doc: &JournalDoc) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(doc).map_err(StorageError::JournalEncode)?;
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source| StorageError::JournalIo {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, content).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl SessionStore for JsonStore {
    fn append(&mut self, record: SessionRecord) -> Result<(), StorageError> {
        let mut doc = JournalDoc {
            sessions: self.doc.sessions.clone(),
            stats: self.doc.stats,
        };
        doc.sessions.insert(0, record);
        self.persist(&doc)?;
        self.doc = doc;
        Ok(())
    }

    fn append_with_stats(
        &mut self,
        record: SessionRecord,
        stats: UserStats,
    ) -> Result<(), StorageError> {
        let mut doc = JournalDoc {
            sessions: self.doc.sessions.clone(),
            stats,
        };
        doc.sessions.insert(0, record);
        self.persist(&doc)?;
        self.doc = doc;
        Ok(())
    }

    fn all(&self) -> &[SessionRecord] {
        &self.doc.sessions
    }

    fn get(&self, id: Uuid) -> Option<&SessionRecord> {
        self.doc.sessions.iter().find(|s| s.id == id)
    }

    fn delete(&mut self, id: Uuid) -> Result<SessionRecord, StorageError> {
        let index = self
            .doc
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or(StorageError::SessionNotFound(id))?;

        let mut doc = JournalDoc {
            sessions: self.doc.sessions.clone(),
            stats: self.doc.stats,
        };
        let record = doc.sessions.remove(index);
        self.persist(&doc)?;
        self.doc = doc;

        // Release the page image. Best effort: a missing file is not a
        // reason to fail the delete.
        if let Some(name) = &record.image {
            let _ = fs::remove_file(self.images_dir.join(name));
        }
        Ok(record)
    }

    fn load_stats(&self) -> UserStats {
        self.doc.stats
    }

    fn save_stats(&mut self, stats: UserStats) -> Result<(), StorageError> {
        let doc = JournalDoc {
            sessions: self.doc.sessions.clone(),
            stats,
        };
        self.persist(&doc)?;
        self.doc = doc;
        Ok(())
    }
}

/// In-memory store, for tests and ephemeral hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Vec<SessionRecord>,
    stats: UserStats,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn append(&mut self, record: SessionRecord) -> Result<(), StorageError> {
        self.sessions.insert(0, record);
        Ok(())
    }

    fn all(&self) -> &[SessionRecord] {
        &self.sessions
    }

    fn get(&self, id: Uuid) -> Option<&SessionRecord> {
        self.sessions.iter().find(|s| s.id == id)
    }

    fn delete(&mut self, id: Uuid) -> Result<SessionRecord, StorageError> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or(StorageError::SessionNotFound(id))?;
        Ok(self.sessions.remove(index))
    }

    fn load_stats(&self) -> UserStats {
        self.stats
    }

    fn save_stats(&mut self, stats: UserStats) -> Result<(), StorageError> {
        self.stats = stats;
        Ok(())
    }
}
