//! Local backup slot for saved schedules

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schedule::Day;

/// Default key for the schedule draft
pub const DRAFT_KEY: &str = "plandl-schedule-draft";

/// Backup payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
    pub schedule: Vec<Day>,
}

/// Durable key-value slot
pub trait BackupSlot {
    fn write(&self, key: &str, draft: &ScheduleDraft) -> Result<()>;

    /// Returns `None` when nothing was saved under `key`
    fn read(&self, key: &str) -> Result<Option<ScheduleDraft>>;
}

/// One JSON file per key
#[derive(Debug, Clone)]
pub struct FileBackup {
    dir: PathBuf,
}

impl FileBackup {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BackupSlot for FileBackup {
    fn write(&self, key: &str, draft: &ScheduleDraft) -> Result<()> {
        let path = self.path_for(key);
        debug!(?path, days = draft.schedule.len(), "FileBackup::write: called");
        fs::create_dir_all(&self.dir).context("Failed to create backup directory")?;
        let json = serde_json::to_string_pretty(draft).context("Failed to serialize schedule draft")?;
        fs::write(&path, json).context(format!("Failed to write backup {}", path.display()))?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<ScheduleDraft>> {
        let path = self.path_for(key);
        debug!(?path, "FileBackup::read: called");
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path).context(format!("Failed to read backup {}", path.display()))?;
        let draft = serde_json::from_str(&json).context("Failed to parse schedule draft")?;
        Ok(Some(draft))
    }
}

/// In-process slot, used by tests and one-shot runs
#[derive(Debug, Default)]
pub struct MemoryBackup {
    slots: Mutex<HashMap<String, ScheduleDraft>>,
}

impl MemoryBackup {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackupSlot for MemoryBackup {
    fn write(&self, key: &str, draft: &ScheduleDraft) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| eyre!("backup slot lock poisoned"))?;
        slots.insert(key.to_string(), draft.clone());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<ScheduleDraft>> {
        let slots = self.slots.lock().map_err(|_| eyre!("backup slot lock poisoned"))?;
        Ok(slots.get(key).cloned())
    }
}
