//! Session persistence for the CLI
//!
//! The library keeps everything in memory; the `tp` binary carries the chat
//! transcript and the schedule between invocations through a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chat::ChatStore;
use crate::planner::PlanForm;
use crate::schedule::{Day, ScheduleStore};

/// Everything the CLI needs to resume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub chats: ChatStore,
    pub schedule: Vec<Day>,
    /// Day color palette; empty means the configured default
    pub colors: Vec<String>,
    /// Last submitted plan-input form; follow-ups reuse everything but the text
    pub form: PlanForm,
}

impl Session {
    /// Split into the live stores
    ///
    /// `default_colors` applies when the session has never stored a palette.
    pub fn into_stores(self, default_colors: &[String]) -> (ChatStore, ScheduleStore) {
        let colors = if self.colors.is_empty() {
            default_colors.to_vec()
        } else {
            self.colors
        };
        let mut store = ScheduleStore::with_colors(colors);
        if !self.schedule.is_empty() {
            store.replace(self.schedule);
        }
        (self.chats, store)
    }

    /// Snapshot the live stores; the form starts at its defaults
    pub fn from_stores(chats: ChatStore, store: &ScheduleStore) -> Self {
        Self {
            chats,
            schedule: store.snapshot(),
            colors: store.colors().to_vec(),
            form: PlanForm::default(),
        }
    }
}

/// JSON file holding a [`Session`]
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session; a missing file is an empty session
    pub fn load(&self) -> Result<Session> {
        debug!(path = ?self.path, "SessionFile::load: called");
        if !self.path.exists() {
            debug!("SessionFile::load: no session file, starting empty");
            return Ok(Session::default());
        }
        let json = fs::read_to_string(&self.path).context(format!("Failed to read session {}", self.path.display()))?;
        serde_json::from_str(&json).context("Failed to parse session file")
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        debug!(path = ?self.path, "SessionFile::save: called");
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        let json = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&self.path, json).context("Failed to write session file")?;
        Ok(())
    }

    /// Remove the session file if present
    pub fn clear(&self) -> Result<()> {
        debug!(path = ?self.path, "SessionFile::clear: called");
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove session file")?;
            info!(path = %self.path.display(), "Session cleared");
        }
        Ok(())
    }
}
