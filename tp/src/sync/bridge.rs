//! ItinerarySync - writes the edited schedule back into the transcript

use chrono::{DateTime, Local, Utc};
use eyre::Result;
use tracing::{debug, info, warn};

use super::backup::{BackupSlot, DRAFT_KEY, ScheduleDraft};
use crate::chat::{ChatStore, MessageUpdate};
use crate::schedule::ScheduleStore;

/// The message a save overwrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptTarget {
    pub chat_id: String,
    pub message_id: String,
}

/// Result of one save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub saved_at: DateTime<Utc>,
    pub backup_written: bool,
    /// `None` when the active chat has no itinerary message to update
    pub updated: Option<TranscriptTarget>,
}

impl SaveReport {
    /// Local wall-clock `HH:MM` for the confirmation line
    pub fn saved_label(&self) -> String {
        self.saved_at.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// Save bridge between the schedule store, the transcript and a backup slot
pub struct ItinerarySync<B: BackupSlot> {
    backup: B,
    key: String,
}

impl<B: BackupSlot> ItinerarySync<B> {
    pub fn new(backup: B) -> Self {
        Self::with_key(backup, DRAFT_KEY)
    }

    pub fn with_key(backup: B, key: impl Into<String>) -> Self {
        Self { backup, key: key.into() }
    }

    pub fn backup(&self) -> &B {
        &self.backup
    }

    /// Push the current schedule into the active chat and the backup slot
    ///
    /// The target is the newest assistant message in the current chat that
    /// is done loading and carries an itinerary. Saving twice without edits
    /// changes nothing but `saved_at`.
    pub fn save(&self, store: &ScheduleStore, chats: &mut ChatStore, now: DateTime<Utc>) -> SaveReport {
        debug!(days = store.len(), revision = store.revision(), "ItinerarySync::save: called");
        let snapshot = store.snapshot();

        let draft = ScheduleDraft {
            saved_at: now,
            schedule: snapshot.clone(),
        };
        let backup_written = match self.backup.write(&self.key, &draft) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, key = %self.key, "Schedule backup failed, continuing");
                false
            }
        };

        let target = chats.current_chat().and_then(|chat| {
            chat.latest_itinerary().map(|m| TranscriptTarget {
                chat_id: chat.id.clone(),
                message_id: m.id.clone(),
            })
        });

        match &target {
            Some(t) => {
                chats.update_message(&t.chat_id, &t.message_id, MessageUpdate::content(snapshot));
                info!(chat_id = %t.chat_id, message_id = %t.message_id, "Schedule saved to transcript");
            }
            None => debug!("ItinerarySync::save: no transcript target"),
        }

        SaveReport {
            saved_at: now,
            backup_written,
            updated: target,
        }
    }

    /// Last backed-up draft, if any
    pub fn restore(&self) -> Result<Option<ScheduleDraft>> {
        debug!(key = %self.key, "ItinerarySync::restore: called");
        self.backup.read(&self.key)
    }
}
