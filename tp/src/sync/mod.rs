//! Itinerary sync
//!
//! Saving an edited schedule writes it back into the chat message that
//! produced it and keeps a local backup copy. The transcript update is the
//! contract; the backup is best effort.

mod backup;
mod bridge;

pub use backup::{BackupSlot, DRAFT_KEY, FileBackup, MemoryBackup, ScheduleDraft};
pub use bridge::{ItinerarySync, SaveReport, TranscriptTarget};
