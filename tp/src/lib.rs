//! TripPlanner - schedule-editing core for an AI travel planner
//!
//! A chat-style flow collects trip preferences, forwards them to a remote
//! planning service and turns the returned day-by-day itinerary into an
//! editable schedule. This crate holds the parts of that flow with real
//! invariants, free of any rendering layer.
//!
//! # Core Concepts
//!
//! - **Calendar-safe dates**: date ranges are picked with day-granular
//!   `NaiveDate` arithmetic and never exceed the maximum trip length
//! - **Position is order**: a place's `order` is always its 1-based index in
//!   its day, re-derived after every edit
//! - **Explicit state machines**: drag gestures and the date picker are plain
//!   values driven by synthetic events
//! - **One owner per state**: stores are passed around explicitly, nothing is
//!   global
//!
//! # Modules
//!
//! - [`calendar`] - date range picker state machine and month grids
//! - [`schedule`] - itinerary data model and the schedule store
//! - [`drag`] - drag-and-drop reorder controller
//! - [`chat`] - chat transcript the planner writes into
//! - [`planner`] - plan-input form and the remote planner client
//! - [`sync`] - pushes edited schedules back into the transcript
//! - [`session`] - on-disk session used by the CLI
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod calendar;
pub mod chat;
pub mod cli;
pub mod config;
pub mod drag;
pub mod planner;
pub mod schedule;
pub mod session;
pub mod sync;

// Re-export commonly used types
pub use calendar::{CalendarCell, DateRange, DateRangePicker, MAX_DAYS, MonthPanel, YearMonth, apply_click, format_range};
pub use chat::{Chat, ChatStore, Message, MessageUpdate, Role};
pub use config::{Config, DisplayConfig, PlannerConfig, StorageConfig};
pub use drag::{DragController, DragEvent, DragOutcome, DragSource, DragState, DropTarget, MoveRequest, transition};
pub use planner::{
    FormError, HttpPlannerClient, PendingPlan, PlanForm, PlanRequest, PlanResponse, PlannerClient, PlannerError, SubmitError,
};
pub use schedule::{DEFAULT_COLORS, Day, MapMarker, Place, ScheduleStore};
pub use session::{Session, SessionFile};
pub use sync::{BackupSlot, FileBackup, ItinerarySync, MemoryBackup, SaveReport, ScheduleDraft, TranscriptTarget};
