//! Chat transcript
//!
//! Conversations with the planner. Assistant messages carry the itinerary
//! they produced so the transcript can be reopened later.

mod store;
mod types;

pub use store::ChatStore;
pub use types::{Chat, Message, MessageUpdate, Role, chat_title};
