//! ChatStore - owns every conversation
//!
//! Explicitly owned; callers pass it by reference instead of reaching for a
//! global.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::types::{Chat, Message, MessageUpdate};

/// All chats, newest first, plus the active selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStore {
    chats: Vec<Chat>,
    current_chat_id: Option<String>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn current_chat_id(&self) -> Option<&str> {
        self.current_chat_id.as_deref()
    }

    pub fn chat(&self, id: &str) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == id)
    }

    pub fn current_chat(&self) -> Option<&Chat> {
        self.current_chat_id.as_deref().and_then(|id| self.chat(id))
    }

    /// Prepend a chat and make it current
    pub fn add_chat(&mut self, chat: Chat) {
        info!(chat_id = %chat.id, title = %chat.title, "Chat added");
        self.current_chat_id = Some(chat.id.clone());
        self.chats.insert(0, chat);
    }

    /// Drop every chat
    pub fn reset(&mut self) {
        debug!("ChatStore::reset: called");
        self.chats.clear();
        self.current_chat_id = None;
    }

    /// Append a message to a chat; returns false for an unknown chat
    pub fn push_message(&mut self, chat_id: &str, message: Message, now: DateTime<Utc>) -> bool {
        debug!(%chat_id, message_id = %message.id, "ChatStore::push_message: called");
        let Some(chat) = self.chats.iter_mut().find(|c| c.id == chat_id) else {
            debug!("ChatStore::push_message: chat not found");
            return false;
        };
        chat.messages.push(message);
        chat.updated_at = now;
        true
    }

    /// Rename a chat; returns false for an unknown chat
    pub fn rename_chat(&mut self, chat_id: &str, title: impl Into<String>) -> bool {
        let Some(chat) = self.chats.iter_mut().find(|c| c.id == chat_id) else {
            return false;
        };
        chat.title = title.into();
        true
    }

    /// Patch one message by id; returns whether it was found
    pub fn update_message(&mut self, chat_id: &str, message_id: &str, update: MessageUpdate) -> bool {
        debug!(%chat_id, %message_id, ?update, "ChatStore::update_message: called");
        let found = self
            .chats
            .iter_mut()
            .filter(|c| c.id == chat_id)
            .flat_map(|c| c.messages.iter_mut())
            .find(|m| m.id == message_id);
        match found {
            Some(msg) => {
                update.apply(msg);
                true
            }
            None => {
                debug!("ChatStore::update_message: message not found");
                false
            }
        }
    }

    /// Remove a chat; if it was current, the newest remaining chat becomes
    /// current
    pub fn delete_chat(&mut self, chat_id: &str) -> bool {
        debug!(%chat_id, "ChatStore::delete_chat: called");
        let before = self.chats.len();
        self.chats.retain(|c| c.id != chat_id);
        if self.chats.len() == before {
            return false;
        }
        if self.current_chat_id.as_deref() == Some(chat_id) {
            self.current_chat_id = self.chats.first().map(|c| c.id.clone());
        }
        info!(%chat_id, "Chat deleted");
        true
    }

    /// Select a chat; `None` or an unknown id clears the selection
    pub fn set_current(&mut self, chat_id: Option<&str>) {
        debug!(?chat_id, "ChatStore::set_current: called");
        self.current_chat_id = chat_id.filter(|id| self.chat(id).is_some()).map(str::to_string);
    }

    /// Most recent finished assistant message with itinerary content
    pub fn latest_itinerary_message(&self, chat_id: &str) -> Option<&Message> {
        self.chat(chat_id).and_then(Chat::latest_itinerary)
    }
}
