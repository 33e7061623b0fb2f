//! Chat and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schedule::Day;

const TITLE_MAX_CHARS: usize = 30;

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,

    /// Text shown in the bubble
    pub message: String,

    /// Itinerary attached to an assistant reply
    #[serde(default)]
    pub content: Vec<Day>,

    pub role: Role,

    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub is_loading: bool,

    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    /// A user message
    pub fn user(id: impl Into<String>, text: impl Into<String>, now: DateTime<Utc>) -> Self {
        debug!("Message::user: called");
        Self {
            id: id.into(),
            message: text.into(),
            content: Vec::new(),
            role: Role::User,
            timestamp: now,
            is_loading: false,
            is_error: false,
        }
    }

    /// An assistant placeholder awaiting the planner response
    pub fn loading(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        debug!("Message::loading: called");
        Self {
            id: id.into(),
            message: String::new(),
            content: Vec::new(),
            role: Role::Assistant,
            timestamp: now,
            is_loading: true,
            is_error: false,
        }
    }

    /// Assistant reply that finished and carries an itinerary
    pub fn has_itinerary(&self) -> bool {
        self.role == Role::Assistant && !self.is_loading && !self.content.is_empty()
    }
}

/// Partial update applied to a message; `None` fields are left as-is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageUpdate {
    pub message: Option<String>,
    pub content: Option<Vec<Day>>,
    pub is_loading: Option<bool>,
    pub is_error: Option<bool>,
}

impl MessageUpdate {
    pub fn content(content: Vec<Day>) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }

    pub(crate) fn apply(self, msg: &mut Message) {
        if let Some(message) = self.message {
            msg.message = message;
        }
        if let Some(content) = self.content {
            msg.content = content;
        }
        if let Some(is_loading) = self.is_loading {
            msg.is_loading = is_loading;
        }
        if let Some(is_error) = self.is_error {
            msg.is_error = is_error;
        }
    }
}

/// A conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn new(id: impl Into<String>, title: impl Into<String>, messages: Vec<Message>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            messages,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Most recent finished assistant message with itinerary content
    pub fn latest_itinerary(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.has_itinerary())
    }
}

/// Chat title from the first user request: 30 characters, then "..."
pub fn chat_title(text: &str) -> String {
    let trimmed = text.trim();
    let mut title: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}
