use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::entities::{conversations, messages};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i32,
    pub conversation_id: i32,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub role: String,
    pub content: String,
}

impl NewMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Title given to conversations created without one.
pub fn default_title(id: i32) -> String {
    format!("Conversation {}", id)
}

impl From<conversations::Model> for Conversation {
    fn from(model: conversations::Model) -> Self {
        let title = model.title.unwrap_or_else(|| default_title(model.id));
        Self {
            id: model.id,
            title,
            created_at: model.created_at,
        }
    }
}

impl From<messages::Model> for Message {
    fn from(model: messages::Model) -> Self {
        Self {
            id: model.id,
            conversation_id: model.conversation_id,
            role: model.role,
            content: model.content,
            created_at: model.created_at,
        }
    }
}
