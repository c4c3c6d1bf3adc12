//! Message entity

use super::enums::{MessageStatus, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Message {
    pub message_id: i64,
    pub sender_id: i64,
    pub sender_role: Role,
    // the resident party of the conversation, replies copy it from their root
    pub recipient_resident_id: i64,
    // None only for thread-initiating messages
    pub parent_message_id: Option<i64>,
    pub subject: String,
    pub body: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    // refreshed only when `status` changes
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// A thread-initiating message has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_message_id.is_none()
    }

    /// Id of the thread this message belongs to.
    pub fn thread_id(&self) -> i64 {
        self.parent_message_id.unwrap_or(self.message_id)
    }

    pub fn is_unread(&self) -> bool {
        self.status == MessageStatus::Unread
    }
}
