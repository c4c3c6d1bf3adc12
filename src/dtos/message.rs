//! Message DTOs - Data Transfer Objects for messages and conversations

use super::not_blank;
use crate::entities::{Message, MessageStatus, Role};
use crate::messaging::Conversation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Message as exposed to clients
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageDTO {
    pub message_id: i64,
    pub sender_id: i64,
    pub sender_role: Role,
    pub recipient_resident_id: i64,
    pub parent_message_id: Option<i64>,
    pub subject: String,
    pub body: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        Self {
            message_id: value.message_id,
            sender_id: value.sender_id,
            sender_role: value.sender_role,
            recipient_resident_id: value.recipient_resident_id,
            parent_message_id: value.parent_message_id,
            subject: value.subject,
            body: value.body,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// One thread: the initiating message first, then the replies oldest to newest
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConversationDTO {
    pub thread_id: i64,
    pub subject: String,
    pub last_activity_at: DateTime<Utc>,
    pub unread_count: usize,
    pub messages: Vec<MessageDTO>,
}

impl From<Conversation> for ConversationDTO {
    fn from(value: Conversation) -> Self {
        let thread_id = value.thread_id();
        let last_activity_at = value.last_activity();
        let subject = value.root().subject.clone();
        let unread_count = value.messages().iter().filter(|m| m.is_unread()).count();
        Self {
            thread_id,
            subject,
            last_activity_at,
            unread_count,
            messages: value.into_messages().into_iter().map(MessageDTO::from).collect(),
        }
    }
}

/// DTO to insert a new message (without message_id)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateMessageDTO {
    pub sender_id: i64,
    pub sender_role: Role,
    pub recipient_resident_id: i64,
    pub parent_message_id: Option<i64>,

    #[validate(
        length(min = 1, max = 255, message = "Subject must be between 1 and 255 characters"),
        custom(function = "not_blank", message = "Subject must not be blank")
    )]
    pub subject: String,

    #[validate(
        length(min = 1, max = 5000, message = "Message body must be between 1 and 5000 characters"),
        custom(function = "not_blank", message = "Message body must not be blank")
    )]
    pub body: String,

    pub created_at: DateTime<Utc>,
}

/// Request body of `POST /admin/messages`.
/// The recipient is given either by id or by flat number.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SendMessageDTO {
    pub recipient_resident_id: Option<i64>,

    #[validate(length(min = 1, max = 32, message = "Flat number must be between 1 and 32 characters"))]
    pub flat_number: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Subject must be between 1 and 255 characters"))]
    pub subject: String,

    #[validate(length(min = 1, max = 5000, message = "Message body must be between 1 and 5000 characters"))]
    pub body: String,
}

/// Request body of `POST /messages/{message_id}/replies`
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ReplyMessageDTO {
    #[validate(length(min = 1, max = 5000, message = "Message body must be between 1 and 5000 characters"))]
    pub body: String,

    // overrides the synthesized "RE: <subject>"
    #[validate(length(min = 1, max = 255, message = "Subject must be between 1 and 255 characters"))]
    pub subject: Option<String>,
}
