//! Messaging core - threads between administrators and residents
//!
//! - [`guard`]: who may send, reply, mark read and view
//! - [`engine`]: the mutating operations, each in one transaction
//! - [`assembler`]: read-only reconstruction of threads and conversations
//!
//! A thread is a root message (no parent) plus every message whose
//! `parent_message_id` is the root's id. Threads are one level deep and
//! always belong to exactly one resident.

pub mod assembler;
pub mod engine;
pub mod error;
pub mod guard;

pub use assembler::{all_messages, conversations_for_resident, thread_by_initial_id};
pub use engine::ThreadEngine;
pub use error::MessagingError;

use crate::entities::{Message, Role, User};
use chrono::{DateTime, Utc};

/// Authenticated identity performing an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
    // set iff role is Resident
    pub resident_id: Option<i64>,
}

impl Actor {
    pub fn admin(user_id: i64) -> Self {
        Self {
            user_id,
            role: Role::Admin,
            resident_id: None,
        }
    }

    pub fn resident(user_id: i64, resident_id: i64) -> Self {
        Self {
            user_id,
            role: Role::Resident,
            resident_id: Some(resident_id),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Resident this actor acts for, `None` for admins
    pub fn own_resident_id(&self) -> Option<i64> {
        match self.role {
            Role::Resident => self.resident_id,
            Role::Admin => None,
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            role: user.role,
            resident_id: user.resident_id,
        }
    }
}

/// A thread as shown to readers: root first, replies oldest to newest.
/// Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Builds a conversation, ordering the replies by `(created_at, message_id)`
    pub fn new(root: Message, mut replies: Vec<Message>) -> Self {
        replies.sort_by_key(|m| (m.created_at, m.message_id));
        let mut messages = Vec::with_capacity(replies.len() + 1);
        messages.push(root);
        messages.extend(replies);
        Self { messages }
    }

    pub fn root(&self) -> &Message {
        &self.messages[0]
    }

    pub fn thread_id(&self) -> i64 {
        self.root().message_id
    }

    pub fn last(&self) -> &Message {
        // non-empty by construction
        &self.messages[self.messages.len() - 1]
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last().created_at
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
