//! Thread engine - the mutating operations of the messaging core.
//!
//! Each operation runs inside one transaction spanning its lookups and its
//! writes. Returning early with an error drops the transaction, which rolls
//! back anything written so far.

use super::{Actor, MessagingError, guard};
use crate::dtos::CreateMessageDTO;
use crate::entities::Message;
use crate::repositories::{MessageRepository, ResidentRepository};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};
use validator::Validate;

const REPLY_PREFIX: &str = "RE: ";
const MAX_SUBJECT_CHARS: usize = 255;

pub struct ThreadEngine {
    connection_pool: SqlitePool,
}

impl ThreadEngine {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Start a new thread from an administrator to a resident.
    ///
    /// # Errors
    /// * `AccessDenied` - the actor is not an admin
    /// * `ResidentNotFound` - `recipient_resident_id` does not exist
    /// * `Validation` - empty subject or body
    #[instrument(skip(self, actor, subject, body), fields(user_id = %actor.user_id))]
    pub async fn send_initial(
        &self,
        actor: &Actor,
        recipient_resident_id: i64,
        subject: &str,
        body: &str,
    ) -> Result<Message, MessagingError> {
        debug!("Sending initial message");
        let mut tx = self.connection_pool.begin().await?;

        let recipient = ResidentRepository::find_by_id(&mut *tx, recipient_resident_id).await?;
        guard::can_send(actor, recipient_resident_id, recipient.as_ref())?;

        let data = CreateMessageDTO {
            sender_id: actor.user_id,
            sender_role: actor.role,
            recipient_resident_id,
            parent_message_id: None,
            subject: subject.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        };
        data.validate()?;

        let message = MessageRepository::insert(&mut *tx, &data).await?;
        tx.commit().await?;

        info!(message_id = message.message_id, "Thread started");
        Ok(message)
    }

    /// Attach a reply to a thread.
    ///
    /// `parent_message_id` may name the root or any reply of the thread; the
    /// stored reply always points at the root. When the replier is the
    /// resident the thread is addressed to, the named parent is marked read
    /// in the same transaction.
    ///
    /// # Errors
    /// * `AccessDenied` - the actor is not the resident party of the thread
    /// * `ThreadNotFound` - `parent_message_id` does not exist
    /// * `Validation` - empty body or subject override
    #[instrument(skip(self, actor, body, subject_override), fields(user_id = %actor.user_id))]
    pub async fn reply(
        &self,
        actor: &Actor,
        parent_message_id: i64,
        body: &str,
        subject_override: Option<&str>,
    ) -> Result<Message, MessagingError> {
        debug!("Replying to message");
        let mut tx = self.connection_pool.begin().await?;

        let parent = MessageRepository::find_by_id(&mut *tx, parent_message_id).await?;
        let root = match &parent {
            Some(p) if p.is_root() => Some(p.clone()),
            Some(p) => MessageRepository::find_by_id(&mut *tx, p.thread_id()).await?,
            None => None,
        };
        guard::can_reply(actor, parent_message_id, root.as_ref())?;

        let (Some(parent), Some(root)) = (parent, root) else {
            return Err(MessagingError::ThreadNotFound(parent_message_id));
        };

        let now = Utc::now();
        let data = CreateMessageDTO {
            sender_id: actor.user_id,
            sender_role: actor.role,
            recipient_resident_id: root.recipient_resident_id,
            parent_message_id: Some(root.message_id),
            subject: subject_override
                .map(str::to_string)
                .unwrap_or_else(|| reply_subject(&root.subject)),
            body: body.to_string(),
            created_at: now,
        };
        data.validate()?;

        let reply = MessageRepository::insert(&mut *tx, &data).await?;

        // replying proves the recipient saw the parent
        if actor.own_resident_id() == Some(root.recipient_resident_id) && parent.is_unread() {
            MessageRepository::mark_read(&mut *tx, parent.message_id, now).await?;
            debug!(message_id = parent.message_id, "Parent acknowledged by reply");
        }

        tx.commit().await?;

        info!(
            message_id = reply.message_id,
            thread_id = root.message_id,
            "Reply stored"
        );
        Ok(reply)
    }

    /// Mark a message as read.
    ///
    /// Idempotent: a message that is already read is returned unchanged,
    /// `updated_at` included.
    ///
    /// # Errors
    /// * `MessageNotFound` - `message_id` does not exist
    /// * `AccessDenied` - see [`guard::can_mark_read`]
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn mark_read(&self, actor: &Actor, message_id: i64) -> Result<Message, MessagingError> {
        debug!("Marking message as read");
        let mut tx = self.connection_pool.begin().await?;

        let message = MessageRepository::find_by_id(&mut *tx, message_id)
            .await?
            .ok_or(MessagingError::MessageNotFound(message_id))?;
        guard::can_mark_read(actor, &message)?;

        if !message.is_unread() {
            debug!("Message already read");
            return Ok(message);
        }

        MessageRepository::mark_read(&mut *tx, message_id, Utc::now()).await?;
        let updated = MessageRepository::find_by_id(&mut *tx, message_id)
            .await?
            .ok_or(MessagingError::MessageNotFound(message_id))?;
        tx.commit().await?;

        info!("Message marked as read");
        Ok(updated)
    }
}

// truncated so a reply to a maximal subject still validates
fn reply_subject(subject: &str) -> String {
    format!("{REPLY_PREFIX}{subject}")
        .chars()
        .take(MAX_SUBJECT_CHARS)
        .collect()
}
