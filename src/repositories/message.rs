//! MessageRepository - Repository for messages

use super::{Create, Read};
use crate::dtos::CreateMessageDTO;
use crate::entities::{Message, Role};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqliteConnection, SqlitePool};

/// Prepends the full column list of `messages` to the given tail
macro_rules! select_messages {
    ($tail:literal) => {
        concat!(
            "SELECT message_id, sender_id, sender_role, recipient_resident_id, parent_message_id, ",
            "subject, body, status, created_at, updated_at FROM messages ",
            $tail
        )
    };
}

// MESSAGE REPO
pub struct MessageRepository {
    connection_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    // ---------------------------------------------------------------
    // Statements usable inside a transaction
    // ---------------------------------------------------------------

    /// Look up a message by id on the given connection
    pub async fn find_by_id(
        conn: &mut SqliteConnection,
        message_id: i64,
    ) -> Result<Option<Message>, Error> {
        sqlx::query_as::<_, Message>(select_messages!("WHERE message_id = ?"))
            .bind(message_id)
            .fetch_optional(conn)
            .await
    }

    /// Insert a message, both timestamps are set to `data.created_at`
    pub async fn insert(
        conn: &mut SqliteConnection,
        data: &CreateMessageDTO,
    ) -> Result<Message, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (
                sender_id, sender_role, recipient_resident_id, parent_message_id,
                subject, body, status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, 'UNREAD', ?, ?)
            RETURNING message_id, sender_id, sender_role, recipient_resident_id, parent_message_id,
                      subject, body, status, created_at, updated_at
            "#,
        )
        .bind(data.sender_id)
        .bind(data.sender_role)
        .bind(data.recipient_resident_id)
        .bind(data.parent_message_id)
        .bind(&data.subject)
        .bind(&data.body)
        .bind(data.created_at)
        .bind(data.created_at)
        .fetch_one(conn)
        .await
    }

    /// Transition `UNREAD -> READ` and refresh `updated_at`.
    ///
    /// The update is conditional on the current status, so a message that is
    /// already read keeps its `updated_at`.
    ///
    /// # Returns
    /// `true` if this call performed the transition
    pub async fn mark_read(
        conn: &mut SqliteConnection,
        message_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE messages SET status = 'READ', updated_at = ? WHERE message_id = ? AND status = 'UNREAD'",
        )
        .bind(now)
        .bind(message_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    // ---------------------------------------------------------------
    // Read-only queries on the pool
    // ---------------------------------------------------------------

    /// Thread-initiating messages sent by an admin to the given resident
    pub async fn find_roots_addressed_to(&self, resident_id: &i64) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(select_messages!(
            "WHERE sender_role = ? AND recipient_resident_id = ? AND parent_message_id IS NULL ORDER BY message_id DESC"
        ))
        .bind(Role::Admin)
        .bind(resident_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Thread-initiating messages authored by the given user with the given role
    pub async fn find_roots_sent_by(
        &self,
        sender_id: &i64,
        sender_role: Role,
    ) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(select_messages!(
            "WHERE sender_id = ? AND sender_role = ? AND parent_message_id IS NULL ORDER BY message_id DESC"
        ))
        .bind(sender_id)
        .bind(sender_role)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// All replies of a thread, in insertion order
    pub async fn find_replies(&self, parent_message_id: &i64) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(select_messages!(
            "WHERE parent_message_id = ? ORDER BY message_id ASC"
        ))
        .bind(parent_message_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Every message in the store, newest first
    pub async fn find_all(&self) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(select_messages!("ORDER BY message_id DESC"))
            .fetch_all(&self.connection_pool)
            .await
    }
}

impl Create<Message, CreateMessageDTO> for MessageRepository {
    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        let mut conn = self.connection_pool.acquire().await?;
        Self::insert(&mut conn, data).await
    }
}

impl Read<Message, i64> for MessageRepository {
    async fn read(&self, id: &i64) -> Result<Option<Message>, Error> {
        let mut conn = self.connection_pool.acquire().await?;
        Self::find_by_id(&mut conn, *id).await
    }
}
