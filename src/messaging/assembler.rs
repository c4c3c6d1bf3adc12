//! Conversation assembler - read-only views over the message store.
//!
//! Nothing here writes: conversations are rebuilt from the stored messages
//! on every request.

use super::Conversation;
use crate::entities::{Message, Role};
use crate::repositories::{MessageRepository, Read};
use futures_util::future::try_join_all;
use sqlx::Error;
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Every conversation a resident is part of, most recently active first.
///
/// Collects the threads an admin started towards `resident_id` and, when the
/// resident has a login account, the legacy threads that account started
/// itself. A thread appears once even if it matches both rules.
#[instrument(skip(messages))]
pub async fn conversations_for_resident(
    messages: &MessageRepository,
    resident_id: i64,
    resident_user_id: Option<i64>,
) -> Result<Vec<Conversation>, Error> {
    let mut roots = messages.find_roots_addressed_to(&resident_id).await?;
    if let Some(user_id) = resident_user_id {
        roots.extend(messages.find_roots_sent_by(&user_id, Role::Resident).await?);
    }
    let roots = dedup_roots(roots);
    debug!("Found {} threads", roots.len());

    let replies = try_join_all(roots.iter().map(|root| messages.find_replies(&root.message_id))).await?;

    Ok(assemble(roots.into_iter().zip(replies)))
}

/// The thread started by `initial_message_id`.
///
/// `None` when the id does not exist or names a reply.
#[instrument(skip(messages))]
pub async fn thread_by_initial_id(
    messages: &MessageRepository,
    initial_message_id: i64,
) -> Result<Option<Conversation>, Error> {
    let Some(root) = messages.read(&initial_message_id).await? else {
        return Ok(None);
    };
    if !root.is_root() {
        debug!("Message is a reply, not a thread root");
        return Ok(None);
    }

    let replies = messages.find_replies(&root.message_id).await?;
    Ok(Some(Conversation::new(root, replies)))
}

/// Every stored message, newest first (administrator inbox)
pub async fn all_messages(messages: &MessageRepository) -> Result<Vec<Message>, Error> {
    let mut all = messages.find_all().await?;
    all.sort_by_key(|m| Reverse((m.created_at, m.message_id)));
    Ok(all)
}

/// Groups roots with their replies and orders the conversations by the
/// `created_at` of their last message, newest first.
///
/// Ties are broken by the last message id so the order is stable. A root id
/// seen twice is kept once.
pub fn assemble(threads: impl IntoIterator<Item = (Message, Vec<Message>)>) -> Vec<Conversation> {
    let mut seen = HashSet::new();
    let mut conversations: Vec<Conversation> = threads
        .into_iter()
        .filter(|(root, _)| seen.insert(root.message_id))
        .map(|(root, replies)| Conversation::new(root, replies))
        .collect();

    conversations.sort_by_key(|c| Reverse((c.last().created_at, c.last().message_id)));
    conversations
}

fn dedup_roots(roots: Vec<Message>) -> Vec<Message> {
    let mut seen = HashSet::new();
    roots
        .into_iter()
        .filter(|m| seen.insert(m.message_id))
        .collect()
}
