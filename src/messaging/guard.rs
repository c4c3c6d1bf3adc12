//! Authorization guard for the messaging operations.
//!
//! Every check is a pure function over data the caller already loaded.
//! A deny is returned as [`MessagingError::AccessDenied`]; role checks run
//! before existence checks so an unauthorized actor cannot probe for ids.

use super::{Actor, MessagingError};
use crate::entities::{Message, Resident, Role};
use tracing::warn;

/// Only admins start threads, and only towards an existing resident.
pub fn can_send(
    actor: &Actor,
    recipient_resident_id: i64,
    recipient: Option<&Resident>,
) -> Result<(), MessagingError> {
    if !actor.is_admin() {
        warn!(user_id = actor.user_id, "Non-admin attempted to start a thread");
        return Err(MessagingError::AccessDenied("only administrators can send messages"));
    }

    match recipient {
        Some(_) => Ok(()),
        None => Err(MessagingError::ResidentNotFound(recipient_resident_id)),
    }
}

/// Replies are reserved to the resident party of the thread: the resident it
/// is addressed to, or the resident who started it (legacy threads).
///
/// `root` is the thread-initiating message the reply will be attached to,
/// `None` when `parent_message_id` did not resolve.
pub fn can_reply(
    actor: &Actor,
    parent_message_id: i64,
    root: Option<&Message>,
) -> Result<(), MessagingError> {
    if actor.role != Role::Resident {
        warn!(user_id = actor.user_id, "Non-resident attempted to reply");
        return Err(MessagingError::AccessDenied("only residents can reply"));
    }

    let root = root.ok_or(MessagingError::ThreadNotFound(parent_message_id))?;

    if is_resident_party(actor, root) {
        Ok(())
    } else {
        warn!(
            user_id = actor.user_id,
            thread_id = root.message_id,
            "Resident attempted to reply to a thread of another resident"
        );
        Err(MessagingError::AccessDenied("not a party of this thread"))
    }
}

/// Admins read what residents wrote; residents read what is addressed to them.
pub fn can_mark_read(actor: &Actor, message: &Message) -> Result<(), MessagingError> {
    let allowed = match actor.role {
        Role::Admin => message.sender_role == Role::Resident,
        Role::Resident => actor.resident_id == Some(message.recipient_resident_id),
    };

    if allowed {
        Ok(())
    } else {
        warn!(
            user_id = actor.user_id,
            message_id = message.message_id,
            "Mark-read denied"
        );
        Err(MessagingError::AccessDenied("cannot mark this message as read"))
    }
}

/// Admins see every thread, residents only the ones they are party of.
pub fn can_view_thread(actor: &Actor, root: &Message) -> Result<(), MessagingError> {
    if actor.is_admin() || is_resident_party(actor, root) {
        Ok(())
    } else {
        Err(MessagingError::AccessDenied("not a party of this thread"))
    }
}

/// Admins see the conversations of every resident, residents only their own.
pub fn can_view_conversations(actor: &Actor, resident_id: i64) -> Result<(), MessagingError> {
    if actor.is_admin() || actor.own_resident_id() == Some(resident_id) {
        Ok(())
    } else {
        Err(MessagingError::AccessDenied("cannot view conversations of another resident"))
    }
}

fn is_resident_party(actor: &Actor, root: &Message) -> bool {
    let Some(resident_id) = actor.own_resident_id() else {
        return false;
    };
    let is_recipient = root.recipient_resident_id == resident_id;
    let is_original_sender = root.sender_role == Role::Resident && root.sender_id == actor.user_id;
    is_recipient || is_original_sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MessageStatus;
    use chrono::Utc;

    const ADMIN: i64 = 1;
    const ALICE_USER: i64 = 2;
    const ALICE: i64 = 10;
    const BRUNO_USER: i64 = 3;
    const BRUNO: i64 = 20;

    fn message(sender_id: i64, sender_role: Role, recipient: i64) -> Message {
        let now = Utc::now();
        Message {
            message_id: 100,
            sender_id,
            sender_role,
            recipient_resident_id: recipient,
            parent_message_id: None,
            subject: "Notice".to_string(),
            body: "Pipe maintenance".to_string(),
            status: MessageStatus::Unread,
            created_at: now,
            updated_at: now,
        }
    }

    fn resident(resident_id: i64) -> Resident {
        Resident {
            resident_id,
            name: "Alice Rossi".to_string(),
            flat_number: "A-101".to_string(),
            email: None,
            phone: None,
        }
    }

    #[test]
    fn test_only_admin_can_send() {
        let alice = resident(ALICE);
        assert!(can_send(&Actor::admin(ADMIN), ALICE, Some(&alice)).is_ok());
        assert!(matches!(
            can_send(&Actor::resident(ALICE_USER, ALICE), ALICE, Some(&alice)),
            Err(MessagingError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_send_to_unknown_resident() {
        assert!(matches!(
            can_send(&Actor::admin(ADMIN), 99, None),
            Err(MessagingError::ResidentNotFound(99))
        ));
        // residents are denied before the directory is consulted
        assert!(matches!(
            can_send(&Actor::resident(ALICE_USER, ALICE), 99, None),
            Err(MessagingError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_reply_matrix() {
        let to_alice = message(ADMIN, Role::Admin, ALICE);

        assert!(can_reply(&Actor::resident(ALICE_USER, ALICE), 100, Some(&to_alice)).is_ok());
        assert!(matches!(
            can_reply(&Actor::resident(BRUNO_USER, BRUNO), 100, Some(&to_alice)),
            Err(MessagingError::AccessDenied(_))
        ));
        assert!(matches!(
            can_reply(&Actor::admin(ADMIN), 100, Some(&to_alice)),
            Err(MessagingError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_reply_to_legacy_thread_started_by_resident() {
        // recipient points elsewhere, but alice wrote the root herself
        let legacy = message(ALICE_USER, Role::Resident, BRUNO);
        assert!(can_reply(&Actor::resident(ALICE_USER, ALICE), 100, Some(&legacy)).is_ok());
    }

    #[test]
    fn test_reply_to_missing_thread() {
        assert!(matches!(
            can_reply(&Actor::resident(ALICE_USER, ALICE), 7, None),
            Err(MessagingError::ThreadNotFound(7))
        ));
        assert!(matches!(
            can_reply(&Actor::admin(ADMIN), 7, None),
            Err(MessagingError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_mark_read_matrix() {
        let from_admin_to_alice = message(ADMIN, Role::Admin, ALICE);
        let from_alice = message(ALICE_USER, Role::Resident, ALICE);

        assert!(can_mark_read(&Actor::admin(ADMIN), &from_alice).is_ok());
        assert!(can_mark_read(&Actor::admin(ADMIN), &from_admin_to_alice).is_err());

        assert!(can_mark_read(&Actor::resident(ALICE_USER, ALICE), &from_admin_to_alice).is_ok());
        assert!(can_mark_read(&Actor::resident(BRUNO_USER, BRUNO), &from_admin_to_alice).is_err());
    }

    #[test]
    fn test_view_permissions() {
        let to_alice = message(ADMIN, Role::Admin, ALICE);

        assert!(can_view_thread(&Actor::admin(ADMIN), &to_alice).is_ok());
        assert!(can_view_thread(&Actor::resident(ALICE_USER, ALICE), &to_alice).is_ok());
        assert!(can_view_thread(&Actor::resident(BRUNO_USER, BRUNO), &to_alice).is_err());

        assert!(can_view_conversations(&Actor::admin(ADMIN), ALICE).is_ok());
        assert!(can_view_conversations(&Actor::resident(ALICE_USER, ALICE), ALICE).is_ok());
        assert!(can_view_conversations(&Actor::resident(ALICE_USER, ALICE), BRUNO).is_err());
    }
}
