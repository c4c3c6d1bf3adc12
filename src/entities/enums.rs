//! Enumerations used by the entities

use serde::{Deserialize, Serialize};

// ********************* ENUMERATIONS **********************//

/// Role of an account, and of the author of a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Resident,
}

/// Read state of a message. The only legal transition is `Unread -> Read`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum MessageStatus {
    Unread,
    Read,
}
