//! Entities module - Domain entities
//!
//! Every entity here maps one table of the database (see `migrations/`).
//! Relations between rows are kept as plain ids, never as nested objects.

pub mod enums;
pub mod message;
pub mod resident;
pub mod user;

// Re-exports to simplify imports
pub use enums::{MessageStatus, Role};
pub use message::Message;
pub use resident::Resident;
pub use user::User;
