//! Repositories module - Coordinator of every repository of the project
//!
//! Each repository owns the SQL of one table. Queries are written with the
//! runtime `sqlx::query_as` API and mapped through `FromRow`, so the crate
//! builds without a live database.
//!
//! Operations that must take part in a transaction are exposed as associated
//! functions taking `&mut SqliteConnection`: the caller opens the transaction
//! (`pool.begin()`) and passes `&mut *tx`. The pool-based methods reuse the
//! same functions on a pooled connection, so every statement exists once.

pub mod message;
pub mod resident;
pub mod traits;
pub mod user;

// Re-export of the traits to simplify imports
pub use traits::{Create, Read};

// Re-export of the repository structs
pub use message::MessageRepository;
pub use resident::ResidentRepository;
pub use user::UserRepository;
