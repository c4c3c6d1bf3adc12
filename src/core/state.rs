//! Application State - shared state of the application
//!
//! Holds every repository, the thread engine and the session store.

use crate::core::session::SessionStore;
use crate::messaging::ThreadEngine;
use crate::repositories::{MessageRepository, ResidentRepository, UserRepository};
use chrono::Duration;
use sqlx::SqlitePool;

/// Global state shared by every route and middleware
pub struct AppState {
    /// Repository of the login accounts
    pub user: UserRepository,

    /// Resident directory
    pub resident: ResidentRepository,

    /// Message store (read side)
    pub msg: MessageRepository,

    /// Mutating operations on threads
    pub engine: ThreadEngine,

    /// Open sessions, keyed by bearer token
    pub sessions: SessionStore,
}

impl AppState {
    /// Create a new AppState over the given connection pool.
    ///
    /// # Arguments
    /// * `pool` - Shared SQLite connection pool
    /// * `session_ttl` - Lifetime of a session token
    pub fn new(pool: SqlitePool, session_ttl: Duration) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            resident: ResidentRepository::new(pool.clone()),
            msg: MessageRepository::new(pool.clone()),
            engine: ThreadEngine::new(pool),
            sessions: SessionStore::new(session_ttl),
        }
    }
}
