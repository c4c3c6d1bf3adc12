//! Session store - opaque bearer tokens mapped to the actor that logged in
//!
//! Process-wide state: a token is created on login and removed on logout.
//! Sessions also expire after a configurable time to live: an expired token
//! is rejected when resolved, and every login sweeps the expired entries.

use crate::messaging::Actor;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub actor: Actor,
    pub created_at: DateTime<Utc>,
}

pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Open a session for `actor` and return its token
    pub fn create(&self, actor: Actor) -> String {
        self.purge_expired();

        let token = Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                actor,
                created_at: Utc::now(),
            },
        );
        token
    }

    /// Actor of a live session; an expired session is evicted and yields `None`
    pub fn resolve(&self, token: &str) -> Option<Actor> {
        {
            let session = self.sessions.get(token)?;
            if Utc::now() - session.created_at <= self.ttl {
                return Some(session.actor.clone());
            }
        }

        debug!("Evicting expired session");
        self.sessions.remove(token);
        None
    }

    /// Drop every session older than the time to live, returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| now - session.created_at <= self.ttl);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!("Purged {} expired sessions", removed);
        }
        removed
    }

    /// Close a session, `false` if the token was unknown
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_logout_cycle() {
        let store = SessionStore::new(Duration::hours(1));
        let actor = Actor::resident(2, 1);

        let token = store.create(actor.clone());
        assert_eq!(store.resolve(&token), Some(actor));
        assert_eq!(store.len(), 1);

        assert!(store.revoke(&token));
        assert!(!store.revoke(&token));
        assert_eq!(store.resolve(&token), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_tokens_are_distinct() {
        let store = SessionStore::new(Duration::hours(1));
        let first = store.create(Actor::admin(1));
        let second = store.create(Actor::admin(1));
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_expired_session_is_evicted() {
        let store = SessionStore::new(Duration::milliseconds(10));
        let token = store.create(Actor::admin(1));

        std::thread::sleep(std::time::Duration::from_millis(30));

        assert_eq!(store.resolve(&token), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_login_sweeps_stale_sessions() {
        let store = SessionStore::new(Duration::milliseconds(1));
        for user_id in 0..100 {
            store.create(Actor::admin(user_id));
        }

        std::thread::sleep(std::time::Duration::from_millis(20));

        // none of the stale tokens is ever resolved again
        store.create(Actor::admin(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_purge_keeps_live_sessions() {
        let store = SessionStore::new(Duration::hours(1));
        store.create(Actor::admin(1));
        store.create(Actor::resident(2, 1));

        assert_eq!(store.purge_expired(), 0);
        assert_eq!(store.len(), 2);
    }
}
