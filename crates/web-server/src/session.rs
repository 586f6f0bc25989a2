//! Server-side sessions.
//!
//! The browser only ever holds a random id in a cookie; who the user is and
//! what role they have lives here, in memory, until the session idles out
//! or the user logs out.

use chrono::{DateTime, Duration, Utc};
use core_types::{Role, UserAccount};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

/// What a request knows about its logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub user_id: i32,
    pub display_name: String,
    pub role: Role,
}

impl From<&UserAccount> for SessionUser {
    fn from(account: &UserAccount) -> Self {
        Self {
            user_id: account.user_id,
            display_name: account.full_name(),
            role: account.role,
        }
    }
}

#[derive(Debug, Clone)]
struct SessionEntry {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Starts a session and returns the id to put in the cookie.
    pub fn create(&self, user: SessionUser) -> Uuid {
        let id = Uuid::new_v4();
        tracing::debug!(user_id = user.user_id, "Session started");
        self.sessions.insert(
            id,
            SessionEntry {
                user,
                expires_at: Utc::now() + self.ttl,
            },
        );
        id
    }

    /// The user behind `id`, extending the session's lifetime. Expired
    /// sessions are dropped on sight.
    pub fn get(&self, id: &Uuid) -> Option<SessionUser> {
        let now = Utc::now();
        {
            let mut entry = self.sessions.get_mut(id)?;
            if entry.expires_at > now {
                entry.expires_at = now + self.ttl;
                return Some(entry.user.clone());
            }
        }
        self.sessions.remove(id);
        None
    }

    /// Ends a session. Returns whether it existed.
    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drops every expired session; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.sessions.len())
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

    fn teacher() -> SessionUser {
        SessionUser {
            user_id: 1,
            display_name: "Ana Petrova".to_string(),
            role: Role::Teacher,
        }
    }

    #[test]
    fn created_sessions_resolve_until_removed() {
        let store = SessionStore::new(30);
        let id = store.create(teacher());
        assert_eq!(store.get(&id), Some(teacher()));
        assert!(store.remove(&id));
        assert_eq!(store.get(&id), None);
        assert!(!store.remove(&id));
    }

    #[test]
    fn unknown_ids_resolve_to_nothing() {
        let store = SessionStore::new(30);
        store.create(teacher());
        assert_eq!(store.get(&Uuid::new_v4()), None);
    }

    #[test]
    fn expired_sessions_are_dropped() {
        let store = SessionStore::new(-1);
        let id = store.create(teacher());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id), None);
        assert!(store.is_empty());

        store.create(teacher());
        store.create(teacher());
        assert_eq!(store.purge_expired(), 2);
    }
}
