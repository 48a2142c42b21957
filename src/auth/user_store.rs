//! User Storage
//! Mission: Keep registered accounts behind a swappable store interface

use crate::auth::models::User;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

/// How a store treats a second registration under an existing username.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Refuse the registration with [`StoreError::Conflict`].
    #[default]
    Reject,
    /// Append the duplicate; lookups keep returning the first match.
    Allow,
}

/// User store errors
#[derive(Debug)]
pub enum StoreError {
    Conflict { username: String },
    /// Storage failure reported by a persistent backend; the in-memory
    /// store never produces it.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict { username } => write!(f, "Username already exists: {}", username),
            StoreError::Backend(msg) => write!(f, "User store failure: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Storage backend for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user record.
    async fn register(&self, user: User) -> Result<(), StoreError>;

    /// Look up a user, first inserted match wins.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Number of stored records.
    async fn len(&self) -> Result<usize, StoreError>;

    async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len().await? == 0)
    }
}

/// Process-lifetime user store; everything is lost on restart.
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
    policy: DuplicatePolicy,
}

impl InMemoryUserStore {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            policy,
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new(DuplicatePolicy::default())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn register(&self, user: User) -> Result<(), StoreError> {
        // Check and append under one write lock so racing registrations
        // of the same name cannot both pass the check.
        let mut users = self.users.write();

        if self.policy == DuplicatePolicy::Reject
            && users.iter().any(|u| u.username == user.username)
        {
            debug!("Rejected duplicate username: {}", user.username);
            return Err(StoreError::Conflict {
                username: user.username,
            });
        }

        info!("✅ Registered user: {}", user.username);
        users.push(user);
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.users.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_register_and_find() {
        let store = InMemoryUserStore::default();
        assert!(store.is_empty().await.unwrap());

        store.register(User::new("alice", "hash-a")).await.unwrap();

        let found = store.find_by_username("alice").await.unwrap();
        assert_eq!(found, Some(User::new("alice", "hash-a")));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_user_not_found() {
        let store = InMemoryUserStore::default();
        store.register(User::new("alice", "hash-a")).await.unwrap();

        assert!(store.find_by_username("bob").await.unwrap().is_none());
        // Lookup is exact, not case-folded
        assert!(store.find_by_username("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reject_policy_refuses_duplicates() {
        let store = InMemoryUserStore::new(DuplicatePolicy::Reject);
        store.register(User::new("alice", "hash-1")).await.unwrap();

        let err = store
            .register(User::new("alice", "hash-2"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { ref username } if username == "alice"));

        assert_eq!(store.len().await.unwrap(), 1);
        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "hash-1");
    }

    #[tokio::test]
    async fn test_allow_policy_keeps_first_match() {
        let store = InMemoryUserStore::new(DuplicatePolicy::Allow);
        store.register(User::new("alice", "hash-1")).await.unwrap();
        store.register(User::new("alice", "hash-2")).await.unwrap();

        assert_eq!(store.len().await.unwrap(), 2);
        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "hash-1");
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registrations_admit_one() {
        let store = Arc::new(InMemoryUserStore::new(DuplicatePolicy::Reject));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .register(User::new("alice", format!("hash-{}", i)))
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[test]
    fn test_store_error_display() {
        let conflict = StoreError::Conflict {
            username: "alice".to_string(),
        };
        assert_eq!(conflict.to_string(), "Username already exists: alice");

        let backend = StoreError::Backend("disk full".to_string());
        assert_eq!(backend.to_string(), "User store failure: disk full");
    }
}
