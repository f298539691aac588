//! In-memory auth storage backends.
//!
//! Suitable for single-process deployments and tests. Data is lost on
//! restart; outstanding refresh tokens become invalid, which is safe.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use time::OffsetDateTime;

use crate::error::AuthError;
use crate::storage::refresh_token::{RefreshToken, RefreshTokenStore};
use crate::storage::user::{User, UserStore};
use crate::AuthResult;

/// In-memory user store, keyed by username.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given users.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let map = users
            .into_iter()
            .map(|u| (u.username.clone(), u))
            .collect();
        Self {
            users: RwLock::new(map),
        }
    }

    /// Returns the number of users in the store.
    pub fn len(&self) -> usize {
        self.users.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| AuthError::storage("user store lock poisoned"))?;
        Ok(users.get(username).cloned())
    }

    async fn find_by_id(&self, id: &str) -> AuthResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| AuthError::storage("user store lock poisoned"))?;
        Ok(users.values().find(|u| u.id == id).cloned())
    }
}

/// In-memory refresh token store, keyed by token hash.
#[derive(Default)]
pub struct MemoryRefreshTokenStore {
    tokens: RwLock<HashMap<String, RefreshToken>>,
}

impl MemoryRefreshTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored tokens (including revoked ones).
    pub fn len(&self) -> usize {
        self.tokens.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| AuthError::storage("refresh token store lock poisoned"))?;
        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<RefreshToken>> {
        let tokens = self
            .tokens
            .read()
            .map_err(|_| AuthError::storage("refresh token store lock poisoned"))?;
        Ok(tokens.get(token_hash).cloned())
    }

    async fn revoke(&self, token_hash: &str) -> AuthResult<()> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| AuthError::storage("refresh token store lock poisoned"))?;
        match tokens.get_mut(token_hash) {
            Some(token) => {
                if token.revoked_at.is_none() {
                    token.revoked_at = Some(OffsetDateTime::now_utc());
                }
                Ok(())
            }
            None => Err(AuthError::invalid_grant("refresh token not found")),
        }
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| AuthError::storage("refresh token store lock poisoned"))?;
        let now = OffsetDateTime::now_utc();
        let before = tokens.len();
        tokens.retain(|_, token| token.is_valid(now));
        Ok((before - tokens.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_user_lookup_by_username_and_id() {
        let user = User::new("alice", "$argon2id$x");
        let id = user.id.clone();
        let store = MemoryUserStore::with_users([user]);

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, id);

        let found = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.username, "alice");

        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_token_create_and_find() {
        let store = MemoryRefreshTokenStore::new();
        let token = RefreshToken::new("hash-1", "user-1", Duration::from_secs(3600));
        store.create(&token).await.unwrap();

        let found = store.find_by_hash("hash-1").await.unwrap().unwrap();
        assert_eq!(found.subject, "user-1");
        assert!(found.is_valid(OffsetDateTime::now_utc()));

        assert!(store.find_by_hash("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_marks_token() {
        let store = MemoryRefreshTokenStore::new();
        let token = RefreshToken::new("hash-1", "user-1", Duration::from_secs(3600));
        store.create(&token).await.unwrap();

        store.revoke("hash-1").await.unwrap();
        let found = store.find_by_hash("hash-1").await.unwrap().unwrap();
        assert!(found.is_revoked());

        // Revoking twice is a no-op, not an error.
        store.revoke("hash-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_removes_dead_tokens() {
        let store = MemoryRefreshTokenStore::new();
        store
            .create(&RefreshToken::new("live", "user-1", Duration::from_secs(3600)))
            .await
            .unwrap();
        store
            .create(&RefreshToken::new("stale", "user-1", Duration::ZERO))
            .await
            .unwrap();
        store
            .create(&RefreshToken::new("dead", "user-1", Duration::from_secs(3600)))
            .await
            .unwrap();
        store.revoke("dead").await.unwrap();

        let removed = store.cleanup_expired().await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.find_by_hash("live").await.unwrap().is_some());
        assert!(store.find_by_hash("stale").await.unwrap().is_none());
        assert!(store.find_by_hash("dead").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cleanup_on_empty_store() {
        let store = MemoryRefreshTokenStore::new();
        assert_eq!(store.cleanup_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_revoke_unknown_token_fails() {
        let store = MemoryRefreshTokenStore::new();
        assert!(matches!(
            store.revoke("nope").await.unwrap_err(),
            AuthError::InvalidGrant { .. }
        ));
    }
}
