//! User storage trait.
//!
//! The user store is read-only from the service's perspective: accounts
//! are provisioned externally (seeded from configuration at startup)
//! and only looked up here.

use async_trait::async_trait;

use crate::AuthResult;

/// A user account.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier; becomes the token subject.
    pub id: String,

    /// Username for sign-in.
    pub username: String,

    /// Argon2 hash of the user's password.
    pub password_hash: String,

    /// Whether the account may authenticate.
    pub active: bool,
}

impl User {
    /// Creates an active user with a generated ID.
    #[must_use]
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            password_hash: password_hash.into(),
            active: true,
        }
    }
}

/// Lookup operations over user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by username.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;

    /// Finds a user by ID.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: &str) -> AuthResult<Option<User>>;
}
