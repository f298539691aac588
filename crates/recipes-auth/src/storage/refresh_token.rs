//! Refresh token storage.
//!
//! Refresh tokens are opaque random strings handed to the client once;
//! the server keeps only their SHA-256 hash. Revocation must be atomic:
//! once revoked, a token can never mint another access token.

use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::AuthResult;

/// Number of random bytes in a raw refresh token.
const TOKEN_BYTES: usize = 32;

/// A stored refresh token record.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    /// SHA-256 hash of the raw token, hex-encoded.
    pub token_hash: String,

    /// Subject (user ID) the token is bound to.
    pub subject: String,

    /// When the token was issued.
    pub issued_at: OffsetDateTime,

    /// When the token expires.
    pub expires_at: OffsetDateTime,

    /// When the token was revoked, if it has been.
    pub revoked_at: Option<OffsetDateTime>,
}

impl RefreshToken {
    /// Creates a new unrevoked record expiring `lifetime` from now.
    #[must_use]
    pub fn new(
        token_hash: impl Into<String>,
        subject: impl Into<String>,
        lifetime: std::time::Duration,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            token_hash: token_hash.into(),
            subject: subject.into(),
            issued_at: now,
            expires_at: now + lifetime,
            revoked_at: None,
        }
    }

    /// Returns `true` if the token has expired.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }

    /// Returns `true` if the token has been revoked.
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Returns `true` if the token may still be used.
    #[must_use]
    pub fn is_valid(&self, now: OffsetDateTime) -> bool {
        !self.is_revoked() && !self.is_expired(now)
    }
}

/// Generates a fresh raw refresh token and its storage hash.
///
/// The raw token goes to the client; only the hash is persisted.
#[must_use]
pub fn generate_refresh_token() -> (String, String) {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hash = token_hash(&raw);
    (raw, hash)
}

/// Hashes a raw refresh token for storage or lookup.
#[must_use]
pub fn token_hash(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// Storage operations for refresh tokens.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Stores a new refresh token record.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be stored.
    async fn create(&self, token: &RefreshToken) -> AuthResult<()>;

    /// Finds a refresh token by its hash.
    ///
    /// Returns records regardless of expiry/revocation status; callers
    /// must check `is_valid` before honoring one.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<RefreshToken>>;

    /// Revokes a refresh token.
    ///
    /// Sets `revoked_at` to the current time. Revoking an already
    /// revoked token is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not found or the operation
    /// fails.
    async fn revoke(&self, token_hash: &str) -> AuthResult<()>;

    /// Deletes expired and revoked token records.
    ///
    /// Should be called periodically so dead records do not accumulate.
    /// Deleting a revoked record is safe: a lookup miss rejects the
    /// token just as the revocation mark would.
    ///
    /// # Returns
    ///
    /// Returns the number of records deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleanup operation fails.
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
