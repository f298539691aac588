//! Sign-in and token refresh flows.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password::{hash_password, verify_password};
use crate::storage::memory::{MemoryRefreshTokenStore, MemoryUserStore};
use crate::storage::refresh_token::{
    generate_refresh_token, token_hash, RefreshToken, RefreshTokenStore,
};
use crate::storage::user::{User, UserStore};
use crate::token::TokenService;
use crate::AuthResult;

/// Access and refresh token pair returned by sign-in and refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived JWT for the Authorization header.
    pub access_token: String,

    /// Opaque single-use refresh token.
    pub refresh_token: String,

    /// Always "Bearer".
    pub token_type: String,

    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Orchestrates password sign-in and refresh token rotation.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    tokens: Arc<TokenService>,
    refresh_token_lifetime: Duration,
}

impl AuthService {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        tokens: Arc<TokenService>,
        refresh_token_lifetime: Duration,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            tokens,
            refresh_token_lifetime,
        }
    }

    /// Builds an auth service with in-memory stores from configuration.
    ///
    /// Seeded users come from `config.users`; passwords are expected to
    /// be Argon2 hashes already.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the config doesn't validate.
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        config.validate()?;

        let users = MemoryUserStore::with_users(
            config
                .users
                .iter()
                .map(|seed| User::new(seed.username.clone(), seed.password_hash.clone())),
        );
        info!(users = users.len(), "seeded user store from configuration");

        let tokens = TokenService::new(
            config.jwt_secret.as_bytes(),
            config.issuer.clone(),
            config.access_token_lifetime,
        );

        Ok(Self::new(
            Arc::new(users),
            Arc::new(MemoryRefreshTokenStore::new()),
            Arc::new(tokens),
            config.refresh_token_lifetime,
        ))
    }

    /// Authenticates a username/password pair and issues a token pair.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` whether the user is missing, the
    /// password is wrong, or the account is inactive; callers get no
    /// signal to distinguish the cases.
    pub async fn sign_in(&self, username: &str, password: &str) -> AuthResult<TokenPair> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                // Burn a hash verification so a missing user costs the
                // same as a wrong password.
                let _ = verify_password(password, &dummy_hash());
                debug!(username, "sign-in for unknown user");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !user.active {
            debug!(username, "sign-in for inactive user");
            return Err(AuthError::InvalidCredentials);
        }

        if !verify_password(password, &user.password_hash)? {
            debug!(username, "sign-in with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.issue_pair(&user.id).await?;
        info!(username, subject = %user.id, "user signed in");
        Ok(pair)
    }

    /// Exchanges a valid refresh token for a new token pair.
    ///
    /// The presented token is revoked before the new pair is issued, so
    /// each refresh token works at most once.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGrant` for unknown, expired, or revoked tokens
    /// and for tokens whose user no longer exists or is inactive.
    pub async fn refresh(&self, raw_token: &str) -> AuthResult<TokenPair> {
        let hash = token_hash(raw_token);
        let stored = self
            .refresh_tokens
            .find_by_hash(&hash)
            .await?
            .ok_or_else(|| AuthError::invalid_grant("unknown refresh token"))?;

        let now = OffsetDateTime::now_utc();
        if stored.is_revoked() {
            warn!(subject = %stored.subject, "revoked refresh token presented");
            return Err(AuthError::invalid_grant("refresh token revoked"));
        }
        if stored.is_expired(now) {
            return Err(AuthError::invalid_grant("refresh token expired"));
        }

        let user = self
            .users
            .find_by_id(&stored.subject)
            .await?
            .filter(|u| u.active)
            .ok_or_else(|| AuthError::invalid_grant("user no longer active"))?;

        // Rotate: the old token dies before the new pair exists.
        self.refresh_tokens.revoke(&hash).await?;

        let pair = self.issue_pair(&user.id).await?;
        debug!(subject = %user.id, "refresh token rotated");
        Ok(pair)
    }

    /// Returns a shared handle to the token service, for access token
    /// verification outside the sign-in/refresh flows.
    #[must_use]
    pub fn token_service(&self) -> Arc<TokenService> {
        Arc::clone(&self.tokens)
    }

    async fn issue_pair(&self, subject: &str) -> AuthResult<TokenPair> {
        // Opportunistic pruning keeps the store from collecting dead
        // records; a failed sweep must not block token issuance.
        match self.refresh_tokens.cleanup_expired().await {
            Ok(0) => {}
            Ok(removed) => debug!(removed, "pruned dead refresh tokens"),
            Err(err) => warn!(%err, "refresh token cleanup failed"),
        }

        let (access_token, claims) = self.tokens.issue(subject)?;
        let (raw_refresh, refresh_hash) = generate_refresh_token();
        let record = RefreshToken::new(refresh_hash, subject, self.refresh_token_lifetime);
        self.refresh_tokens.create(&record).await?;

        Ok(TokenPair {
            access_token,
            refresh_token: raw_refresh,
            token_type: "Bearer".to_string(),
            expires_in: (claims.exp - claims.iat).max(0) as u64,
        })
    }
}

/// A constant Argon2 hash used to equalize sign-in timing when the
/// user doesn't exist.
fn dummy_hash() -> String {
    static DUMMY: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    DUMMY
        .get_or_init(|| {
            hash_password("dummy-password-for-timing")
                .unwrap_or_else(|_| "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_string())
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserSeed;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service_with_user(username: &str, password: &str) -> AuthService {
        let config = AuthConfig {
            jwt_secret: SECRET.to_string(),
            users: vec![UserSeed {
                username: username.to_string(),
                password_hash: hash_password(password).unwrap(),
            }],
            ..AuthConfig::default()
        };
        AuthService::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_issues_verifiable_tokens() {
        let svc = service_with_user("alice", "hunter2");
        let pair = svc.sign_in("alice", "hunter2").await.unwrap();

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);

        let claims = svc.token_service().verify(&pair.access_token).unwrap();
        assert!(!claims.sub.is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_failures_are_indistinguishable() {
        let svc = service_with_user("alice", "hunter2");

        let missing = svc.sign_in("bob", "hunter2").await.unwrap_err();
        let wrong = svc.sign_in("alice", "wrong").await.unwrap_err();

        assert_eq!(missing.to_string(), wrong.to_string());
        assert!(matches!(missing, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let svc = service_with_user("alice", "hunter2");
        let first = svc.sign_in("alice", "hunter2").await.unwrap();

        let second = svc.refresh(&first.refresh_token).await.unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);
        assert_ne!(second.access_token, first.access_token);

        // The consumed token is dead.
        assert!(matches!(
            svc.refresh(&first.refresh_token).await.unwrap_err(),
            AuthError::InvalidGrant { .. }
        ));

        // The rotated one still works.
        svc.refresh(&second.refresh_token).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_rejects_expired_token() {
        let config = AuthConfig {
            jwt_secret: SECRET.to_string(),
            users: vec![UserSeed {
                username: "alice".to_string(),
                password_hash: hash_password("hunter2").unwrap(),
            }],
            ..AuthConfig::default()
        };
        let users = MemoryUserStore::with_users(
            config
                .users
                .iter()
                .map(|s| User::new(s.username.clone(), s.password_hash.clone())),
        );
        let tokens = TokenService::new(
            config.jwt_secret.as_bytes(),
            config.issuer.clone(),
            config.access_token_lifetime,
        );
        // Zero lifetime: every issued refresh token is already expired.
        let svc = AuthService::new(
            Arc::new(users),
            Arc::new(MemoryRefreshTokenStore::new()),
            Arc::new(tokens),
            Duration::ZERO,
        );

        let pair = svc.sign_in("alice", "hunter2").await.unwrap();
        let err = svc.refresh(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant { .. }));
    }

    #[tokio::test]
    async fn test_refresh_does_not_accumulate_dead_tokens() {
        let config = AuthConfig {
            jwt_secret: SECRET.to_string(),
            users: vec![UserSeed {
                username: "alice".to_string(),
                password_hash: hash_password("hunter2").unwrap(),
            }],
            ..AuthConfig::default()
        };
        let users = MemoryUserStore::with_users(
            config
                .users
                .iter()
                .map(|s| User::new(s.username.clone(), s.password_hash.clone())),
        );
        let tokens = TokenService::new(
            config.jwt_secret.as_bytes(),
            config.issuer.clone(),
            config.access_token_lifetime,
        );
        let refresh_store = Arc::new(MemoryRefreshTokenStore::new());
        let svc = AuthService::new(
            Arc::new(users),
            Arc::clone(&refresh_store) as Arc<dyn RefreshTokenStore>,
            Arc::new(tokens),
            config.refresh_token_lifetime,
        );

        let mut pair = svc.sign_in("alice", "hunter2").await.unwrap();
        for _ in 0..5 {
            pair = svc.refresh(&pair.refresh_token).await.unwrap();
        }

        // Each rotation revokes its predecessor and the next issuance
        // sweeps it out, so only the live token remains stored.
        assert_eq!(refresh_store.len(), 1);
        svc.refresh(&pair.refresh_token).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_rejects_unknown_token() {
        let svc = service_with_user("alice", "hunter2");
        assert!(matches!(
            svc.refresh("not-a-token").await.unwrap_err(),
            AuthError::InvalidGrant { .. }
        ));
    }

    #[tokio::test]
    async fn test_access_token_is_not_a_refresh_token() {
        let svc = service_with_user("alice", "hunter2");
        let pair = svc.sign_in("alice", "hunter2").await.unwrap();
        assert!(svc.refresh(&pair.access_token).await.is_err());
    }
}
