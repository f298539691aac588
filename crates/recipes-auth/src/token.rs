//! JWT access token generation and validation.
//!
//! Access tokens are stateless HS256 JWTs: validity is cryptographic
//! plus expiry, never a storage lookup. The signing secret comes from
//! configuration and is shared by issuer and verifier.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;

use crate::error::AuthError;
use crate::AuthResult;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenClaims {
    /// Issuer (this server's URL).
    pub iss: String,

    /// Subject (user ID).
    pub sub: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// JWT ID (unique per token).
    pub jti: String,
}

/// Service for issuing and validating access tokens.
///
/// Thread-safe (`Send + Sync`); share it behind an `Arc`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    access_token_lifetime: Duration,
}

impl TokenService {
    /// Creates a new token service from the shared signing secret.
    #[must_use]
    pub fn new(secret: &[u8], issuer: impl Into<String>, access_token_lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            access_token_lifetime,
        }
    }

    /// Issues a new access token for the given subject.
    ///
    /// Returns the encoded token together with its claims so callers
    /// can report `expiresIn` without re-decoding.
    ///
    /// # Errors
    ///
    /// Returns an `Internal` error if encoding fails.
    pub fn issue(&self, subject: &str) -> AuthResult<(String, AccessTokenClaims)> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = AccessTokenClaims {
            iss: self.issuer.clone(),
            sub: subject.to_string(),
            exp: now + self.access_token_lifetime.as_secs() as i64,
            iat: now,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("token encoding failed: {e}")))?;

        Ok((token, claims))
    }

    /// Decodes and validates an access token.
    ///
    /// Checks the signature, the expiry, and the issuer.
    ///
    /// # Errors
    ///
    /// Returns `TokenExpired` for expired tokens and `InvalidToken`
    /// for everything else that fails validation.
    pub fn verify(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;

        decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::invalid_token(e.to_string()),
            })
    }

    /// Returns the configured access token lifetime.
    #[must_use]
    pub fn access_token_lifetime(&self) -> Duration {
        self.access_token_lifetime
    }

    /// Returns the issuer URL.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn service() -> TokenService {
        TokenService::new(SECRET, "http://localhost:8080", Duration::from_secs(900))
    }

    #[test]
    fn test_issue_and_verify() {
        let svc = service();
        let (token, claims) = svc.issue("user-1").unwrap();
        assert!(!token.is_empty());
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.exp - claims.iat, 900);

        let verified = svc.verify(&token).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn test_jti_unique_per_token() {
        let svc = service();
        let (_, a) = svc.issue("user-1").unwrap();
        let (_, b) = svc.issue("user-1").unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expired_token_rejected() {
        let svc = service();
        // Expired well past jsonwebtoken's default leeway.
        let past = AccessTokenClaims {
            iss: "http://localhost:8080".to_string(),
            sub: "user-1".to_string(),
            exp: OffsetDateTime::now_utc().unix_timestamp() - 3600,
            iat: OffsetDateTime::now_utc().unix_timestamp() - 7200,
            jti: "test".to_string(),
        };
        let expired = encode(
            &Header::new(Algorithm::HS256),
            &past,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            svc.verify(&expired).unwrap_err(),
            AuthError::TokenExpired
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = service();
        let other = TokenService::new(
            b"ffffffffffffffffffffffffffffffff",
            "http://localhost:8080",
            Duration::from_secs(900),
        );
        let (token, _) = other.issue("user-1").unwrap();

        assert!(matches!(
            svc.verify(&token).unwrap_err(),
            AuthError::InvalidToken { .. }
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let svc = service();
        let other = TokenService::new(SECRET, "http://evil.example.com", Duration::from_secs(900));
        let (token, _) = other.issue("user-1").unwrap();

        assert!(matches!(
            svc.verify(&token).unwrap_err(),
            AuthError::InvalidToken { .. }
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let svc = service();
        assert!(matches!(
            svc.verify("not.a.jwt").unwrap_err(),
            AuthError::InvalidToken { .. }
        ));
    }
}
