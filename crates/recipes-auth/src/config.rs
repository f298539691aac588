//! Authentication configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::AuthError;

/// Minimum length for the JWT signing secret, in bytes.
const MIN_JWT_SECRET_LEN: usize = 32;

/// Authentication configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// enabled = true
/// mode = "jwt"
/// issuer = "http://localhost:8080"
/// jwt_secret = "change-me-to-a-long-random-string!!"
/// access_token_lifetime = "15m"
/// refresh_token_lifetime = "30d"
///
/// [[auth.users]]
/// username = "admin"
/// password_hash = "$argon2id$..."
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Enable/disable authentication entirely.
    /// When disabled, protected routes accept every request.
    pub enabled: bool,

    /// How protected routes are authenticated.
    pub mode: AuthMode,

    /// Issuer URL (used in the token `iss` claim).
    pub issuer: String,

    /// Secret used to sign and verify access tokens (jwt mode).
    pub jwt_secret: String,

    /// Static key compared against the `X-API-Key` header (api-key mode).
    pub api_key: String,

    /// Access token lifetime. Short by design; clients refresh.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,

    /// Users seeded into the in-memory user store at startup.
    ///
    /// The user store is read-only at runtime; this is the only way
    /// accounts enter the system.
    pub users: Vec<UserSeed>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: AuthMode::Jwt,
            issuer: "http://localhost:8080".to_string(),
            jwt_secret: String::new(),
            api_key: String::new(),
            access_token_lifetime: Duration::from_secs(15 * 60),
            refresh_token_lifetime: Duration::from_secs(30 * 24 * 3600),
            users: Vec::new(),
        }
    }
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when the selected mode is
    /// missing its secret material or lifetimes are zero.
    pub fn validate(&self) -> Result<(), AuthError> {
        if !self.enabled {
            return Ok(());
        }
        match self.mode {
            AuthMode::Jwt => {
                if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
                    return Err(AuthError::configuration(format!(
                        "auth.jwt_secret must be at least {MIN_JWT_SECRET_LEN} bytes"
                    )));
                }
                if self.access_token_lifetime.is_zero() {
                    return Err(AuthError::configuration(
                        "auth.access_token_lifetime must be > 0",
                    ));
                }
                if self.refresh_token_lifetime.is_zero() {
                    return Err(AuthError::configuration(
                        "auth.refresh_token_lifetime must be > 0",
                    ));
                }
            }
            AuthMode::ApiKey => {
                if self.api_key.is_empty() {
                    return Err(AuthError::configuration(
                        "auth.api_key must be set in api-key mode",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Authentication mode for protected routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// Bearer JWT access tokens issued via /signin and /refresh.
    Jwt,
    /// A single static key carried in the `X-API-Key` header.
    ApiKey,
}

/// A user account seeded from configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserSeed {
    /// Username for sign-in.
    pub username: String,

    /// Argon2 hash of the user's password.
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let cfg = AuthConfig::default();
        assert!(cfg.enabled);
        assert_eq!(cfg.mode, AuthMode::Jwt);
        assert_eq!(cfg.access_token_lifetime, Duration::from_secs(900));
    }

    #[test]
    fn test_validate_jwt_mode() {
        assert!(jwt_config().validate().is_ok());

        let cfg = AuthConfig {
            jwt_secret: "too-short".to_string(),
            ..AuthConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_api_key_mode() {
        let cfg = AuthConfig {
            mode: AuthMode::ApiKey,
            api_key: "secret-key".to_string(),
            ..AuthConfig::default()
        };
        assert!(cfg.validate().is_ok());

        let cfg = AuthConfig {
            mode: AuthMode::ApiKey,
            ..AuthConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_disabled_skips_validation() {
        let cfg = AuthConfig {
            enabled: false,
            ..AuthConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_deserialization_with_humantime_lifetimes() {
        let cfg: AuthConfig = serde_json::from_value(serde_json::json!({
            "mode": "api-key",
            "api_key": "k",
            "access_token_lifetime": "5m",
            "users": [{"username": "admin", "password_hash": "$argon2id$x"}],
        }))
        .unwrap();

        assert_eq!(cfg.mode, AuthMode::ApiKey);
        assert_eq!(cfg.access_token_lifetime, Duration::from_secs(300));
        assert_eq!(cfg.users.len(), 1);
        assert_eq!(cfg.users[0].username, "admin");
    }
}
