//! Axum extractors guarding protected routes.
//!
//! Handlers opt into authentication by taking a [`BearerAuth`]
//! argument. The extractor pulls [`AuthState`] out of the router state
//! via `FromRef`, so any state type that carries one works.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::config::AuthMode;
use crate::error::AuthError;
use crate::token::TokenService;
use crate::AuthResult;

/// Header carrying the static key in api-key mode.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared authentication state for the extractor.
#[derive(Clone)]
pub struct AuthState {
    enabled: bool,
    mode: AuthMode,
    tokens: Option<Arc<TokenService>>,
    api_key: Option<String>,
}

impl AuthState {
    /// State for JWT mode.
    #[must_use]
    pub fn jwt(tokens: Arc<TokenService>) -> Self {
        Self {
            enabled: true,
            mode: AuthMode::Jwt,
            tokens: Some(tokens),
            api_key: None,
        }
    }

    /// State for static API-key mode.
    #[must_use]
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            enabled: true,
            mode: AuthMode::ApiKey,
            tokens: None,
            api_key: Some(key.into()),
        }
    }

    /// State that accepts every request (auth disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            mode: AuthMode::Jwt,
            tokens: None,
            api_key: None,
        }
    }

    /// Returns `true` if authentication is enforced.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn authenticate(&self, parts: &Parts) -> AuthResult<AuthSubject> {
        if !self.enabled {
            return Ok(AuthSubject::Anonymous);
        }
        match self.mode {
            AuthMode::Jwt => self.authenticate_bearer(parts),
            AuthMode::ApiKey => self.authenticate_api_key(parts),
        }
    }

    fn authenticate_bearer(&self, parts: &Parts) -> AuthResult<AuthSubject> {
        let tokens = self
            .tokens
            .as_ref()
            .ok_or_else(|| AuthError::configuration("jwt mode without a token service"))?;

        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AuthError::unauthorized("missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AuthError::unauthorized("Authorization header is not a Bearer token"))?;

        let claims = tokens.verify(token)?;
        Ok(AuthSubject::User { id: claims.sub })
    }

    fn authenticate_api_key(&self, parts: &Parts) -> AuthResult<AuthSubject> {
        let expected = self
            .api_key
            .as_ref()
            .ok_or_else(|| AuthError::configuration("api-key mode without a key"))?;

        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AuthError::unauthorized("missing X-API-Key header"))?;

        if constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
            Ok(AuthSubject::ApiKey)
        } else {
            Err(AuthError::unauthorized("invalid API key"))
        }
    }
}

/// Who a request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSubject {
    /// A user identified by a verified access token.
    User {
        /// Subject claim from the token.
        id: String,
    },
    /// The holder of the static API key.
    ApiKey,
    /// No authentication enforced.
    Anonymous,
}

/// Extractor that rejects unauthenticated requests.
#[derive(Debug, Clone)]
pub struct BearerAuth(pub AuthSubject);

impl<S> FromRequestParts<S> for BearerAuth
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        match auth.authenticate(parts) {
            Ok(subject) => Ok(Self(subject)),
            Err(err) => {
                debug!(error = %err, path = %parts.uri.path(), "request rejected");
                Err(err)
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        // Server-side detail stays in the logs.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Compares two byte strings in time independent of where they differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use std::time::Duration;

    fn jwt_state() -> (AuthState, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new(
            b"0123456789abcdef0123456789abcdef",
            "http://localhost:8080",
            Duration::from_secs(900),
        ));
        (AuthState::jwt(tokens.clone()), tokens)
    }

    fn parts_with_header(name: &str, value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .uri("/recipes")
            .header(name, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    fn bare_parts() -> Parts {
        let (parts, ()) = Request::builder().uri("/recipes").body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_valid_bearer_token_accepted() {
        let (state, tokens) = jwt_state();
        let (token, _) = tokens.issue("user-1").unwrap();
        let parts = parts_with_header("authorization", &format!("Bearer {token}"));

        let subject = state.authenticate(&parts).unwrap();
        assert_eq!(
            subject,
            AuthSubject::User {
                id: "user-1".to_string()
            }
        );
    }

    #[test]
    fn test_missing_header_rejected() {
        let (state, _) = jwt_state();
        assert!(matches!(
            state.authenticate(&bare_parts()).unwrap_err(),
            AuthError::Unauthorized { .. }
        ));
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let (state, _) = jwt_state();
        let parts = parts_with_header("authorization", "Basic dXNlcjpwYXNz");
        assert!(matches!(
            state.authenticate(&parts).unwrap_err(),
            AuthError::Unauthorized { .. }
        ));
    }

    #[test]
    fn test_api_key_mode() {
        let state = AuthState::api_key("secret-key");

        let parts = parts_with_header("x-api-key", "secret-key");
        assert_eq!(state.authenticate(&parts).unwrap(), AuthSubject::ApiKey);

        let parts = parts_with_header("x-api-key", "wrong");
        assert!(state.authenticate(&parts).is_err());

        assert!(state.authenticate(&bare_parts()).is_err());
    }

    #[test]
    fn test_disabled_accepts_everything() {
        let state = AuthState::disabled();
        assert_eq!(
            state.authenticate(&bare_parts()).unwrap(),
            AuthSubject::Anonymous
        );
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_error_response_status() {
        let resp = AuthError::InvalidCredentials.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = AuthError::storage("down").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
