//! Authentication for the recipes server.
//!
//! Covers the full token lifecycle: password sign-in, short-lived JWT
//! access tokens, rotating server-side refresh tokens, and the axum
//! extractor that guards protected routes. A static API-key mode is
//! available as a degraded alternative to JWT.

pub mod config;
pub mod error;
pub mod extract;
pub mod password;
pub mod service;
pub mod storage;
pub mod token;

pub use config::{AuthConfig, AuthMode, UserSeed};
pub use error::{AuthError, ErrorCategory};
pub use extract::{AuthState, AuthSubject, BearerAuth};
pub use service::{AuthService, TokenPair};
pub use storage::{
    MemoryRefreshTokenStore, MemoryUserStore, RefreshToken, RefreshTokenStore, User, UserStore,
};
pub use token::{AccessTokenClaims, TokenService};

/// Convenience result type for auth operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;
