//! Storage traits and in-memory backends for auth data.

pub mod memory;
pub mod refresh_token;
pub mod user;

pub use memory::{MemoryRefreshTokenStore, MemoryUserStore};
pub use refresh_token::{generate_refresh_token, token_hash, RefreshToken, RefreshTokenStore};
pub use user::{User, UserStore};
