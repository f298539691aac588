//! HTTP server for the recipes API.
//!
//! Wires the in-memory recipe store, the invalidate-on-write list
//! cache, and the auth layer into an axum application.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod server;
pub mod service;

pub use cache::{CacheError, MemoryCache, RecipeCache, RECIPES_KEY};
pub use config::{load_config, AppConfig};
pub use error::ApiError;
pub use handlers::AppState;
pub use server::{build_app, build_state, RecipesServer, ServerBuilder};
pub use service::RecipeService;
