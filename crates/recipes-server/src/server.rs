//! Router assembly and server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use recipes_auth::{AuthMode, AuthService, AuthState};
use recipes_db_memory::InMemoryRecipeStore;
use recipes_storage::RecipeStore;

use crate::cache::MemoryCache;
use crate::config::AppConfig;
use crate::handlers::{self, AppState};
use crate::service::RecipeService;

/// Builds the application state from configuration.
///
/// # Errors
///
/// Returns an error if the auth configuration is invalid.
pub fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let store = Arc::new(InMemoryRecipeStore::new());
    tracing::info!(backend = store.backend_name(), "recipe store initialized");
    let cache = Arc::new(MemoryCache::new(cfg.cache.ttl));
    let recipes = Arc::new(
        RecipeService::new(store, cache).with_op_timeout(cfg.storage.op_timeout),
    );

    let (auth, auth_service) = if !cfg.auth.enabled {
        tracing::warn!("authentication is disabled, all routes are open");
        (AuthState::disabled(), None)
    } else {
        match cfg.auth.mode {
            AuthMode::Jwt => {
                let service = Arc::new(AuthService::from_config(&cfg.auth)?);
                (AuthState::jwt(service.token_service()), Some(service))
            }
            AuthMode::ApiKey => {
                cfg.auth
                    .validate()
                    .map_err(|e| anyhow::anyhow!("auth config error: {e}"))?;
                (AuthState::api_key(cfg.auth.api_key.clone()), None)
            }
        }
    };

    Ok(AppState {
        recipes,
        auth,
        auth_service,
    })
}

/// Builds the router over the given state.
pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/signin", post(handlers::signin))
        .route("/refresh", post(handlers::refresh))
        .route(
            "/recipes",
            get(handlers::list_recipes).post(handlers::create_recipe),
        )
        .route("/recipes/search", get(handlers::search_recipes))
        .route(
            "/recipes/{id}",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(cfg.server.request_timeout))
        .layer(axum::extract::DefaultBodyLimit::max(
            cfg.server.body_limit_bytes,
        ))
        .with_state(state)
}

pub struct RecipesServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    config: AppConfig,
}

impl ServerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    /// Builds the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be constructed.
    pub fn build(self) -> anyhow::Result<RecipesServer> {
        let state = build_state(&self.config)?;
        let app = build_app(state, &self.config);

        Ok(RecipesServer {
            addr: self.config.addr(),
            app,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipesServer {
    /// Binds the listener and serves until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if binding or serving fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
