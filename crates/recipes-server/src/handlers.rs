//! HTTP handlers for the recipes API.

use axum::extract::{FromRef, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use recipes_auth::{AuthService, AuthState, BearerAuth, TokenPair};
use recipes_core::{Recipe, RecipeDraft};

use crate::error::ApiError;
use crate::service::RecipeService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<RecipeService>,
    pub auth: AuthState,
    /// Present only in JWT mode; sign-in and refresh need it.
    pub auth_service: Option<Arc<AuthService>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> AuthState {
        state.auth.clone()
    }
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Recipes Server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

// ---- Recipes ----

pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = state.recipes.list().await?;
    Ok(Json(recipes.as_ref().clone()))
}

pub async fn get_recipe(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = state.recipes.get(&id).await?;
    Ok(Json(recipe))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub tag: String,
}

pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = state.recipes.search_by_tag(&params.tag).await?;
    Ok(Json(recipes))
}

pub async fn create_recipe(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Json(draft): Json<RecipeDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let recipe = state.recipes.create(draft).await?;
    Ok((StatusCode::OK, Json(recipe)))
}

pub async fn update_recipe(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<RecipeDraft>,
) -> Result<impl IntoResponse, ApiError> {
    state.recipes.update(&id, draft).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Recipe has been updated" })),
    ))
}

pub async fn delete_recipe(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.recipes.delete(&id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Recipe has been deleted" })),
    ))
}

// ---- Auth ----

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn signin(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let auth = token_issuer(&state)?;
    let pair = auth.sign_in(&body.username, &body.password).await?;
    Ok(Json(pair))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let auth = token_issuer(&state)?;
    let pair = auth.refresh(&body.refresh_token).await?;
    Ok(Json(pair))
}

fn token_issuer(state: &AppState) -> Result<&Arc<AuthService>, ApiError> {
    state
        .auth_service
        .as_ref()
        .ok_or_else(|| ApiError::unauthorized("token endpoints are not enabled"))
}
