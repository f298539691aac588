//! Recipe operations over the store and cache.
//!
//! Reads go through the cache; writes go to the store and then
//! invalidate the cached list before the caller sees an acknowledgment.
//! A request observing its own write therefore never sees the
//! pre-write list.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use recipes_core::{validate_id, Recipe, RecipeDraft};
use recipes_storage::{RecipeStore, StorageError};

use crate::cache::{RecipeCache, RECIPES_KEY};
use crate::error::ApiError;

/// Default bound on a single storage call.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Coordinates the recipe store and the list cache.
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    cache: Arc<dyn RecipeCache>,
    op_timeout: Duration,
}

impl RecipeService {
    /// Creates a new service.
    #[must_use]
    pub fn new(store: Arc<dyn RecipeStore>, cache: Arc<dyn RecipeCache>) -> Self {
        Self {
            store,
            cache,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Overrides the per-operation storage timeout.
    #[must_use]
    pub fn with_op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = timeout;
        self
    }

    /// Lists all recipes, serving from the cache when possible.
    ///
    /// On a miss the full list is read from the store and cached before
    /// being returned. Cache trouble never fails a read; it is logged
    /// and the store result is returned uncached.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub async fn list(&self) -> Result<Arc<Vec<Recipe>>, ApiError> {
        match self.cache.get(RECIPES_KEY) {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "cache read failed, falling back to store"),
        }

        let recipes = self.bounded(self.store.find_all()).await?;
        debug!(count = recipes.len(), "recipe list loaded from store");

        match self.cache.set(RECIPES_KEY, recipes.clone()) {
            Ok(shared) => Ok(shared),
            Err(e) => {
                warn!(error = %e, "cache write failed, serving uncached");
                Ok(Arc::new(recipes))
            }
        }
    }

    /// Reads a single recipe by ID, straight from the store.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a malformed ID and `NotFound` if no
    /// recipe has this ID.
    pub async fn get(&self, id: &str) -> Result<Recipe, ApiError> {
        validate_id(id)?;
        self.bounded(self.store.find_by_id(id))
            .await?
            .ok_or_else(|| ApiError::not_found(format!("recipe not found: {id}")))
    }

    /// Lists recipes carrying the given tag (case-insensitive).
    ///
    /// Rides the same cached list as [`list`](Self::list), so search
    /// results are exactly as fresh as the list itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying list read fails.
    pub async fn search_by_tag(&self, tag: &str) -> Result<Vec<Recipe>, ApiError> {
        let all = self.list().await?;
        Ok(all.iter().filter(|r| r.has_tag(tag)).cloned().collect())
    }

    /// Creates a recipe from a draft.
    ///
    /// The cached list is invalidated after the insert and before this
    /// returns, so the acknowledgment implies a coherent cache.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an invalid draft and `Internal` if the
    /// insert or the invalidation fails.
    pub async fn create(&self, draft: RecipeDraft) -> Result<Recipe, ApiError> {
        validate_draft(&draft)?;
        let recipe = draft.into_recipe();
        self.bounded(self.store.insert(&recipe)).await?;
        self.invalidate_list()?;
        info!(id = %recipe.id, name = %recipe.name, "recipe created");
        Ok(recipe)
    }

    /// Replaces the mutable fields of an existing recipe.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a malformed ID or invalid draft and
    /// `NotFound` if the recipe does not exist.
    pub async fn update(&self, id: &str, draft: RecipeDraft) -> Result<Recipe, ApiError> {
        validate_id(id)?;
        validate_draft(&draft)?;

        let existing = self
            .bounded(self.store.find_by_id(id))
            .await?
            .ok_or_else(|| ApiError::not_found(format!("recipe not found: {id}")))?;

        let updated = draft.apply_to(&existing);
        let matched = self.bounded(self.store.update(id, &updated)).await?;
        if matched == 0 {
            // Deleted between the read and the write.
            return Err(ApiError::not_found(format!("recipe not found: {id}")));
        }

        self.invalidate_list()?;
        info!(id = %id, "recipe updated");
        Ok(updated)
    }

    /// Deletes a recipe by ID.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a malformed ID and `NotFound` if no
    /// recipe matched.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        validate_id(id)?;

        let matched = self.bounded(self.store.delete(id)).await?;
        if matched == 0 {
            return Err(ApiError::not_found(format!("recipe not found: {id}")));
        }

        self.invalidate_list()?;
        info!(id = %id, "recipe deleted");
        Ok(())
    }

    /// Invalidation on the write path must succeed before the ack;
    /// otherwise a success response could precede a stale read.
    fn invalidate_list(&self) -> Result<(), ApiError> {
        self.cache
            .invalidate(RECIPES_KEY)
            .map_err(|e| ApiError::internal(format!("cache invalidation failed: {e}")))
    }

    async fn bounded<T>(
        &self,
        op: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<T, ApiError> {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => Err(StorageError::timeout(self.op_timeout.as_millis() as u64).into()),
        }
    }
}

fn validate_draft(draft: &RecipeDraft) -> Result<(), ApiError> {
    if draft.name.trim().is_empty() {
        return Err(ApiError::bad_request("recipe name must not be empty"));
    }
    Ok(())
}
