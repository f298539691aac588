//! Storage traits for the recipe document store.
//!
//! This module defines the contract every document store backend must
//! implement.

use async_trait::async_trait;

use recipes_core::Recipe;

use crate::error::StorageError;

/// The document store contract for recipe records.
///
/// Implementations must be thread-safe (`Send + Sync`). Reads return
/// `Option` for missing records; mutations report how many records
/// matched so callers can distinguish a no-op update/delete from a
/// successful one.
///
/// # Example
///
/// ```ignore
/// use recipes_storage::{RecipeStore, StorageError};
///
/// async fn get_recipe(store: &dyn RecipeStore, id: &str) -> Result<Recipe, StorageError> {
///     store
///         .find_by_id(id)
///         .await?
///         .ok_or_else(|| StorageError::not_found(id))
/// }
/// ```
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Returns all recipes in store iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn find_all(&self) -> Result<Vec<Recipe>, StorageError>;

    /// Reads a recipe by ID.
    ///
    /// Returns `None` if the recipe does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing
    /// records.
    async fn find_by_id(&self, id: &str) -> Result<Option<Recipe>, StorageError>;

    /// Inserts a new recipe.
    ///
    /// The recipe must already carry its server-assigned ID and
    /// publication timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidRecord` if a recipe with the same
    /// ID already exists.
    async fn insert(&self, recipe: &Recipe) -> Result<(), StorageError>;

    /// Replaces the mutable fields of the recipe with the given ID.
    ///
    /// Returns the number of matched records (0 or 1); callers treat a
    /// zero-matched update as not found.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn update(&self, id: &str, recipe: &Recipe) -> Result<u64, StorageError>;

    /// Deletes the recipe with the given ID.
    ///
    /// Returns the number of matched records (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn delete(&self, id: &str) -> Result<u64, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that RecipeStore is object-safe
    fn _assert_store_object_safe(_: &dyn RecipeStore) {}
}
