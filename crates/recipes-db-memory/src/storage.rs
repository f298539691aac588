use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use recipes_core::Recipe;
use recipes_storage::{RecipeStore, StorageError};

/// In-memory recipe store.
///
/// Backed by an `IndexMap` behind an async `RwLock`. Insertion order is
/// preserved and defines the store's iteration order, which is what
/// `find_all` (and therefore list/search results) reflect.
#[derive(Debug, Default)]
pub struct InMemoryRecipeStore {
    data: RwLock<IndexMap<String, Recipe>>,
}

impl InMemoryRecipeStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(IndexMap::new()),
        }
    }

    /// Creates a store pre-populated with the given recipes.
    pub fn with_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        let data = recipes.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            data: RwLock::new(data),
        }
    }

    /// Returns the number of stored recipes.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Returns `true` if the store holds no recipes.
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn find_all(&self) -> Result<Vec<Recipe>, StorageError> {
        let guard = self.data.read().await;
        Ok(guard.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Recipe>, StorageError> {
        let guard = self.data.read().await;
        Ok(guard.get(id).cloned())
    }

    async fn insert(&self, recipe: &Recipe) -> Result<(), StorageError> {
        let mut guard = self.data.write().await;
        if guard.contains_key(&recipe.id) {
            return Err(StorageError::invalid_record(format!(
                "recipe {} already exists",
                recipe.id
            )));
        }
        guard.insert(recipe.id.clone(), recipe.clone());
        Ok(())
    }

    async fn update(&self, id: &str, recipe: &Recipe) -> Result<u64, StorageError> {
        let mut guard = self.data.write().await;
        match guard.get_mut(id) {
            Some(existing) => {
                *existing = recipe.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &str) -> Result<u64, StorageError> {
        let mut guard = self.data.write().await;
        // shift_remove keeps the iteration order of the remaining entries
        match guard.shift_remove(id) {
            Some(_) => Ok(1),
            None => Ok(0),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
