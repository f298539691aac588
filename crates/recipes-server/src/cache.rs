//! Cache for the recipe list.
//!
//! A single key caches the full recipe list between writes. Entries
//! carry a TTL as a backstop; the primary coherence mechanism is
//! explicit invalidation on every successful write.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use recipes_core::Recipe;

/// Cache key for the full recipe list.
pub const RECIPES_KEY: &str = "recipes";

/// A cache operation failure.
///
/// The in-memory backend never produces one, but the service treats
/// every backend as fallible: read-path failures are swallowed,
/// write-path invalidation failures withhold the ack.
#[derive(Debug, thiserror::Error)]
#[error("Cache error: {message}")]
pub struct CacheError {
    /// Description of the failure.
    pub message: String,
}

impl CacheError {
    /// Creates a new cache error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Cache contract for recipe lists.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait RecipeCache: Send + Sync {
    /// Gets a cached list. Expired entries count as misses.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    fn get(&self, key: &str) -> Result<Option<Arc<Vec<Recipe>>>, CacheError>;

    /// Stores a list under the given key, returning the shared copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    fn set(&self, key: &str, recipes: Vec<Recipe>) -> Result<Arc<Vec<Recipe>>, CacheError>;

    /// Removes an entry. Removing a missing key is a no-op; either way
    /// the key must be absent when this returns successfully.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be confirmed.
    fn invalidate(&self, key: &str) -> Result<(), CacheError>;
}

/// A cached entry with TTL support.
///
/// The list is wrapped in `Arc` so cache hits clone a pointer, not the
/// recipes themselves.
#[derive(Clone, Debug)]
struct CachedEntry {
    data: Arc<Vec<Recipe>>,
    cached_at: Instant,
    ttl: Duration,
}

impl CachedEntry {
    fn new(data: Vec<Recipe>, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// In-process cache backend over a concurrent map.
pub struct MemoryCache {
    entries: DashMap<String, CachedEntry>,
    ttl: Duration,
}

impl MemoryCache {
    /// Creates an empty cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Number of entries (expired ones may still be counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecipeCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Arc<Vec<Recipe>>>, CacheError> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                tracing::debug!(key = %key, "cache hit");
                Ok(Some(Arc::clone(&entry.data)))
            }
            Some(entry) => {
                drop(entry);
                self.entries.remove(key);
                tracing::debug!(key = %key, "cache miss (expired)");
                Ok(None)
            }
            None => {
                tracing::debug!(key = %key, "cache miss");
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, recipes: Vec<Recipe>) -> Result<Arc<Vec<Recipe>>, CacheError> {
        let entry = CachedEntry::new(recipes, self.ttl);
        let data = Arc::clone(&entry.data);
        self.entries.insert(key.to_string(), entry);
        tracing::debug!(key = %key, ttl_secs = %self.ttl.as_secs(), "cache set");
        Ok(data)
    }

    fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        tracing::debug!(key = %key, "cache invalidated");
        Ok(())
    }
}
