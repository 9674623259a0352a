//! # Recipe Cache
//!
//! Read-through/write-through cache of recipe details in front of any
//! [`RecipeSource`]. Each cached record carries its own timestamp and TTL.
//! Expired or unreadable records count as misses; cache write failures are
//! logged and never fail the lookup.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::FetchError;
use crate::recipe_model::RecipeDetail;
use crate::recipe_source::RecipeSource;
use crate::storage::{load_json, recipe_cache_key, save_json, SharedStorage};

/// A cached value with its own expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
    pub ttl_secs: u64,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, timestamp: DateTime<Utc>, ttl_secs: u64) -> Self {
        Self {
            data,
            timestamp,
            ttl_secs,
        }
    }

    /// Whether the entry is still valid at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let ttl = i64::try_from(self.ttl_secs)
            .ok()
            .and_then(Duration::try_seconds);

        match ttl {
            Some(ttl) => now.signed_duration_since(self.timestamp) < ttl,
            // Too large to represent: never expires
            None => true,
        }
    }
}

/// Recipe source that consults storage before the wrapped source
pub struct CachedRecipeSource<S> {
    inner: Arc<S>,
    storage: SharedStorage,
    ttl_secs: u64,
}

impl<S: RecipeSource> CachedRecipeSource<S> {
    pub fn new(inner: Arc<S>, storage: SharedStorage, ttl_secs: u64) -> Self {
        Self {
            inner,
            storage,
            ttl_secs,
        }
    }

    /// Fresh cached details for `id`, if any
    pub fn cached(&self, id: &str) -> Option<RecipeDetail> {
        let key = recipe_cache_key(id);
        match load_json::<CacheEntry<RecipeDetail>>(self.storage.as_ref(), &key) {
            Ok(Some(entry)) if entry.is_fresh(Utc::now()) => Some(entry.data),
            Ok(Some(_)) => {
                debug!(recipe_id = %id, "Cached recipe expired");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(recipe_id = %id, error = %e, "Error reading from recipe cache");
                None
            }
        }
    }

    /// Store details for `id`, stamped now
    pub fn store(&self, id: &str, recipe: &RecipeDetail) {
        let entry = CacheEntry::new(recipe, Utc::now(), self.ttl_secs);
        if let Err(e) = save_json(self.storage.as_ref(), &recipe_cache_key(id), &entry) {
            warn!(recipe_id = %id, error = %e, "Error writing to recipe cache");
        }
    }
}

impl<S: RecipeSource> RecipeSource for CachedRecipeSource<S> {
    async fn fetch_recipe_details(&self, id: &str) -> Result<Option<RecipeDetail>, FetchError> {
        if let Some(recipe) = self.cached(id) {
            debug!(recipe_id = %id, "Recipe cache hit");
            return Ok(Some(recipe));
        }

        let fetched = self.inner.fetch_recipe_details(id).await?;
        if let Some(recipe) = &fetched {
            self.store(id, recipe);
        }

        Ok(fetched)
    }
}
