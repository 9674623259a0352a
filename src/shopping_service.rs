//! # Shopping Service
//!
//! Runs consolidation passes: fetch the planned recipes, consolidate their
//! ingredients against the purchased set, and apply the result to the store.
//!
//! A pass is computed off to the side and applied in one step under the store
//! lock. When a newer pass has started by the time a pass is ready, its result
//! is discarded so stale data never overwrites newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::consolidation::consolidate;
use crate::ingredient_model::ShoppingListItem;
use crate::recipe_source::{fetch_all, RecipeSource};
use crate::shopping_list::ShoppingListStore;

/// Result of a regeneration request
#[derive(Debug, Clone, PartialEq)]
pub enum RegenerationOutcome {
    /// The pass was applied to the store
    Applied {
        /// Items computed by this pass, sorted by name
        items: Vec<ShoppingListItem>,
        /// Recipes that could not be fetched and were left out; retryable
        failed_ids: Vec<String>,
    },
    /// A newer pass started first; this result was dropped
    Stale,
}

/// Coordinates consolidation passes against a shared store
pub struct ShoppingService<S> {
    source: Arc<S>,
    store: Arc<Mutex<ShoppingListStore>>,
    generation: AtomicU64,
}

impl<S: RecipeSource> ShoppingService<S> {
    pub fn new(source: Arc<S>, store: Arc<Mutex<ShoppingListStore>>) -> Self {
        Self {
            source,
            store,
            generation: AtomicU64::new(0),
        }
    }

    /// Shared handle to the store, for reads and user mutations
    pub fn store(&self) -> Arc<Mutex<ShoppingListStore>> {
        Arc::clone(&self.store)
    }

    /// Recompute the shopping list from `recipe_ids`
    pub async fn regenerate(&self, recipe_ids: &[String]) -> RegenerationOutcome {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation = token, recipes = recipe_ids.len(), "Starting consolidation pass");

        let fetched = fetch_all(Arc::clone(&self.source), recipe_ids).await;

        let mut store = self.store.lock().await;
        if self.generation.load(Ordering::SeqCst) != token {
            info!(generation = token, "Discarding stale consolidation pass");
            return RegenerationOutcome::Stale;
        }

        let items = consolidate(&fetched.recipes, store.purchased_ids());
        store.add_or_update_items(items.clone());

        info!(
            generation = token,
            items = items.len(),
            failed = fetched.failed_ids.len(),
            "Applied consolidation pass"
        );

        RegenerationOutcome::Applied {
            items,
            failed_ids: fetched.failed_ids,
        }
    }
}
