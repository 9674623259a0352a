//! # Shopping List Store
//!
//! Holds the consolidated shopping list and the purchased-id set, and writes
//! both through to storage on every change. The purchased set is the source of
//! truth for checked state: regenerating or updating list items never changes
//! it, only [`ShoppingListStore::toggle_purchased`],
//! [`ShoppingListStore::clear_purchased`] and [`ShoppingListStore::clear_list`] do.
//!
//! Loading is failure tolerant: a missing or corrupt snapshot starts the store
//! empty. Write failures are logged and the in-memory state stays correct.

use tracing::{error, info, warn};

use crate::ingredient_model::{
    PurchasedSet, ShoppingListItem, ShoppingListItemPatch, ShoppingListStats,
};
use crate::storage::{load_json, save_json, SharedStorage, PURCHASED_ITEMS_KEY, SHOPPING_LIST_KEY};

/// Persistent shopping list state
pub struct ShoppingListStore {
    items: Vec<ShoppingListItem>,
    purchased: PurchasedSet,
    storage: SharedStorage,
}

impl ShoppingListStore {
    /// Open the store, restoring the last persisted snapshot
    pub fn open(storage: SharedStorage) -> Self {
        let loaded = load_json::<Vec<ShoppingListItem>>(storage.as_ref(), SHOPPING_LIST_KEY);
        let mut items = match loaded {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                error!(error = %e, "Failed to load shopping list, starting empty");
                Vec::new()
            }
        };

        let purchased = match load_json::<Vec<String>>(storage.as_ref(), PURCHASED_ITEMS_KEY) {
            Ok(ids) => ids.unwrap_or_default().into_iter().collect(),
            Err(e) => {
                error!(error = %e, "Failed to load purchased items, starting empty");
                PurchasedSet::new()
            }
        };

        // Snapshots follow the purchased set
        for item in &mut items {
            item.purchased = purchased.contains(&item.id);
        }

        info!(
            items = items.len(),
            purchased = purchased.len(),
            "Shopping list store opened"
        );

        Self {
            items,
            purchased,
            storage,
        }
    }

    /// Current list items, in stored order
    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    /// Ids currently checked off
    pub fn purchased_ids(&self) -> &PurchasedSet {
        &self.purchased
    }

    pub fn is_purchased(&self, id: &str) -> bool {
        self.purchased.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&ShoppingListItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Progress figures derived from the list and the purchased set
    pub fn stats(&self) -> ShoppingListStats {
        ShoppingListStats::compute(&self.items, &self.purchased)
    }

    /// Insert a new item or update the existing item with the same id
    pub fn add_item(&mut self, item: ShoppingListItem) {
        self.upsert(item);
        self.persist_items();
    }

    /// Insert or update a batch of items with a single write
    ///
    /// Existing items take the incoming name, measure and recipe ids. The
    /// `purchased` flag of every touched item is re-derived from the purchased
    /// set, never taken from the incoming item. Items not in the batch stay.
    pub fn add_or_update_items(&mut self, items: Vec<ShoppingListItem>) {
        let count = items.len();
        for item in items {
            self.upsert(item);
        }
        info!(count, total = self.items.len(), "Applied shopping list items");
        self.persist_items();
    }

    /// Remove an item; returns whether it existed
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);

        let removed = self.items.len() != before;
        if removed {
            self.persist_items();
        }
        removed
    }

    /// Apply a partial update to an item; returns whether it existed
    pub fn update_item(&mut self, id: &str, patch: ShoppingListItemPatch) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };

        item.apply_patch(patch);
        self.persist_items();
        true
    }

    /// Flip the purchased state of `id`; the item need not be in the list.
    /// Returns the new state.
    pub fn toggle_purchased(&mut self, id: &str) -> bool {
        let purchased = if self.purchased.remove(id) {
            false
        } else {
            self.purchased.insert(id.to_string());
            true
        };

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.purchased = purchased;
        }

        self.persist_purchased();
        purchased
    }

    /// Forget every purchased id; the list itself is untouched
    pub fn clear_purchased(&mut self) {
        self.purchased.clear();
        self.persist_purchased();
    }

    /// Empty both the list and the purchased set
    pub fn clear_list(&mut self) {
        self.items.clear();
        self.purchased.clear();
        self.persist_items();
        self.persist_purchased();
    }

    fn upsert(&mut self, mut incoming: ShoppingListItem) {
        incoming.purchased = self.purchased.contains(&incoming.id);

        match self.items.iter_mut().find(|item| item.id == incoming.id) {
            Some(existing) => *existing = incoming,
            None => self.items.push(incoming),
        }
    }

    fn persist_items(&self) {
        if let Err(e) = save_json(self.storage.as_ref(), SHOPPING_LIST_KEY, &self.items) {
            warn!(error = %e, "Failed to persist shopping list");
        }
    }

    fn persist_purchased(&self) {
        let ids: Vec<&String> = self.purchased.iter().collect();
        if let Err(e) = save_json(self.storage.as_ref(), PURCHASED_ITEMS_KEY, &ids) {
            warn!(error = %e, "Failed to persist purchased items");
        }
    }
}
