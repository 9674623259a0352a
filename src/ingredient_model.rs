//! # Ingredient and Shopping List Data Model
//!
//! This module defines the data structures that flow through the shopping list
//! pipeline: raw ingredient/measure pairs as supplied by recipes, parsed
//! quantities, and the consolidated shopping list entries.
//!
//! ## Core Concepts
//!
//! - **Ingredient**: a raw `name`/`measure` pair exactly as the recipe lists it
//! - **ParsedQuantity**: a numeric prefix and the unit text that follows it
//! - **ShoppingListItem**: one consolidated line of the shopping list
//! - **Purchased set**: the ids the user has checked off, kept apart from the list
//!
//! ## Usage
//!
//! ```rust
//! use meal_planner::ingredient_model::{Ingredient, ShoppingListItem};
//!
//! let salt = Ingredient::new("Salt", "1 tsp");
//! let item = ShoppingListItem::new("Salt", "1 tsp", "52772");
//!
//! assert_eq!(salt.merge_key(), "salt");
//! assert_eq!(item.id, "salt");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Ids of shopping list items the user has checked off.
///
/// Ordered so the persisted snapshot is stable between writes.
pub type PurchasedSet = BTreeSet<String>;

/// A raw ingredient as listed by a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Free-text ingredient name (e.g., "Salt", "Olive Oil")
    pub name: String,

    /// Unstructured quantity and unit (e.g., "1 1/2 cups", "200 g", "to taste"); may be empty
    pub measure: String,
}

/// Numeric quantity and unit text split off a measure string
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuantity {
    /// Leading numeric value, `0.0` when the measure has no numeric prefix
    pub quantity: f64,

    /// Remainder of the measure after the numeric prefix, trimmed
    pub unit: String,
}

/// One consolidated line of the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    /// Merge key: the trimmed, lowercased ingredient name
    pub id: String,

    /// Display name, cased as in the first recipe that listed the ingredient
    pub name: String,

    /// Current merged display measure
    pub measure: String,

    /// Purchased flag captured when the item was built.
    ///
    /// The purchased set is authoritative; this is a snapshot of it.
    #[serde(default)]
    pub purchased: bool,

    /// Every recipe that contributed this ingredient, in discovery order
    #[serde(default)]
    pub recipe_ids: Vec<String>,
}

/// Partial update applied by [`crate::shopping_list::ShoppingListStore::update_item`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShoppingListItemPatch {
    pub name: Option<String>,
    pub measure: Option<String>,
    pub recipe_ids: Option<Vec<String>>,
}

/// Derived progress figures for the shopping list
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListStats {
    pub total_count: usize,
    pub purchased_count: usize,
    pub progress_percentage: f64,
}

/// Compute the merge key for an ingredient name
pub fn merge_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Ingredient {
    /// Create a new ingredient from a name and measure
    pub fn new(name: &str, measure: &str) -> Self {
        Self {
            name: name.to_string(),
            measure: measure.to_string(),
        }
    }

    /// The key under which this ingredient is consolidated
    pub fn merge_key(&self) -> String {
        merge_key(&self.name)
    }
}

impl ShoppingListItem {
    /// Create an item contributed by a single recipe
    pub fn new(name: &str, measure: &str, recipe_id: &str) -> Self {
        Self {
            id: merge_key(name),
            name: name.to_string(),
            measure: measure.to_string(),
            purchased: false,
            recipe_ids: vec![recipe_id.to_string()],
        }
    }

    /// Set the purchased snapshot
    pub fn with_purchased(mut self, purchased: bool) -> Self {
        self.purchased = purchased;
        self
    }

    /// Apply a partial update
    pub fn apply_patch(&mut self, patch: ShoppingListItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(measure) = patch.measure {
            self.measure = measure;
        }
        if let Some(recipe_ids) = patch.recipe_ids {
            self.recipe_ids = recipe_ids;
        }
    }
}

impl ShoppingListStats {
    /// Compute stats for a list against the purchased set
    pub fn compute(items: &[ShoppingListItem], purchased: &PurchasedSet) -> Self {
        let total_count = items.len();
        let purchased_count = items
            .iter()
            .filter(|item| purchased.contains(&item.id))
            .count();

        let progress_percentage = if total_count > 0 {
            purchased_count as f64 / total_count as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_count,
            purchased_count,
            progress_percentage,
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.measure.trim().is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.measure, self.name)
        }
    }
}

impl fmt::Display for ShoppingListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.purchased { "x" } else { " " };
        write!(f, "[{}] {} ({})", check, self.name, self.measure)?;

        if self.recipe_ids.len() > 1 {
            write!(f, " from {} recipes", self.recipe_ids.len())?;
        }

        Ok(())
    }
}
