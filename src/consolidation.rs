//! # Ingredient Consolidation
//!
//! Builds a shopping list from a set of planned recipes. Ingredients are
//! merged case-insensitively by name; their measures are combined by parsing,
//! normalizing and (where the unit table allows) converting the quantities.
//!
//! ## Merge rules
//!
//! - Same normalized unit: quantities are summed ("1 tsp" + "2 tsp" = "3 tsp")
//! - Convertible units: the incoming quantity is converted into the existing
//!   unit before summing ("1 tbsp" + "1 tsp" = "1.3 tbsp")
//! - Anything else: both measures are kept verbatim ("1 cup + 200 g")
//!
//! ## Usage
//!
//! ```rust
//! use meal_planner::consolidation::consolidate;
//! use meal_planner::ingredient_model::PurchasedSet;
//! use meal_planner::recipe_model::RecipeDetail;
//!
//! let recipes = vec![
//!     RecipeDetail::new("1", "Soup").with_ingredient("Salt", "1 tsp"),
//!     RecipeDetail::new("2", "Stew").with_ingredient("salt", "2 tsp"),
//! ];
//!
//! let list = consolidate(&recipes, &PurchasedSet::new());
//! assert_eq!(list.len(), 1);
//! assert_eq!(list[0].measure, "3 tsp");
//! ```

use log::{debug, info, trace};
use std::collections::HashMap;

use crate::ingredient_model::{merge_key, PurchasedSet, ShoppingListItem};
use crate::quantity_formatter::format_quantity;
use crate::quantity_parser::parse_quantity;
use crate::recipe_model::RecipeDetail;
use crate::unit_converter::convert_unit;
use crate::unit_normalizer::normalize_unit;

/// Consolidate the ingredients of all recipes into one shopping list
///
/// Every distinct merge key produces exactly one item. The first occurrence
/// supplies the display name and initial measure; `purchased` is a snapshot
/// of the given purchased set. The result is sorted case-insensitively by
/// name, ties keeping discovery order.
pub fn consolidate(recipes: &[RecipeDetail], purchased: &PurchasedSet) -> Vec<ShoppingListItem> {
    let mut items: Vec<ShoppingListItem> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for recipe in recipes {
        let recipe_id = recipe.id();

        for ingredient in &recipe.ingredients {
            let key = merge_key(&ingredient.name);

            match index_by_key.get(&key) {
                Some(&index) => {
                    let existing = &mut items[index];
                    existing.recipe_ids.push(recipe_id.to_string());

                    let merged = merge_measures(&existing.measure, &ingredient.measure);
                    trace!(
                        "Merged '{}' from recipe {}: '{}' + '{}' -> '{}'",
                        key,
                        recipe_id,
                        existing.measure,
                        ingredient.measure,
                        merged
                    );
                    existing.measure = merged;
                }
                None => {
                    debug!("New shopping list entry '{}' from recipe {}", key, recipe_id);
                    let is_purchased = purchased.contains(&key);

                    index_by_key.insert(key.clone(), items.len());
                    items.push(ShoppingListItem {
                        id: key,
                        name: ingredient.name.clone(),
                        measure: ingredient.measure.clone(),
                        purchased: is_purchased,
                        recipe_ids: vec![recipe_id.to_string()],
                    });
                }
            }
        }
    }

    items.sort_by_cached_key(|item| item.name.to_lowercase());

    info!(
        "Consolidated {} recipes into {} shopping list items",
        recipes.len(),
        items.len()
    );

    items
}

/// Combine an existing merged measure with an incoming one
///
/// The result is expressed in the existing measure's unit when the quantities
/// can be combined, otherwise both strings are joined with `" + "`.
pub fn merge_measures(existing: &str, incoming: &str) -> String {
    let existing_parsed = parse_quantity(existing);
    let incoming_parsed = parse_quantity(incoming);

    let existing_unit = normalize_unit(&existing_parsed.unit);
    let incoming_unit = normalize_unit(&incoming_parsed.unit);

    if existing_unit == incoming_unit {
        let total = existing_parsed.quantity + incoming_parsed.quantity;
        return format_quantity(total, &existing_unit);
    }

    let converted = convert_unit(incoming_parsed.quantity, &incoming_unit, &existing_unit);
    if converted != incoming_parsed.quantity {
        let total = existing_parsed.quantity + converted;
        format_quantity(total, &existing_unit)
    } else {
        format!("{} + {}", existing, incoming)
    }
}
