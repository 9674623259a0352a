//! # Consolidation Tests
//!
//! End-to-end checks of the shopping list pipeline: recipe details in,
//! consolidated and persisted shopping list out.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use meal_planner::consolidation::consolidate;
use meal_planner::errors::FetchError;
use meal_planner::ingredient_model::{PurchasedSet, ShoppingListItem, ShoppingListStats};
use meal_planner::recipe_model::RecipeDetail;
use meal_planner::recipe_source::RecipeSource;
use meal_planner::shopping_list::ShoppingListStore;
use meal_planner::shopping_service::{RegenerationOutcome, ShoppingService};
use meal_planner::storage::MemoryStore;

/// Serves a fixed set of recipes; ids listed in `broken` fail
struct FixedSource {
    recipes: HashMap<String, RecipeDetail>,
    broken: HashSet<String>,
}

impl FixedSource {
    fn new(recipes: Vec<RecipeDetail>) -> Self {
        Self {
            recipes: recipes
                .into_iter()
                .map(|recipe| (recipe.id().to_string(), recipe))
                .collect(),
            broken: HashSet::new(),
        }
    }
}

impl RecipeSource for FixedSource {
    async fn fetch_recipe_details(&self, id: &str) -> Result<Option<RecipeDetail>, FetchError> {
        if self.broken.contains(id) {
            return Err(FetchError::Timeout(format!("lookup of {id} timed out")));
        }
        Ok(self.recipes.get(id).cloned())
    }
}

fn teriyaki() -> RecipeDetail {
    RecipeDetail::new("52772", "Teriyaki Chicken Casserole")
        .with_ingredient("soy sauce", "3/4 cup")
        .with_ingredient("water", "1/2 cup")
        .with_ingredient("brown sugar", "1/4 cup")
        .with_ingredient("ground ginger", "1/2 teaspoon")
        .with_ingredient("Salt", "1 tsp")
}

fn curry() -> RecipeDetail {
    RecipeDetail::new("52795", "Chicken Handi")
        .with_ingredient("Chicken", "1.2 kg")
        .with_ingredient("Ginger", "1 tbsp")
        .with_ingredient("ground ginger", "1 tsp")
        .with_ingredient("salt ", "2 tsp")
        .with_ingredient("Water", "1 cup")
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_single_recipe_round_trip() {
    let recipe = teriyaki();
    let list = consolidate(&[recipe.clone()], &PurchasedSet::new());

    assert_eq!(list.len(), recipe.ingredients.len());
    for ingredient in &recipe.ingredients {
        let item = list
            .iter()
            .find(|item| item.name == ingredient.name)
            .expect("every ingredient is listed");
        assert_eq!(item.measure, ingredient.measure);
        assert_eq!(item.recipe_ids, vec!["52772".to_string()]);
        assert!(!item.purchased);
    }
}

#[test]
fn test_merges_across_recipes() {
    let list = consolidate(&[teriyaki(), curry()], &PurchasedSet::new());

    let salt = list.iter().find(|item| item.id == "salt").unwrap();
    assert_eq!(salt.name, "Salt");
    assert_eq!(salt.measure, "3 tsp");
    assert_eq!(salt.recipe_ids, ids(&["52772", "52795"]));

    let ginger = list.iter().find(|item| item.id == "ground ginger").unwrap();
    assert_eq!(ginger.measure, "1.5 tsp");

    // "1/2 cup" + "1 cup" in the same unit
    let water = list.iter().find(|item| item.id == "water").unwrap();
    assert_eq!(water.measure, "1.5 cup");
}

#[test]
fn test_one_item_per_merge_key() {
    let list = consolidate(&[teriyaki(), curry()], &PurchasedSet::new());

    let keys: HashSet<&str> = list.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(keys.len(), list.len());
    assert_eq!(
        keys,
        HashSet::from([
            "soy sauce",
            "water",
            "brown sugar",
            "ground ginger",
            "salt",
            "chicken",
            "ginger",
        ])
    );
}

#[test]
fn test_recipe_order_does_not_change_result() {
    let forward = consolidate(&[teriyaki(), curry()], &PurchasedSet::new());
    let backward = consolidate(&[curry(), teriyaki()], &PurchasedSet::new());

    let item_ids = |list: &[ShoppingListItem]| -> Vec<String> {
        list.iter().map(|item| item.id.clone()).collect()
    };
    let measures = |list: &[ShoppingListItem]| -> HashMap<String, String> {
        list.iter()
            .map(|item| (item.id.clone(), item.measure.clone()))
            .collect()
    };

    assert_eq!(item_ids(&forward), item_ids(&backward));
    assert_eq!(measures(&forward), measures(&backward));
}

#[test]
fn test_conversion_and_concatenation() {
    let a = RecipeDetail::new("1", "Pancakes")
        .with_ingredient("Sugar", "1 tbsp")
        .with_ingredient("Flour", "1 cup");
    let b = RecipeDetail::new("2", "Crepes")
        .with_ingredient("sugar", "1 tsp")
        .with_ingredient("flour", "200 g");

    let list = consolidate(&[a, b], &PurchasedSet::new());

    assert_eq!(list[0].id, "flour");
    assert_eq!(list[0].measure, "1 cup + 200 g");
    assert_eq!(list[1].id, "sugar");
    assert_eq!(list[1].measure, "1.3 tbsp");
}

#[test]
fn test_output_sorted_by_name() {
    let list = consolidate(&[teriyaki(), curry()], &PurchasedSet::new());

    let names: Vec<String> = list.iter().map(|item| item.name.to_lowercase()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn test_empty_inputs() {
    assert!(consolidate(&[], &PurchasedSet::new()).is_empty());
    assert!(consolidate(&[RecipeDetail::new("1", "Water")], &PurchasedSet::new()).is_empty());
}

#[test]
fn test_stats_without_items() {
    let stats = ShoppingListStats::compute(&[], &PurchasedSet::from(["salt".to_string()]));

    assert_eq!(stats.total_count, 0);
    assert_eq!(stats.purchased_count, 0);
    assert_eq!(stats.progress_percentage, 0.0);
    assert!(stats.progress_percentage.is_finite());
}

#[tokio::test]
async fn test_regeneration_keeps_purchased_state() {
    let source = Arc::new(FixedSource::new(vec![teriyaki(), curry()]));
    let store = Arc::new(Mutex::new(ShoppingListStore::open(Arc::new(MemoryStore::new()))));
    let service = ShoppingService::new(source, Arc::clone(&store));

    service.regenerate(&ids(&["52772"])).await;
    assert!(store.lock().await.toggle_purchased("salt"));

    let outcome = service.regenerate(&ids(&["52772", "52795"])).await;
    let RegenerationOutcome::Applied { items, failed_ids } = outcome else {
        panic!("expected applied pass");
    };
    assert!(failed_ids.is_empty());

    let salt = items.iter().find(|item| item.id == "salt").unwrap();
    assert!(salt.purchased);
    assert_eq!(salt.measure, "3 tsp");

    let store = store.lock().await;
    assert!(store.is_purchased("salt"));
    assert_eq!(store.stats().purchased_count, 1);
}

#[tokio::test]
async fn test_regeneration_reports_failed_recipes() {
    let mut source = FixedSource::new(vec![teriyaki(), curry()]);
    source.broken.insert("52795".to_string());
    let store = Arc::new(Mutex::new(ShoppingListStore::open(Arc::new(MemoryStore::new()))));
    let service = ShoppingService::new(Arc::new(source), Arc::clone(&store));

    let outcome = service.regenerate(&ids(&["52772", "52795", "00000"])).await;
    let RegenerationOutcome::Applied { items, failed_ids } = outcome else {
        panic!("expected applied pass");
    };

    assert_eq!(failed_ids, ids(&["52795"]));
    assert!(items.iter().all(|item| item.recipe_ids == ids(&["52772"])));
    assert_eq!(store.lock().await.items().len(), items.len());
}
