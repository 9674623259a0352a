//! # Recipe Data Model
//!
//! Recipe types as served by TheMealDB. Field names follow the API's JSON keys
//! (`idMeal`, `strMeal`, ...) so responses deserialize directly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ingredient_model::Ingredient;

/// TheMealDB lists at most this many ingredient/measure slots per meal
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// Recipe summary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id_meal: String,
    pub str_meal: String,
    #[serde(default)]
    pub str_category: Option<String>,
    #[serde(default)]
    pub str_area: Option<String>,
    #[serde(default)]
    pub str_instructions: Option<String>,
    #[serde(default)]
    pub str_meal_thumb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub str_youtube: Option<String>,
}

/// Recipe with its flattened ingredient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
}

/// Recipe category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id_category: String,
    pub str_category: String,
    #[serde(default)]
    pub str_category_thumb: Option<String>,
    #[serde(default)]
    pub str_category_description: Option<String>,
}

/// `search.php` / `filter.php` response; `meals` is `null` when nothing matches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipesResponse {
    pub meals: Option<Vec<Recipe>>,
}

/// `lookup.php` response, kept raw so the numbered ingredient slots can be read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMealsResponse {
    pub meals: Option<Vec<Map<String, Value>>>,
}

/// `categories.php` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

impl Recipe {
    /// Create a recipe summary with just an id and name
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id_meal: id.to_string(),
            str_meal: name.to_string(),
            ..Default::default()
        }
    }
}

impl RecipeDetail {
    /// Create a recipe with no ingredients
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            recipe: Recipe::new(id, name),
            ingredients: Vec::new(),
        }
    }

    /// Add an ingredient to this recipe
    pub fn with_ingredient(mut self, name: &str, measure: &str) -> Self {
        self.ingredients.push(Ingredient::new(name, measure));
        self
    }

    pub fn id(&self) -> &str {
        &self.recipe.id_meal
    }

    pub fn name(&self) -> &str {
        &self.recipe.str_meal
    }

    /// Build a recipe detail from a raw meal object
    ///
    /// Reads the numbered `strIngredientN`/`strMeasureN` slots. Slots with a
    /// blank ingredient name are skipped; missing measures become `""`.
    pub fn from_raw_meal(meal: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let ingredients = parse_ingredient_slots(&meal);
        let recipe: Recipe = serde_json::from_value(Value::Object(meal))?;

        Ok(Self {
            recipe,
            ingredients,
        })
    }
}

/// Flatten the numbered ingredient/measure slots of a raw meal
pub fn parse_ingredient_slots(meal: &Map<String, Value>) -> Vec<Ingredient> {
    (1..=MAX_INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let name = meal
                .get(&format!("strIngredient{slot}"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())?;

            let measure = meal
                .get(&format!("strMeasure{slot}"))
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or("");

            Some(Ingredient::new(name, measure))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_meal() -> Map<String, Value> {
        let value = json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven to 350.",
            "strMealThumb": "https://example.com/thumb.jpg",
            "strYoutube": "",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": " water ",
            "strMeasure2": " 1/2 cup ",
            "strIngredient3": "brown sugar",
            "strMeasure3": null,
            "strIngredient4": "",
            "strMeasure4": "1 tsp",
            "strIngredient5": null,
            "strMeasure5": null,
            "strIngredient6": "garlic",
            "strMeasure6": "3 cloves"
        });

        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_ingredient_slots() {
        let ingredients = parse_ingredient_slots(&raw_meal());

        assert_eq!(ingredients.len(), 4);
        assert_eq!(ingredients[0], Ingredient::new("soy sauce", "3/4 cup"));
        assert_eq!(ingredients[1], Ingredient::new("water", "1/2 cup"));
        assert_eq!(ingredients[2], Ingredient::new("brown sugar", ""));
        assert_eq!(ingredients[3], Ingredient::new("garlic", "3 cloves"));
    }

    #[test]
    fn test_recipe_detail_from_raw_meal() {
        let detail = RecipeDetail::from_raw_meal(raw_meal()).unwrap();

        assert_eq!(detail.id(), "52772");
        assert_eq!(detail.name(), "Teriyaki Chicken Casserole");
        assert_eq!(detail.recipe.str_area.as_deref(), Some("Japanese"));
        assert_eq!(detail.ingredients.len(), 4);
    }

    #[test]
    fn test_recipe_detail_serde_round_trip_keeps_api_keys() {
        let detail = RecipeDetail::new("1", "Omelette").with_ingredient("Eggs", "3");
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["idMeal"], "1");
        assert_eq!(json["strMeal"], "Omelette");
        assert_eq!(json["ingredients"][0]["measure"], "3");

        let back: RecipeDetail = serde_json::from_value(json).unwrap();
        assert_eq!(back, detail);
    }

    #[test]
    fn test_recipes_response_with_null_meals() {
        let response: RecipesResponse = serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(response.meals.is_none());
    }
}
