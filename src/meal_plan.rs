//! # Meal Plan
//!
//! Weekly meal plan: at most one recipe per calendar day. The plan is the
//! source of the planned recipe ids the shopping list is generated from.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use meal_planner::meal_plan::{MealPlan, MealPlanAction};
//! use meal_planner::recipe_model::Recipe;
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let plan = MealPlan::default().reduce(MealPlanAction::AddMeal {
//!     date: monday,
//!     recipe: Recipe::new("52772", "Teriyaki Chicken Casserole"),
//! });
//!
//! assert_eq!(plan.planned_recipe_ids(), vec!["52772".to_string()]);
//! ```

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

use crate::recipe_model::Recipe;
use crate::storage::{load_json, save_json, SharedStorage, MEAL_PLAN_KEY};

/// Recipes planned per date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealPlan {
    meals: BTreeMap<NaiveDate, Recipe>,
}

/// Changes that can be applied to a meal plan
#[derive(Debug, Clone, PartialEq)]
pub enum MealPlanAction {
    /// Plan a recipe on a date, replacing whatever was there
    AddMeal { date: NaiveDate, recipe: Recipe },
    /// Remove the meal planned on a date
    RemoveMeal { date: NaiveDate },
    /// Remove every meal
    ClearPlan,
    /// Replace the whole plan
    LoadPlan(MealPlan),
}

/// One day of the current week
#[derive(Debug, Clone, PartialEq)]
pub struct WeekDay {
    pub date: NaiveDate,
    /// Short day name, e.g. "Mon"
    pub day_name: String,
    /// Display label, e.g. "Jan 05"
    pub label: String,
}

impl MealPlan {
    /// Apply an action, returning the new plan
    pub fn reduce(mut self, action: MealPlanAction) -> Self {
        self.apply(action);
        self
    }

    /// Apply an action in place
    pub fn apply(&mut self, action: MealPlanAction) {
        match action {
            MealPlanAction::AddMeal { date, recipe } => {
                self.meals.insert(date, recipe);
            }
            MealPlanAction::RemoveMeal { date } => {
                self.meals.remove(&date);
            }
            MealPlanAction::ClearPlan => self.meals.clear(),
            MealPlanAction::LoadPlan(plan) => *self = plan,
        }
    }

    pub fn meal_on(&self, date: NaiveDate) -> Option<&Recipe> {
        self.meals.get(&date)
    }

    /// Planned meals in date order
    pub fn meals(&self) -> impl Iterator<Item = (&NaiveDate, &Recipe)> {
        self.meals.iter()
    }

    /// Ids of all planned recipes in date order; a recipe planned on several
    /// days appears once per day
    pub fn planned_recipe_ids(&self) -> Vec<String> {
        self.meals.values().map(|recipe| recipe.id_meal.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}

/// The seven days, Monday to Sunday, of the week containing `today`
pub fn week_dates(today: NaiveDate) -> Vec<WeekDay> {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));

    (0..7)
        .map(|offset| {
            let date = monday + Duration::days(offset);
            WeekDay {
                date,
                day_name: date.format("%a").to_string(),
                label: date.format("%b %d").to_string(),
            }
        })
        .collect()
}

/// Persistent meal plan
pub struct MealPlanStore {
    plan: MealPlan,
    storage: SharedStorage,
}

impl MealPlanStore {
    /// Open the store, restoring the persisted plan; corrupt data starts empty
    pub fn open(storage: SharedStorage) -> Self {
        let plan = match load_json::<MealPlan>(storage.as_ref(), MEAL_PLAN_KEY) {
            Ok(plan) => plan.unwrap_or_default(),
            Err(e) => {
                error!(error = %e, "Failed to load meal plan, starting empty");
                MealPlan::default()
            }
        };

        info!(meals = plan.len(), "Meal plan store opened");
        Self { plan, storage }
    }

    pub fn plan(&self) -> &MealPlan {
        &self.plan
    }

    /// Apply an action and persist the result
    pub fn dispatch(&mut self, action: MealPlanAction) {
        self.plan.apply(action);

        if let Err(e) = save_json(self.storage.as_ref(), MEAL_PLAN_KEY, &self.plan) {
            warn!(error = %e, "Failed to persist meal plan");
        }
    }
}
