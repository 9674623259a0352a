//! # Recipe API Client
//!
//! HTTP client for TheMealDB JSON API. Implements [`RecipeSource`] for recipe
//! lookups and exposes the search/browse endpoints used to discover recipes.
//!
//! Failed requests are retried with exponential backoff and random jitter
//! according to [`RecoveryConfig`].

use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::{ApiConfig, RecoveryConfig};
use crate::errors::FetchError;
use crate::recipe_model::{
    CategoriesResponse, Category, RawMealsResponse, Recipe, RecipeDetail, RecipesResponse,
};
use crate::recipe_source::RecipeSource;

/// TheMealDB API client
#[derive(Debug, Clone)]
pub struct MealDbClient {
    client: Client,
    base_url: String,
    recovery: RecoveryConfig,
}

/// Delay before retry number `attempt` (1-based), with up to 25% jitter
///
/// The exponential part is capped at `max_retry_delay_ms`.
pub fn calculate_retry_delay(attempt: u32, recovery: &RecoveryConfig) -> u64 {
    let exponent = attempt.saturating_sub(1).min(16);
    let base = recovery
        .base_retry_delay_ms
        .saturating_mul(1u64 << exponent)
        .min(recovery.max_retry_delay_ms);

    let jitter_range = base / 4;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..=jitter_range)
    } else {
        0
    };

    base + jitter
}

/// Merge per-letter browse responses, in letter order
///
/// Failed letters contribute nothing. Recipes listed under several letters
/// are kept once, at their first occurrence.
pub fn merge_letter_results(results: Vec<Result<RecipesResponse, FetchError>>) -> Vec<Recipe> {
    let mut seen = HashSet::new();

    results
        .into_iter()
        .filter_map(Result::ok)
        .flat_map(|response| response.meals.unwrap_or_default())
        .filter(|recipe| seen.insert(recipe.id_meal.clone()))
        .collect()
}

impl MealDbClient {
    /// Build a client from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FetchError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            recovery: config.recovery.clone(),
        })
    }

    /// Search recipes by name
    pub async fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>, FetchError> {
        let response: RecipesResponse = self.get_json("search.php", &[("s", query)]).await?;
        Ok(response.meals.unwrap_or_default())
    }

    /// List all recipe categories
    pub async fn list_categories(&self) -> Result<Vec<Category>, FetchError> {
        let response: CategoriesResponse = self.get_json("categories.php", &[]).await?;
        Ok(response.categories)
    }

    /// List recipes in a category
    pub async fn filter_by_category(&self, category: &str) -> Result<Vec<Recipe>, FetchError> {
        let response: RecipesResponse = self.get_json("filter.php", &[("c", category)]).await?;
        Ok(response.meals.unwrap_or_default())
    }

    /// Browse every recipe by querying each letter of the alphabet
    ///
    /// The API has no "list all" endpoint. Letters run concurrently; a failed
    /// letter contributes nothing. Recipes are deduplicated by id, keeping the
    /// first occurrence in letter order.
    pub async fn all_recipes(&self) -> Vec<Recipe> {
        let mut tasks = JoinSet::new();

        for (index, letter) in ('a'..='z').enumerate() {
            let client = self.clone();
            tasks.spawn(async move {
                let letter = letter.to_string();
                let result = client
                    .get_json::<RecipesResponse>("filter.php", &[("a", letter.as_str())])
                    .await;
                if let Err(e) = &result {
                    warn!(letter = %letter, error = %e, "Failed to fetch recipes for letter");
                }
                (index, result)
            });
        }

        let mut slots: Vec<Option<Result<RecipesResponse, FetchError>>> =
            (0..26).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!(error = %e, "Recipe browse task aborted"),
            }
        }

        let recipes = merge_letter_results(slots.into_iter().flatten().collect());
        info!(count = recipes.len(), "Fetched all recipes");
        recipes
    }

    async fn lookup(&self, id: &str) -> Result<Option<RecipeDetail>, FetchError> {
        let response: RawMealsResponse = self.get_json("lookup.php", &[("i", id)]).await?;

        match response.meals.and_then(|meals| meals.into_iter().next()) {
            Some(meal) => Ok(Some(RecipeDetail::from_raw_meal(meal)?)),
            None => Ok(None),
        }
    }

    /// GET `endpoint` with retries, decoding the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut attempt = 0;

        loop {
            match self.get_json_once(&url, query).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.recovery.max_retries => {
                    attempt += 1;
                    let delay = calculate_retry_delay(attempt, &self.recovery);
                    warn!(
                        url = %url,
                        attempt,
                        delay_ms = delay,
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        debug!(url = %url, ?query, "Requesting");
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(FetchError::Api { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl RecipeSource for MealDbClient {
    async fn fetch_recipe_details(&self, id: &str) -> Result<Option<RecipeDetail>, FetchError> {
        match self.lookup(id).await {
            Err(FetchError::Api { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            other => other,
        }
    }
}
