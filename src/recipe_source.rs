//! # Recipe Source
//!
//! The seam between the shopping list pipeline and wherever recipe details
//! come from (the remote API, the cache, or a test double), plus the
//! concurrent fetch-all used to gather the planned recipes.

use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::errors::FetchError;
use crate::recipe_model::RecipeDetail;

/// Anything that can look up recipe details by id
pub trait RecipeSource: Send + Sync + 'static {
    /// Fetch one recipe; `Ok(None)` means the id is unknown
    fn fetch_recipe_details(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<RecipeDetail>, FetchError>> + Send;
}

/// Outcome of fetching a batch of recipes
#[derive(Debug, Default)]
pub struct FetchAllResult {
    /// Recipes that resolved, in the order their ids were requested
    pub recipes: Vec<RecipeDetail>,
    /// Ids whose fetch failed and may be retried
    pub failed_ids: Vec<String>,
    /// Ids the source does not know
    pub missing_ids: Vec<String>,
}

/// Fetch all `ids` concurrently, one task per id
///
/// Individual failures never abort the batch: failed ids are reported in
/// `failed_ids` and simply left out of `recipes`.
pub async fn fetch_all<S: RecipeSource>(source: Arc<S>, ids: &[String]) -> FetchAllResult {
    let mut tasks = JoinSet::new();

    for (index, id) in ids.iter().cloned().enumerate() {
        let source = Arc::clone(&source);
        tasks.spawn(async move {
            let result = source.fetch_recipe_details(&id).await;
            (index, id, result)
        });
    }

    let mut slots: Vec<Option<RecipeDetail>> = vec![None; ids.len()];
    let mut result = FetchAllResult::default();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, _, Ok(Some(recipe)))) => slots[index] = Some(recipe),
            Ok((_, id, Ok(None))) => {
                debug!(recipe_id = %id, "Recipe not found");
                result.missing_ids.push(id);
            }
            Ok((_, id, Err(e))) => {
                warn!(recipe_id = %id, error = %e, "Failed to fetch recipe details");
                result.failed_ids.push(id);
            }
            Err(e) => warn!(error = %e, "Recipe fetch task aborted"),
        }
    }

    result.recipes = slots.into_iter().flatten().collect();
    result
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory recipe source with optional failures and per-id delays
    #[derive(Default)]
    pub struct StubSource {
        pub recipes: HashMap<String, RecipeDetail>,
        pub failing: HashSet<String>,
        pub delays_ms: HashMap<String, u64>,
        pub calls: AtomicUsize,
    }

    impl StubSource {
        pub fn with_recipes(recipes: Vec<RecipeDetail>) -> Self {
            Self {
                recipes: recipes
                    .into_iter()
                    .map(|recipe| (recipe.id().to_string(), recipe))
                    .collect(),
                ..Default::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RecipeSource for StubSource {
        async fn fetch_recipe_details(&self, id: &str) -> Result<Option<RecipeDetail>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays_ms.get(id) {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
            }
            if self.failing.contains(id) {
                return Err(FetchError::Timeout(format!("recipe {id}")));
            }
            Ok(self.recipes.get(id).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::StubSource;
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_request_order() {
        let mut source = StubSource::with_recipes(vec![
            RecipeDetail::new("1", "Soup"),
            RecipeDetail::new("2", "Stew"),
            RecipeDetail::new("3", "Curry"),
        ]);
        // The first id resolves last
        source.delays_ms.insert("1".to_string(), 30);

        let result = fetch_all(Arc::new(source), &ids(&["1", "2", "3"])).await;
        let fetched: Vec<&str> = result.recipes.iter().map(|r| r.id()).collect();
        assert_eq!(fetched, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_fetch_all_tolerates_failures() {
        let mut source = StubSource::with_recipes(vec![
            RecipeDetail::new("1", "Soup"),
            RecipeDetail::new("3", "Curry"),
        ]);
        source.failing.insert("3".to_string());

        let result = fetch_all(Arc::new(source), &ids(&["1", "2", "3"])).await;
        assert_eq!(result.recipes.len(), 1);
        assert_eq!(result.recipes[0].id(), "1");
        assert_eq!(result.missing_ids, ids(&["2"]));
        assert_eq!(result.failed_ids, ids(&["3"]));
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_duplicate_ids() {
        let source = StubSource::with_recipes(vec![RecipeDetail::new("1", "Soup")]);

        let result = fetch_all(Arc::new(source), &ids(&["1", "1"])).await;
        assert_eq!(result.recipes.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_all_empty() {
        let result = fetch_all(Arc::new(StubSource::default()), &[]).await;
        assert!(result.recipes.is_empty());
        assert!(result.failed_ids.is_empty());
    }
}
