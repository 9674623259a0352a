use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use std::env;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use meal_planner::config::AppConfig;
use meal_planner::meal_plan::{MealPlanAction, MealPlanStore};
use meal_planner::recipe_api::MealDbClient;
use meal_planner::recipe_cache::CachedRecipeSource;
use meal_planner::recipe_source::RecipeSource;
use meal_planner::shopping_list::ShoppingListStore;
use meal_planner::shopping_service::{RegenerationOutcome, ShoppingService};
use meal_planner::storage::{FileStore, SharedStorage};

const USAGE: &str = "\
Usage:
  meal-planner plan add <YYYY-MM-DD> <recipe-id>
  meal-planner plan remove <YYYY-MM-DD>
  meal-planner plan show
  meal-planner plan clear
  meal-planner list generate
  meal-planner list show
  meal-planner list toggle <ingredient>
  meal-planner list clear-purchased
  meal-planner list clear
  meal-planner recipe search <query>
  meal-planner recipe categories
  meal-planner recipe category <name>
  meal-planner recipe browse";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!(data_dir = %config.data_dir.display(), "Starting meal planner");

    let storage: SharedStorage = Arc::new(
        FileStore::open(&config.data_dir).context("Failed to open data directory")?,
    );
    let client = Arc::new(
        MealDbClient::new(&config.api).context("Failed to build recipe API client")?,
    );
    let source = Arc::new(CachedRecipeSource::new(
        Arc::clone(&client),
        Arc::clone(&storage),
        config.cache_ttl_secs,
    ));

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["plan", rest @ ..] => run_plan_command(rest, storage, source.as_ref()).await,
        ["list", rest @ ..] => run_list_command(rest, storage, source).await,
        ["recipe", rest @ ..] => run_recipe_command(rest, &client).await,
        _ => bail!("{USAGE}"),
    }
}

async fn run_plan_command<S: RecipeSource>(
    args: &[&str],
    storage: SharedStorage,
    source: &S,
) -> Result<()> {
    let mut plans = MealPlanStore::open(storage);

    match args {
        ["add", date, recipe_id] => {
            let date = parse_date(date)?;
            let detail = source
                .fetch_recipe_details(recipe_id)
                .await
                .with_context(|| format!("Failed to fetch recipe {recipe_id}"))?
                .ok_or_else(|| anyhow!("Recipe {recipe_id} not found"))?;

            println!("Planned {} on {}", detail.name(), date);
            plans.dispatch(MealPlanAction::AddMeal {
                date,
                recipe: detail.recipe,
            });
        }
        ["remove", date] => {
            let date = parse_date(date)?;
            plans.dispatch(MealPlanAction::RemoveMeal { date });
            println!("Removed meal on {date}");
        }
        ["show"] => {
            if plans.plan().is_empty() {
                println!("No meals planned");
            }
            for (date, recipe) in plans.plan().meals() {
                println!(
                    "{}  {} ({})",
                    date.format("%a %Y-%m-%d"),
                    recipe.str_meal,
                    recipe.id_meal
                );
            }
        }
        ["clear"] => {
            plans.dispatch(MealPlanAction::ClearPlan);
            println!("Meal plan cleared");
        }
        _ => bail!("{USAGE}"),
    }

    Ok(())
}

async fn run_list_command<S: RecipeSource>(
    args: &[&str],
    storage: SharedStorage,
    source: Arc<S>,
) -> Result<()> {
    let plans = MealPlanStore::open(Arc::clone(&storage));
    let store = Arc::new(Mutex::new(ShoppingListStore::open(storage)));
    let service = ShoppingService::new(source, Arc::clone(&store));

    match args {
        ["generate"] => {
            let recipe_ids = plans.plan().planned_recipe_ids();
            if recipe_ids.is_empty() {
                println!("Add meals to your weekly plan to generate a shopping list");
                return Ok(());
            }

            if let RegenerationOutcome::Applied { failed_ids, .. } =
                service.regenerate(&recipe_ids).await
            {
                if !failed_ids.is_empty() {
                    eprintln!(
                        "Could not fetch recipes {}; run `list generate` again to retry",
                        failed_ids.join(", ")
                    );
                }
            }
            print_list(&*store.lock().await);
        }
        ["show"] => print_list(&*store.lock().await),
        ["toggle", id] => {
            let id = meal_planner::ingredient_model::merge_key(id);
            let purchased = store.lock().await.toggle_purchased(&id);
            println!("{id}: {}", if purchased { "purchased" } else { "not purchased" });
        }
        ["clear-purchased"] => {
            store.lock().await.clear_purchased();
            println!("Purchased items cleared");
        }
        ["clear"] => {
            store.lock().await.clear_list();
            println!("Shopping list cleared");
        }
        _ => bail!("{USAGE}"),
    }

    Ok(())
}

async fn run_recipe_command(args: &[&str], client: &MealDbClient) -> Result<()> {
    let recipes = match args {
        ["search", query] => client
            .search_recipes(query)
            .await
            .with_context(|| format!("Failed to search recipes for {query:?}"))?,
        ["category", name] => client
            .filter_by_category(name)
            .await
            .with_context(|| format!("Failed to list recipes in {name}"))?,
        ["browse"] => client.all_recipes().await,
        ["categories"] => {
            let categories = client
                .list_categories()
                .await
                .context("Failed to list categories")?;
            for category in categories {
                println!("{}", category.str_category);
            }
            return Ok(());
        }
        _ => bail!("{USAGE}"),
    };

    if recipes.is_empty() {
        println!("No recipes found");
    }
    for recipe in recipes {
        println!("{:>8}  {}", recipe.id_meal, recipe.str_meal);
    }

    Ok(())
}

fn print_list(store: &ShoppingListStore) {
    let stats = store.stats();
    println!(
        "Shopping list: {} items, {} purchased ({:.0}%)",
        stats.total_count, stats.purchased_count, stats.progress_percentage
    );

    for item in store.items() {
        let check = if store.is_purchased(&item.id) { "x" } else { " " };
        println!("[{}] {:<30} {}", check, item.name, item.measure);
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date {raw:?}, expected YYYY-MM-DD"))
}
