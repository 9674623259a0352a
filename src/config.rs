//! # Configuration Module
//!
//! This module defines configuration structures for the meal planner,
//! including the recipe API endpoint, fetch recovery settings, the recipe
//! cache lifetime and the data directory.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// Constants for default configuration
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60; // recipe details change rarely
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Recovery configuration for failed recipe fetches
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryConfig {
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_retry_delay_ms: 250,
            max_retry_delay_ms: 2000,
        }
    }
}

/// Recipe API client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL of TheMealDB JSON API, without a trailing slash
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Retry settings for failed requests
    pub recovery: RecoveryConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            recovery: RecoveryConfig::default(),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api: ApiConfig,
    /// Directory holding the persisted JSON records
    pub data_dir: PathBuf,
    /// Lifetime of cached recipe details in seconds
    pub cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment (and a `.env` file if present)
    ///
    /// Unset variables keep their defaults; set but unparsable values are errors.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("MEALDB_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api.base_url);

        let data_dir = lookup("MEAL_PLANNER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        Ok(Self {
            api: ApiConfig {
                base_url,
                request_timeout_secs: parse_var(
                    &lookup,
                    "REQUEST_TIMEOUT_SECS",
                    defaults.api.request_timeout_secs,
                )?,
                recovery: RecoveryConfig {
                    max_retries: parse_var(
                        &lookup,
                        "FETCH_MAX_RETRIES",
                        defaults.api.recovery.max_retries,
                    )?,
                    base_retry_delay_ms: parse_var(
                        &lookup,
                        "FETCH_BASE_RETRY_DELAY_MS",
                        defaults.api.recovery.base_retry_delay_ms,
                    )?,
                    max_retry_delay_ms: parse_var(
                        &lookup,
                        "FETCH_MAX_RETRY_DELAY_MS",
                        defaults.api.recovery.max_retry_delay_ms,
                    )?,
                },
            },
            data_dir,
            cache_ttl_secs: parse_var(&lookup, "RECIPE_CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
