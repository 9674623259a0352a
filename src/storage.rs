//! # Storage Module
//!
//! Key-value persistence port shared by the shopping list, the meal plan and
//! the recipe cache. Values are JSON strings; each record lives under its own
//! key so clearing one never touches another.
//!
//! Two backends are provided:
//!
//! - [`MemoryStore`]: in-process map, used by tests and ephemeral sessions
//! - [`FileStore`]: one `<key>.json` file per key inside a data directory

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::errors::StorageError;

/// Key of the persisted shopping list array
pub const SHOPPING_LIST_KEY: &str = "shopping-list";
/// Key of the persisted purchased-id array
pub const PURCHASED_ITEMS_KEY: &str = "purchased-items";
/// Key of the persisted meal plan
pub const MEAL_PLAN_KEY: &str = "meal-plan";

/// Cache key for a recipe's details
pub fn recipe_cache_key(id: &str) -> String {
    format!("recipe-{id}")
}

/// A string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage handle shared between components
pub type SharedStorage = Arc<dyn KeyValueStore>;

/// Read and decode a JSON record
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match storage.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON record
pub fn save_json<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// File-backed key-value store: one JSON file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!(path = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::Unavailable(format!("invalid storage key: {key:?}")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        // Write then rename so a crash never leaves a half-written record
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        debug!(key, bytes = value.len(), "Wrote storage record");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_operations() -> Result<(), StorageError> {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("a", "1")?;
        assert_eq!(store.get("a")?, Some("1".to_string()));
        assert_eq!(store.get("b")?, None);

        store.remove("a")?;
        store.remove("a")?;
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_file_store_operations() -> Result<(), StorageError> {
        let dir = TempDir::new()?;
        let store = FileStore::open(dir.path().join("data"))?;

        assert_eq!(store.get(SHOPPING_LIST_KEY)?, None);
        store.set(SHOPPING_LIST_KEY, "[]")?;
        assert_eq!(store.get(SHOPPING_LIST_KEY)?, Some("[]".to_string()));
        assert!(store.root().join("shopping-list.json").exists());

        store.remove(SHOPPING_LIST_KEY)?;
        assert_eq!(store.get(SHOPPING_LIST_KEY)?, None);
        store.remove(SHOPPING_LIST_KEY)?;
        Ok(())
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() -> Result<(), StorageError> {
        let dir = TempDir::new()?;
        let store = FileStore::open(dir.path())?;

        assert!(matches!(store.set("../escape", "x"), Err(StorageError::Unavailable(_))));
        assert!(matches!(store.get(""), Err(StorageError::Unavailable(_))));
        Ok(())
    }

    #[test]
    fn test_json_helpers() -> Result<(), StorageError> {
        let store = MemoryStore::new();
        save_json(&store, PURCHASED_ITEMS_KEY, &vec!["salt", "pepper"])?;

        let loaded: Option<Vec<String>> = load_json(&store, PURCHASED_ITEMS_KEY)?;
        assert_eq!(loaded, Some(vec!["salt".to_string(), "pepper".to_string()]));

        store.set(PURCHASED_ITEMS_KEY, "not json")?;
        let corrupt: Result<Option<Vec<String>>, _> = load_json(&store, PURCHASED_ITEMS_KEY);
        assert!(matches!(corrupt, Err(StorageError::Serialization(_))));
        Ok(())
    }

    #[test]
    fn test_recipe_cache_key() {
        assert_eq!(recipe_cache_key("52772"), "recipe-52772");
    }
}
