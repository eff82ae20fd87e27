use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use super::{LocalStore, StorageError};

/// Typed, fail-soft access to a [`LocalStore`].
///
/// Reads never fail: a missing, unreadable or corrupt value yields the type's
/// default (an empty map for the caches). Writes never fail either; an error
/// is logged and the value simply is not durable.
#[derive(Debug, Clone)]
pub struct CacheStore<S> {
    store: S,
}

impl<S: LocalStore> CacheStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the value under `key`, or the default if there is none usable.
    pub async fn get<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let contents = match self.store.read(key).await {
            Ok(Some(contents)) => contents,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!(key, error = %e, "Failed to read cache, using empty default");
                return T::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Cache value is corrupt, using empty default");
                T::default()
            }
        }
    }

    /// Replaces the value under `key`.
    ///
    /// Returns whether the value was persisted. Failures are logged, not
    /// raised.
    pub async fn set<T>(&self, key: &str, value: &T) -> bool
    where
        T: Serialize + ?Sized,
    {
        match self.try_set(key, value).await {
            Ok(()) => true,
            Err(e) => {
                error!(key, error = %e, "Failed to persist cache; in-memory state kept");
                false
            }
        }
    }

    async fn try_set<T>(&self, key: &str, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + ?Sized,
    {
        let contents = serde_json::to_string(value)
            .map_err(|e| StorageError::Encode(key.to_string(), e))?;
        self.store.write(key, &contents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayBucket, MacroCache};
    use crate::storage::{FileStore, MemoryStore};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_missing_returns_default() {
        let cache = CacheStore::new(MemoryStore::new());
        let value: MacroCache = cache.get("caltrax-macros").await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn test_get_corrupt_returns_default() {
        let store = MemoryStore::new();
        store.insert_raw("caltrax-macros", "{not json");
        let cache = CacheStore::new(store);

        let value: MacroCache = cache.get("caltrax-macros").await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = CacheStore::new(MemoryStore::new());
        let mut value = MacroCache::new();
        value.insert("2024-06-30".to_string(), DayBucket::new("2024-06-30"));

        assert!(cache.set("caltrax-macros", &value).await);
        let loaded: MacroCache = cache.get("caltrax-macros").await;
        assert_eq!(loaded, value);
    }

    #[tokio::test]
    async fn test_set_failure_is_reported_not_raised() {
        let store = MemoryStore::new();
        store.reject_writes(true);
        let cache = CacheStore::new(store);

        let value: BTreeMap<String, u32> = BTreeMap::from([("a".to_string(), 1)]);
        assert!(!cache.set("k", &value).await);
        assert!(cache.store().raw("k").is_none());
    }

    #[tokio::test]
    async fn test_file_backed_values_survive_new_instance() {
        let temp_dir = TempDir::new().unwrap();
        let value: BTreeMap<String, Vec<u32>> = BTreeMap::from([("owner".to_string(), vec![1, 2])]);

        {
            let cache = CacheStore::new(FileStore::new(temp_dir.path().to_path_buf()));
            assert!(cache.set("caltrax-meal-plans", &value).await);
        }

        let cache = CacheStore::new(FileStore::new(temp_dir.path().to_path_buf()));
        let loaded: BTreeMap<String, Vec<u32>> = cache.get("caltrax-meal-plans").await;
        assert_eq!(loaded, value);
    }

    #[tokio::test]
    async fn test_get_keeps_buckets_next_to_null_entry_name() {
        let store = MemoryStore::new();
        store.insert_raw(
            "caltrax-macros",
            r#"{
                "2024-06-28": {"date": "2024-06-28", "entries": [], "totals": {}},
                "2024-06-29": {"date": "2024-06-29", "entries": [
                    {"id": "7", "timestamp": "2024-06-29", "name": null,
                     "nutrition": {"calories": 500}, "syncedFromRemote": true}
                ], "totals": {"calories": 500}}
            }"#,
        );
        let cache = CacheStore::new(store);

        let value: MacroCache = cache.get("caltrax-macros").await;
        assert_eq!(value.len(), 2);
        let bucket = &value["2024-06-29"];
        assert_eq!(bucket.entries[0].name, "");
        assert_eq!(bucket.totals.calories, 500.0);
    }
}
