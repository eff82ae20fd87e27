use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{LocalStore, StorageError};

/// In-process storage. Clones share the same contents.
///
/// Writes can be switched to fail, standing in for a full or read-only
/// medium.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    reject_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following write fail until switched back.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Stores a raw value directly, bypassing the rejection switch.
    pub fn insert_raw(&self, key: &str, contents: &str) {
        self.lock().insert(key.to_string(), contents.to_string());
    }

    /// Returns the raw value under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still structurally valid.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    async fn write(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected(
                key.to_string(),
                "storage quota exceeded".to_string(),
            ));
        }
        self.insert_raw(key, contents);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_contents() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.write("k", "v").await.unwrap();
        assert_eq!(other.read("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_rejected_write_keeps_previous_value() {
        let store = MemoryStore::new();
        store.write("k", "old").await.unwrap();

        store.reject_writes(true);
        assert!(matches!(
            store.write("k", "new").await,
            Err(StorageError::Rejected(_, _))
        ));
        assert_eq!(store.raw("k"), Some("old".to_string()));

        store.reject_writes(false);
        store.write("k", "new").await.unwrap();
        assert_eq!(store.raw("k"), Some("new".to_string()));
    }
}
