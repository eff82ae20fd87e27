//! Local persistent cache storage.
//!
//! A [`LocalStore`] holds raw JSON text under string keys. [`CacheStore`]
//! layers typed, fail-soft reads and writes on top of any store.
//!
//! # Layout
//!
//! [`FileStore`] keeps one file per key in the data directory:
//! - `caltrax-macros.json`: date -> day bucket
//! - `caltrax-workout-plans.json`: owner id -> workout plans
//! - `caltrax-meal-plans.json`: owner id -> meal plans

mod cache;
mod file;
mod memory;

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use cache::CacheStore;
pub use file::FileStore;
pub use memory::MemoryStore;

/// String-keyed storage of serialized cache values.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Reads the raw value under `key`, `Ok(None)` if nothing is stored.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the whole value under `key`.
    async fn write(&self, key: &str, contents: &str) -> Result<(), StorageError>;
}

/// Errors that can occur during cache storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error for {}: {1}", .0.display())]
    Io(PathBuf, #[source] io::Error),

    #[error("failed to encode cache value for '{0}': {1}")]
    Encode(String, #[source] serde_json::Error),

    #[error("write rejected for '{0}': {1}")]
    Rejected(String, String),
}
