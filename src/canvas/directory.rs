//! In-memory key/value directory.
//!
//! Every operation takes the same lock. Each is O(1) metadata work, so one
//! coarse lock is enough; pixel I/O never happens while it is held.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::descriptor::TiledImage;
use crate::error::DirectoryError;

/// Thread-safe map from string keys to cloneable values.
#[derive(Debug)]
pub struct Directory<V> {
    entries: Mutex<HashMap<String, V>>,
}

/// Directory of registered image descriptors.
pub type ImageDirectory = Directory<Arc<TiledImage>>;

impl<V> Default for Directory<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> Directory<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`.
    ///
    /// Keys are expected to be unique; an existing entry is replaced.
    pub async fn add(&self, key: impl Into<String>, value: V) {
        self.entries.lock().await.insert(key.into(), value);
    }

    /// Look up `key`.
    pub async fn get(&self, key: &str) -> Result<V, DirectoryError> {
        self.entries
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(key.to_string()))
    }

    /// Remove `key`, returning the value it held.
    pub async fn delete(&self, key: &str) -> Result<V, DirectoryError> {
        self.entries
            .lock()
            .await
            .remove(key)
            .ok_or_else(|| DirectoryError::NotFound(key.to_string()))
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.lock().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
