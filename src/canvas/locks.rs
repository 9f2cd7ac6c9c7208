//! Per-image read/write locks.
//!
//! Fragment writes fetch, mutate and save whole tiles. Two writes touching the
//! same tile must not interleave, so writers hold an image's write lock for
//! the whole tile loop and readers hold its read lock.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// Lazily created `RwLock` per image id.
#[derive(Debug, Default)]
pub struct ImageLocks {
    locks: Mutex<HashMap<String, Arc<RwLock<()>>>>,
}

impl ImageLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock_for(&self, image_id: &str) -> Arc<RwLock<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(
            locks
                .entry(image_id.to_string())
                .or_insert_with(|| Arc::new(RwLock::new(()))),
        )
    }

    /// Shared access to `image_id`'s tiles.
    pub async fn read(&self, image_id: &str) -> OwnedRwLockReadGuard<()> {
        self.lock_for(image_id).await.read_owned().await
    }

    /// Exclusive access to `image_id`'s tiles.
    pub async fn write(&self, image_id: &str) -> OwnedRwLockWriteGuard<()> {
        self.lock_for(image_id).await.write_owned().await
    }

    /// Forget the lock of a deleted image.
    ///
    /// Tasks still holding or waiting on it keep their own `Arc`.
    pub async fn remove(&self, image_id: &str) {
        self.locks.lock().await.remove(image_id);
    }

    /// Number of images with a lock entry.
    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.locks.lock().await.is_empty()
    }
}
