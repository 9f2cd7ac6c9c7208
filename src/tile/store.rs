//! Tile persistence.
//!
//! A [`TileStore`] keeps one pixel buffer per `(image_id, x, y)` key, where
//! `(x, y)` is the tile's absolute origin inside its image. Buffers come back
//! from [`TileStore::get_tile`] with zero-origin placement; shifting them into
//! image coordinates is done by the caller.

use std::collections::HashMap;

use async_trait::async_trait;
use image::RgbaImage;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::raster::PixelBuffer;

// =============================================================================
// TileStore Trait
// =============================================================================

/// Storage backend for tile pixel buffers.
///
/// Implementations perform no locking across calls: a read-modify-write of one
/// tile must be serialized by the caller.
#[async_trait]
pub trait TileStore: Send + Sync {
    /// Persist `tile` as the tile whose origin is `(x, y)`.
    ///
    /// Overwrites any existing tile under that key. The buffer's own origin is
    /// ignored. The write is durable once this returns.
    async fn save_tile(
        &self,
        image_id: &str,
        x: i64,
        y: i64,
        tile: &PixelBuffer,
    ) -> Result<(), StoreError>;

    /// Fetch the tile whose origin is `(x, y)`, placed at `(0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TileNotFound`] if nothing is stored under the key.
    async fn get_tile(&self, image_id: &str, x: i64, y: i64) -> Result<PixelBuffer, StoreError>;

    /// Remove every tile of `image_id`.
    ///
    /// Succeeds when the image has no tiles.
    async fn delete_image(&self, image_id: &str) -> Result<(), StoreError>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TileKey {
    image_id: String,
    x: i64,
    y: i64,
}

/// Tile store that keeps every tile in process memory.
///
/// Nothing survives a restart. Useful for tests and for `--in-memory` runs.
#[derive(Debug, Default)]
pub struct MemoryTileStore {
    tiles: RwLock<HashMap<TileKey, RgbaImage>>,
}

impl MemoryTileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored tiles across all images.
    pub async fn tile_count(&self) -> usize {
        self.tiles.read().await.len()
    }

    /// Number of stored tiles belonging to `image_id`.
    pub async fn image_tile_count(&self, image_id: &str) -> usize {
        self.tiles
            .read()
            .await
            .keys()
            .filter(|k| k.image_id == image_id)
            .count()
    }
}

#[async_trait]
impl TileStore for MemoryTileStore {
    async fn save_tile(
        &self,
        image_id: &str,
        x: i64,
        y: i64,
        tile: &PixelBuffer,
    ) -> Result<(), StoreError> {
        let key = TileKey {
            image_id: image_id.to_string(),
            x,
            y,
        };
        self.tiles.write().await.insert(key, tile.as_image().clone());
        Ok(())
    }

    async fn get_tile(&self, image_id: &str, x: i64, y: i64) -> Result<PixelBuffer, StoreError> {
        let key = TileKey {
            image_id: image_id.to_string(),
            x,
            y,
        };
        let tiles = self.tiles.read().await;
        tiles
            .get(&key)
            .map(|pixels| PixelBuffer::from_image(pixels.clone()))
            .ok_or_else(|| StoreError::TileNotFound {
                image_id: image_id.to_string(),
                x,
                y,
            })
    }

    async fn delete_image(&self, image_id: &str) -> Result<(), StoreError> {
        self.tiles
            .write()
            .await
            .retain(|key, _| key.image_id != image_id);
        Ok(())
    }
}
