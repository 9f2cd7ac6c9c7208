//! Tiled image service.
//!
//! This module turns image-level requests into per-tile operations.
//!
//! # Coordinate Framing
//!
//! Tiles come back from the [`TileStore`] at `(0, 0)` and fragments arrive
//! from callers at `(0, 0)`. Both are shifted to their absolute placement here
//! and nowhere else, and all intersection arithmetic happens in image
//! coordinates.
//!
//! # Failure Model
//!
//! Storage errors are returned as-is and never retried. Multi-tile operations
//! are not atomic:
//!
//! - `add_image` removes already written tiles if a save fails (best effort;
//!   the descriptor is only registered after every tile is saved)
//! - `delete_image` forgets the descriptor before deleting tiles; if tile
//!   deletion fails the image is gone but its files may remain
//! - `set_fragment` saves tiles one at a time with no rollback; a failure
//!   leaves earlier tiles updated and later ones untouched

use std::num::NonZeroU32;
use std::sync::Arc;

use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::descriptor::TiledImage;
use super::directory::ImageDirectory;
use super::limits::{FRAGMENT_SIZE_LIMITS, IMAGE_SIZE_LIMITS};
use super::locks::ImageLocks;
use crate::error::CanvasError;
use crate::geometry::Rect;
use crate::raster::PixelBuffer;
use crate::tile::{compute_tiles, overlapping_tiles, TileStore};

/// Default tile edge bound.
pub const DEFAULT_TILE_MAX_SIZE: u32 = 1000;

// =============================================================================
// Tiled Image Service
// =============================================================================

/// Service for creating, reading, writing and deleting tiled images.
///
/// The service owns the image directory and drives all tile I/O. Construct
/// one at startup and share it by reference (or `Arc`).
///
/// # Example
///
/// ```
/// use std::num::NonZeroU32;
/// use tilecanvas::canvas::TiledImageService;
/// use tilecanvas::tile::MemoryTileStore;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), tilecanvas::CanvasError> {
/// let service = TiledImageService::new(MemoryTileStore::new(), NonZeroU32::new(10).unwrap());
///
/// let image = service.add_image(15, 15).await?;
/// assert_eq!(image.tiles.len(), 4);
///
/// let fragment = service.get_fragment(&image, 5, 5, 10, 10).await?;
/// assert_eq!((fragment.width(), fragment.height()), (10, 10));
/// # Ok(())
/// # }
/// ```
pub struct TiledImageService<S: TileStore> {
    /// Registered image descriptors
    directory: ImageDirectory,

    /// Tile persistence backend
    store: Arc<S>,

    /// Serializes fetch-mutate-save sequences per image
    locks: ImageLocks,

    /// Tile edge bound for newly created images
    tile_max_size: NonZeroU32,
}

impl<S: TileStore> TiledImageService<S> {
    /// Create a service over `store`, tiling new images by `tile_max_size`.
    pub fn new(store: S, tile_max_size: NonZeroU32) -> Self {
        Self::with_shared_store(Arc::new(store), tile_max_size)
    }

    /// Create a service over a store that is also used elsewhere.
    pub fn with_shared_store(store: Arc<S>, tile_max_size: NonZeroU32) -> Self {
        Self {
            directory: ImageDirectory::new(),
            store,
            locks: ImageLocks::new(),
            tile_max_size,
        }
    }

    /// Tile edge bound applied to images created from now on.
    pub fn tile_max_size(&self) -> u32 {
        self.tile_max_size.get()
    }

    /// The underlying tile store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Number of registered images.
    pub async fn image_count(&self) -> usize {
        self.directory.len().await
    }

    /// Create a `width` x `height` image filled with the default color.
    ///
    /// # Errors
    ///
    /// - [`CanvasError::Size`] if either dimension is out of range; nothing
    ///   is written in that case
    /// - [`CanvasError::Store`] if a tile cannot be saved; tiles written so
    ///   far are removed best-effort and the image is not registered
    pub async fn add_image(&self, width: u32, height: u32) -> Result<Arc<TiledImage>, CanvasError> {
        IMAGE_SIZE_LIMITS.check(width, height)?;

        let id = Uuid::new_v4().to_string();
        let tile_max_size = self.tile_max_size.get();
        let tiles = compute_tiles(width, height, tile_max_size);

        debug!(
            image_id = %id,
            width,
            height,
            tile_count = tiles.len(),
            "Creating image"
        );

        for (written, tile) in tiles.iter().enumerate() {
            let buffer = PixelBuffer::new(*tile);
            if let Err(err) = self
                .store
                .save_tile(&id, tile.min_x, tile.min_y, &buffer)
                .await
            {
                warn!(
                    image_id = %id,
                    written,
                    total = tiles.len(),
                    "Tile save failed during image creation: {}",
                    err
                );
                if let Err(cleanup) = self.store.delete_image(&id).await {
                    warn!(image_id = %id, "Could not remove partial image: {}", cleanup);
                }
                return Err(err.into());
            }
        }

        let image = Arc::new(TiledImage {
            id: id.clone(),
            width,
            height,
            tile_max_size,
            tiles,
        });
        self.directory.add(id, Arc::clone(&image)).await;

        info!(image_id = %image.id, width, height, "Image created");
        Ok(image)
    }

    /// Look up a registered image.
    pub async fn get_image(&self, id: &str) -> Result<Arc<TiledImage>, CanvasError> {
        self.directory
            .get(id)
            .await
            .map_err(|_| CanvasError::NotExist { id: id.to_string() })
    }

    /// Unregister an image and delete its tiles.
    ///
    /// # Errors
    ///
    /// - [`CanvasError::NotExist`] if `id` is not registered
    /// - [`CanvasError::Store`] if tile deletion fails; the image is already
    ///   unregistered at that point and stays so
    pub async fn delete_image(&self, id: &str) -> Result<(), CanvasError> {
        self.directory
            .delete(id)
            .await
            .map_err(|_| CanvasError::NotExist { id: id.to_string() })?;

        let result = {
            let _guard = self.locks.write(id).await;
            self.store.delete_image(id).await
        };
        self.locks.remove(id).await;

        match result {
            Ok(()) => {
                info!(image_id = id, "Image deleted");
                Ok(())
            }
            Err(err) => {
                warn!(
                    image_id = id,
                    "Image unregistered but tile deletion failed: {}", err
                );
                Err(err.into())
            }
        }
    }

    /// Read the `width` x `height` region of `image` starting at `(x, y)`.
    ///
    /// The result always has the full requested size and is placed at
    /// `(x, y)`. Parts of the region outside the image carry
    /// [`crate::raster::DEFAULT_FILL`].
    ///
    /// # Errors
    ///
    /// - [`CanvasError::Size`] if the fragment size is out of range
    /// - [`CanvasError::NotOverlaps`] if the region misses the image entirely
    /// - [`CanvasError::NotExist`] if the image was deleted
    /// - [`CanvasError::Store`] if a tile cannot be read
    pub async fn get_fragment(
        &self,
        image: &TiledImage,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, CanvasError> {
        FRAGMENT_SIZE_LIMITS.check(width, height)?;

        let target = placed_rect(image, x, y, width, height)?;

        let _guard = self.read_registered(&image.id).await?;

        let mut fragment = PixelBuffer::new(target);
        let mut tiles_read = 0usize;

        for tile in overlapping_tiles(&image.tiles, &target) {
            let mut buffer = self
                .store
                .get_tile(&image.id, tile.min_x, tile.min_y)
                .await?;
            buffer.shift(tile.min_x, tile.min_y);

            fragment.copy_from(&buffer, tile.intersect(&target));
            tiles_read += 1;
        }

        debug!(image_id = %image.id, rect = %target, tiles_read, "Read fragment");
        Ok(fragment)
    }

    /// Overwrite the pixels of `image` covered by `fragment` placed at `(x, y)`.
    ///
    /// `fragment` is expected at zero origin; it is moved to `(x, y)` here.
    /// Parts of the fragment outside the image are ignored. Pixels are
    /// replaced, not blended.
    ///
    /// # Errors
    ///
    /// - [`CanvasError::Size`] if the fragment size is out of range
    /// - [`CanvasError::NotOverlaps`] if the fragment misses the image entirely
    /// - [`CanvasError::NotExist`] if the image was deleted
    /// - [`CanvasError::Store`] if a tile cannot be read or saved; tiles saved
    ///   before the failure keep their new content
    pub async fn set_fragment(
        &self,
        image: &TiledImage,
        x: i64,
        y: i64,
        fragment: PixelBuffer,
    ) -> Result<(), CanvasError> {
        FRAGMENT_SIZE_LIMITS.check(fragment.width(), fragment.height())?;

        let target = placed_rect(image, x, y, fragment.width(), fragment.height())?;
        let fragment = fragment.at(x, y);

        let _guard = self.write_registered(&image.id).await?;

        let touched: Vec<Rect> = overlapping_tiles(&image.tiles, &target).copied().collect();

        for (saved, tile) in touched.iter().enumerate() {
            let mut buffer = self
                .store
                .get_tile(&image.id, tile.min_x, tile.min_y)
                .await?;
            buffer.shift(tile.min_x, tile.min_y);

            buffer.copy_from(&fragment, tile.intersect(&target));

            if let Err(err) = self
                .store
                .save_tile(&image.id, tile.min_x, tile.min_y, &buffer)
                .await
            {
                if saved > 0 {
                    warn!(
                        image_id = %image.id,
                        saved,
                        total = touched.len(),
                        "Fragment partially applied: {}",
                        err
                    );
                }
                return Err(err.into());
            }
        }

        debug!(
            image_id = %image.id,
            rect = %target,
            tiles_written = touched.len(),
            "Wrote fragment"
        );
        Ok(())
    }

    async fn ensure_registered(&self, id: &str) -> Result<(), CanvasError> {
        if self.directory.contains(id).await {
            Ok(())
        } else {
            Err(CanvasError::NotExist { id: id.to_string() })
        }
    }

    /// Shared lock on a registered image.
    ///
    /// Checked before locking so an unknown id never creates a lock entry,
    /// and again after, since a delete may have won the race for the lock.
    async fn read_registered(&self, id: &str) -> Result<OwnedRwLockReadGuard<()>, CanvasError> {
        self.ensure_registered(id).await?;
        let guard = self.locks.read(id).await;
        if let Err(err) = self.ensure_registered(id).await {
            drop(guard);
            self.locks.remove(id).await;
            return Err(err);
        }
        Ok(guard)
    }

    /// Exclusive lock on a registered image. See [`Self::read_registered`].
    async fn write_registered(&self, id: &str) -> Result<OwnedRwLockWriteGuard<()>, CanvasError> {
        self.ensure_registered(id).await?;
        let guard = self.locks.write(id).await;
        if let Err(err) = self.ensure_registered(id).await {
            drop(guard);
            self.locks.remove(id).await;
            return Err(err);
        }
        Ok(guard)
    }
}

/// The absolute rectangle of a `width` x `height` region at `(x, y)`.
///
/// A region whose far edge does not fit in `i64` cannot reach the image.
fn placed_rect(
    image: &TiledImage,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
) -> Result<Rect, CanvasError> {
    match Rect::checked_from_origin_size(x, y, width, height) {
        Some(rect) if image.bounds().overlaps(&rect) => Ok(rect),
        _ => Err(CanvasError::NotOverlaps),
    }
}

// =============================================================================
// Tests
// =============================================================================
