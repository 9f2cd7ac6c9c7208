//! Filesystem-backed tile store.
//!
//! Tiles are laid out as `<root>/<image_id>/<y>/<x>.<ext>`, where `(x, y)` is
//! the tile's origin and `<ext>` comes from the codec. Deleting an image
//! removes `<root>/<image_id>` recursively.
//!
//! Writes go to a temporary sibling file that is synced and then renamed over
//! the final name, so a reader never observes a half-written tile.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::store::TileStore;
use crate::error::StoreError;
use crate::raster::{BmpCodec, Codec, PixelBuffer};

/// Tile store persisting encoded tiles under a root directory.
#[derive(Debug, Clone)]
pub struct FsTileStore<C: Codec = BmpCodec> {
    root: PathBuf,
    codec: C,
}

impl FsTileStore<BmpCodec> {
    /// Open a BMP tile store rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::with_codec(root, BmpCodec::new()).await
    }
}

impl<C: Codec> FsTileStore<C> {
    /// Open a tile store rooted at `root` that encodes tiles with `codec`.
    pub async fn with_codec(root: impl Into<PathBuf>, codec: C) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root, codec })
    }

    /// The directory all images live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every tile of `image_id`.
    pub fn image_dir(&self, image_id: &str) -> Result<PathBuf, StoreError> {
        validate_image_id(image_id)?;
        Ok(self.root.join(image_id))
    }

    /// Path of the tile whose origin is `(x, y)`.
    pub fn tile_path(&self, image_id: &str, x: i64, y: i64) -> Result<PathBuf, StoreError> {
        Ok(self
            .image_dir(image_id)?
            .join(y.to_string())
            .join(format!("{}.{}", x, self.codec.extension())))
    }
}

/// Reject ids that would escape the root or collapse onto it.
fn validate_image_id(image_id: &str) -> Result<(), StoreError> {
    let mut components = Path::new(image_id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !image_id.contains(['/', '\\']) => Ok(()),
        _ => Err(StoreError::InvalidImageId(image_id.to_string())),
    }
}

#[async_trait]
impl<C: Codec> TileStore for FsTileStore<C> {
    async fn save_tile(
        &self,
        image_id: &str,
        x: i64,
        y: i64,
        tile: &PixelBuffer,
    ) -> Result<(), StoreError> {
        let path = self.tile_path(image_id, x, y)?;
        let encoded = self.codec.encode(tile)?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io(dir, e))?;
        }

        let tmp_path = path.with_extension(format!("{}.tmp", self.codec.extension()));
        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        file.write_all(&encoded)
            .await
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        drop(file);

        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        debug!(image_id, x, y, bytes = encoded.len(), "Saved tile");
        Ok(())
    }

    async fn get_tile(&self, image_id: &str, x: i64, y: i64) -> Result<PixelBuffer, StoreError> {
        let path = self.tile_path(image_id, x, y)?;

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::TileNotFound {
                    image_id: image_id.to_string(),
                    x,
                    y,
                })
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        Ok(self.codec.decode(&data)?)
    }

    async fn delete_image(&self, image_id: &str) -> Result<(), StoreError> {
        let dir = self.image_dir(image_id)?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!(image_id, "Removed image directory");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&dir, e)),
        }
    }
}
