//! Tiled image metadata.

use crate::geometry::Rect;

/// Metadata of one logical image.
///
/// `tiles` partitions `Rect(0, 0, width, height)` in row-major order, each
/// tile at most `tile_max_size` along both axes. The descriptor is immutable
/// once registered; pixel data lives in the tile store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiledImage {
    /// Unique identifier
    pub id: String,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Tile edge bound fixed when the image was created
    pub tile_max_size: u32,

    /// Tile rectangles in absolute image coordinates
    pub tiles: Vec<Rect>,
}

impl TiledImage {
    /// The whole image as a rectangle anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::with_size(self.width, self.height)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}
