//! Tile grid computation.

use crate::geometry::Rect;

/// Partition a `width` x `height` image into row-major tiles.
///
/// Each tile is at most `max_tile_size` pixels along each axis. Tiles in the
/// last column and row are smaller when the dimension is not a multiple of
/// `max_tile_size`. The result covers `[0, width) x [0, height)` exactly,
/// with no overlaps.
///
/// `max_tile_size` must be at least 1; callers validate this first.
///
/// # Example
///
/// ```
/// use tilecanvas::geometry::Rect;
/// use tilecanvas::tile::compute_tiles;
///
/// let tiles = compute_tiles(15, 15, 10);
/// assert_eq!(tiles[0], Rect::new(0, 0, 10, 10));
/// assert_eq!(tiles[1], Rect::new(10, 0, 15, 10));
/// assert_eq!(tiles.len(), 4);
/// ```
pub fn compute_tiles(width: u32, height: u32, max_tile_size: u32) -> Vec<Rect> {
    debug_assert!(max_tile_size >= 1, "max_tile_size must be positive");
    let step = max_tile_size.max(1);

    let cols = width.div_ceil(step) as usize;
    let rows = height.div_ceil(step) as usize;
    let mut tiles = Vec::with_capacity(cols * rows);

    let mut y = 0u32;
    while y < height {
        let tile_height = step.min(height - y);
        let mut x = 0u32;
        while x < width {
            let tile_width = step.min(width - x);
            tiles.push(Rect::from_origin_size(
                i64::from(x),
                i64::from(y),
                tile_width,
                tile_height,
            ));
            x += tile_width;
        }
        y += tile_height;
    }

    tiles
}

/// Tiles from `tiles` that share at least one pixel with `target`, in order.
pub fn overlapping_tiles<'a>(
    tiles: &'a [Rect],
    target: &'a Rect,
) -> impl Iterator<Item = &'a Rect> + 'a {
    tiles.iter().filter(move |tile| tile.overlaps(target))
}
