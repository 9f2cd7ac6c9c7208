//! End-to-end tests against the filesystem tile store.
//!
//! Tests verify:
//! - Tile files land at `<root>/<id>/<y>/<x>.bmp` and are valid BMPs
//! - Fragment writes change exactly the touched tile files
//! - Deletion removes the image directory
//! - Tiles outlive the store handle that wrote them

use axum::body::Body;
use axum::http::{Method, StatusCode};
use tempfile::TempDir;

use tilecanvas::geometry::Rect;
use tilecanvas::raster::{BmpCodec, Codec, PixelBuffer, DEFAULT_FILL};
use tilecanvas::tile::{compute_tiles, FsTileStore, TileStore};

use super::test_utils::{
    create_image, decode_bmp, get_fragment, gradient_bmp, put_fragment, router_with_store, send,
    solid_bmp, GREEN, RED,
};

async fn fs_router(dir: &TempDir, tile_max_size: u32) -> axum::Router {
    let store = FsTileStore::new(dir.path()).await.unwrap();
    router_with_store(store, tile_max_size).0
}

#[tokio::test]
async fn test_create_writes_one_file_per_tile() {
    let dir = TempDir::new().unwrap();
    let router = fs_router(&dir, 10).await;

    let id = create_image(&router, 25, 25).await;

    for tile in compute_tiles(25, 25, 10) {
        let path = dir
            .path()
            .join(&id)
            .join(tile.min_y.to_string())
            .join(format!("{}.bmp", tile.min_x));
        let bytes = std::fs::read(&path).unwrap();
        let decoded = decode_bmp(&bytes);
        assert_eq!(
            (i64::from(decoded.width()), i64::from(decoded.height())),
            (tile.width(), tile.height()),
            "{}",
            path.display()
        );
        assert!(decoded.as_image().pixels().all(|p| *p == DEFAULT_FILL));
    }
}

#[tokio::test]
async fn test_write_touches_only_overlapping_tiles() {
    let dir = TempDir::new().unwrap();
    let router = fs_router(&dir, 10).await;
    let id = create_image(&router, 15, 15).await;

    let mut fragment = PixelBuffer::new(Rect::with_size(2, 1));
    fragment.set_pixel(0, 0, RED);
    fragment.set_pixel(1, 0, GREEN);
    let bmp = BmpCodec::new().encode(&fragment).unwrap();

    let status = put_fragment(&router, &id, 9, 0, 2, 1, bmp).await;
    assert_eq!(status, StatusCode::OK);

    let tile = |x: i64, y: i64| {
        let path = dir
            .path()
            .join(&id)
            .join(y.to_string())
            .join(format!("{}.bmp", x));
        decode_bmp(&std::fs::read(path).unwrap())
    };

    assert_eq!(tile(0, 0).pixel(9, 0), Some(RED));
    assert_eq!(tile(10, 0).pixel(0, 0), Some(GREEN));
    assert!(tile(0, 10)
        .as_image()
        .pixels()
        .all(|p| *p == DEFAULT_FILL));
    assert!(tile(10, 10)
        .as_image()
        .pixels()
        .all(|p| *p == DEFAULT_FILL));
}

#[tokio::test]
async fn test_round_trip_on_disk() {
    let dir = TempDir::new().unwrap();
    let router = fs_router(&dir, 16).await;
    let id = create_image(&router, 50, 40).await;
    let (expected, bmp) = gradient_bmp(30, 25);

    assert_eq!(put_fragment(&router, &id, 11, 9, 30, 25, bmp).await, StatusCode::OK);

    let read = get_fragment(&router, &id, 11, 9, 30, 25).await;
    assert_eq!(read.as_image(), expected.as_image());
}

#[tokio::test]
async fn test_delete_removes_directory() {
    let dir = TempDir::new().unwrap();
    let router = fs_router(&dir, 10).await;
    let id = create_image(&router, 12, 12).await;
    assert!(dir.path().join(&id).is_dir());

    let (status, _) = send(&router, Method::DELETE, &format!("/chartas/{}", id), Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!dir.path().join(&id).exists());
}

#[tokio::test]
async fn test_tiles_survive_store_reopen() {
    let dir = TempDir::new().unwrap();
    let router = fs_router(&dir, 8).await;
    let id = create_image(&router, 8, 8).await;
    put_fragment(&router, &id, 2, 2, 3, 3, solid_bmp(3, 3, RED)).await;

    let reopened = FsTileStore::new(dir.path()).await.unwrap();
    let tile = reopened.get_tile(&id, 0, 0).await.unwrap();

    assert_eq!(tile.origin(), (0, 0));
    assert_eq!(tile.pixel(2, 2), Some(RED));
    assert_eq!(tile.pixel(4, 4), Some(RED));
    assert_eq!(tile.pixel(5, 5), Some(DEFAULT_FILL));
}
