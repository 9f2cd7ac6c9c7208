//! Service-level tests exercising concurrency and larger canvases.
//!
//! Tests verify:
//! - Concurrent writers on one image never lose pixels
//! - Readers racing a delete see either the old content or `NotExist`
//! - Images at the size limits tile correctly

use std::num::NonZeroU32;
use std::sync::Arc;

use image::Rgba;
use tempfile::TempDir;

use tilecanvas::canvas::TiledImageService;
use tilecanvas::error::CanvasError;
use tilecanvas::geometry::Rect;
use tilecanvas::raster::{PixelBuffer, DEFAULT_FILL};
use tilecanvas::tile::{FsTileStore, MemoryTileStore};

use super::test_utils::RED;

fn memory_service(tile_max_size: u32) -> Arc<TiledImageService<MemoryTileStore>> {
    Arc::new(TiledImageService::new(
        MemoryTileStore::new(),
        NonZeroU32::new(tile_max_size).unwrap(),
    ))
}

#[tokio::test]
async fn test_concurrent_overlapping_writes_on_disk() {
    let dir = TempDir::new().unwrap();
    let store = FsTileStore::new(dir.path()).await.unwrap();
    let service = Arc::new(TiledImageService::new(store, NonZeroU32::new(8).unwrap()));
    let image = service.add_image(32, 32).await.unwrap();

    // Every writer paints its own row, and every row crosses four tiles
    let mut handles = Vec::new();
    for row in 0..32u8 {
        let service = Arc::clone(&service);
        let image = Arc::clone(&image);
        handles.push(tokio::spawn(async move {
            let line = PixelBuffer::filled(Rect::with_size(32, 1), Rgba([row, 0, 0, 255]));
            service.set_fragment(&image, 0, i64::from(row), line).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let read = service.get_fragment(&image, 0, 0, 32, 32).await.unwrap();
    for row in 0..32u8 {
        for x in 0..32 {
            assert_eq!(
                read.pixel(x, i64::from(row)),
                Some(Rgba([row, 0, 0, 255])),
                "row {} col {}",
                row,
                x
            );
        }
    }
}

#[tokio::test]
async fn test_images_are_isolated() {
    let service = memory_service(10);
    let a = service.add_image(20, 20).await.unwrap();
    let b = service.add_image(20, 20).await.unwrap();

    let red = PixelBuffer::filled(Rect::with_size(20, 20), RED);
    service.set_fragment(&a, 0, 0, red).await.unwrap();

    let read_b = service.get_fragment(&b, 0, 0, 20, 20).await.unwrap();
    assert!(read_b.as_image().pixels().all(|p| *p == DEFAULT_FILL));

    service.delete_image(&a.id).await.unwrap();
    assert!(service.get_image(&b.id).await.is_ok());
}

#[tokio::test]
async fn test_reads_racing_delete() {
    let service = memory_service(10);
    let image = service.add_image(30, 30).await.unwrap();
    let red = PixelBuffer::filled(Rect::with_size(30, 30), RED);
    service.set_fragment(&image, 0, 0, red).await.unwrap();

    let mut readers = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let image = Arc::clone(&image);
        readers.push(tokio::spawn(async move {
            service.get_fragment(&image, 0, 0, 30, 30).await
        }));
    }
    service.delete_image(&image.id).await.unwrap();

    for reader in readers {
        match reader.await.unwrap() {
            Ok(fragment) => assert!(fragment.as_image().pixels().all(|p| *p == RED)),
            Err(CanvasError::NotExist { .. }) => {}
            Err(other) => panic!("Unexpected error: {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_widest_image() {
    let service = memory_service(1000);
    let image = service.add_image(20_000, 1).await.unwrap();
    assert_eq!(image.tile_count(), 20);

    let marker = PixelBuffer::filled(Rect::with_size(2, 1), RED);
    service.set_fragment(&image, 18_999, 0, marker).await.unwrap();

    let read = service.get_fragment(&image, 18_998, 0, 4, 1).await.unwrap();
    assert_eq!(read.pixel(18_998, 0), Some(DEFAULT_FILL));
    assert_eq!(read.pixel(18_999, 0), Some(RED));
    assert_eq!(read.pixel(19_000, 0), Some(RED));
    assert_eq!(read.pixel(19_001, 0), Some(DEFAULT_FILL));
}

#[tokio::test]
async fn test_tallest_image() {
    let service = memory_service(1000);
    let image = service.add_image(1, 50_000).await.unwrap();
    assert_eq!(image.tile_count(), 50);

    let read = service.get_fragment(&image, 0, 49_990, 1, 20).await.unwrap();
    assert_eq!(read.origin(), (0, 49_990));
    assert_eq!(read.pixel(0, 49_999), Some(DEFAULT_FILL));
    assert_eq!(read.pixel(0, 50_005), Some(DEFAULT_FILL));
}
