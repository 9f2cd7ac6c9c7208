//! Test utilities for integration tests.
//!
//! Router builders, BMP helpers and a small request driver shared by the
//! API and storage tests.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use image::Rgba;
use tower::ServiceExt;

use tilecanvas::canvas::TiledImageService;
use tilecanvas::geometry::Rect;
use tilecanvas::raster::{BmpCodec, Codec, PixelBuffer};
use tilecanvas::server::{create_router_with_state, AppState, RouterConfig};
use tilecanvas::tile::{MemoryTileStore, TileStore};

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

// =============================================================================
// Routers
// =============================================================================

/// Build a router over `store`, also returning the service for direct checks.
pub fn router_with_store<S>(store: S, tile_max_size: u32) -> (Router, Arc<TiledImageService<S>>)
where
    S: TileStore + 'static,
{
    let service = Arc::new(TiledImageService::new(
        store,
        NonZeroU32::new(tile_max_size).unwrap(),
    ));
    let state = AppState::from_shared(Arc::clone(&service));
    let router = create_router_with_state(state, RouterConfig::new().with_tracing(false));
    (router, service)
}

/// Router over a fresh in-memory store.
pub fn memory_router(tile_max_size: u32) -> Router {
    router_with_store(MemoryTileStore::new(), tile_max_size).0
}

// =============================================================================
// BMP Helpers
// =============================================================================

/// A solid `width` x `height` BMP.
pub fn solid_bmp(width: u32, height: u32, color: Rgba<u8>) -> Bytes {
    let buffer = PixelBuffer::filled(Rect::with_size(width, height), color);
    BmpCodec::new().encode(&buffer).unwrap()
}

/// A BMP whose pixel `(x, y)` encodes its own coordinates.
pub fn gradient_bmp(width: u32, height: u32) -> (PixelBuffer, Bytes) {
    let mut buffer = PixelBuffer::new(Rect::with_size(width, height));
    for y in 0..i64::from(height) {
        for x in 0..i64::from(width) {
            buffer.set_pixel(x, y, Rgba([x as u8, y as u8, (x + y) as u8, 255]));
        }
    }
    let bytes = BmpCodec::new().encode(&buffer).unwrap();
    (buffer, bytes)
}

/// A bare 24-bit BMP header claiming `width` x `height`, with no pixel data.
pub fn bmp_header_only(width: u32, height: u32) -> Bytes {
    let mut data = Vec::with_capacity(54);
    // BITMAPFILEHEADER
    data.extend_from_slice(b"BM");
    data.extend_from_slice(&54u32.to_le_bytes());
    data.extend_from_slice(&[0; 4]);
    data.extend_from_slice(&54u32.to_le_bytes());
    // BITMAPINFOHEADER
    data.extend_from_slice(&40u32.to_le_bytes());
    data.extend_from_slice(&(width as i32).to_le_bytes());
    data.extend_from_slice(&(height as i32).to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&24u16.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&2835i32.to_le_bytes());
    data.extend_from_slice(&2835i32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    Bytes::from(data)
}

pub fn decode_bmp(bytes: &[u8]) -> PixelBuffer {
    BmpCodec::new().decode(bytes).unwrap()
}

// =============================================================================
// Request Driver
// =============================================================================

/// Send a request and collect the status and body.
pub async fn send(router: &Router, method: Method, uri: &str, body: Body) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

/// Create an image over HTTP and return its id.
pub async fn create_image(router: &Router, width: u32, height: u32) -> String {
    let (status, body) = send(
        router,
        Method::POST,
        &format!("/chartas?width={}&height={}", width, height),
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    String::from_utf8(body.to_vec()).unwrap()
}

/// Write a BMP fragment and return the status.
pub async fn put_fragment(
    router: &Router,
    id: &str,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
    bmp: Bytes,
) -> StatusCode {
    let uri = format!(
        "/chartas/{}?x={}&y={}&width={}&height={}",
        id, x, y, width, height
    );
    send(router, Method::POST, &uri, Body::from(bmp)).await.0
}

/// Read a fragment, asserting success, and decode it.
pub async fn get_fragment(
    router: &Router,
    id: &str,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
) -> PixelBuffer {
    let uri = format!(
        "/chartas/{}?x={}&y={}&width={}&height={}",
        id, x, y, width, height
    );
    let (status, body) = send(router, Method::GET, &uri, Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    decode_bmp(&body)
}

/// Parse a JSON error body and return its `error` field.
pub fn error_type(body: &[u8]) -> String {
    let json: serde_json::Value = serde_json::from_slice(body).unwrap();
    json["error"].as_str().unwrap().to_string()
}
