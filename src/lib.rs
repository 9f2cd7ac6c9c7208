//! # Tilecanvas
//!
//! A tiled store for raster images too large to hold in memory.
//!
//! An image is created at a fixed size and split into a grid of tiles, each
//! persisted independently. Clients then write and read arbitrary rectangular
//! fragments; only the tiles a fragment touches are loaded.
//!
//! ## Features
//!
//! - **Huge canvases**: images up to 20000 x 50000 pixels
//! - **Fragment I/O**: read or write any rectangle up to 5000 x 5000, even one
//!   that only partly overlaps the image
//! - **Pluggable storage**: BMP tiles on disk or an in-memory store
//! - **HTTP API**: Axum server exchanging fragments as BMP
//!
//! ## Architecture
//!
//! - [`geometry`] - Integer rectangles and intersection
//! - [`raster`] - Positioned pixel buffers and the BMP codec
//! - [`tile`] - Tile grid layout and tile stores
//! - [`canvas`] - Image directory and the fragment service
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::num::NonZeroU32;
//! use tilecanvas::{create_router, FsTileStore, RouterConfig, TiledImageService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FsTileStore::new("/var/lib/tilecanvas").await?;
//!     let tile_max_size = NonZeroU32::new(1000).ok_or("zero tile size")?;
//!     let service = TiledImageService::new(store, tile_max_size);
//!
//!     let router = create_router(service, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod canvas;
pub mod config;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod server;
pub mod tile;

// Re-export commonly used types
pub use canvas::{TiledImage, TiledImageService, DEFAULT_TILE_MAX_SIZE};
pub use config::Config;
pub use error::{CanvasError, CodecError, DirectoryError, SizeError, StoreError};
pub use geometry::Rect;
pub use raster::{BmpCodec, Codec, PixelBuffer, DEFAULT_FILL};
pub use server::{create_router, AppState, RouterConfig};
pub use tile::{compute_tiles, FsTileStore, MemoryTileStore, TileStore};
