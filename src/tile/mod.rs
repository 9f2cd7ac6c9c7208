//! Tile layer.
//!
//! This module partitions images into tiles and persists tile pixel buffers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           TiledImageService             │
//! └────────────────────┬────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │   Tile Grid     │    │  TileStore Trait    │
//! │ (compute_tiles) │    │ (zero-origin tiles) │
//! └─────────────────┘    └──────────┬──────────┘
//!                                   │
//!                       ┌───────────┴───────────┐
//!                       ▼                       ▼
//!              ┌─────────────────┐    ┌─────────────────┐
//!              │  FsTileStore    │    │ MemoryTileStore │
//!              │ (<root>/id/y/x) │    │   (HashMap)     │
//!              └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Components
//!
//! - [`compute_tiles`]: row-major partition of an image into bounded tiles
//! - [`overlapping_tiles`]: tiles touched by a fragment rectangle
//! - [`TileStore`]: async storage interface keyed by `(image_id, x, y)`
//! - [`FsTileStore`]: encoded tiles on disk, one file per tile
//! - [`MemoryTileStore`]: tiles held in process memory

mod fs_store;
mod grid;
mod store;

pub use fs_store::FsTileStore;
pub use grid::{compute_tiles, overlapping_tiles};
pub use store::{MemoryTileStore, TileStore};
