//! Tiled image management.
//!
//! A logical image is a rectangle partitioned into tiles. Clients read and
//! write arbitrary rectangular fragments; the service maps each fragment onto
//! the tiles it touches.
//!
//! # Request Flow
//!
//! ```text
//!   get_fragment(x, y, w, h)                 set_fragment(x, y, buf)
//!            │                                         │
//!            ▼                                         ▼
//!   ┌─────────────────┐                      ┌─────────────────┐
//!   │ size + overlap  │                      │ size + overlap  │
//!   │ checks          │                      │ checks          │
//!   └────────┬────────┘                      └────────┬────────┘
//!            │ read lock                              │ write lock
//!            ▼                                         ▼
//!   for each touched tile:                   for each touched tile:
//!     get_tile → shift → copy into result      get_tile → shift → copy
//!                                              fragment in → save_tile
//! ```

mod descriptor;
mod directory;
mod limits;
mod locks;
mod service;

pub use descriptor::TiledImage;
pub use directory::{Directory, ImageDirectory};
pub use limits::{SizeLimits, FRAGMENT_SIZE_LIMITS, IMAGE_SIZE_LIMITS};
pub use locks::ImageLocks;
pub use service::{TiledImageService, DEFAULT_TILE_MAX_SIZE};
