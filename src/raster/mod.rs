//! Raster buffers and the binary codec.
//!
//! - [`PixelBuffer`]: an owned RGBA8 raster with zero-origin storage and an
//!   absolute placement that can be shifted without touching pixels
//! - [`Codec`]: encode/decode boundary between buffers and bytes
//! - [`BmpCodec`]: the BMP implementation used for tiles and HTTP bodies

mod buffer;
mod codec;

pub use buffer::{PixelBuffer, DEFAULT_FILL};
pub use codec::{BmpCodec, Codec, BMP_CONTENT_TYPE, BMP_EXTENSION};
