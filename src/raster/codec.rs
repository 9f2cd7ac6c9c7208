//! BMP raster codec.
//!
//! # Design Decisions
//!
//! - **Channel reduction**: buffers whose alpha is 255 everywhere are written
//!   as 24-bit BMP. Anything with transparency is written as 32-bit BMP so the
//!   alpha channel survives.
//!
//! - **Zero origin on decode**: a decoded buffer always starts at `(0, 0)`.
//!   Placing it in image coordinates is the caller's job.
//!
//! - **Bit-exact**: BMP is uncompressed, so `decode(encode(b))` reproduces
//!   every pixel of `b`.

use bytes::Bytes;
use image::codecs::bmp::BmpEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use std::io::Cursor;

use super::buffer::PixelBuffer;
use crate::error::CodecError;

/// File extension used for tiles written by [`BmpCodec`].
pub const BMP_EXTENSION: &str = "bmp";

/// MIME type of [`BmpCodec`] output.
pub const BMP_CONTENT_TYPE: &str = "image/bmp";

// =============================================================================
// Codec Trait
// =============================================================================

/// Converts pixel buffers to and from a binary raster format.
pub trait Codec: Send + Sync {
    /// Encode the buffer's pixels. The origin is not stored.
    fn encode(&self, buffer: &PixelBuffer) -> Result<Bytes, CodecError>;

    /// Decode bytes into a zero-origin buffer.
    fn decode(&self, data: &[u8]) -> Result<PixelBuffer, CodecError>;

    /// File extension for persisted data, without the dot.
    fn extension(&self) -> &'static str;

    /// MIME type of encoded data.
    fn content_type(&self) -> &'static str;
}

// =============================================================================
// BMP Codec
// =============================================================================

/// BMP codec backed by the `image` crate.
///
/// # Example
///
/// ```
/// use tilecanvas::geometry::Rect;
/// use tilecanvas::raster::{BmpCodec, Codec, PixelBuffer};
///
/// let codec = BmpCodec::new();
/// let buffer = PixelBuffer::new(Rect::with_size(4, 3));
///
/// let bytes = codec.encode(&buffer).unwrap();
/// let decoded = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, buffer);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BmpCodec;

impl BmpCodec {
    pub fn new() -> Self {
        Self
    }

    /// Read image dimensions from the header without decoding pixels.
    ///
    /// Returns `(width, height)`.
    pub fn dimensions(&self, data: &[u8]) -> Result<(u32, u32), CodecError> {
        ImageReader::with_format(Cursor::new(data), ImageFormat::Bmp)
            .into_dimensions()
            .map_err(|e| CodecError::Decode {
                message: e.to_string(),
            })
    }
}

impl Codec for BmpCodec {
    fn encode(&self, buffer: &PixelBuffer) -> Result<Bytes, CodecError> {
        let image = buffer.as_image();
        let mut output = Vec::new();
        let encoder = BmpEncoder::new(&mut output);

        let result = if buffer.is_opaque() {
            let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
            encoder.write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )
        } else {
            encoder.write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
        };

        result.map_err(|e| CodecError::Encode {
            message: e.to_string(),
        })?;

        Ok(Bytes::from(output))
    }

    fn decode(&self, data: &[u8]) -> Result<PixelBuffer, CodecError> {
        let reader = ImageReader::with_format(Cursor::new(data), ImageFormat::Bmp);

        let img = reader.decode().map_err(|e| CodecError::Decode {
            message: e.to_string(),
        })?;

        Ok(PixelBuffer::from_image(img.into_rgba8()))
    }

    fn extension(&self) -> &'static str {
        BMP_EXTENSION
    }

    fn content_type(&self) -> &'static str {
        BMP_CONTENT_TYPE
    }
}

// =============================================================================
// Tests
// =============================================================================
