//! Pixel buffers placed in absolute image coordinates.
//!
//! A [`PixelBuffer`] owns an RGBA8 raster whose own indexing always starts at
//! `(0, 0)`, plus an origin that places it in the image's coordinate space.
//! Shifting a buffer only moves the origin; pixel data is untouched.

use image::{Rgba, RgbaImage};

use crate::geometry::Rect;

/// Color of freshly created tiles and of fragment pixels outside the image.
///
/// Fully opaque, so untouched images encode on the 24-bit path.
pub const DEFAULT_FILL: Rgba<u8> = Rgba([0, 0, 0, 0xFF]);

const CHANNELS: usize = 4;

/// An owned RGBA8 raster with an absolute origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    origin_x: i64,
    origin_y: i64,
    pixels: RgbaImage,
}

impl PixelBuffer {
    /// Allocate a buffer covering `rect`, filled with [`DEFAULT_FILL`].
    pub fn new(rect: Rect) -> Self {
        Self::filled(rect, DEFAULT_FILL)
    }

    /// Allocate a buffer covering `rect`, filled with `color`.
    pub fn filled(rect: Rect, color: Rgba<u8>) -> Self {
        let width = u32::try_from(rect.width()).unwrap_or(0);
        let height = u32::try_from(rect.height()).unwrap_or(0);
        Self {
            origin_x: rect.min_x,
            origin_y: rect.min_y,
            pixels: RgbaImage::from_pixel(width, height, color),
        }
    }

    /// Wrap an existing raster at the origin.
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            pixels,
        }
    }

    /// Place this buffer at `(x, y)`.
    pub fn at(mut self, x: i64, y: i64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Move the buffer by `(dx, dy)`.
    pub fn shift(&mut self, dx: i64, dy: i64) {
        self.origin_x += dx;
        self.origin_y += dy;
    }

    /// Absolute top-left corner.
    pub fn origin(&self) -> (i64, i64) {
        (self.origin_x, self.origin_y)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The absolute rectangle this buffer occupies.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin_x, self.origin_y, self.width(), self.height())
    }

    /// Pixel at absolute `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba<u8>> {
        let (lx, ly) = self.local(x, y)?;
        Some(*self.pixels.get_pixel(lx, ly))
    }

    /// Overwrite the pixel at absolute `(x, y)`.
    ///
    /// Returns `false` and does nothing if the point is outside the buffer.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) -> bool {
        match self.local(x, y) {
            Some((lx, ly)) => {
                self.pixels.put_pixel(lx, ly, color);
                true
            }
            None => false,
        }
    }

    /// Copy the pixels of `src` that fall inside `region` into `self`.
    ///
    /// `region` is in absolute coordinates and is clipped to both buffers.
    /// Pixels are overwritten; no alpha blending takes place. Returns the
    /// number of pixels copied.
    pub fn copy_from(&mut self, src: &PixelBuffer, region: Rect) -> usize {
        let region = region.intersect(&self.rect()).intersect(&src.rect());
        if region.is_empty() {
            return 0;
        }

        let row_len = region.width() as usize * CHANNELS;
        let src_stride = src.width() as usize * CHANNELS;
        let dst_stride = self.width() as usize * CHANNELS;

        let src_x = (region.min_x - src.origin_x) as usize * CHANNELS;
        let dst_x = (region.min_x - self.origin_x) as usize * CHANNELS;

        let src_raw: &[u8] = src.pixels.as_raw();
        let dst_raw: &mut [u8] = &mut self.pixels;

        for y in region.min_y..region.max_y {
            let src_start = (y - src.origin_y) as usize * src_stride + src_x;
            let dst_start = (y - self.origin_y) as usize * dst_stride + dst_x;
            dst_raw[dst_start..dst_start + row_len]
                .copy_from_slice(&src_raw[src_start..src_start + row_len]);
        }

        region.area() as usize
    }

    /// Returns `true` if every pixel has full alpha.
    pub fn is_opaque(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 0xFF)
    }

    /// Borrow the zero-origin raster.
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    fn local(&self, x: i64, y: i64) -> Option<(u32, u32)> {
        if !self.rect().contains_point(x, y) {
            return None;
        }
        Some(((x - self.origin_x) as u32, (y - self.origin_y) as u32))
    }
}
