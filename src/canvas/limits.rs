//! Size bounds for images and fragment requests.
//!
//! The image bound caps total addressable area (and so the tile count). The
//! smaller fragment bound caps the memory of any single request, however large
//! the backing image is.

use crate::error::{Dimension, SizeError, SizeViolation};

/// Inclusive width and height ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

/// Bounds for [`crate::canvas::TiledImageService::add_image`].
pub const IMAGE_SIZE_LIMITS: SizeLimits = SizeLimits {
    min_width: 1,
    max_width: 20_000,
    min_height: 1,
    max_height: 50_000,
};

/// Bounds for fragment reads and writes.
pub const FRAGMENT_SIZE_LIMITS: SizeLimits = SizeLimits {
    min_width: 1,
    max_width: 5_000,
    min_height: 1,
    max_height: 5_000,
};

impl SizeLimits {
    /// Check both dimensions, reporting every one that is out of range.
    pub fn check(&self, width: u32, height: u32) -> Result<(), SizeError> {
        let mut violations = Vec::new();

        if width < self.min_width || width > self.max_width {
            violations.push(SizeViolation {
                dimension: Dimension::Width,
                min: self.min_width,
                got: width,
                max: self.max_width,
            });
        }
        if height < self.min_height || height > self.max_height {
            violations.push(SizeViolation {
                dimension: Dimension::Height,
                min: self.min_height,
                got: height,
                max: self.max_height,
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SizeError { violations })
        }
    }
}
