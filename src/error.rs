use std::fmt;

use thiserror::Error;

/// Which axis of a size check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Width => f.write_str("width"),
            Dimension::Height => f.write_str("height"),
        }
    }
}

/// A single out-of-range dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeViolation {
    pub dimension: Dimension,
    pub min: u32,
    pub got: u32,
    pub max: u32,
}

impl fmt::Display for SizeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} must be in [{}, {}], got {}",
            self.dimension, self.min, self.max, self.got
        )
    }
}

/// Width and/or height outside the allowed range.
///
/// Every offending dimension is listed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_violations(.violations))]
pub struct SizeError {
    pub violations: Vec<SizeViolation>,
}

impl SizeError {
    /// The violation for `dimension`, if that axis was out of range.
    pub fn violation(&self, dimension: Dimension) -> Option<&SizeViolation> {
        self.violations.iter().find(|v| v.dimension == dimension)
    }
}

fn join_violations(violations: &[SizeViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors from encoding or decoding a pixel buffer.
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    #[error("Failed to decode raster: {message}")]
    Decode { message: String },

    #[error("Failed to encode raster: {message}")]
    Encode { message: String },
}

/// Errors from the tile persistence layer
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Filesystem or other backing-store failure
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    /// No tile is stored under the requested key
    #[error("Tile ({x}, {y}) of image {image_id} not found")]
    TileNotFound { image_id: String, x: i64, y: i64 },

    /// The image id cannot be used as a storage key
    #[error("Invalid image id: {0:?}")]
    InvalidImageId(String),

    /// A stored tile could not be encoded or decoded
    #[error("Tile codec error: {0}")]
    Codec(#[from] CodecError),
}

impl StoreError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        StoreError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Errors from the generic key/value directory
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("Key not found: {0}")]
    NotFound(String),
}

/// Errors surfaced by [`crate::canvas::TiledImageService`].
///
/// The transport layer maps each variant to its own response.
#[derive(Debug, Clone, Error)]
pub enum CanvasError {
    /// Requested image or fragment size is out of range
    #[error("Invalid size: {0}")]
    Size(#[from] SizeError),

    /// The fragment rectangle does not intersect the image
    #[error("Fragment does not overlap the image")]
    NotOverlaps,

    /// No image is registered under this id
    #[error("Image not found: {id}")]
    NotExist { id: String },

    /// Tile storage failed; the operation may be partially applied
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}
