//! Integer rectangle arithmetic.
//!
//! All rectangles are half-open: a [`Rect`] covers `min_x <= x < max_x` and
//! `min_y <= y < max_y`. Coordinates are signed because fragment requests may
//! start left of or above the image origin.

/// A half-open integer box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl Rect {
    /// Create a rectangle from two corners.
    ///
    /// Corners are swapped if needed so that `min <= max` on both axes.
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Create a rectangle from its top-left corner and size.
    ///
    /// The far edges saturate at `i64::MAX`; use
    /// [`Rect::checked_from_origin_size`] when the full size must fit.
    pub fn from_origin_size(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x.saturating_add(i64::from(width)),
            max_y: y.saturating_add(i64::from(height)),
        }
    }

    /// Like [`Rect::from_origin_size`], but `None` if a far edge overflows.
    pub fn checked_from_origin_size(x: i64, y: i64, width: u32, height: u32) -> Option<Self> {
        Some(Self {
            min_x: x,
            min_y: y,
            max_x: x.checked_add(i64::from(width))?,
            max_y: y.checked_add(i64::from(height))?,
        })
    }

    /// Rectangle of a `width` x `height` image anchored at the origin.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self::from_origin_size(0, 0, width, height)
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.max_y - self.min_y
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    /// Number of pixels covered.
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width() * self.height()
        }
    }

    /// The region common to both rectangles.
    ///
    /// Returns [`Rect::default`] (the empty rectangle at the origin) when the
    /// two do not overlap.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        };
        if r.is_empty() {
            Rect::default()
        } else {
            r
        }
    }

    /// Returns `true` if the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    ///
    /// An empty rectangle is contained in everything.
    pub fn contains(&self, other: &Rect) -> bool {
        if other.is_empty() {
            return true;
        }
        self.min_x <= other.min_x
            && other.max_x <= self.max_x
            && self.min_y <= other.min_y
            && other.max_y <= self.max_y
    }

    /// Returns `true` if the pixel at `(x, y)` lies inside the rectangle.
    pub fn contains_point(&self, x: i64, y: i64) -> bool {
        self.min_x <= x && x < self.max_x && self.min_y <= y && y < self.max_y
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
