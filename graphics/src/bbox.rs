//! Bounding Boxes
//!
//! Axis-aligned rectangles used for clipping and damage reporting.
//!
//! A box with zero width or height carries no origin: every constructor and
//! operation collapses such results into [`BBox::EMPTY`], so two empty boxes
//! always compare equal and a non-empty box always has `w > 0 && h > 0`.

use core::fmt;

/// Signed pixel coordinate.
pub type Coord = i32;

/// Unsigned pixel extent.
pub type Size = u32;

/// A rectangular region of pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BBox {
    x: Coord,
    y: Coord,
    w: Size,
    h: Size,
}

impl BBox {
    /// The canonical empty box
    pub const EMPTY: BBox = BBox {
        x: 0,
        y: 0,
        w: 0,
        h: 0,
    };

    /// Create a box from origin and size
    pub const fn pack(x: Coord, y: Coord, w: Size, h: Size) -> Self {
        if w == 0 || h == 0 {
            return Self::EMPTY;
        }
        Self { x, y, w, h }
    }

    /// Create from two inclusive corners, in any order
    pub fn from_xyxy(x0: Coord, y0: Coord, x1: Coord, y1: Coord) -> Self {
        Self::from_edges(
            x0.min(x1) as i64,
            y0.min(y1) as i64,
            x0.max(x1) as i64 + 1,
            y0.max(y1) as i64 + 1,
        )
    }

    /// Build from exclusive edges computed in wide arithmetic.
    ///
    /// Edges that do not fit the coordinate space are clamped to it.
    pub(crate) fn from_edges(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        let left = left.clamp(Coord::MIN as i64, Coord::MAX as i64);
        let top = top.clamp(Coord::MIN as i64, Coord::MAX as i64);
        if right <= left || bottom <= top {
            return Self::EMPTY;
        }
        let w = (right - left).min(Size::MAX as i64) as Size;
        let h = (bottom - top).min(Size::MAX as i64) as Size;
        Self::pack(left as Coord, top as Coord, w, h)
    }

    #[inline]
    pub const fn x(&self) -> Coord {
        self.x
    }

    #[inline]
    pub const fn y(&self) -> Coord {
        self.y
    }

    #[inline]
    pub const fn w(&self) -> Size {
        self.w
    }

    #[inline]
    pub const fn h(&self) -> Size {
        self.h
    }

    /// Whether the box covers no pixels
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Exclusive right edge
    #[inline]
    pub fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    /// Exclusive bottom edge
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    /// Inclusive right column. Meaningless for an empty box.
    #[inline]
    pub fn x1(&self) -> i64 {
        self.right() - 1
    }

    /// Inclusive bottom row. Meaningless for an empty box.
    #[inline]
    pub fn y1(&self) -> i64 {
        self.bottom() - 1
    }

    /// Number of pixels covered
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BBox) -> BBox {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        Self::from_edges(
            (self.x as i64).min(other.x as i64),
            (self.y as i64).min(other.y as i64),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Overlap of two boxes, empty if they do not overlap
    pub fn intersect(&self, other: &BBox) -> BBox {
        if self.is_empty() || other.is_empty() {
            return Self::EMPTY;
        }

        Self::from_edges(
            (self.x as i64).max(other.x as i64),
            (self.y as i64).max(other.y as i64),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        )
    }

    /// Check if two boxes share at least one pixel
    pub fn intersects(&self, other: &BBox) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Shift the origin. Moving an empty box yields an empty box.
    pub fn translate(&self, dx: Coord, dy: Coord) -> BBox {
        if self.is_empty() {
            return Self::EMPTY;
        }
        let x = self.x as i64 + dx as i64;
        let y = self.y as i64 + dy as i64;
        Self::from_edges(x, y, x + self.w as i64, y + self.h as i64)
    }

    /// Check if the box contains a point
    pub fn contains(&self, px: Coord, py: Coord) -> bool {
        let (px, py) = (px as i64, py as i64);
        px >= self.x as i64 && px < self.right() && py >= self.y as i64 && py < self.bottom()
    }

    /// Check if this box fully contains another. Every box contains `EMPTY`.
    pub fn contains_bbox(&self, other: &BBox) -> bool {
        if other.is_empty() {
            return true;
        }
        !self.is_empty()
            && self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "empty");
        }
        write!(f, "{}x{}{:+}{:+}", self.w, self.h, self.x, self.y)
    }
}
