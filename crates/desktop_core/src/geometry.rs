//! Shared integer-pixel geometry primitives for the shell interaction engines.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
/// A point in desktop coordinates (origin at the viewport's top-left corner).
pub struct Point {
    /// Horizontal offset in pixels.
    pub x: i32,
    /// Vertical offset in pixels.
    pub y: i32,
}

impl Point {
    /// Builds a point from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point translated by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// An axis-aligned rectangle in desktop coordinates.
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Rect {
    /// Builds a rectangle from its edges and extent.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the normalized rectangle spanned by two opposite corners.
    ///
    /// The corners may be given in any order; the result always has
    /// non-negative extent.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (a.x - b.x).abs(),
            h: (a.y - b.y).abs(),
        }
    }

    /// Returns this rectangle translated by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Returns this rectangle with width/height raised to the given minimums.
    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    /// Returns the center point of the rectangle.
    pub fn center(self) -> Point {
        Point {
            x: self.x + self.w / 2,
            y: self.y + self.h / 2,
        }
    }

    /// Returns whether `point` lies inside the rectangle (edges inclusive on
    /// the top/left, exclusive on the bottom/right).
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }

    /// Returns whether two rectangles overlap.
    ///
    /// Two rectangles intersect unless one is entirely to the left, right,
    /// above, or below the other.
    pub fn intersects(self, other: Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn from_corners_normalizes_any_drag_direction() {
        let top_left = Rect::from_corners(Point::new(10, 20), Point::new(60, 90));
        let bottom_right = Rect::from_corners(Point::new(60, 90), Point::new(10, 20));
        assert_eq!(top_left, bottom_right);
        assert_eq!(top_left, Rect::new(10, 20, 50, 70));
    }

    #[test]
    fn intersects_rejects_fully_separated_rects() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.intersects(Rect::new(10, 0, 10, 10)));
        assert!(!a.intersects(Rect::new(0, 10, 10, 10)));
        assert!(!a.intersects(Rect::new(-10, 0, 10, 10)));
        assert!(a.intersects(Rect::new(9, 9, 10, 10)));
        assert!(a.intersects(Rect::new(-5, -5, 10, 10)));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 10)));
    }

    #[test]
    fn default_rect_is_collapsed_at_the_origin() {
        assert_eq!(Rect::default(), Rect::new(0, 0, 0, 0));
        assert!(!Rect::default().contains(Point::default()));
    }
}
