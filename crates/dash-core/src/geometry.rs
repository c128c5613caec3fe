// ABOUTME: Rectangle and point value types for panel placement.
// ABOUTME: Provides the gap-expanded overlap and containment predicates.

use serde::{Deserialize, Serialize};

/// Content-box size of a panel. `0x0` means "not yet measured".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const UNMEASURED: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A size can be placed once both dimensions have been observed as positive.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned panel rectangle in container coordinates.
///
/// `bottom` and `right` are always derived from the top-left corner and a
/// size, so the fields are private and every constructor keeps them in sync.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    top: f32,
    left: f32,
    bottom: f32,
    right: f32,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("Non-finite edge in rectangle ({top}, {left}, {bottom}, {right})")]
    NonFinite {
        top: f32,
        left: f32,
        bottom: f32,
        right: f32,
    },

    #[error("Inverted rectangle: bottom {bottom} < top {top} or right {right} < left {left}")]
    Inverted {
        top: f32,
        left: f32,
        bottom: f32,
        right: f32,
    },
}

impl Position {
    pub fn new(left: f32, top: f32, size: Size) -> Self {
        Self {
            top,
            left,
            bottom: top + size.height,
            right: left + size.width,
        }
    }

    pub fn at(point: Point, size: Size) -> Self {
        Self::new(point.x, point.y, size)
    }

    /// Build a rectangle from explicit edges, rejecting inconsistent input.
    pub fn from_edges(top: f32, left: f32, bottom: f32, right: f32) -> Result<Self, GeometryError> {
        if ![top, left, bottom, right].iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFinite {
                top,
                left,
                bottom,
                right,
            });
        }
        if bottom < top || right < left {
            return Err(GeometryError::Inverted {
                top,
                left,
                bottom,
                right,
            });
        }
        Ok(Self {
            top,
            left,
            bottom,
            right,
        })
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Same size, moved so its top-left corner sits at `point`.
    pub fn translated_to(&self, point: Point) -> Self {
        Self::at(point, self.size())
    }

    /// True when the rectangle does not extend past `width` on the right.
    pub fn fits_within(&self, width: f32) -> bool {
        self.right <= width
    }

    /// True when `point` lies strictly inside this rectangle grown by `gap`
    /// on every side.
    pub fn contains_point(&self, point: Point, gap: f32) -> bool {
        self.left - gap < point.x
            && point.x < self.right + gap
            && self.top - gap < point.y
            && point.y < self.bottom + gap
    }
}

/// Gap-expanded AABB test: two rectangles overlap if they come within `gap`
/// of touching.
pub fn overlaps(a: &Position, b: &Position, gap: f32) -> bool {
    a.left - gap < b.right
        && b.left < a.right + gap
        && a.top - gap < b.bottom
        && b.top < a.bottom + gap
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAP: f32 = 16.0;

    #[test]
    fn position_derives_bottom_and_right() {
        let pos = Position::new(10.0, 20.0, Size::new(200.0, 100.0));
        assert_eq!(pos.right(), 210.0);
        assert_eq!(pos.bottom(), 120.0);
        assert_eq!(pos.size(), Size::new(200.0, 100.0));
    }

    #[test]
    fn from_edges_rejects_inverted_rect() {
        let err = Position::from_edges(100.0, 0.0, 50.0, 10.0).unwrap_err();
        assert!(matches!(err, GeometryError::Inverted { .. }));
    }

    #[test]
    fn from_edges_rejects_nan() {
        let err = Position::from_edges(f32::NAN, 0.0, 50.0, 10.0).unwrap_err();
        assert!(matches!(err, GeometryError::NonFinite { .. }));
    }

    #[test]
    fn unmeasured_size_is_not_measured() {
        assert!(!Size::UNMEASURED.is_measured());
        assert!(!Size::new(100.0, 0.0).is_measured());
        assert!(Size::new(1.0, 1.0).is_measured());
    }

    #[test]
    fn panels_separated_by_exact_gap_do_not_overlap() {
        let a = Position::new(0.0, 0.0, Size::new(200.0, 100.0));
        let b = Position::new(216.0, 0.0, Size::new(200.0, 100.0));
        assert!(!overlaps(&a, &b, GAP));
        assert!(!overlaps(&b, &a, GAP));
    }

    #[test]
    fn panels_closer_than_gap_overlap() {
        let a = Position::new(0.0, 0.0, Size::new(200.0, 100.0));
        let b = Position::new(215.0, 0.0, Size::new(200.0, 100.0));
        assert!(overlaps(&a, &b, GAP));
    }

    #[test]
    fn diagonal_neighbours_within_gap_overlap() {
        let a = Position::new(0.0, 0.0, Size::new(100.0, 100.0));
        let b = Position::new(110.0, 110.0, Size::new(100.0, 100.0));
        assert!(overlaps(&a, &b, GAP));
        let c = Position::new(116.0, 116.0, Size::new(100.0, 100.0));
        assert!(!overlaps(&a, &c, GAP));
    }

    #[test]
    fn contains_point_excludes_gap_boundary() {
        let pos = Position::new(0.0, 0.0, Size::new(200.0, 100.0));
        assert!(pos.contains_point(Point::new(100.0, 50.0), GAP));
        assert!(pos.contains_point(Point::new(215.0, 0.0), GAP));
        assert!(!pos.contains_point(Point::new(216.0, 0.0), GAP));
        assert!(!pos.contains_point(Point::new(0.0, 116.0), GAP));
    }

    #[test]
    fn translated_to_keeps_size() {
        let pos = Position::new(0.0, 0.0, Size::new(50.0, 40.0));
        let moved = pos.translated_to(Point::new(300.0, 300.0));
        assert_eq!(moved.top_left(), Point::new(300.0, 300.0));
        assert_eq!(moved.size(), pos.size());
    }

    #[test]
    fn fits_within_is_inclusive() {
        let pos = Position::new(216.0, 0.0, Size::new(200.0, 100.0));
        assert!(pos.fits_within(416.0));
        assert!(!pos.fits_within(415.0));
    }

    #[test]
    fn position_serializes_all_edges() {
        let pos = Position::new(1.0, 2.0, Size::new(3.0, 4.0));
        let json = serde_json::to_value(pos).unwrap();
        assert_eq!(json["top"], 2.0);
        assert_eq!(json["left"], 1.0);
        assert_eq!(json["bottom"], 6.0);
        assert_eq!(json["right"], 4.0);
    }
}
