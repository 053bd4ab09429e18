//! The map rectangle visibility is computed in.

use super::Aabb2;
use crate::primitives::{Point2, Vec2};
use crate::tolerance::is_close;
use serde::{Deserialize, Serialize};

/// One side of the map rectangle.
///
/// Discriminants follow the clockwise walk on a y-down map, which is the
/// order [`MapBounds::corners`] returns its corners in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEdge {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl MapEdge {
    /// The edge index used to walk [`MapBounds::corners`].
    #[inline]
    pub fn index(self) -> isize {
        self as isize
    }
}

/// Rectangle within which visibility is computed.
///
/// Either the background map's extent or, in autodetect mode, the bounding
/// box of every map-layer image. The effective rectangle is
/// `offset * scale .. (offset + size) * scale` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub offset: Point2<f64>,
    pub size: Vec2<f64>,
    pub scale: Vec2<f64>,
}

impl MapBounds {
    /// Creates bounds from offset, size and per-axis scale.
    pub fn new(offset: Point2<f64>, size: Vec2<f64>, scale: Vec2<f64>) -> Self {
        Self {
            offset,
            size,
            scale,
        }
    }

    /// Creates unscaled bounds covering exactly `rect`.
    pub fn from_rect(rect: Aabb2<f64>) -> Self {
        Self {
            offset: rect.min,
            size: Vec2::new(rect.width(), rect.height()),
            scale: Vec2::one(),
        }
    }

    /// The effective map rectangle.
    pub fn rect(&self) -> Aabb2<f64> {
        Aabb2::from_corners(
            Point2::new(self.offset.x * self.scale.x, self.offset.y * self.scale.y),
            Point2::new(
                (self.offset.x + self.size.x) * self.scale.x,
                (self.offset.y + self.size.y) * self.scale.y,
            ),
        )
    }

    /// Corners in walking order: `(maxx, miny)`, `(maxx, maxy)`, `(minx, maxy)`, `(minx, miny)`.
    ///
    /// Corner `k` is where [`MapEdge`] `k` ends when walking clockwise.
    pub fn corners(&self) -> [Point2<f64>; 4] {
        let r = self.rect();
        [
            Point2::new(r.max.x, r.min.y),
            Point2::new(r.max.x, r.max.y),
            Point2::new(r.min.x, r.max.y),
            Point2::new(r.min.x, r.min.y),
        ]
    }

    /// Classifies a boundary point by the edge it lies on.
    ///
    /// Horizontal edges win over vertical ones at the corners. Points off the
    /// boundary fall back to [`MapEdge::Top`].
    pub fn edge_of(&self, p: Point2<f64>, eps: f64) -> MapEdge {
        let r = self.rect();
        if is_close(p.y, r.min.y, eps) {
            MapEdge::Top
        } else if is_close(p.y, r.max.y, eps) {
            MapEdge::Bottom
        } else if is_close(p.x, r.min.x, eps) {
            MapEdge::Left
        } else if is_close(p.x, r.max.x, eps) {
            MapEdge::Right
        } else {
            MapEdge::Top
        }
    }

    /// Returns `true` if the rectangle has positive, finite area.
    pub fn is_valid(&self) -> bool {
        let r = self.rect();
        r.min.is_finite() && r.max.is_finite() && r.width() > 0.0 && r.height() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> MapBounds {
        MapBounds::new(Point2::new(0.0, 0.0), Vec2::new(1000.0, 1000.0), Vec2::one())
    }

    #[test]
    fn test_rect_applies_scale() {
        let bounds = MapBounds::new(Point2::new(10.0, 20.0), Vec2::new(100.0, 50.0), Vec2::new(2.0, 0.5));
        let r = bounds.rect();
        assert_eq!(r.min, Point2::new(20.0, 10.0));
        assert_eq!(r.max, Point2::new(220.0, 35.0));
    }

    #[test]
    fn test_corners_walk_clockwise() {
        let c = square().corners();
        assert_eq!(c[0], Point2::new(1000.0, 0.0));
        assert_eq!(c[1], Point2::new(1000.0, 1000.0));
        assert_eq!(c[2], Point2::new(0.0, 1000.0));
        assert_eq!(c[3], Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_edge_of() {
        let b = square();
        assert_eq!(b.edge_of(Point2::new(400.0, 0.0), 1e-6), MapEdge::Top);
        assert_eq!(b.edge_of(Point2::new(1000.0, 300.0), 1e-6), MapEdge::Right);
        assert_eq!(b.edge_of(Point2::new(400.0, 1000.0), 1e-6), MapEdge::Bottom);
        assert_eq!(b.edge_of(Point2::new(0.0, 300.0), 1e-6), MapEdge::Left);
        // Corners prefer the horizontal edge.
        assert_eq!(b.edge_of(Point2::new(0.0, 1000.0), 1e-6), MapEdge::Bottom);
    }

    #[test]
    fn test_from_rect_round_trips() {
        let rect = Aabb2::new(Point2::new(-5.0, 3.0), Point2::new(15.0, 8.0));
        assert_eq!(MapBounds::from_rect(rect).rect(), rect);
    }

    #[test]
    fn test_is_valid() {
        assert!(square().is_valid());
        let flat = MapBounds::new(Point2::origin(), Vec2::new(10.0, 0.0), Vec2::one());
        assert!(!flat.is_valid());
    }
}
