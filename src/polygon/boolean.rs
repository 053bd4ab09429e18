//! Multi-polygon regions and their boolean operations.
//!
//! A [`Region`] is the value every visibility stage passes around: the map
//! rectangle, a visible area, the fog overlay. Union, difference and
//! intersection are delegated to the `geo` crate's `BooleanOps`, which is
//! treated as an exact black box here.
//!
//! # Example
//!
//! ```
//! use dynfog::bounds::Aabb2;
//! use dynfog::polygon::Region;
//! use dynfog::Point2;
//!
//! let map = Region::rect(Aabb2::new(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0)));
//! let right = Region::rect(Aabb2::new(Point2::new(1.0, 0.0), Point2::new(2.0, 2.0)));
//!
//! let left = map.difference(&right);
//! assert!((left.area() - 2.0).abs() < 1e-9);
//! ```

use super::core::Polygon;
use crate::bounds::Aabb2;
use crate::primitives::{Circle2, Point2};
use geo::{
    Area, BooleanOps, BoundingRect, Contains, Coord, LineString, MultiPolygon,
    Point as GeoPoint, Polygon as GeoPolygon,
};

/// One connected piece of a [`Region`]: an outer ring and its holes.
///
/// Rings are open (the closing vertex is not repeated).
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPart {
    pub exterior: Polygon<f64>,
    pub holes: Vec<Polygon<f64>>,
}

/// An area of the map made of zero or more polygons with holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    shape: MultiPolygon<f64>,
}

impl Region {
    /// The empty region.
    pub fn empty() -> Self {
        Self {
            shape: MultiPolygon::new(Vec::new()),
        }
    }

    /// A region covering an axis-aligned rectangle.
    pub fn rect(aabb: Aabb2<f64>) -> Self {
        Self::from_polygon(&Polygon::new(aabb.ring().to_vec()))
    }

    /// A region covering a simple polygon. Fewer than three vertices yield
    /// the empty region.
    pub fn from_polygon(polygon: &Polygon<f64>) -> Self {
        if polygon.len() < 3 {
            return Self::empty();
        }
        Self {
            shape: MultiPolygon::new(vec![GeoPolygon::new(to_line_string(&polygon.vertices), Vec::new())]),
        }
    }

    /// The polygonal approximation of a disc, inscribed in `circle`.
    pub fn from_circle(circle: &Circle2<f64>, segments: usize) -> Self {
        Self::from_polygon(&Polygon::new(circle.to_polygon(segments)))
    }

    /// Points in either region.
    pub fn union(&self, other: &Region) -> Region {
        if self.shape.0.is_empty() {
            return other.clone();
        }
        if other.shape.0.is_empty() {
            return self.clone();
        }
        Self {
            shape: self.shape.union(&other.shape),
        }
    }

    /// Points in `self` but not in `other`.
    pub fn difference(&self, other: &Region) -> Region {
        if self.shape.0.is_empty() || other.shape.0.is_empty() {
            return self.clone();
        }
        Self {
            shape: self.shape.difference(&other.shape),
        }
    }

    /// Points in both regions.
    pub fn intersection(&self, other: &Region) -> Region {
        if self.shape.0.is_empty() || other.shape.0.is_empty() {
            return Self::empty();
        }
        Self {
            shape: self.shape.intersection(&other.shape),
        }
    }

    /// Union of every region yielded by `regions`.
    pub fn union_all<'a, I>(regions: I) -> Region
    where
        I: IntoIterator<Item = &'a Region>,
    {
        regions
            .into_iter()
            .fold(Region::empty(), |acc, region| acc.union(region))
    }

    /// Returns `true` if the region covers no area.
    pub fn is_empty(&self) -> bool {
        self.shape.0.is_empty() || self.area() <= 0.0
    }

    /// Total covered area.
    pub fn area(&self) -> f64 {
        self.shape.unsigned_area()
    }

    /// Tests if a point lies in the interior of the region.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        self.shape.contains(&GeoPoint::new(point.x, point.y))
    }

    /// Returns the bounding box, or `None` for the empty region.
    pub fn bounding_box(&self) -> Option<Aabb2<f64>> {
        self.shape.bounding_rect().map(|r| {
            Aabb2::new(
                Point2::new(r.min().x, r.min().y),
                Point2::new(r.max().x, r.max().y),
            )
        })
    }

    /// Returns `true` if every vertex has finite coordinates.
    pub fn is_finite(&self) -> bool {
        self.shape.0.iter().all(|poly| {
            std::iter::once(poly.exterior())
                .chain(poly.interiors())
                .flat_map(|ring| ring.0.iter())
                .all(|c| c.x.is_finite() && c.y.is_finite())
        })
    }

    /// Number of connected pieces.
    pub fn part_count(&self) -> usize {
        self.shape.0.len()
    }

    /// The region's pieces as open rings.
    pub fn parts(&self) -> Vec<RegionPart> {
        self.shape
            .0
            .iter()
            .map(|poly| RegionPart {
                exterior: from_line_string(poly.exterior()),
                holes: poly.interiors().iter().map(from_line_string).collect(),
            })
            .collect()
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::empty()
    }
}

fn to_line_string(vertices: &[Point2<f64>]) -> LineString<f64> {
    LineString::new(vertices.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
}

fn from_line_string(ring: &LineString<f64>) -> Polygon<f64> {
    let mut vertices: Vec<Point2<f64>> = ring.0.iter().map(|c| Point2::new(c.x, c.y)).collect();
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    Polygon::new(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Region {
        Region::rect(Aabb2::new(Point2::new(x0, y0), Point2::new(x1, y1)))
    }

    #[test]
    fn test_rect_area() {
        assert_relative_eq!(rect(0.0, 0.0, 4.0, 3.0).area(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference_half() {
        let left = rect(0.0, 0.0, 1000.0, 1000.0).difference(&rect(400.0, 0.0, 1000.0, 1000.0));
        assert_relative_eq!(left.area(), 400_000.0, epsilon = 1e-6);
        assert!(left.contains(Point2::new(200.0, 500.0)));
        assert!(!left.contains(Point2::new(600.0, 500.0)));
    }

    #[test]
    fn test_difference_with_hole() {
        let frame = rect(0.0, 0.0, 4.0, 4.0).difference(&rect(1.0, 1.0, 3.0, 3.0));
        assert_relative_eq!(frame.area(), 12.0, epsilon = 1e-9);
        let parts = frame.parts();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].holes.len(), 1);
        assert_eq!(parts[0].exterior.len(), 4);
    }

    #[test]
    fn test_union_overlapping() {
        let u = rect(0.0, 0.0, 2.0, 2.0).union(&rect(1.0, 1.0, 3.0, 3.0));
        assert_relative_eq!(u.area(), 7.0, epsilon = 1e-9);
        assert_eq!(u.part_count(), 1);
    }

    #[test]
    fn test_union_disjoint() {
        let u = rect(0.0, 0.0, 1.0, 1.0).union(&rect(3.0, 0.0, 4.0, 1.0));
        assert_relative_eq!(u.area(), 2.0, epsilon = 1e-9);
        assert_eq!(u.part_count(), 2);
    }

    #[test]
    fn test_intersection() {
        let i = rect(0.0, 0.0, 2.0, 2.0).intersection(&rect(1.0, 1.0, 3.0, 3.0));
        assert_relative_eq!(i.area(), 1.0, epsilon = 1e-9);
        assert!(rect(0.0, 0.0, 1.0, 1.0)
            .intersection(&rect(5.0, 5.0, 6.0, 6.0))
            .is_empty());
    }

    #[test]
    fn test_empty_operands() {
        let square = rect(0.0, 0.0, 1.0, 1.0);
        let empty = Region::empty();
        assert!(empty.is_empty());
        assert_eq!(square.union(&empty), square);
        assert_eq!(square.difference(&empty), square);
        assert!(square.intersection(&empty).is_empty());
        assert!(empty.difference(&square).is_empty());
    }

    #[test]
    fn test_union_all() {
        let regions = vec![rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 0.0, 2.0, 1.0), rect(5.0, 5.0, 6.0, 6.0)];
        let u = Region::union_all(&regions);
        assert_relative_eq!(u.area(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_from_circle_inside_circle() {
        let circle = Circle2::new(Point2::new(10.0, 10.0), 5.0);
        let disc = Region::from_circle(&circle, 64);
        let bb = disc.bounding_box().unwrap();
        assert!(bb.min.x >= 5.0 - 1e-9 && bb.max.x <= 15.0 + 1e-9);
        assert!(disc.area() < std::f64::consts::PI * 25.0);
        assert!(disc.area() > 0.99 * std::f64::consts::PI * 25.0);
    }

    #[test]
    fn test_from_degenerate_polygon() {
        let line = Polygon::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        assert!(Region::from_polygon(&line).is_empty());
    }

    #[test]
    fn test_is_finite() {
        assert!(rect(0.0, 0.0, 1.0, 1.0).is_finite());
    }
}
