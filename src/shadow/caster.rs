//! Shadow projection of one obstruction segment from one observer.
//!
//! The shadow of a segment is bounded by the segment itself, the rays from
//! the observer through both endpoints, and the stretch of map boundary
//! between the points where those rays leave the map. When the two exit
//! points lie on different edges, the map corners in between are spliced in.
//!
//! ```text
//!   +-----------p1=====c0
//!   |           :       |
//!   |     start *       |
//!   |  o        |  shadow
//!   |       end *       |
//!   |           :       |
//!   +-----------p2=====c1
//! ```

use crate::bounds::{Aabb2, MapBounds};
use crate::polygon::Polygon;
use crate::primitives::{Point2, Segment2};
use crate::scene::ItemId;
use crate::tolerance::wrap_index;
use serde_json::Value;
use tracing::trace;

/// Which side of a segment is allowed to cast a shadow.
///
/// For a segment from `start` to `end` on a y-down map, `Left` segments are
/// transparent to observers on their left (`side_of < 0`) and `Right`
/// segments to observers on their right (`side_of > 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OneSided {
    #[default]
    None,
    Left,
    Right,
}

impl OneSided {
    /// Parses the `oneSided` metadata value. Anything other than `"left"`
    /// or `"right"` is two-sided.
    pub fn from_meta(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("left") => OneSided::Left,
            Some("right") => OneSided::Right,
            _ => OneSided::None,
        }
    }

    /// Returns `true` if an observer with signed side `s` sees through the
    /// segment.
    #[inline]
    pub fn is_transparent(self, s: f64) -> bool {
        match self {
            OneSided::None => false,
            OneSided::Left => s < 0.0,
            OneSided::Right => s > 0.0,
        }
    }
}

/// A map-space segment of an obstruction shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstructionSegment {
    pub segment: Segment2<f64>,
    pub one_sided: OneSided,
    /// The obstruction item the segment was exploded from.
    pub shape: ItemId,
}

/// A shadow cast by one segment, tagged with its originating shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowPolygon {
    pub polygon: Polygon<f64>,
    pub shape: ItemId,
}

/// Casts the shadow of `obstruction` as seen from `observer` onto the map.
///
/// Returns `None` when the segment casts nothing: it is one-sided and the
/// observer is on its transparent side, it has zero length, the observer
/// sits on one of its endpoints, or the shadow has no area.
pub fn cast(
    observer: Point2<f64>,
    obstruction: &ObstructionSegment,
    bounds: &MapBounds,
    eps: f64,
) -> Option<ShadowPolygon> {
    let seg = obstruction.segment;
    if seg.is_degenerate(eps) || observer.approx_eq(seg.start, eps) || observer.approx_eq(seg.end, eps) {
        trace!(shape = %obstruction.shape, "skipping degenerate segment");
        return None;
    }

    let s = seg.side_of(observer);
    if obstruction.one_sided.is_transparent(s) {
        return None;
    }

    let rect = bounds.rect();
    let proj_start = project_to_boundary(observer, seg.start, &rect)?;
    let proj_end = project_to_boundary(observer, seg.end, &rect)?;

    let first_edge = bounds.edge_of(proj_start, eps).index();
    let second_edge = bounds.edge_of(proj_end, eps).index();

    let direction: isize = if s > 0.0 { -1 } else { 1 };
    let last = if direction == 1 {
        wrap_index(second_edge, 4)
    } else {
        wrap_index(second_edge - 1, 4)
    };

    let corners = bounds.corners();
    let mut points = vec![seg.start, proj_start];
    let mut k = if direction == 1 { first_edge } else { first_edge - 1 };
    while wrap_index(k, 4) != last {
        points.push(corners[wrap_index(k, 4)]);
        k += direction;
    }
    points.push(proj_end);
    points.push(seg.end);

    let polygon = Polygon::new(points).deduplicated(eps);
    if !polygon.is_proper(eps) {
        trace!(shape = %obstruction.shape, "shadow has no area");
        return None;
    }

    Some(ShadowPolygon {
        polygon,
        shape: obstruction.shape.clone(),
    })
}

/// Extends the ray from `observer` through `p` beyond `p` until it meets the
/// boundary of `rect`.
///
/// Candidates are the hits on the vertical boundary (when the ray has an x
/// component) and on the horizontal boundary (when it has a y component);
/// the one closer to `p` is where the ray actually leaves. Ties go to the
/// horizontal boundary.
fn project_to_boundary(observer: Point2<f64>, p: Point2<f64>, rect: &Aabb2<f64>) -> Option<Point2<f64>> {
    let v = p - observer;
    let xlim = if v.x < 0.0 { rect.min.x } else { rect.max.x };
    let ylim = if v.y < 0.0 { rect.min.y } else { rect.max.y };

    let vertical = (v.x != 0.0).then(|| Point2::new(xlim, p.y + v.y * (xlim - p.x) / v.x));
    let horizontal = (v.y != 0.0).then(|| Point2::new(p.x + v.x * (ylim - p.y) / v.y, ylim));

    match (vertical, horizontal) {
        (Some(a), Some(b)) => {
            if a.distance_squared(p) < b.distance_squared(p) {
                Some(a)
            } else {
                Some(b)
            }
        }
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Vec2;
    use approx::assert_relative_eq;

    fn map() -> MapBounds {
        MapBounds::new(Point2::origin(), Vec2::new(1000.0, 1000.0), Vec2::one())
    }

    fn wall(x0: f64, y0: f64, x1: f64, y1: f64, one_sided: OneSided) -> ObstructionSegment {
        ObstructionSegment {
            segment: Segment2::from_coords(x0, y0, x1, y1),
            one_sided,
            shape: ItemId::from("wall"),
        }
    }

    #[test]
    fn test_full_height_wall_shadows_far_half() {
        let w = wall(400.0, 0.0, 400.0, 1000.0, OneSided::None);

        let from_left = cast(Point2::new(200.0, 500.0), &w, &map(), 1e-6).unwrap();
        assert_relative_eq!(from_left.polygon.area(), 600_000.0, epsilon = 1e-6);
        assert!(from_left.polygon.contains(Point2::new(700.0, 500.0)));
        assert!(!from_left.polygon.contains(Point2::new(200.0, 500.0)));

        let from_right = cast(Point2::new(600.0, 500.0), &w, &map(), 1e-6).unwrap();
        assert_relative_eq!(from_right.polygon.area(), 400_000.0, epsilon = 1e-6);
        assert!(from_right.polygon.contains(Point2::new(100.0, 500.0)));
        assert_eq!(from_right.shape, ItemId::from("wall"));
    }

    #[test]
    fn test_short_wall_projects_onto_one_edge() {
        let w = wall(400.0, 400.0, 400.0, 600.0, OneSided::None);
        let shadow = cast(Point2::new(200.0, 500.0), &w, &map(), 1e-6).unwrap();

        assert_eq!(shadow.polygon.len(), 4);
        assert!(shadow.polygon.vertices.contains(&Point2::new(1000.0, 100.0)));
        assert!(shadow.polygon.vertices.contains(&Point2::new(1000.0, 900.0)));
        // Trapezoid between x = 400 and x = 1000.
        assert_relative_eq!(shadow.polygon.area(), 0.5 * (200.0 + 800.0) * 600.0, epsilon = 1e-6);
    }

    #[test]
    fn test_shadow_wraps_corner() {
        // Observer below-left of a horizontal wall: shadow leaves through the
        // top and the right edge, so the top-right corner is spliced in.
        let w = wall(400.0, 400.0, 600.0, 400.0, OneSided::None);
        let shadow = cast(Point2::new(300.0, 500.0), &w, &map(), 1e-6).unwrap();

        assert!(shadow.polygon.vertices.contains(&Point2::new(1000.0, 0.0)));
        assert!(shadow.polygon.contains(Point2::new(900.0, 50.0)));
        assert!(!shadow.polygon.contains(Point2::new(100.0, 50.0)));
    }

    #[test]
    fn test_shadow_wraps_three_edges() {
        // Observer just right of a long wall: the shadow leaves through the
        // top and bottom edges and wraps both left corners.
        let w = wall(100.0, 100.0, 100.0, 900.0, OneSided::None);
        let shadow = cast(Point2::new(101.0, 500.0), &w, &map(), 1e-6).unwrap();

        assert!(shadow.polygon.vertices.contains(&Point2::new(0.0, 0.0)));
        assert!(shadow.polygon.vertices.contains(&Point2::new(0.0, 1000.0)));
        assert!(shadow.polygon.contains(Point2::new(50.0, 500.0)));
        assert!(!shadow.polygon.contains(Point2::new(500.0, 500.0)));
    }

    #[test]
    fn test_one_sided_filter() {
        let observer = Point2::new(200.0, 500.0);
        // side_of(observer) < 0 for this segment direction.
        let left = wall(400.0, 0.0, 400.0, 1000.0, OneSided::Left);
        let right = wall(400.0, 0.0, 400.0, 1000.0, OneSided::Right);

        assert!(cast(observer, &left, &map(), 1e-6).is_none());
        let shadow = cast(observer, &right, &map(), 1e-6).unwrap();
        assert_relative_eq!(shadow.polygon.area(), 600_000.0, epsilon = 1e-6);

        // From the other side the roles swap.
        let observer = Point2::new(600.0, 500.0);
        assert!(cast(observer, &left, &map(), 1e-6).is_some());
        assert!(cast(observer, &right, &map(), 1e-6).is_none());
    }

    #[test]
    fn test_degenerate_inputs_are_skipped() {
        let point = wall(400.0, 400.0, 400.0, 400.0, OneSided::None);
        assert!(cast(Point2::new(200.0, 500.0), &point, &map(), 1e-6).is_none());

        let w = wall(400.0, 400.0, 400.0, 600.0, OneSided::None);
        assert!(cast(Point2::new(400.0, 400.0), &w, &map(), 1e-6).is_none());

        // Observer on the segment's line: zero-area shadow.
        assert!(cast(Point2::new(400.0, 200.0), &w, &map(), 1e-6).is_none());
    }

    #[test]
    fn test_project_axis_aligned_ray() {
        let rect = map().rect();
        let hit = project_to_boundary(Point2::new(500.0, 500.0), Point2::new(600.0, 500.0), &rect).unwrap();
        assert_eq!(hit, Point2::new(1000.0, 500.0));
        let hit = project_to_boundary(Point2::new(500.0, 500.0), Point2::new(500.0, 400.0), &rect).unwrap();
        assert_eq!(hit, Point2::new(500.0, 0.0));
        assert!(project_to_boundary(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0), &rect).is_none());
    }

    #[test]
    fn test_one_sided_from_meta() {
        assert_eq!(OneSided::from_meta(Some(&Value::from("left"))), OneSided::Left);
        assert_eq!(OneSided::from_meta(Some(&Value::from("right"))), OneSided::Right);
        assert_eq!(OneSided::from_meta(Some(&Value::from(true))), OneSided::None);
        assert_eq!(OneSided::from_meta(None), OneSided::None);
    }
}
