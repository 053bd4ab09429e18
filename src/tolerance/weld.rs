//! Vertex cleanup for closed rings.
//!
//! Shadow polygons are built from projected points that frequently coincide
//! (an endpoint already on the map edge projects onto itself), and boolean
//! results may carry collinear vertices. These helpers strip both so rings
//! stay valid input for the boolean primitive and hash identically when they
//! describe the same shape.

use crate::primitives::Point2;
use num_traits::Float;
use std::collections::VecDeque;

/// Removes consecutive duplicate vertices (within epsilon) from a closed ring.
///
/// The closing pair (last, first) is checked too, so an explicitly closed
/// ring loses its repeated first vertex.
///
/// # Example
///
/// ```
/// use dynfog::tolerance::remove_duplicate_vertices;
/// use dynfog::Point2;
///
/// let ring = vec![
///     Point2::new(0.0_f64, 0.0),
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.0, 1.0),
///     Point2::new(0.0, 0.0),
/// ];
/// assert_eq!(remove_duplicate_vertices(&ring, 1e-9).len(), 3);
/// ```
pub fn remove_duplicate_vertices<F: Float>(points: &[Point2<F>], epsilon: F) -> Vec<Point2<F>> {
    let eps_sq = epsilon * epsilon;
    let mut result: Vec<Point2<F>> = Vec::with_capacity(points.len());

    for &p in points {
        match result.last() {
            Some(last) if last.distance_squared(p) <= eps_sq => {}
            _ => result.push(p),
        }
    }

    while result.len() > 1 {
        let first = result[0];
        match result.last() {
            Some(last) if last.distance_squared(first) <= eps_sq => {
                result.pop();
            }
            _ => break,
        }
    }

    result
}

/// Removes vertices of a closed ring that lie within `epsilon` of the line
/// through their two neighbours.
///
/// Rings that collapse below three vertices come back empty.
pub fn remove_collinear_vertices<F: Float>(points: &[Point2<F>], epsilon: F) -> Vec<Point2<F>> {
    let mut ring: VecDeque<Point2<F>> = points.iter().copied().collect();

    loop {
        let before = ring.len();
        ring = collinear_pass(ring, epsilon);

        // The pass never looks across the seam between the last and first vertex.
        while ring.len() >= 3 {
            let n = ring.len();
            if is_collinear(ring[n - 2], ring[n - 1], ring[0], epsilon) {
                ring.pop_back();
            } else if is_collinear(ring[n - 1], ring[0], ring[1], epsilon) {
                ring.pop_front();
            } else {
                break;
            }
        }

        if ring.len() < 3 {
            return Vec::new();
        }
        if ring.len() == before {
            return ring.into();
        }
    }
}

/// One linear sweep: each vertex pops the collinear vertices behind it.
fn collinear_pass<F: Float>(ring: VecDeque<Point2<F>>, epsilon: F) -> VecDeque<Point2<F>> {
    let mut stack: VecDeque<Point2<F>> = VecDeque::with_capacity(ring.len());
    for p in ring {
        while stack.len() >= 2 && is_collinear(stack[stack.len() - 2], stack[stack.len() - 1], p, epsilon) {
            stack.pop_back();
        }
        stack.push_back(p);
    }
    stack
}

/// `true` if `b` lies within `epsilon` of the line through `a` and `c`.
fn is_collinear<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, epsilon: F) -> bool {
    let base = c - a;
    base.cross(b - a).abs() <= epsilon * base.magnitude_squared().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_duplicates_keeps_distinct() {
        let ring = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
        ];
        assert_eq!(remove_duplicate_vertices(&ring, 1e-9), ring);
    }

    #[test]
    fn test_remove_duplicates_closing_vertex() {
        let ring = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1e-12, 0.0),
        ];
        assert_eq!(remove_duplicate_vertices(&ring, 1e-9).len(), 3);
    }

    #[test]
    fn test_remove_duplicates_empty() {
        let ring: Vec<Point2<f64>> = Vec::new();
        assert!(remove_duplicate_vertices(&ring, 1e-9).is_empty());
    }

    #[test]
    fn test_remove_collinear_square_with_midpoints() {
        let ring = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
            Point2::new(0.0, 5.0),
        ];
        let cleaned = remove_collinear_vertices(&ring, 1e-9);
        assert_eq!(cleaned.len(), 4);
        assert!(!cleaned.contains(&Point2::new(5.0, 0.0)));
        assert!(!cleaned.contains(&Point2::new(0.0, 5.0)));
    }

    #[test]
    fn test_remove_collinear_tolerates_rounding() {
        let ring = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(500.0, 0.4),
            Point2::new(1000.0, 0.0),
            Point2::new(1000.0, 1000.0),
            Point2::new(0.0, 1000.0),
        ];
        assert_eq!(remove_collinear_vertices(&ring, 0.5).len(), 4);
        assert_eq!(remove_collinear_vertices(&ring, 0.1).len(), 5);
    }

    #[test]
    fn test_remove_collinear_densely_sampled_square() {
        // 1000 points per edge, starting mid-edge so the seam falls on a straight run.
        let edge = |from: (f64, f64), to: (f64, f64)| {
            (0..1000).map(move |i| {
                let t = i as f64 / 1000.0;
                Point2::new(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
            })
        };
        let mut ring: Vec<Point2<f64>> = edge((0.0, 0.0), (1000.0, 0.0))
            .chain(edge((1000.0, 0.0), (1000.0, 1000.0)))
            .chain(edge((1000.0, 1000.0), (0.0, 1000.0)))
            .chain(edge((0.0, 1000.0), (0.0, 0.0)))
            .collect();
        ring.rotate_left(500);

        let cleaned = remove_collinear_vertices(&ring, 1e-6);
        assert_eq!(cleaned.len(), 4);
        for corner in [(0.0, 0.0), (1000.0, 0.0), (1000.0, 1000.0), (0.0, 1000.0)] {
            assert!(cleaned.contains(&Point2::new(corner.0, corner.1)));
        }
    }

    #[test]
    fn test_remove_collinear_degenerate_ring() {
        let ring = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert!(remove_collinear_vertices(&ring, 1e-9).is_empty());
    }
}
