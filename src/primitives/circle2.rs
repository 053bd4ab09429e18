//! 2D circle type, used for vision-range clipping.

use super::Point2;
use num_traits::Float;

/// A 2D circle defined by center and radius.
///
/// # Example
///
/// ```
/// use dynfog::primitives::{Circle2, Point2};
///
/// let circle: Circle2<f64> = Circle2::new(Point2::new(0.0, 0.0), 1.0);
/// assert!(circle.contains(Point2::new(0.5, 0.0)));
/// assert!(!circle.contains(Point2::new(2.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle2<F> {
    /// Center point of the circle
    pub center: Point2<F>,
    /// Radius of the circle (must be non-negative)
    pub radius: F,
}

impl<F: Float> Circle2<F> {
    /// Creates a new circle from center and radius.
    #[inline]
    pub fn new(center: Point2<F>, radius: F) -> Self {
        Self { center, radius }
    }

    /// Checks if a point is inside the circle (including boundary).
    #[inline]
    pub fn contains(&self, point: Point2<F>) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Returns the point on the circle at the given angle (in radians).
    ///
    /// Angle 0 is at (center.x + radius, center.y).
    #[inline]
    pub fn point_at(&self, angle: F) -> Point2<F> {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Converts the circle to an inscribed polygon with the given number of segments.
    ///
    /// Every vertex lies on the circle, so the polygon never leaves it.
    pub fn to_polygon(&self, num_segments: usize) -> Vec<Point2<F>> {
        let n = num_segments.max(3);
        let tau = F::from(std::f64::consts::TAU).unwrap_or_else(F::zero);
        let count = F::from(n).unwrap_or_else(F::one);

        (0..n)
            .map(|i| {
                let step = F::from(i).unwrap_or_else(F::zero);
                self.point_at(tau * step / count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_contains() {
        let c: Circle2<f64> = Circle2::new(Point2::new(5.0, 5.0), 2.0);
        assert!(c.contains(Point2::new(5.0, 5.0)));
        assert!(c.contains(Point2::new(7.0, 5.0)));
        assert!(!c.contains(Point2::new(7.1, 5.0)));
    }

    #[test]
    fn test_point_at() {
        let c: Circle2<f64> = Circle2::new(Point2::new(1.0, 1.0), 2.0);
        let p = c.point_at(std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_to_polygon_inscribed() {
        let c: Circle2<f64> = Circle2::new(Point2::new(0.0, 0.0), 10.0);
        let poly = c.to_polygon(32);
        assert_eq!(poly.len(), 32);
        for p in &poly {
            assert_relative_eq!(p.distance_squared(c.center), 100.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_to_polygon_minimum_segments() {
        let c: Circle2<f64> = Circle2::new(Point2::new(0.0, 0.0), 1.0);
        assert_eq!(c.to_polygon(1).len(), 3);
    }
}
