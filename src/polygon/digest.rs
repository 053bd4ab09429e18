//! Canonical geometry text and content digests for regions.
//!
//! Two regions that cover the same area must hash identically even when the
//! boolean primitive emitted them with different starting vertices, ring
//! orientation, part order or a few collinear points. The canonical form:
//!
//! - coordinates rounded to `1 / precision` and stored as integers
//! - consecutive duplicate and collinear vertices removed
//! - exteriors counter-clockwise, holes clockwise
//! - every ring rotated to start at its lexicographically smallest vertex
//! - holes sorted within a part, parts sorted within the region

use super::boolean::Region;
use crate::primitives::Point2;
use crate::tolerance::{remove_collinear_vertices, remove_duplicate_vertices};
use sha2::{Digest, Sha256};

type GridPoint = (i64, i64);

impl Region {
    /// Returns the canonical geometry text of the region.
    pub fn canonical_text(&self, precision: f64) -> String {
        let mut parts: Vec<String> = self
            .parts()
            .iter()
            .filter_map(|part| {
                let exterior = canonical_ring(&part.exterior.vertices, precision, true)?;
                let mut holes: Vec<String> = part
                    .holes
                    .iter()
                    .filter_map(|hole| canonical_ring(&hole.vertices, precision, false))
                    .map(|ring| ring_text(&ring))
                    .collect();
                holes.sort();

                let mut text = ring_text(&exterior);
                for hole in holes {
                    text.push(' ');
                    text.push_str(&hole);
                }
                Some(text)
            })
            .collect();
        parts.sort();
        parts.join(" ")
    }

    /// Returns the SHA-256 digest of the canonical geometry text, hex encoded.
    ///
    /// # Example
    ///
    /// ```
    /// use dynfog::bounds::Aabb2;
    /// use dynfog::polygon::Region;
    /// use dynfog::Point2;
    ///
    /// let a = Region::rect(Aabb2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)));
    /// let b = Region::rect(Aabb2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0000001)));
    /// assert_eq!(a.digest(1000.0), b.digest(1000.0));
    /// ```
    pub fn digest(&self, precision: f64) -> String {
        hex::encode(Sha256::digest(self.canonical_text(precision).as_bytes()))
    }
}

fn canonical_ring(vertices: &[Point2<f64>], precision: f64, ccw: bool) -> Option<Vec<GridPoint>> {
    let eps = 0.5 / precision;
    let cleaned = remove_collinear_vertices(&remove_duplicate_vertices(vertices, eps), eps);

    let mut ring: Vec<GridPoint> = Vec::with_capacity(cleaned.len());
    for p in cleaned {
        let q = quantize(p, precision);
        if ring.last() != Some(&q) {
            ring.push(q);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return None;
    }

    let twice_area = twice_signed_area(&ring);
    if twice_area == 0 {
        return None;
    }
    if (twice_area > 0) != ccw {
        ring.reverse();
    }

    let start = ring
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| **p)
        .map(|(i, _)| i)
        .unwrap_or(0);
    ring.rotate_left(start);
    Some(ring)
}

fn quantize(p: Point2<f64>, precision: f64) -> GridPoint {
    // `as` saturates and maps NaN to 0; -0.0 rounds to 0.
    ((p.x * precision).round() as i64, (p.y * precision).round() as i64)
}

fn twice_signed_area(ring: &[GridPoint]) -> i128 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % n];
            x0 as i128 * y1 as i128 - x1 as i128 * y0 as i128
        })
        .sum()
}

fn ring_text(ring: &[GridPoint]) -> String {
    let mut text = String::new();
    for (i, (x, y)) in ring.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(&format!("{} {} {}", if i == 0 { "M" } else { "L" }, x, y));
    }
    text.push_str(" Z");
    text
}
