//! Polygon rings and multi-polygon regions.
//!
//! This module provides:
//! - Simple polygon rings with area, winding and containment
//! - [`Region`], a multi-polygon with exact union, difference and intersection
//! - Canonical geometry text and content digests for regions
//!
//! # Example
//!
//! ```
//! use dynfog::polygon::{Polygon, Region};
//! use dynfog::Point2;
//!
//! // Two overlapping squares
//! let square1 = Region::from_polygon(&Polygon::new(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ]));
//!
//! let square2 = Region::from_polygon(&Polygon::new(vec![
//!     Point2::new(1.0, 1.0),
//!     Point2::new(3.0, 1.0),
//!     Point2::new(3.0, 3.0),
//!     Point2::new(1.0, 3.0),
//! ]));
//!
//! let intersection = square1.intersection(&square2);
//! assert_eq!(intersection.part_count(), 1);
//! assert!((intersection.area() - 1.0).abs() < 1e-9);
//! ```

mod boolean;
mod core;
mod digest;

pub use boolean::{Region, RegionPart};
pub use core::{polygon_contains, polygon_signed_area, Polygon};
