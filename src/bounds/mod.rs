//! Bounding rectangles.

mod aabb;
mod map;

pub use aabb::Aabb2;
pub use map::{MapBounds, MapEdge};
