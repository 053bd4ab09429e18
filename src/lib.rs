//! dynfog - Dynamic fog of war for shared 2D maps
//!
//! Observers on a map see everything that no obstruction segment hides from
//! them. Each pass casts one shadow per observer and segment, subtracts the
//! shadows from the map rectangle, optionally limits the result to a vision
//! range, and writes the visible regions back to the scene as fog items.
//! Passes skip themselves when nothing relevant changed and reuse regions
//! of observers that did not move.
//!
//! The entry point is [`VisionSession::evaluate`], called against any
//! [`SceneStore`](scene::SceneStore) implementation.

pub mod bounds;
pub mod detect;
pub mod engine;
pub mod error;
pub mod fog;
pub mod io;
pub mod polygon;
pub mod primitives;
pub mod scene;
pub mod shadow;
pub mod timing;
pub mod tolerance;

pub use bounds::{Aabb2, MapBounds};
pub use engine::{EngineOptions, PassOutcome, SkipReason, VisionSession};
pub use error::{StoreError, VisionError};
pub use polygon::Region;
pub use primitives::{Circle2, Point2, Segment2, Vec2};
pub use timing::PerformanceReport;
