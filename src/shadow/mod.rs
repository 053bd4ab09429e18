//! Shadow casting, composition and per-observer caching.
//!
//! For each observer, every obstruction segment casts a shadow polygon onto
//! the map rectangle ([`cast`]). The shadows are composed into the region
//! the observer can see ([`compose`]), which is memoized per observer in a
//! [`ShadowCache`] and finally limited to the observer's vision range
//! ([`clip_to_range`]).

mod cache;
mod caster;
mod compositor;

pub use cache::{CacheEntry, ShadowCache};
pub use caster::{cast, ObstructionSegment, OneSided, ShadowPolygon};
pub use compositor::{clip_to_range, compose, shape_masks, ShapeMasks};
