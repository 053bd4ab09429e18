//! Change detection between consecutive passes.
//!
//! Every pass reduces the scene to a set of [`SnapshotKeys`]. Comparing them
//! with the keys of the last recompute decides whether anything needs to be
//! computed at all, and whether cached per-observer regions are still
//! structurally valid.

use crate::bounds::MapBounds;
use crate::scene::SceneSettings;
use serde::Serialize;
use tracing::debug;

/// The parts of a scene a pass depends on.
///
/// Item-valued keys hold the serialized items so any property change is
/// noticed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotKeys {
    /// Serialized background map item, if any.
    pub map: Option<String>,
    /// Vision, autodetect, fog-of-war and persistence switches and the
    /// overlay color.
    pub settings: SceneSettings,
    /// Serialized active obstruction items.
    pub obstructions: String,
    /// Serialized observer items.
    pub observers: String,
    /// Resolved map rectangle.
    pub bounds: Option<MapBounds>,
}

/// Outcome of [`ChangeDetector::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeDecision {
    pub should_recompute: bool,
    pub invalidate_cache: bool,
}

/// Remembers the keys of the last recompute.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    previous: Option<SnapshotKeys>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares `keys` with the previous recompute.
    ///
    /// Recompute is needed when any key changed or `force` is set. The cache
    /// is invalidated only when the map, the obstruction set or the bounds
    /// changed; observer moves and toggles keep it. The first evaluation
    /// after construction or [`ChangeDetector::forget`] always recomputes
    /// and invalidates.
    pub fn evaluate(&mut self, keys: &SnapshotKeys, force: bool) -> ChangeDecision {
        let decision = match &self.previous {
            None => ChangeDecision {
                should_recompute: true,
                invalidate_cache: true,
            },
            Some(prev) => ChangeDecision {
                should_recompute: force || prev != keys,
                invalidate_cache: prev.map != keys.map
                    || prev.obstructions != keys.obstructions
                    || prev.bounds != keys.bounds,
            },
        };

        if decision.should_recompute {
            debug!(
                invalidate_cache = decision.invalidate_cache,
                force, "scene changed"
            );
            self.previous = Some(keys.clone());
        }

        decision
    }

    /// Drops the remembered keys so the next evaluation recomputes.
    pub fn forget(&mut self) {
        self.previous = None;
    }
}
