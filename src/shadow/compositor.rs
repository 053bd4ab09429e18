//! Composition of one observer's shadows into a visible region.

use super::caster::ShadowPolygon;
use crate::bounds::MapBounds;
use crate::error::VisionError;
use crate::polygon::Region;
use crate::primitives::Circle2;
use crate::scene::{Grid, ItemId, Observer, Obstruction, VisionRange};
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Interiors of closed obstruction shapes, by shape id.
pub type ShapeMasks = BTreeMap<ItemId, Region>;

/// Builds the interior masks of every closed obstruction.
pub fn shape_masks(obstructions: &[Obstruction]) -> ShapeMasks {
    obstructions
        .iter()
        .filter_map(|o| {
            o.interior
                .as_ref()
                .map(|interior| (o.id.clone(), Region::from_polygon(interior)))
        })
        .filter(|(_, region)| !region.is_empty())
        .collect()
}

/// Computes the region `observer` can see: the map rectangle minus the
/// shadows cast by every obstruction.
///
/// Shadows are grouped by their originating shape. Each group is unioned,
/// loses the shape's own interior when the shape is closed, and is then
/// subtracted from the map rectangle.
///
/// Fails with [`VisionError::CompositionFailed`] if the result is empty or
/// has non-finite coordinates.
pub fn compose(
    observer: &ItemId,
    bounds: &MapBounds,
    shadows: &[ShadowPolygon],
    masks: &ShapeMasks,
) -> Result<Region, VisionError> {
    let mut groups: BTreeMap<&ItemId, Vec<Region>> = BTreeMap::new();
    for shadow in shadows {
        groups
            .entry(&shadow.shape)
            .or_default()
            .push(Region::from_polygon(&shadow.polygon));
    }

    let mut visible = Region::rect(bounds.rect());
    for (shape, regions) in groups {
        let mut shadow = Region::union_all(&regions);
        if let Some(mask) = masks.get(shape) {
            shadow = shadow.difference(mask);
        }
        visible = visible.difference(&shadow);
    }

    if visible.is_empty() || !visible.is_finite() {
        return Err(VisionError::CompositionFailed {
            observer: observer.to_string(),
        });
    }

    Ok(visible)
}

/// Limits a visible region to the observer's vision range.
///
/// A limited range `r` becomes a disc of radius
/// `grid.dpi * (r / grid.scale + 0.5)` around the observer, approximated by
/// an inscribed polygon with `segments` sides. A region whose bounding box
/// already lies inside that polygon is returned as is.
pub fn clip_to_range(region: Region, observer: &Observer, grid: &Grid, segments: usize) -> Region {
    match observer.vision_range {
        VisionRange::Unlimited => region,
        VisionRange::Limited(range) => {
            let radius = grid.dpi * (range / grid.scale + 0.5);
            let sides = segments.max(3);
            // Incircle of the inscribed polygon.
            let inner = Circle2::new(observer.position, radius * (PI / sides as f64).cos());
            let enclosed = region
                .bounding_box()
                .is_some_and(|bb| bb.ring().iter().all(|&corner| inner.contains(corner)));
            if enclosed {
                return region;
            }
            let disc = Region::from_circle(&Circle2::new(observer.position, radius), sides);
            region.intersection(&disc)
        }
    }
}
