//! Typed, per-pass view of a scene snapshot.
//!
//! Raw items are classified once per pass. Everything downstream works on
//! the typed observers, obstructions and fog records built here instead of
//! probing metadata keys again.

use super::item::{keys, Item, ItemContent, ItemId, Layer};
use super::settings::SceneSettings;
use super::store::{Grid, SceneSnapshot};
use crate::bounds::{Aabb2, MapBounds};
use crate::detect::SnapshotKeys;
use crate::error::VisionError;
use crate::polygon::Polygon;
use crate::primitives::{Point2, Segment2, Vec2};
use crate::shadow::{ObstructionSegment, OneSided};
use serde_json::Value;

/// Largest accepted vision range, in distance units.
pub const MAX_VISION_RANGE: f64 = 999.0;

/// How far an observer sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisionRange {
    /// Range in distance units.
    Limited(f64),
    Unlimited,
}

impl VisionRange {
    /// Parses the `visionRange` metadata value.
    ///
    /// A positive number (or numeric string) is a limited range clamped to
    /// [`MAX_VISION_RANGE`]; `false`, `0`, absence or anything else is
    /// unlimited.
    pub fn from_meta(value: Option<&Value>) -> Self {
        let range = match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match range {
            Some(r) if r.is_finite() && r > 0.0 => VisionRange::Limited(r.min(MAX_VISION_RANGE)),
            _ => VisionRange::Unlimited,
        }
    }
}

/// A character that sees.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    pub id: ItemId,
    pub position: Point2<f64>,
    pub vision_range: VisionRange,
}

/// An active obstruction shape exploded into map-space segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstruction {
    pub id: ItemId,
    pub segments: Vec<ObstructionSegment>,
    /// Interior of a closed shape.
    pub interior: Option<Polygon<f64>>,
}

/// A persisted visible-region record.
#[derive(Debug, Clone, PartialEq)]
pub struct FogRecord {
    pub id: ItemId,
    pub digest: Option<String>,
    pub owners: Vec<ItemId>,
}

/// The persisted fog-of-war overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRecord {
    pub id: ItemId,
    pub fill_color: Option<String>,
}

/// What an item means to a visibility pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Obstruction { one_sided: OneSided, closed: bool },
    Observer { vision_range: VisionRange },
    BackgroundImage,
    MapImage,
    FogItem { digest: Option<String>, owners: Vec<ItemId> },
    FogOverlay,
    Other,
}

/// Classifies one raw item.
///
/// Item flags follow loose truthiness (any value other than absent, `null`,
/// `false`, `0` or `""` sets them), unlike scene switches which must be
/// exactly `true`.
pub fn classify(item: &Item) -> ItemKind {
    if item.truthy(keys::IS_FOG_OVERLAY) {
        return ItemKind::FogOverlay;
    }
    if item.truthy(keys::IS_VISION_FOG) {
        return ItemKind::FogItem {
            digest: item.meta(keys::DIGEST).and_then(Value::as_str).map(str::to_string),
            owners: item
                .meta(keys::OWNERS)
                .and_then(Value::as_array)
                .map(|ids| ids.iter().filter_map(Value::as_str).map(ItemId::from).collect())
                .unwrap_or_default(),
        };
    }

    match (&item.layer, &item.content) {
        (_, ItemContent::Shape { closed, .. })
            if item.truthy(keys::IS_VISION_LINE) && !item.truthy(keys::DISABLED) =>
        {
            ItemKind::Obstruction {
                one_sided: OneSided::from_meta(item.meta(keys::ONE_SIDED)),
                closed: *closed != Some(false),
            }
        }
        (Layer::Character, _) if item.truthy(keys::HAS_VISION) => ItemKind::Observer {
            vision_range: VisionRange::from_meta(item.meta(keys::VISION_RANGE)),
        },
        (Layer::Map, ItemContent::Image { .. }) if item.truthy(keys::IS_BACKGROUND_IMAGE) => {
            ItemKind::BackgroundImage
        }
        (Layer::Map, ItemContent::Image { .. }) => ItemKind::MapImage,
        _ => ItemKind::Other,
    }
}

/// Everything one pass needs, derived from a [`SceneSnapshot`].
#[derive(Debug, Clone)]
pub struct SceneView {
    pub settings: SceneSettings,
    pub grid: Grid,
    pub observers: Vec<Observer>,
    pub obstructions: Vec<Obstruction>,
    /// The flagged background image, or the largest map image when none is
    /// flagged.
    pub background: Option<Item>,
    /// Map rectangle for this pass; `None` when there is no map to see.
    pub bounds: Option<MapBounds>,
    pub fog_items: Vec<FogRecord>,
    pub overlay: Option<OverlayRecord>,
    pub keys: SnapshotKeys,
}

impl SceneView {
    /// Classifies every item of `snapshot` and resolves the map bounds.
    ///
    /// `eps` is the closeness tolerance used to drop zero-length segments
    /// and duplicate closing points.
    pub fn from_snapshot(snapshot: &SceneSnapshot, eps: f64) -> Result<Self, VisionError> {
        let settings = SceneSettings::from_metadata(&snapshot.metadata);
        let grid = snapshot.grid;

        let mut observers = Vec::new();
        let mut observer_items = Vec::new();
        let mut obstructions = Vec::new();
        let mut obstruction_items = Vec::new();
        let mut flagged_background = None;
        let mut map_images = Vec::new();
        let mut fog_items = Vec::new();
        let mut overlay = None;

        for item in &snapshot.items {
            match classify(item) {
                ItemKind::Observer { vision_range } => {
                    observers.push(Observer {
                        id: item.id.clone(),
                        position: item.position,
                        vision_range,
                    });
                    observer_items.push(item);
                }
                ItemKind::Obstruction { one_sided, closed } => {
                    obstructions.push(explode(item, one_sided, closed, eps));
                    obstruction_items.push(item);
                }
                ItemKind::BackgroundImage => {
                    if flagged_background.is_none() {
                        flagged_background = Some(item);
                    }
                    map_images.push(item);
                }
                ItemKind::MapImage => map_images.push(item),
                ItemKind::FogItem { digest, owners } => fog_items.push(FogRecord {
                    id: item.id.clone(),
                    digest,
                    owners,
                }),
                ItemKind::FogOverlay => {
                    if overlay.is_none() {
                        overlay = Some(OverlayRecord {
                            id: item.id.clone(),
                            fill_color: match &item.content {
                                ItemContent::Path { style, .. } => Some(style.fill_color.clone()),
                                _ => None,
                            },
                        });
                    }
                }
                ItemKind::Other => {}
            }
        }

        let background = flagged_background
            .or_else(|| largest_image(&map_images))
            .cloned();

        let bounds = if settings.autodetect_enabled {
            autodetect_bounds(&map_images, &grid)
        } else {
            background.as_ref().and_then(|bg| background_bounds(bg, &grid))
        };

        let keys = SnapshotKeys {
            map: background.as_ref().map(serde_json::to_string).transpose()?,
            settings: settings.clone(),
            obstructions: serde_json::to_string(&obstruction_items)?,
            observers: serde_json::to_string(&observer_items)?,
            bounds,
        };

        Ok(Self {
            settings,
            grid,
            observers,
            obstructions,
            background,
            bounds,
            fog_items,
            overlay,
            keys,
        })
    }

    /// All obstruction segments of the pass.
    pub fn segments(&self) -> impl Iterator<Item = &ObstructionSegment> {
        self.obstructions.iter().flat_map(|o| o.segments.iter())
    }
}

/// Explodes an obstruction shape into map-space segments.
///
/// Consecutive points form segments. A closed shape whose last point does
/// not repeat the first also gets the closing segment, and contributes its
/// interior.
fn explode(item: &Item, one_sided: OneSided, closed: bool, eps: f64) -> Obstruction {
    let points: Vec<Point2<f64>> = match &item.content {
        ItemContent::Shape { points, .. } => points
            .iter()
            .map(|p| p.scale_translate(item.scale, item.position))
            .collect(),
        _ => Vec::new(),
    };

    let mut segments: Vec<ObstructionSegment> = points
        .windows(2)
        .map(|w| ObstructionSegment {
            segment: Segment2::new(w[0], w[1]),
            one_sided,
            shape: item.id.clone(),
        })
        .collect();

    let mut interior = None;
    if closed && points.len() >= 3 {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if !first.approx_eq(last, eps) {
                segments.push(ObstructionSegment {
                    segment: Segment2::new(last, first),
                    one_sided,
                    shape: item.id.clone(),
                });
            }
        }
        let polygon = Polygon::new(points).deduplicated(eps);
        if polygon.is_proper(eps) {
            interior = Some(polygon);
        }
    }

    Obstruction {
        id: item.id.clone(),
        segments,
        interior,
    }
}

fn image_size(item: &Item, grid: &Grid) -> Option<Vec2<f64>> {
    match item.content {
        ItemContent::Image { width, height, dpi } if dpi > 0.0 => {
            let ratio = grid.dpi / dpi;
            Some(Vec2::new(width * ratio, height * ratio))
        }
        _ => None,
    }
}

/// The map image covering the most grid cells.
fn largest_image<'a>(images: &[&'a Item]) -> Option<&'a Item> {
    images
        .iter()
        .filter_map(|item| match item.content {
            ItemContent::Image { width, height, dpi } if dpi > 0.0 => {
                Some((*item, width * height / (dpi * dpi)))
            }
            _ => None,
        })
        .fold(None::<(&'a Item, f64)>, |best, (item, cells)| match best {
            Some((_, best_cells)) if best_cells >= cells => best,
            _ => Some((item, cells)),
        })
        .map(|(item, _)| item)
}

fn background_bounds(background: &Item, grid: &Grid) -> Option<MapBounds> {
    let size = image_size(background, grid)?;
    let bounds = MapBounds::new(background.position, size, background.scale);
    bounds.is_valid().then_some(bounds)
}

/// Union of the extents of every map image, at unit scale.
fn autodetect_bounds(images: &[&Item], grid: &Grid) -> Option<MapBounds> {
    let rect = images
        .iter()
        .filter_map(|item| {
            let size = image_size(item, grid)?;
            let min = item.position;
            let max = Point2::new(
                min.x + size.x * item.scale.x,
                min.y + size.y * item.scale.y,
            );
            Some(Aabb2::from_corners(min, max))
        })
        .reduce(Aabb2::union)?;

    let bounds = MapBounds::from_rect(rect);
    bounds.is_valid().then_some(bounds)
}
