//! Raw scene items as the host store holds them.

use crate::io::PathCommand;
use crate::primitives::{Point2, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed JSON metadata attached to items and to the scene.
pub type Metadata = BTreeMap<String, Value>;

/// Metadata keys, namespaced under `dynfog/`.
pub mod keys {
    /// Character is an observer.
    pub const HAS_VISION: &str = "dynfog/hasVision";
    /// Observer range in distance units, or `false` for unlimited.
    pub const VISION_RANGE: &str = "dynfog/visionRange";
    /// Shape is an obstruction.
    pub const IS_VISION_LINE: &str = "dynfog/isVisionLine";
    /// Obstruction is switched off.
    pub const DISABLED: &str = "dynfog/disabled";
    /// `"left"` or `"right"`.
    pub const ONE_SIDED: &str = "dynfog/oneSided";
    /// Map image chosen as the background.
    pub const IS_BACKGROUND_IMAGE: &str = "dynfog/isBackgroundImage";
    /// Item is a persisted visible-region record.
    pub const IS_VISION_FOG: &str = "dynfog/isVisionFog";
    /// Item is the fog-of-war overlay.
    pub const IS_FOG_OVERLAY: &str = "dynfog/isFogOverlay";
    /// Content digest of a visible-region record.
    pub const DIGEST: &str = "dynfog/digest";
    /// Observer ids that produced a visible-region record.
    pub const OWNERS: &str = "dynfog/owners";

    pub const VISION_ENABLED: &str = "dynfog/visionEnabled";
    pub const AUTODETECT_ENABLED: &str = "dynfog/autodetectEnabled";
    pub const PERSISTENCE_ENABLED: &str = "dynfog/persistenceEnabled";
    pub const FOW_ENABLED: &str = "dynfog/fowEnabled";
    pub const FOW_COLOR: &str = "dynfog/fowColor";
}

/// Opaque identifier of a scene item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Scene layer an item lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Layer {
    Map,
    Character,
    Drawing,
    Fog,
    Other,
}

/// Fill rule for path items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Presentation of a path item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub fill_rule: FillRule,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            fill_color: "#000000".to_string(),
            fill_opacity: 1.0,
            stroke_color: "#000000".to_string(),
            stroke_width: 0.0,
            fill_rule: FillRule::NonZero,
        }
    }
}

/// What an item draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemContent {
    /// A raster image, `width` x `height` pixels at `dpi` pixels per grid cell.
    Image { width: f64, height: f64, dpi: f64 },
    /// A polyline in item-local coordinates. Closed unless `closed` is
    /// explicitly `false`.
    Shape {
        points: Vec<Point2<f64>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        closed: Option<bool>,
    },
    /// Vector path in map coordinates.
    Path {
        commands: Vec<PathCommand>,
        style: PathStyle,
    },
    Empty,
}

/// A scene item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub layer: Layer,
    pub position: Point2<f64>,
    pub scale: Vec2<f64>,
    pub visible: bool,
    pub locked: bool,
    pub z_index: i32,
    pub metadata: Metadata,
    pub content: ItemContent,
}

impl Item {
    /// Creates a visible, unlocked item at the origin with unit scale.
    pub fn new(id: impl Into<String>, layer: Layer, content: ItemContent) -> Self {
        Self {
            id: ItemId::new(id),
            name: String::new(),
            layer,
            position: Point2::origin(),
            scale: Vec2::one(),
            visible: true,
            locked: false,
            z_index: 0,
            metadata: Metadata::new(),
            content,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Point2::new(x, y);
        self
    }

    pub fn with_scale(mut self, sx: f64, sy: f64) -> Self {
        self.scale = Vec2::new(sx, sy);
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Returns the metadata value under `key`.
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Returns `true` only if `key` holds JSON `true`.
    pub fn flag(&self, key: &str) -> bool {
        is_true(self.metadata.get(key))
    }

    /// Returns `true` if `key` holds anything truthy (not absent, `null`,
    /// `false`, `0` or `""`).
    pub fn truthy(&self, key: &str) -> bool {
        match self.metadata.get(key) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

/// Returns `true` only for JSON `true`.
pub fn is_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flag_requires_true() {
        let item = Item::new("a", Layer::Character, ItemContent::Empty)
            .with_meta(keys::HAS_VISION, true)
            .with_meta(keys::DISABLED, "yes");
        assert!(item.flag(keys::HAS_VISION));
        assert!(!item.flag(keys::DISABLED));
        assert!(item.truthy(keys::DISABLED));
        assert!(!item.flag(keys::IS_VISION_LINE));
    }

    #[test]
    fn test_truthy() {
        let item = Item::new("a", Layer::Drawing, ItemContent::Empty)
            .with_meta("zero", 0)
            .with_meta("one", 1)
            .with_meta("empty", "")
            .with_meta("null", Value::Null)
            .with_meta("obj", json!({}));
        assert!(!item.truthy("zero"));
        assert!(item.truthy("one"));
        assert!(!item.truthy("empty"));
        assert!(!item.truthy("null"));
        assert!(item.truthy("obj"));
        assert!(!item.truthy("missing"));
    }

    #[test]
    fn test_item_serializes_content_tag() {
        let item = Item::new(
            "wall",
            Layer::Drawing,
            ItemContent::Shape {
                points: vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)],
                closed: Some(false),
            },
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["layer"], "DRAWING");
        assert_eq!(json["content"]["type"], "shape");
        assert_eq!(json["content"]["closed"], false);

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
