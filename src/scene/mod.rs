//! Scene model: raw items, settings, the store interface and the typed
//! per-pass view.

mod item;
mod memory;
mod settings;
mod store;
mod view;

pub use item::{is_true, keys, FillRule, Item, ItemContent, ItemId, Layer, Metadata, PathStyle};
pub use memory::{MemoryScene, Mutation};
pub use settings::{SceneSettings, DEFAULT_FOW_COLOR};
pub use store::{Grid, ItemUpdate, SceneEvent, SceneSnapshot, SceneStore, UpdateMode};
pub use view::{
    classify, FogRecord, ItemKind, Observer, Obstruction, OverlayRecord, SceneView, VisionRange,
    MAX_VISION_RANGE,
};
