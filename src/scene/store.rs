//! The host scene store the engine reads from and writes to.

use super::item::{Item, ItemContent, ItemId, Metadata};
use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Grid configuration of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Pixels per grid cell.
    pub dpi: f64,
    /// Distance units per grid cell.
    pub scale: f64,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            dpi: 150.0,
            scale: 5.0,
        }
    }
}

/// Everything a pass reads from the store, captured at one point in time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub items: Vec<Item>,
    pub metadata: Metadata,
    pub grid: Grid,
}

/// How an item update should be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Geometry-only change; the store may skip re-validation.
    Fast,
    /// Any other change.
    Full,
}

/// A partial replacement of an existing item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub id: ItemId,
    pub content: Option<ItemContent>,
    pub metadata: Option<Metadata>,
}

/// Notifications from the host that may warrant a new pass.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    ItemsChanged,
    MetadataChanged,
    GridChanged,
    ReadyChanged(bool),
    /// Wipe all fog and recompute from scratch.
    ResetRequested,
}

/// Async access to the host scene graph.
///
/// Calls are awaited one at a time by a pass; implementations need not
/// order concurrent callers.
#[async_trait]
pub trait SceneStore: Send + Sync {
    /// Returns `false` while the scene is loading or switching.
    async fn is_ready(&self) -> Result<bool, StoreError>;

    /// Reads items, scene metadata and grid.
    async fn snapshot(&self) -> Result<SceneSnapshot, StoreError>;

    async fn add_items(&self, items: Vec<Item>) -> Result<(), StoreError>;

    /// Stores without a fast path treat [`UpdateMode::Fast`] as
    /// [`UpdateMode::Full`].
    async fn update_items(
        &self,
        updates: Vec<ItemUpdate>,
        mode: UpdateMode,
    ) -> Result<(), StoreError>;

    async fn delete_items(&self, ids: Vec<ItemId>) -> Result<(), StoreError>;
}
