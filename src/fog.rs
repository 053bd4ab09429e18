//! Fog synthesis: turning visible regions into store mutations.
//!
//! Each pass yields one visible region per observer. Regions are
//! deduplicated by content digest and persisted as fog items, and, when
//! fog-of-war mode is on, the complement of their union becomes the overlay.
//! The resulting [`FogPlan`] is applied in a fixed order: additions, then
//! the overlay operation, then deletions, so a redraw never shows an empty
//! scene in between.

use crate::bounds::MapBounds;
use crate::error::StoreError;
use crate::polygon::Region;
use crate::scene::{
    keys, FillRule, Item, ItemContent, ItemId, ItemUpdate, Layer, PathStyle,
    SceneStore, SceneView, UpdateMode,
};
use serde_json::json;
use std::collections::HashSet;
use tracing::debug;

/// Id of the fog-of-war overlay item.
pub const OVERLAY_ID: &str = "dynfog-overlay";
/// Name given to persisted visible-region items.
pub const FOG_ITEM_NAME: &str = "Fog of War";
/// Name given to the overlay item.
pub const OVERLAY_NAME: &str = "Fog Overlay";
/// Opacity of the overlay fill.
pub const OVERLAY_OPACITY: f64 = 0.5;

const FOG_ITEM_Z_INDEX: i32 = 3;
const DIGEST_ID_LEN: usize = 16;

/// What happens to the overlay in a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayOp {
    Keep,
    Create(Item),
    Update { update: ItemUpdate, mode: UpdateMode },
    Delete(ItemId),
}

/// Store mutations for one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FogPlan {
    pub additions: Vec<Item>,
    pub overlay: OverlayOp,
    pub deletions: Vec<ItemId>,
}

impl FogPlan {
    /// Builds the plan for a pass that produced `regions`, one per observer
    /// id, already clipped to vision range.
    pub fn synthesize(
        view: &SceneView,
        bounds: &MapBounds,
        regions: &[(ItemId, Region)],
        precision: f64,
    ) -> FogPlan {
        let mut groups: Vec<(String, &Region, Vec<ItemId>)> = Vec::new();
        for (observer, region) in regions {
            let digest = region.digest(precision);
            match groups.iter_mut().find(|(d, _, _)| *d == digest) {
                Some((_, _, owners)) => owners.push(observer.clone()),
                None => groups.push((digest, region, vec![observer.clone()])),
            }
        }

        let existing: HashSet<&str> = view
            .fog_items
            .iter()
            .filter_map(|f| f.digest.as_deref())
            .collect();

        let additions: Vec<Item> = groups
            .iter()
            .filter(|(digest, _, _)| !existing.contains(digest.as_str()))
            .map(|(digest, region, owners)| fog_item(digest, region, owners))
            .collect();

        let current: HashSet<&str> = groups.iter().map(|(d, _, _)| d.as_str()).collect();

        let overlay = if view.settings.fow_enabled {
            let visible = Region::union_all(regions.iter().map(|(_, r)| r));
            let unseen = Region::rect(bounds.rect()).difference(&visible);
            let content = overlay_content(&unseen, &view.settings.fow_color);
            match &view.overlay {
                Some(existing) => OverlayOp::Update {
                    update: ItemUpdate {
                        id: existing.id.clone(),
                        content: Some(content),
                        metadata: None,
                    },
                    mode: if existing.fill_color.as_deref() == Some(view.settings.fow_color.as_str()) {
                        UpdateMode::Fast
                    } else {
                        UpdateMode::Full
                    },
                },
                None => OverlayOp::Create(overlay_item(content)),
            }
        } else {
            match &view.overlay {
                Some(existing) => OverlayOp::Delete(existing.id.clone()),
                None => OverlayOp::Keep,
            }
        };

        let deletions = if view.settings.persistence_enabled {
            Vec::new()
        } else {
            view.fog_items
                .iter()
                .filter(|f| !f.digest.as_deref().is_some_and(|d| current.contains(d)))
                .map(|f| f.id.clone())
                .collect()
        };

        debug!(
            regions = regions.len(),
            distinct = groups.len(),
            added = additions.len(),
            deleted = deletions.len(),
            "fog plan"
        );

        FogPlan {
            additions,
            overlay,
            deletions,
        }
    }

    /// A plan that removes every fog item and the overlay.
    pub fn clear(view: &SceneView) -> FogPlan {
        FogPlan {
            additions: Vec::new(),
            overlay: match &view.overlay {
                Some(existing) => OverlayOp::Delete(existing.id.clone()),
                None => OverlayOp::Keep,
            },
            deletions: view.fog_items.iter().map(|f| f.id.clone()).collect(),
        }
    }

    /// Returns `true` if applying the plan would not touch the store.
    pub fn is_noop(&self) -> bool {
        self.additions.is_empty() && self.overlay == OverlayOp::Keep && self.deletions.is_empty()
    }

    /// Writes the plan: additions, then the overlay, then deletions.
    ///
    /// Steps are not atomic; a failure leaves earlier steps applied.
    pub async fn apply<S>(self, store: &S) -> Result<(), StoreError>
    where
        S: SceneStore + ?Sized,
    {
        if !self.additions.is_empty() {
            store.add_items(self.additions).await?;
        }

        match self.overlay {
            OverlayOp::Keep => {}
            OverlayOp::Create(item) => store.add_items(vec![item]).await?,
            OverlayOp::Update { update, mode } => store.update_items(vec![update], mode).await?,
            OverlayOp::Delete(id) => store.delete_items(vec![id]).await?,
        }

        if !self.deletions.is_empty() {
            store.delete_items(self.deletions).await?;
        }

        Ok(())
    }
}

/// Id of the fog item holding the region with `digest`.
pub fn fog_item_id(digest: &str) -> ItemId {
    let prefix = digest.get(..DIGEST_ID_LEN).unwrap_or(digest);
    ItemId::new(format!("fog-{}", prefix))
}

fn fog_item(digest: &str, region: &Region, owners: &[ItemId]) -> Item {
    let owners: Vec<&str> = owners.iter().map(ItemId::as_str).collect();
    let content = ItemContent::Path {
        commands: region.to_commands(),
        style: PathStyle {
            fill_rule: FillRule::EvenOdd,
            ..PathStyle::default()
        },
    };

    let mut item = Item::new(fog_item_id(digest).0, Layer::Fog, content)
        .with_name(FOG_ITEM_NAME)
        .with_meta(keys::IS_VISION_FOG, true)
        .with_meta(keys::DIGEST, digest)
        .with_meta(keys::OWNERS, json!(owners));
    item.visible = false;
    item.locked = true;
    item.z_index = FOG_ITEM_Z_INDEX;
    item
}

fn overlay_content(unseen: &Region, color: &str) -> ItemContent {
    ItemContent::Path {
        commands: unseen.to_commands(),
        style: PathStyle {
            fill_color: color.to_string(),
            fill_opacity: OVERLAY_OPACITY,
            stroke_color: "#000000".to_string(),
            stroke_width: 0.0,
            fill_rule: FillRule::EvenOdd,
        },
    }
}

fn overlay_item(content: ItemContent) -> Item {
    let mut item = Item::new(OVERLAY_ID, Layer::Drawing, content)
        .with_name(OVERLAY_NAME)
        .with_meta(keys::IS_FOG_OVERLAY, true);
    item.locked = true;
    item
}
