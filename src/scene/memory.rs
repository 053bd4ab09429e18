//! In-memory scene store for tests, benches and demos.

use super::item::{Item, ItemId, Metadata};
use super::store::{Grid, ItemUpdate, SceneSnapshot, SceneStore, UpdateMode};
use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::RwLock;

/// A write the store received, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Added(Vec<ItemId>),
    Updated(Vec<ItemId>, UpdateMode),
    Deleted(Vec<ItemId>),
}

#[derive(Debug, Default)]
struct Inner {
    ready: bool,
    snapshot: SceneSnapshot,
    log: Vec<Mutation>,
}

/// In-memory [`SceneStore`].
///
/// Updates and deletes naming unknown items fail with
/// [`StoreError::UnknownItem`] without applying any part of the batch.
#[derive(Debug)]
pub struct MemoryScene {
    inner: RwLock<Inner>,
}

impl MemoryScene {
    /// Creates an empty, ready scene.
    pub fn new(grid: Grid) -> Self {
        Self {
            inner: RwLock::new(Inner {
                ready: true,
                snapshot: SceneSnapshot {
                    grid,
                    ..SceneSnapshot::default()
                },
                log: Vec::new(),
            }),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|e| StoreError::Backend(format!("lock: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|e| StoreError::Backend(format!("lock: {}", e)))
    }

    pub fn set_ready(&self, ready: bool) -> Result<(), StoreError> {
        self.write()?.ready = ready;
        Ok(())
    }

    /// Sets a scene metadata value. `Value::Null` removes the key.
    pub fn set_metadata(&self, key: &str, value: impl Into<Value>) -> Result<(), StoreError> {
        let value = value.into();
        let mut inner = self.write()?;
        if value.is_null() {
            inner.snapshot.metadata.remove(key);
        } else {
            inner.snapshot.metadata.insert(key.to_string(), value);
        }
        Ok(())
    }

    pub fn set_grid(&self, grid: Grid) -> Result<(), StoreError> {
        self.write()?.snapshot.grid = grid;
        Ok(())
    }

    /// Inserts or replaces an item without logging a mutation.
    pub fn put_item(&self, item: Item) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        upsert(&mut inner.snapshot.items, item);
        Ok(())
    }

    /// Applies `edit` to an item in place without logging a mutation.
    pub fn edit_item<F>(&self, id: &ItemId, edit: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Item),
    {
        let mut inner = self.write()?;
        let item = inner
            .snapshot
            .items
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| StoreError::UnknownItem(id.to_string()))?;
        edit(item);
        Ok(())
    }

    pub fn item(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.read()?.snapshot.items.iter().find(|i| &i.id == id).cloned())
    }

    pub fn items(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.read()?.snapshot.items.clone())
    }

    pub fn metadata(&self) -> Result<Metadata, StoreError> {
        Ok(self.read()?.snapshot.metadata.clone())
    }

    /// Writes received through [`SceneStore`] since the last call.
    pub fn take_mutations(&self) -> Result<Vec<Mutation>, StoreError> {
        Ok(std::mem::take(&mut self.write()?.log))
    }
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new(Grid::default())
    }
}

#[async_trait]
impl SceneStore for MemoryScene {
    async fn is_ready(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.ready)
    }

    async fn snapshot(&self) -> Result<SceneSnapshot, StoreError> {
        let inner = self.read()?;
        if !inner.ready {
            return Err(StoreError::NotReady);
        }
        Ok(inner.snapshot.clone())
    }

    async fn add_items(&self, items: Vec<Item>) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let ids = items.iter().map(|i| i.id.clone()).collect();
        for item in items {
            upsert(&mut inner.snapshot.items, item);
        }
        inner.log.push(Mutation::Added(ids));
        Ok(())
    }

    async fn update_items(
        &self,
        updates: Vec<ItemUpdate>,
        mode: UpdateMode,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if let Some(missing) = updates
            .iter()
            .find(|u| !inner.snapshot.items.iter().any(|i| i.id == u.id))
        {
            return Err(StoreError::UnknownItem(missing.id.to_string()));
        }

        let ids = updates.iter().map(|u| u.id.clone()).collect();
        for update in updates {
            if let Some(item) = inner.snapshot.items.iter_mut().find(|i| i.id == update.id) {
                if let Some(content) = update.content {
                    item.content = content;
                }
                if let Some(metadata) = update.metadata {
                    item.metadata = metadata;
                }
            }
        }
        inner.log.push(Mutation::Updated(ids, mode));
        Ok(())
    }

    async fn delete_items(&self, ids: Vec<ItemId>) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if let Some(missing) = ids
            .iter()
            .find(|id| !inner.snapshot.items.iter().any(|i| &i.id == *id))
        {
            return Err(StoreError::UnknownItem(missing.to_string()));
        }

        inner.snapshot.items.retain(|i| !ids.contains(&i.id));
        inner.log.push(Mutation::Deleted(ids));
        Ok(())
    }
}

fn upsert(items: &mut Vec<Item>, item: Item) {
    match items.iter().position(|i| i.id == item.id) {
        Some(idx) => items[idx] = item,
        None => items.push(item),
    }
}
