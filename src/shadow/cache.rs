//! Per-observer memo of composed visible regions.

use crate::polygon::Region;
use crate::primitives::Point2;
use crate::scene::ItemId;
use std::collections::HashMap;

/// A cached region and the observer position it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub region: Region,
    pub position: Point2<f64>,
}

/// Visible regions keyed by observer id.
///
/// An entry is usable only while its observer has not moved. Structural
/// changes (map, obstructions, bounds) must clear the whole cache through
/// [`ShadowCache::invalidate_all`]. Regions are stored before range
/// clipping, so range edits reuse them.
#[derive(Debug, Default)]
pub struct ShadowCache {
    entries: HashMap<ItemId, CacheEntry>,
}

impl ShadowCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&CacheEntry> {
        self.entries.get(id)
    }

    /// Returns the cached region if it was computed at exactly `position`.
    pub fn lookup(&self, id: &ItemId, position: Point2<f64>) -> Option<&Region> {
        self.entries
            .get(id)
            .filter(|entry| entry.position == position)
            .map(|entry| &entry.region)
    }

    /// Stores a region, returning the one it supersedes.
    pub fn put(&mut self, id: ItemId, region: Region, position: Point2<f64>) -> Option<Region> {
        self.entries
            .insert(id, CacheEntry { region, position })
            .map(|old| old.region)
    }

    /// Hands every cached region to `disposer`, then empties the cache.
    pub fn invalidate_all<D>(&mut self, mut disposer: D)
    where
        D: FnMut(ItemId, Region),
    {
        for (id, entry) in self.entries.drain() {
            disposer(id, entry.region);
        }
    }

    /// Drops entries whose observer is not in `current`. Returns how many
    /// were dropped.
    pub fn prune<'a, I>(&mut self, current: I) -> usize
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        let keep: std::collections::HashSet<&ItemId> = current.into_iter().collect();
        let before = self.entries.len();
        self.entries.retain(|id, _| keep.contains(id));
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Aabb2;

    fn square(size: f64) -> Region {
        Region::rect(Aabb2::new(Point2::origin(), Point2::new(size, size)))
    }

    #[test]
    fn test_lookup_requires_same_position() {
        let mut cache = ShadowCache::new();
        let id = ItemId::from("hero");
        cache.put(id.clone(), square(1.0), Point2::new(5.0, 5.0));

        assert!(cache.lookup(&id, Point2::new(5.0, 5.0)).is_some());
        assert!(cache.lookup(&id, Point2::new(5.0, 6.0)).is_none());
        assert!(cache.get(&id).is_some());
        assert!(cache.lookup(&ItemId::from("other"), Point2::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_put_returns_superseded() {
        let mut cache = ShadowCache::new();
        let id = ItemId::from("hero");
        assert!(cache.put(id.clone(), square(1.0), Point2::origin()).is_none());
        let old = cache.put(id.clone(), square(2.0), Point2::new(1.0, 0.0)).unwrap();
        assert_eq!(old, square(1.0));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&id).unwrap().region, square(2.0));
    }

    #[test]
    fn test_invalidate_all_disposes_every_entry() {
        let mut cache = ShadowCache::new();
        cache.put(ItemId::from("a"), square(1.0), Point2::origin());
        cache.put(ItemId::from("b"), square(2.0), Point2::origin());

        let mut disposed = Vec::new();
        cache.invalidate_all(|id, _| disposed.push(id));
        disposed.sort();

        assert_eq!(disposed, vec![ItemId::from("a"), ItemId::from("b")]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_prune_keeps_current_observers() {
        let mut cache = ShadowCache::new();
        cache.put(ItemId::from("a"), square(1.0), Point2::origin());
        cache.put(ItemId::from("b"), square(1.0), Point2::origin());
        cache.put(ItemId::from("c"), square(1.0), Point2::origin());

        let current = [ItemId::from("b")];
        assert_eq!(cache.prune(current.iter()), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&ItemId::from("b")).is_some());
    }
}
