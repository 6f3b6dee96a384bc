//! Keyed singleton cache for collection instances

use super::collection::{Collection, CollectionOptions};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::hash::BuildHasherDefault;
use std::sync::Arc;
use tokio::sync::OnceCell;
use xxhash_rust::xxh3::Xxh3;

/// Cache-entry identity of a collection request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub class_name: String,
    /// Canonical signature of the persistence config
    pub persistence: String,
    pub has_database: bool,
    pub has_ai: bool,
}

impl CacheKey {
    pub fn new(class_name: &str, options: &CollectionOptions) -> Self {
        Self {
            class_name: class_name.to_string(),
            persistence: options.persistence.signature(),
            has_database: options.database.is_some(),
            has_ai: options.ai.is_some(),
        }
    }
}

type Slot = Arc<OnceCell<Arc<dyn Collection>>>;

type SlotMap = HashMap<CacheKey, Slot, BuildHasherDefault<Xxh3>>;

/// At most one live collection per key.
///
/// Each key owns a slot that is initialized once; concurrent requests for an
/// uncached key await the same in-flight construction. A failed construction
/// leaves the slot empty and the next request retries.
#[derive(Default)]
pub struct CollectionCache {
    slots: Mutex<SlotMap>,
}

impl CollectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached collection for `key`, building it with `build` on a miss
    pub async fn get_or_create<F, Fut>(&self, key: CacheKey, build: F) -> anyhow::Result<Arc<dyn Collection>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Arc<dyn Collection>>>,
    {
        let slot = {
            let mut slots = self.slots.lock();
            slots.entry(key.clone()).or_default().clone()
        };

        if let Some(collection) = slot.get() {
            tracing::debug!(class = %key.class_name, "Collection cache hit");
            return Ok(collection.clone());
        }

        match slot.get_or_try_init(build).await {
            Ok(collection) => Ok(collection.clone()),
            Err(err) => {
                self.discard_failed(&key, &slot);
                Err(err)
            }
        }
    }

    /// Drop an empty slot left by a failed construction.
    ///
    /// Kept while another request still holds it: that request retries the
    /// construction on the same slot.
    fn discard_failed(&self, key: &CacheKey, slot: &Slot) {
        let mut slots = self.slots.lock();
        let unused = !slot.initialized() && Arc::strong_count(slot) == 2;
        if unused && slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.remove(key);
        }
    }

    /// Cached collection for `key`, if constructed
    pub fn get(&self, key: &CacheKey) -> Option<Arc<dyn Collection>> {
        self.slots.lock().get(key).and_then(|slot| slot.get().cloned())
    }

    /// Number of constructed collections
    pub fn len(&self) -> usize {
        self.slots.lock().values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached collection
    pub fn clear(&self) {
        self.slots.lock().clear();
    }
}
