use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Weak};

use crate::renderer::device::RenderDevice;
use crate::renderer::gpu_texture::GpuTexture;

/// Outcome of a cache lookup.
pub enum CacheLookup<T> {
    Hit(Arc<T>),
    /// The entry existed but its resource was dropped; it has been erased.
    Stale,
    Miss,
}

/// Thread-safe key to weak-resource table.
///
/// Entries never keep a resource alive: once the last model referencing a
/// resource is dropped, the next lookup finds a stale entry and erases it.
/// The lock is held only for lookup, insert and erase, never while a
/// resource is decoded or created.
pub struct ResourceCache<T> {
    entries: Mutex<FxHashMap<String, Weak<T>>>,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResourceCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn lookup(&self, key: &str) -> CacheLookup<T> {
        let mut entries = self.entries.lock();
        let Some(weak) = entries.get(key) else {
            return CacheLookup::Miss;
        };
        if let Some(resource) = weak.upgrade() {
            return CacheLookup::Hit(resource);
        }
        entries.remove(key);
        log::debug!("Evicted stale cache entry '{key}'");
        CacheLookup::Stale
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        match self.lookup(key) {
            CacheLookup::Hit(resource) => Some(resource),
            CacheLookup::Stale | CacheLookup::Miss => None,
        }
    }

    /// Inserts `candidate` under `key` unless a live resource is already
    /// there, and returns whichever resource the key now maps to.
    ///
    /// Two threads that both missed and both created a resource for the same
    /// key end up sharing the first one published.
    pub fn publish(&self, key: &str, candidate: Arc<T>) -> Arc<T> {
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(key).and_then(Weak::upgrade) {
            log::debug!("Cache entry '{key}' was published concurrently; adopting it");
            return existing;
        }
        entries.insert(key.to_string(), Arc::downgrade(&candidate));
        candidate
    }

    /// Number of entries, live or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Erases every entry whose resource has been dropped.
    pub fn purge_stale(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, weak| weak.strong_count() > 0);
        before - entries.len()
    }
}

/// Cache of standalone textures shared between models.
pub type TextureCache<D> = ResourceCache<GpuTexture<D>>;

impl<D: RenderDevice> TextureCache<D> {
    /// Creates a cache ready to be shared through [`ModelCreateInfo`](crate::assets::ModelCreateInfo).
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}
