//! Shared, process-wide content cache.
//!
//! The renderer publishes in-memory content here and the delivery endpoint
//! reads it back; the minify transform memoizes its output here. The cache
//! is handed to every consumer explicitly as a [`CachePort`].
//!
//! Inserts are idempotent per key: an entry that is still fresh is never
//! overwritten, and the check-then-insert runs under the key's shard lock.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::asset::AssetKind;
use crate::reader::{InvalidationPolicy, PolicySnapshot};
use crate::utils::hash::ContentHash;

/// Processed content published for indirect delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedContent {
    pub content: Arc<str>,
    pub kind: AssetKind,
}

impl CachedContent {
    pub fn new(content: Arc<str>, kind: AssetKind) -> Self {
        Self { content, kind }
    }

    pub const fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }
}

/// Keyed cache with per-entry invalidation.
pub trait CachePort<V>: Send + Sync {
    /// Fresh value for `key`, if any.
    fn get(&self, key: &ContentHash) -> Option<V>;

    fn contains(&self, key: &ContentHash) -> bool;

    /// Insert unless a fresh entry already exists. Returns whether the value
    /// was stored.
    fn insert(&self, key: ContentHash, value: V, policy: &InvalidationPolicy) -> bool;
}

struct CacheEntry<V> {
    value: V,
    snapshot: PolicySnapshot,
}

/// Stored inserts between two sweeps of stale entries.
const PURGE_INTERVAL: usize = 64;

/// In-process [`CachePort`] backed by a sharded concurrent map.
///
/// Stale entries are swept every [`PURGE_INTERVAL`] stored inserts, so
/// expired or invalidated content does not stay resident.
pub struct MemoryCache<V> {
    entries: DashMap<ContentHash, CacheEntry<V>>,
    inserts: AtomicUsize,
}

impl<V> MemoryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            inserts: AtomicUsize::new(0),
        }
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every stale entry.
    pub fn purge_stale(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.snapshot.is_stale());
        before.saturating_sub(self.entries.len())
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> CachePort<V> for MemoryCache<V> {
    fn get(&self, key: &ContentHash) -> Option<V> {
        let entry = self.entries.get(key)?;
        (!entry.snapshot.is_stale()).then(|| entry.value.clone())
    }

    fn contains(&self, key: &ContentHash) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.snapshot.is_stale())
    }

    fn insert(&self, key: ContentHash, value: V, policy: &InvalidationPolicy) -> bool {
        let fresh = CacheEntry {
            value,
            snapshot: policy.snapshot(),
        };
        let stored = match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().snapshot.is_stale() {
                    occupied.insert(fresh);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                true
            }
        };

        // the shard lock is released here; retain takes every shard
        if stored && (self.inserts.fetch_add(1, Ordering::Relaxed) + 1) % PURGE_INTERVAL == 0 {
            self.purge_stale();
        }
        stored
    }
}

/// Cache shared between renderers and the delivery endpoint.
pub type ContentCache = Arc<dyn CachePort<CachedContent>>;
