//! Cached views and their invalidation.
//!
//! Each tag carries a generation that `invalidate` bumps. A reader takes the
//! generation before it queries and hands it back to `put`; a view built
//! from rows read before an invalidation is dropped instead of cached.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Views kept per tag before the oldest is evicted.
pub const DEFAULT_VIEWS_PER_TAG: usize = 128;

/// Logical key of a cached view, e.g. the invoice list path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CacheTag(String);

impl CacheTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CacheTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store of rendered views, grouped by tag.
///
/// `invalidate` is fire-and-forget: callers do not wait for, or learn about,
/// propagation to other readers.
pub trait ViewCache: Send + Sync {
    fn get(&self, tag: &CacheTag, key: &str) -> Option<serde_json::Value>;

    /// Current generation of `tag`. Take it before reading the rows a view
    /// is built from.
    fn generation(&self, tag: &CacheTag) -> u64;

    /// Cache `view` unless `tag` was invalidated since `generation` was taken.
    /// Returns whether the view was stored.
    fn put(&self, tag: &CacheTag, generation: u64, key: String, view: serde_json::Value) -> bool;

    /// Drop every view cached under `tag` and start a new generation.
    fn invalidate(&self, tag: &CacheTag);
}

#[derive(Debug, Default)]
struct TagViews {
    generation: u64,
    views: HashMap<String, serde_json::Value>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
}

/// Process-local view cache with a bounded number of views per tag.
#[derive(Debug)]
pub struct InMemoryViewCache {
    tags: RwLock<HashMap<CacheTag, TagViews>>,
    views_per_tag: usize,
    invalidations: AtomicU64,
}

impl Default for InMemoryViewCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_VIEWS_PER_TAG)
    }
}

impl InMemoryViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `views_per_tag` views under any one tag (minimum 1).
    pub fn with_capacity(views_per_tag: usize) -> Self {
        Self {
            tags: RwLock::new(HashMap::new()),
            views_per_tag: views_per_tag.max(1),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Number of `invalidate` calls seen so far.
    pub fn invalidation_count(&self) -> u64 {
        self.invalidations.load(Ordering::SeqCst)
    }

    pub fn cached_views(&self, tag: &CacheTag) -> usize {
        self.tags
            .read()
            .map(|t| t.get(tag).map_or(0, |entry| entry.views.len()))
            .unwrap_or(0)
    }
}

impl ViewCache for InMemoryViewCache {
    fn get(&self, tag: &CacheTag, key: &str) -> Option<serde_json::Value> {
        self.tags.read().ok()?.get(tag)?.views.get(key).cloned()
    }

    fn generation(&self, tag: &CacheTag) -> u64 {
        self.tags
            .read()
            .map(|t| t.get(tag).map_or(0, |entry| entry.generation))
            .unwrap_or(0)
    }

    fn put(&self, tag: &CacheTag, generation: u64, key: String, view: serde_json::Value) -> bool {
        let Ok(mut tags) = self.tags.write() else {
            return false;
        };
        let entry = tags.entry(tag.clone()).or_default();
        if entry.generation != generation {
            tracing::debug!(tag = %tag, key = %key, "dropping view built before invalidation");
            return false;
        }

        if entry.views.insert(key.clone(), view).is_none() {
            entry.order.push_back(key);
            while entry.views.len() > self.views_per_tag {
                match entry.order.pop_front() {
                    Some(oldest) => {
                        entry.views.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        true
    }

    fn invalidate(&self, tag: &CacheTag) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut tags) = self.tags.write() {
            let entry = tags.entry(tag.clone()).or_default();
            entry.generation += 1;
            entry.views.clear();
            entry.order.clear();
        }
        tracing::debug!(tag = %tag, "view cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidate_drops_only_the_tagged_views() {
        let cache = InMemoryViewCache::new();
        let invoices = CacheTag::new("/dashboard/invoices");
        let sellers = CacheTag::new("/dashboard/sellers");

        let generation = cache.generation(&invoices);
        assert!(cache.put(&invoices, generation, "page=1".into(), serde_json::json!({"rows": 1})));
        assert!(cache.put(&invoices, generation, "page=2".into(), serde_json::json!({"rows": 2})));
        cache.put(&sellers, cache.generation(&sellers), "".into(), serde_json::json!([]));
        assert_eq!(cache.cached_views(&invoices), 2);

        cache.invalidate(&invoices);

        assert_eq!(cache.get(&invoices, "page=1"), None);
        assert_eq!(cache.cached_views(&invoices), 0);
        assert_eq!(cache.get(&sellers, ""), Some(serde_json::json!([])));
        assert_eq!(cache.invalidation_count(), 1);
    }

    #[test]
    fn invalidating_an_empty_tag_still_counts() {
        let cache = InMemoryViewCache::new();
        cache.invalidate(&CacheTag::new("/nothing"));
        assert_eq!(cache.invalidation_count(), 1);
    }

    #[test]
    fn views_read_before_an_invalidation_are_not_cached() {
        let cache = InMemoryViewCache::new();
        let tag = CacheTag::new("/dashboard/invoices");

        let before = cache.generation(&tag);
        cache.invalidate(&tag);

        assert!(!cache.put(&tag, before, "page=1".into(), serde_json::json!({"stale": true})));
        assert_eq!(cache.get(&tag, "page=1"), None);

        let after = cache.generation(&tag);
        assert!(after > before);
        assert!(cache.put(&tag, after, "page=1".into(), serde_json::json!({"stale": false})));
        assert_eq!(cache.get(&tag, "page=1"), Some(serde_json::json!({"stale": false})));
    }

    #[test]
    fn views_per_tag_stay_bounded() {
        let cache = InMemoryViewCache::with_capacity(3);
        let tag = CacheTag::new("/dashboard/invoices");
        let generation = cache.generation(&tag);

        for i in 0..1_000 {
            cache.put(&tag, generation, format!("query={i}&page=1"), serde_json::json!(i));
        }

        assert_eq!(cache.cached_views(&tag), 3);
        assert_eq!(cache.get(&tag, "query=0&page=1"), None);
        assert_eq!(cache.get(&tag, "query=999&page=1"), Some(serde_json::json!(999)));
    }

    #[test]
    fn overwriting_a_key_does_not_evict() {
        let cache = InMemoryViewCache::with_capacity(2);
        let tag = CacheTag::new("/dashboard/invoices");
        let generation = cache.generation(&tag);

        cache.put(&tag, generation, "a".into(), serde_json::json!(1));
        cache.put(&tag, generation, "b".into(), serde_json::json!(2));
        cache.put(&tag, generation, "a".into(), serde_json::json!(3));

        assert_eq!(cache.cached_views(&tag), 2);
        assert_eq!(cache.get(&tag, "a"), Some(serde_json::json!(3)));
        assert_eq!(cache.get(&tag, "b"), Some(serde_json::json!(2)));
    }
}
