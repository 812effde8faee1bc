use lru::LruCache;
use std::num::NonZeroUsize;

pub const MAX_CACHE_SIZE: usize = 100;

/// LRU map from the exact raw query string to its result list.
///
/// Keys are not normalized: `rust`, `Rust` and `"rust"` are three separate entries.
pub struct QueryCache<V> {
    entries: LruCache<String, V>,
}

impl<V> QueryCache<V> {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self { entries: LruCache::new(cap) }
    }

    /// Returns the cached results and marks the entry most recently used.
    pub fn get(&mut self, query: &str) -> Option<&V> { self.entries.get(query) }

    /// Presence check that leaves recency untouched.
    pub fn contains(&self, query: &str) -> bool { self.entries.contains(query) }

    pub fn insert(&mut self, query: String, results: V) {
        // push also hands back the old pair when the key was already present
        match self.entries.push(query, results) {
            Some((evicted, _)) if !self.entries.contains(&evicted) => {
                tracing::trace!(query = %evicted, "evicted query from cache");
            }
            _ => {}
        }
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn capacity(&self) -> usize { self.entries.cap().get() }
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self { Self::new(MAX_CACHE_SIZE) }
}
