use parking_lot::RwLock;
use std::{
    collections::HashMap,
    fmt,
    time::{Duration, Instant},
};

/// Key/value store whose entries expire after a per-entry TTL.
///
/// Reads return only unexpired values. Writes for the same key are
/// idempotent because callers derive values deterministically from the key.
pub trait TtlCache<V>: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Option<V>;
    fn insert(&self, key: String, value: V, ttl: Duration);
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Entries kept by [`MemoryCache::new`] before inserts start evicting.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Process-local cache backed by a `RwLock<HashMap>`.
///
/// Expired entries are removed when read and swept whenever an insert would
/// exceed the capacity. If the map is still full after the sweep, the entry
/// closest to expiry makes room.
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    capacity: usize,
}

impl<V> MemoryCache<V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A cache holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for MemoryCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<V: Clone + Send + Sync> TtlCache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Re-check under the write lock; another writer may have refreshed it.
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn insert(&self, key: String, value: V, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now + ttl;
        let mut entries = self.entries.write();

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            entries.retain(|_, entry| entry.expires_at > now);
            if entries.len() >= self.capacity {
                let soonest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(key, _)| key.clone());
                if let Some(soonest) = soonest {
                    entries.remove(&soonest);
                }
            }
        }

        entries.insert(key, CacheEntry { value, expires_at });
    }
}
