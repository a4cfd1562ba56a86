//! Read cache for single-record lookups.

use chrono::{DateTime, Utc};
use recall_core::VectorRecord;
use rustc_hash::FxHashMap;

/// A cached record copy plus its last-access time.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub(crate) record: VectorRecord,
    pub(crate) last_access: DateTime<Utc>,
}

/// Cache of record copies keyed by id.
///
/// Entries age out by TTL during maintenance. When a capacity is
/// configured, populating past it evicts the least-recently-used entry
/// first; without one the cache grows unbounded between maintenance passes.
#[derive(Debug, Default)]
pub(crate) struct AccessCache {
    entries: FxHashMap<String, CacheEntry>,
    capacity: Option<usize>,
}

impl AccessCache {
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        AccessCache {
            entries: FxHashMap::default(),
            capacity,
        }
    }

    /// Look up an id, refreshing its last-access time on a hit.
    pub(crate) fn get_refresh(&mut self, id: &str, now: DateTime<Utc>) -> Option<VectorRecord> {
        let entry = self.entries.get_mut(id)?;
        entry.last_access = now;
        Some(entry.record.clone())
    }

    /// Insert or refresh a record copy, evicting the least-recently-used
    /// entry if the cache is at capacity.
    pub(crate) fn insert(&mut self, record: VectorRecord, now: DateTime<Utc>) {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            if !self.entries.contains_key(&record.id) && self.entries.len() >= capacity {
                self.evict_lru();
            }
        }
        self.entries.insert(
            record.id.clone(),
            CacheEntry {
                record,
                last_access: now,
            },
        );
    }

    pub(crate) fn remove(&mut self, id: &str) {
        self.entries.remove(id);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop every entry last accessed at or before the cutoff.
    /// Returns the number evicted.
    pub(crate) fn evict_older_than(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.last_access > cutoff);
        before - self.entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            self.entries.remove(&id);
        }
    }

    /// Rewrite an entry's last-access time, for aging tests.
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, id: &str, when: DateTime<Utc>) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.last_access = when;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(id: &str) -> VectorRecord {
        VectorRecord::new(id, vec![0.0, 1.0])
    }

    #[test]
    fn test_get_refresh_updates_access_time() {
        let mut cache = AccessCache::new(None);
        let t0 = Utc::now();
        cache.insert(record("a"), t0);

        let t1 = t0 + Duration::seconds(10);
        assert!(cache.get_refresh("a", t1).is_some());
        assert_eq!(cache.evict_older_than(t0 + Duration::seconds(5)), 0);
    }

    #[test]
    fn test_ttl_eviction() {
        let mut cache = AccessCache::new(None);
        let t0 = Utc::now();
        cache.insert(record("a"), t0);
        cache.insert(record("b"), t0 + Duration::seconds(30));

        let evicted = cache.evict_older_than(t0 + Duration::seconds(10));
        assert_eq!(evicted, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get_refresh("b", Utc::now()).is_some());
    }

    #[test]
    fn test_lru_eviction_at_capacity() {
        let mut cache = AccessCache::new(Some(2));
        let t0 = Utc::now();
        cache.insert(record("a"), t0);
        cache.insert(record("b"), t0 + Duration::seconds(1));

        // "a" is oldest; inserting "c" evicts it
        cache.insert(record("c"), t0 + Duration::seconds(2));
        assert_eq!(cache.len(), 2);
        assert!(cache.get_refresh("a", Utc::now()).is_none());
        assert!(cache.get_refresh("b", Utc::now()).is_some());
        assert!(cache.get_refresh("c", Utc::now()).is_some());
    }

    #[test]
    fn test_refresh_protects_from_lru() {
        let mut cache = AccessCache::new(Some(2));
        let t0 = Utc::now();
        cache.insert(record("a"), t0);
        cache.insert(record("b"), t0 + Duration::seconds(1));

        // touching "a" makes "b" the LRU victim
        cache.get_refresh("a", t0 + Duration::seconds(2));
        cache.insert(record("c"), t0 + Duration::seconds(3));
        assert!(cache.get_refresh("a", Utc::now()).is_some());
        assert!(cache.get_refresh("b", Utc::now()).is_none());
    }

    #[test]
    fn test_zero_capacity_caches_nothing() {
        let mut cache = AccessCache::new(Some(0));
        cache.insert(record("a"), Utc::now());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_reinsert_same_id_does_not_evict() {
        let mut cache = AccessCache::new(Some(2));
        let t0 = Utc::now();
        cache.insert(record("a"), t0);
        cache.insert(record("b"), t0);
        cache.insert(record("a"), t0 + Duration::seconds(1));
        assert_eq!(cache.len(), 2);
        assert!(cache.get_refresh("b", Utc::now()).is_some());
    }
}
