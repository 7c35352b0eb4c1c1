// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A hashmap-backed least-recently-used cache, in the style of the C++
//! original's `GlyphCache_c` (an `unordered_map` plus a monotonically
//! increasing "last used" counter per entry, trimmed on demand rather than
//! on every insert). Used by the font cache and the glyph paint cache.

use hashbrown::HashMap;
use std::hash::Hash;

struct Entry<V> {
    value: V,
    last_used: u64,
}

/// A cache keyed by `K`, evicted least-recently-used first when trimmed.
/// Unlike a textbook LRU, eviction only happens when [`trim`](Self::trim) or
/// [`trim_with`](Self::trim_with) is called explicitly — lookups never evict.
pub struct LruCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    clock: u64,
}

impl<K, V> Default for LruCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            clock: 0,
        }
    }
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached value for `key`, bumping its recency, without
    /// creating it if absent.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.clock += 1;
        let clock = self.clock;
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_used = clock;
            Some(&entry.value)
        } else {
            None
        }
    }

    /// Returns the cached value for `key`, creating it with `make` if
    /// absent. `make` may fail; on failure nothing is inserted.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: K,
        make: impl FnOnce() -> Result<V, E>,
    ) -> Result<&V, E> {
        self.clock += 1;
        let clock = self.clock;
        if !self.entries.contains_key(&key) {
            let value = make()?;
            self.entries.insert(key.clone(), Entry { value, last_used: clock });
        }
        let entry = self.entries.get_mut(&key).expect("just inserted or already present");
        entry.last_used = clock;
        Ok(&entry.value)
    }

    /// Evicts least-recently-used entries until at most `max_entries`
    /// remain.
    pub fn trim(&mut self, max_entries: usize) {
        self.trim_with(max_entries, |_| false);
    }

    /// Evicts until at most `max_entries` remain, removing entries for which
    /// `is_cheap` returns `true` before any others, regardless of recency.
    pub fn trim_with(&mut self, max_entries: usize, is_cheap: impl Fn(&K) -> bool) {
        if self.entries.len() <= max_entries {
            return;
        }
        let mut keys: Vec<(K, u64, bool)> = self
            .entries
            .iter()
            .map(|(k, e)| (k.clone(), e.last_used, is_cheap(k)))
            .collect();
        // Cheap entries first (oldest first within each group), then the rest.
        keys.sort_by_key(|(_, last_used, cheap)| (!*cheap, *last_used));
        let to_remove = self.entries.len() - max_entries;
        for (key, _, _) in keys.into_iter().take(to_remove) {
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_once_and_reuses() {
        let mut cache: LruCache<&str, i32> = LruCache::new();
        let mut calls = 0;
        let v = *cache
            .get_or_try_insert_with::<()>("a", || {
                calls += 1;
                Ok(1)
            })
            .unwrap();
        assert_eq!(v, 1);
        let v2 = *cache
            .get_or_try_insert_with::<()>("a", || {
                calls += 1;
                Ok(2)
            })
            .unwrap();
        assert_eq!(v2, 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn trim_evicts_least_recently_used() {
        let mut cache: LruCache<i32, i32> = LruCache::new();
        for i in 0..5 {
            cache.get_or_try_insert_with::<()>(i, || Ok(i)).unwrap();
        }
        // Touch 0 and 1 so they're most recent.
        cache.get(&0);
        cache.get(&1);
        cache.trim(3);
        assert_eq!(cache.len(), 3);
        assert!(cache.get(&0).is_some());
        assert!(cache.get(&1).is_some());
    }

    #[test]
    fn cheap_entries_evicted_first() {
        let mut cache: LruCache<i32, i32> = LruCache::new();
        for i in 0..4 {
            cache.get_or_try_insert_with::<()>(i, || Ok(i)).unwrap();
        }
        // Touch the "cheap" entry (3) most recently; it should still go first.
        cache.get(&3);
        cache.trim_with(2, |k| *k == 3 || *k == 2);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&0).is_some());
        assert!(cache.get(&1).is_some());
    }
}
