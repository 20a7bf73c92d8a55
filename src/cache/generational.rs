// Copyright 2025 The Externalized Properties Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Generation-tagged cache strategy.
//!
//! Stands in for weak-keyed maps in runtimes without a garbage collector:
//! reclamation is explicit. The owner of the proxied interface's lifecycle
//! calls [`GenerationalCacheStrategy::advance_generation`] when cached
//! entries should become unreachable; stale entries are then purged on every
//! write ("purge on access") without a background thread.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use super::CacheStrategy;

/// Cache strategy whose entries are tagged with the generation they were
/// written in. Entries from older generations read as absent and are purged
/// on subsequent writes.
pub struct GenerationalCacheStrategy<K, V> {
    entries: RwLock<HashMap<K, (u64, V)>>,
    generation: AtomicU64,
}

impl<K, V> GenerationalCacheStrategy<K, V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Invalidate every current entry by moving to the next generation.
    pub fn advance_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl<K, V> Default for GenerationalCacheStrategy<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheStrategy<K, V> for GenerationalCacheStrategy<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn cache(&self, key: K, value: V) {
        let generation = self.current_generation();
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.retain(|_, (written_in, _)| *written_in == generation);
        entries.entry(key).or_insert((generation, value));
    }

    fn get(&self, key: &K) -> Option<V> {
        let generation = self.current_generation();
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries
            .get(key)
            .filter(|(written_in, _)| *written_in == generation)
            .map(|(_, value)| value.clone())
    }

    fn expire(&self, key: &K) {
        let generation = self.current_generation();
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.remove(key);
        entries.retain(|_, (written_in, _)| *written_in == generation);
    }

    fn expire_all(&self) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_survive_within_generation() {
        let cache = GenerationalCacheStrategy::new();
        cache.cache("key", 1);
        assert_eq!(cache.get(&"key"), Some(1));
    }

    #[test]
    fn test_advancing_generation_invalidates_reads() {
        let cache = GenerationalCacheStrategy::new();
        cache.cache("key", 1);
        cache.advance_generation();
        assert_eq!(cache.get(&"key"), None);
    }

    #[test]
    fn test_stale_entries_purged_on_write() {
        let cache = GenerationalCacheStrategy::new();
        cache.cache("old", 1);
        cache.advance_generation();

        // The write lands in the new generation and sweeps the stale entry,
        // so the old key is insertable again rather than blocked by
        // insert-if-absent.
        cache.cache("new", 2);
        cache.cache("old", 3);
        assert_eq!(cache.get(&"old"), Some(3));
        assert_eq!(cache.get(&"new"), Some(2));
    }

    #[test]
    fn test_first_writer_wins_within_generation() {
        let cache = GenerationalCacheStrategy::new();
        cache.cache("key", 1);
        cache.cache("key", 2);
        assert_eq!(cache.get(&"key"), Some(1));
    }
}
