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

//! Thread-safe map-backed cache strategy.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use super::CacheStrategy;

/// Cache strategy backed by a read-mostly concurrent map.
pub struct ConcurrentMapCacheStrategy<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> ConcurrentMapCacheStrategy<K, V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for ConcurrentMapCacheStrategy<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheStrategy<K, V> for ConcurrentMapCacheStrategy<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn cache(&self, key: K, value: V) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.entry(key).or_insert(value);
    }

    fn get(&self, key: &K) -> Option<V> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(key).cloned()
    }

    fn expire(&self, key: &K) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.remove(key);
    }

    fn expire_all(&self) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }
}
