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

//! Pluggable key/value stores with an expiry contract.
//!
//! Writes are insert-only: the first writer for a key wins and an existing
//! entry is never overwritten, so concurrent duplicate computations are safe
//! to discard. Per-key lifecycle is `absent -> present -> absent`; there is
//! no update-in-place.

pub mod concurrent_map;
pub mod expiring;
pub mod generational;
pub mod scheduler;

pub use concurrent_map::ConcurrentMapCacheStrategy;
pub use expiring::ExpiringCacheStrategy;
pub use generational::GenerationalCacheStrategy;
pub use scheduler::ExpiryScheduler;

/// Common contract of all cache strategies.
pub trait CacheStrategy<K, V>: Send + Sync {
    /// Insert-if-absent. An existing entry for `key` is kept as-is.
    fn cache(&self, key: K, value: V);

    /// Look up the cached value for `key`, if present.
    fn get(&self, key: &K) -> Option<V>;

    /// Remove the entry for `key`, if present.
    fn expire(&self, key: &K);

    /// Remove all entries. Not atomic with respect to concurrent `cache`
    /// calls on other keys.
    fn expire_all(&self);
}
