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

//! Expiry decorator over any cache strategy.

use std::sync::Arc;
use std::time::Duration;

use log::trace;

use super::{CacheStrategy, ExpiryScheduler};

/// Decorates another [`CacheStrategy`]: every `cache(key, value)` also
/// schedules a one-shot `expire(key)` after a fixed lifetime. Reads and
/// explicit expiry pass straight through to the delegate.
///
/// The scheduled task holds the delegate weakly, so dropping the cache
/// cancels outstanding expirations naturally.
pub struct ExpiringCacheStrategy<K, V> {
    delegate: Arc<dyn CacheStrategy<K, V>>,
    scheduler: ExpiryScheduler,
    lifetime: Duration,
}

impl<K, V> ExpiringCacheStrategy<K, V> {
    pub fn new(
        delegate: Arc<dyn CacheStrategy<K, V>>,
        scheduler: ExpiryScheduler,
        lifetime: Duration,
    ) -> Self {
        Self {
            delegate,
            scheduler,
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

impl<K, V> CacheStrategy<K, V> for ExpiringCacheStrategy<K, V>
where
    K: Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn cache(&self, key: K, value: V) {
        self.delegate.cache(key.clone(), value);

        let weak = Arc::downgrade(&self.delegate);
        self.scheduler.schedule(self.lifetime, move || {
            if let Some(delegate) = weak.upgrade() {
                trace!("expiring cache entry after configured lifetime");
                delegate.expire(&key);
            }
        });
    }

    fn get(&self, key: &K) -> Option<V> {
        self.delegate.get(key)
    }

    fn expire(&self, key: &K) {
        self.delegate.expire(key);
    }

    fn expire_all(&self) {
        self.delegate.expire_all();
    }
}
