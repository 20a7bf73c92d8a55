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

//! Eager-loading decorator over an invocation handler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::cache::{CacheStrategy, ExpiringCacheStrategy, ExpiryScheduler};
use crate::context::{CacheKey, InvocationContext};
use crate::error::ResolutionError;
use crate::interface::{Interface, PropertySource};
use crate::target_type::PropertyValue;

use super::{CachingInvocationHandler, InvocationHandler, Resolution};

/// Resolves every named-property method of an interface up front and seeds
/// the cache with the results.
///
/// The pre-loaded batch is invalidated with a single scheduled `expire_all`
/// after the configured lifetime rather than per key. At call time this
/// behaves like [`CachingInvocationHandler`]; methods that were not
/// pre-loaded (those needing call-time arguments) are resolved lazily and
/// cached individually through an expiring strategy over the same cache.
pub struct EagerLoadingInvocationHandler {
    inner: CachingInvocationHandler,
}

impl EagerLoadingInvocationHandler {
    /// Eagerly resolve and cache the interface's named-property methods. A
    /// failing eager resolution fails the whole construction.
    pub async fn eager_load(
        decorated: Arc<dyn InvocationHandler>,
        cache: Arc<dyn CacheStrategy<CacheKey, PropertyValue>>,
        scheduler: ExpiryScheduler,
        lifetime: Duration,
        interface: &Interface,
    ) -> Result<Self, ResolutionError> {
        let mut preloaded = 0usize;
        for method in interface.methods() {
            if !matches!(method.property(), PropertySource::Named(_)) {
                continue;
            }

            let ctx = InvocationContext::new(interface.name(), method.clone(), Vec::new());
            if let Resolution::Resolved(value) = decorated.invoke(&ctx).await? {
                cache.cache(CacheKey::for_context(&ctx), value);
                preloaded += 1;
            }
        }
        debug!(
            "eagerly loaded {preloaded} propert{} for interface '{}'",
            if preloaded == 1 { "y" } else { "ies" },
            interface.name()
        );

        // One invalidation for the whole batch, not one task per key.
        let weak = Arc::downgrade(&cache);
        scheduler.schedule(lifetime, move || {
            if let Some(cache) = weak.upgrade() {
                cache.expire_all();
            }
        });

        let lazy: Arc<dyn CacheStrategy<CacheKey, PropertyValue>> =
            Arc::new(ExpiringCacheStrategy::new(cache, scheduler, lifetime));
        Ok(Self {
            inner: CachingInvocationHandler::new(decorated, lazy),
        })
    }
}

#[async_trait]
impl InvocationHandler for EagerLoadingInvocationHandler {
    async fn invoke(&self, ctx: &InvocationContext) -> Result<Resolution, ResolutionError> {
        self.inner.invoke(ctx).await
    }
}
