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

//! Caching decorator over an invocation handler.

use std::sync::Arc;

use async_trait::async_trait;
use log::trace;

use crate::cache::CacheStrategy;
use crate::context::{CacheKey, InvocationContext};
use crate::error::ResolutionError;
use crate::interface::PropertySource;
use crate::target_type::PropertyValue;

use super::{InvocationHandler, Resolution};

/// Wraps another handler with a per-method cache.
///
/// The cache key is derived from method identity only. A hit returns the
/// cached value without invoking the decorated handler; a resolved miss is
/// stored insert-only. Fallback results are never cached so unresolvable
/// properties are retried on every call. Methods whose property name derives
/// from an argument bypass the cache entirely, since one key would otherwise
/// be shared across differing arguments.
pub struct CachingInvocationHandler {
    decorated: Arc<dyn InvocationHandler>,
    cache: Arc<dyn CacheStrategy<CacheKey, PropertyValue>>,
}

impl CachingInvocationHandler {
    pub fn new(
        decorated: Arc<dyn InvocationHandler>,
        cache: Arc<dyn CacheStrategy<CacheKey, PropertyValue>>,
    ) -> Self {
        Self { decorated, cache }
    }

    fn cacheable(ctx: &InvocationContext) -> bool {
        !matches!(ctx.method().property(), PropertySource::FirstArgument)
    }
}

#[async_trait]
impl InvocationHandler for CachingInvocationHandler {
    async fn invoke(&self, ctx: &InvocationContext) -> Result<Resolution, ResolutionError> {
        if !Self::cacheable(ctx) {
            return self.decorated.invoke(ctx).await;
        }

        let key = CacheKey::for_context(ctx);
        if let Some(cached) = self.cache.get(&key) {
            trace!("cache hit for method '{}'", ctx.method().name());
            return Ok(Resolution::Resolved(cached));
        }

        let result = self.decorated.invoke(ctx).await?;
        if let Resolution::Resolved(value) = &result {
            self.cache.cache(key, value.clone());
        }
        Ok(result)
    }
}
