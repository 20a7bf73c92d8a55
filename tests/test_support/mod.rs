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

//! Shared resolver doubles for integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use externalized_properties::{InvocationContext, Resolver};

/// Map-backed resolver that counts how many lookups reached it.
pub struct CountingResolver {
    entries: HashMap<String, String>,
    calls: Arc<AtomicUsize>,
}

impl CountingResolver {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> (Self, Arc<AtomicUsize>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            calls: calls.clone(),
        };
        (resolver, calls)
    }
}

#[async_trait]
impl Resolver for CountingResolver {
    fn name(&self) -> &str {
        "counting"
    }

    async fn resolve(
        &self,
        _ctx: &InvocationContext,
        property_name: &str,
    ) -> anyhow::Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.get(property_name).cloned())
    }
}

/// Resolver that fails every lookup with a backend error.
pub struct FailingResolver;

#[async_trait]
impl Resolver for FailingResolver {
    fn name(&self) -> &str {
        "failing"
    }

    async fn resolve(
        &self,
        _ctx: &InvocationContext,
        property_name: &str,
    ) -> anyhow::Result<Option<String>> {
        anyhow::bail!("backend unavailable while resolving '{property_name}'")
    }
}
