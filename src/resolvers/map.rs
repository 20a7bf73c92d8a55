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

//! In-memory map resolver.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::context::InvocationContext;

use super::Resolver;

/// Resolves properties from a fixed in-memory map. Mostly useful for tests
/// and for overriding a subset of properties in front of other resolvers.
pub struct MapResolver {
    entries: HashMap<String, String>,
}

impl MapResolver {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl Resolver for MapResolver {
    fn name(&self) -> &str {
        "map"
    }

    async fn resolve(
        &self,
        _ctx: &InvocationContext,
        property_name: &str,
    ) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(property_name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::MethodDescriptor;
    use std::sync::Arc;

    fn context() -> InvocationContext {
        InvocationContext::new(
            "Test",
            Arc::new(MethodDescriptor::builder("value").property("key").build()),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn test_resolves_known_key() {
        let resolver = MapResolver::new([("key", "1")]);
        let out = resolver.resolve(&context(), "key").await.expect("resolve");
        assert_eq!(out.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_unknown_key_is_none_not_error() {
        let resolver = MapResolver::new::<&str, &str>([]);
        let out = resolver.resolve(&context(), "missing").await.expect("resolve");
        assert_eq!(out, None);
    }
}
