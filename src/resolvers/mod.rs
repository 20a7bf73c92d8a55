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

//! Property resolvers and the root resolution entry point.
//!
//! All property lookups are routed through [`RootResolver`], which expands
//! variables in the requested name, delegates to the registered resolvers in
//! registration order, and runs found values through the processor chain.

pub mod env;
pub mod json_file;
pub mod map;

pub use env::EnvResolver;
pub use json_file::JsonFileResolver;
pub use map::MapResolver;

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, trace};

use crate::context::InvocationContext;
use crate::error::ResolutionError;
use crate::expansion::VariableExpander;
use crate::processing::RootProcessor;

/// Maps a property name to a raw string value from some backing source.
///
/// `Ok(None)` means "not found" and hands over to the next resolver in the
/// chain. An `Err` is a genuine backend failure and aborts the whole lookup.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &str;

    async fn resolve(
        &self,
        ctx: &InvocationContext,
        property_name: &str,
    ) -> anyhow::Result<Option<String>>;
}

/// Combines the resolver chain, variable expansion and post-processing into
/// one property lookup. Registries never mutate after construction.
pub struct RootResolver {
    resolvers: Vec<Arc<dyn Resolver>>,
    processor: RootProcessor,
    expander: Arc<dyn VariableExpander>,
}

impl RootResolver {
    pub fn new(
        resolvers: Vec<Arc<dyn Resolver>>,
        processor: RootProcessor,
        expander: Arc<dyn VariableExpander>,
    ) -> Self {
        Self {
            resolvers,
            processor,
            expander,
        }
    }

    /// Resolve `property_name` for the given invocation.
    ///
    /// Variables are expanded first; an unresolvable token aborts with a
    /// variable-expansion error. Resolvers are then tried in registration
    /// order and the first one returning a value wins; later resolvers are
    /// not invoked. Found values run through the processor chain. No value
    /// from any resolver yields `Ok(None)` so the caller can fall back to a
    /// method default.
    pub async fn resolve(
        &self,
        ctx: &InvocationContext,
        property_name: &str,
    ) -> Result<Option<String>, ResolutionError> {
        if property_name.is_empty() {
            return Err(ResolutionError::invalid_invocation("property name is empty"));
        }

        let expanded = self.expander.expand(self, ctx, property_name).await?;

        for resolver in &self.resolvers {
            match resolver.resolve(ctx, &expanded).await {
                Ok(Some(raw)) => {
                    debug!(
                        "resolved property '{expanded}' via resolver '{}'",
                        resolver.name()
                    );
                    return self.processor.process(ctx, &expanded, raw).map(Some);
                }
                Ok(None) => {
                    trace!(
                        "resolver '{}' has no value for property '{expanded}'",
                        resolver.name()
                    );
                }
                Err(e) => {
                    return Err(ResolutionError::ResolverFailed {
                        property: expanded,
                        source: e.into(),
                    });
                }
            }
        }

        debug!("no resolver produced a value for property '{expanded}'");
        Ok(None)
    }
}
