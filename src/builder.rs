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

//! Entry point: assembles the resolution pipeline and hands out proxies.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::cache::{CacheStrategy, ConcurrentMapCacheStrategy, ExpiringCacheStrategy, ExpiryScheduler};
use crate::context::{CacheKey, InvocationContext};
use crate::conversion::{Converter, OptionalConverter, PrimitiveConverter, RootConverter};
use crate::error::ResolutionError;
use crate::expansion::{SimpleVariableExpander, VariableExpander};
use crate::interface::Interface;
use crate::invocation::{
    CachingInvocationHandler, EagerLoadingInvocationHandler, InvocationHandler,
    PropertyInvocationHandler,
};
use crate::processing::{Processor, RootProcessor};
use crate::resolvers::{EnvResolver, Resolver, RootResolver};
use crate::target_type::PropertyValue;

const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(30 * 60);

/// Assembled resolution pipeline. Initialize interfaces against it to get
/// callable [`Proxy`] instances; the pipeline itself is immutable once
/// built and shared by every proxy.
pub struct ExternalizedProperties {
    resolver: Arc<RootResolver>,
    converter: Arc<RootConverter>,
    invocation_caching: bool,
    eager_loading: bool,
    cache_duration: Duration,
    scheduler: ExpiryScheduler,
}

impl ExternalizedProperties {
    pub fn builder() -> ExternalizedPropertiesBuilder {
        ExternalizedPropertiesBuilder::new()
    }

    /// Produce a proxy for `interface`, wiring the configured handler chain:
    /// base handler, then the eager-loading or caching decorator.
    ///
    /// Eager loading resolves the interface's named properties before this
    /// returns; a failing eager resolution fails initialization.
    pub async fn initialize(&self, interface: Interface) -> Result<Proxy, ResolutionError> {
        let interface = Arc::new(interface);
        let base: Arc<dyn InvocationHandler> = Arc::new(PropertyInvocationHandler::new(
            self.resolver.clone(),
            self.converter.clone(),
        ));

        let handler: Arc<dyn InvocationHandler> = if self.eager_loading {
            let cache: Arc<dyn CacheStrategy<CacheKey, PropertyValue>> =
                Arc::new(ConcurrentMapCacheStrategy::new());
            Arc::new(
                EagerLoadingInvocationHandler::eager_load(
                    base,
                    cache,
                    self.scheduler.clone(),
                    self.cache_duration,
                    &interface,
                )
                .await?,
            )
        } else if self.invocation_caching {
            let cache: Arc<dyn CacheStrategy<CacheKey, PropertyValue>> =
                Arc::new(ExpiringCacheStrategy::new(
                    Arc::new(ConcurrentMapCacheStrategy::new()),
                    self.scheduler.clone(),
                    self.cache_duration,
                ));
            Arc::new(CachingInvocationHandler::new(base, cache))
        } else {
            base
        };

        debug!("initialized proxy for interface '{}'", interface.name());
        Ok(Proxy { interface, handler })
    }

    pub fn scheduler(&self) -> &ExpiryScheduler {
        &self.scheduler
    }
}

/// Fluent configuration for [`ExternalizedProperties`].
///
/// Registration order of resolvers, converters and processors is their
/// chain order; the registries are frozen at [`build`](Self::build).
pub struct ExternalizedPropertiesBuilder {
    resolvers: Vec<Arc<dyn Resolver>>,
    converters: Vec<Arc<dyn Converter>>,
    processors: Vec<Arc<dyn Processor>>,
    expander: Option<Arc<dyn VariableExpander>>,
    invocation_caching: bool,
    eager_loading: bool,
    cache_duration: Duration,
}

impl ExternalizedPropertiesBuilder {
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
            converters: Vec::new(),
            processors: Vec::new(),
            expander: None,
            invocation_caching: false,
            eager_loading: false,
            cache_duration: DEFAULT_CACHE_DURATION,
        }
    }

    pub fn with_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    pub fn with_resolvers(mut self, resolvers: Vec<Arc<dyn Resolver>>) -> Self {
        self.resolvers.extend(resolvers);
        self
    }

    pub fn with_converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converters.push(Arc::new(converter));
        self
    }

    pub fn with_converters(mut self, converters: Vec<Arc<dyn Converter>>) -> Self {
        self.converters.extend(converters);
        self
    }

    pub fn with_processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Arc::new(processor));
        self
    }

    pub fn with_processors(mut self, processors: Vec<Arc<dyn Processor>>) -> Self {
        self.processors.extend(processors);
        self
    }

    pub fn with_variable_expander(mut self, expander: impl VariableExpander + 'static) -> Self {
        self.expander = Some(Arc::new(expander));
        self
    }

    /// Register the default resolver set (process environment).
    pub fn with_default_resolvers(mut self) -> Self {
        self.resolvers.push(Arc::new(EnvResolver));
        self
    }

    /// Register the default converter set (primitives).
    pub fn with_default_converters(mut self) -> Self {
        self.converters.push(Arc::new(PrimitiveConverter));
        self
    }

    /// Cache invocation results per method for the configured duration.
    pub fn enable_invocation_caching(mut self) -> Self {
        self.invocation_caching = true;
        self
    }

    /// Resolve named properties at initialization and seed the cache.
    pub fn enable_eager_loading(mut self) -> Self {
        self.eager_loading = true;
        self
    }

    /// Lifetime of cached invocation results and eager-loaded batches.
    pub fn cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration = duration;
        self
    }

    /// Freeze the registries and assemble the pipeline.
    pub fn build(self) -> ExternalizedProperties {
        let processor = RootProcessor::new(self.processors);

        // The optional-wrapper converter rides at the end of the chain, so
        // any caller-supplied converter for optional targets wins by order.
        let mut converters = self.converters;
        converters.push(Arc::new(OptionalConverter));
        let converter = Arc::new(RootConverter::new(converters));

        let expander = self
            .expander
            .unwrap_or_else(|| Arc::new(SimpleVariableExpander::new()));
        let resolver = Arc::new(RootResolver::new(self.resolvers, processor, expander));

        ExternalizedProperties {
            resolver,
            converter,
            invocation_caching: self.invocation_caching,
            eager_loading: self.eager_loading,
            cache_duration: self.cache_duration,
            scheduler: ExpiryScheduler::new(),
        }
    }
}

impl Default for ExternalizedPropertiesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Callable stand-in for a declared interface: dispatches method calls
/// through the configured handler chain.
pub struct Proxy {
    interface: Arc<Interface>,
    handler: Arc<dyn InvocationHandler>,
}

impl Proxy {
    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    /// Invoke `method` with bound arguments and return the type-erased
    /// result.
    pub async fn invoke(
        &self,
        method: &str,
        args: Vec<PropertyValue>,
    ) -> Result<PropertyValue, ResolutionError> {
        let descriptor = self.interface.method(method).ok_or_else(|| {
            ResolutionError::invalid_invocation(format!(
                "interface '{}' declares no method '{method}'",
                self.interface.name()
            ))
        })?;
        let ctx = InvocationContext::new(self.interface.name(), descriptor.clone(), args);
        Ok(self.handler.invoke(&ctx).await?.into_value())
    }

    /// Invoke a zero-argument `method` and downcast the result to `T`.
    pub async fn get<T: Any + Send + Sync + Clone>(
        &self,
        method: &str,
    ) -> Result<T, ResolutionError> {
        self.get_with(method, Vec::new()).await
    }

    /// Invoke `method` with arguments and downcast the result to `T`.
    pub async fn get_with<T: Any + Send + Sync + Clone>(
        &self,
        method: &str,
        args: Vec<PropertyValue>,
    ) -> Result<T, ResolutionError> {
        let value = self.invoke(method, args).await?;
        value.downcast::<T>().map(|v| (*v).clone()).map_err(|_| {
            ResolutionError::invalid_invocation(format!(
                "method '{method}' does not return {}",
                std::any::type_name::<T>()
            ))
        })
    }
}
