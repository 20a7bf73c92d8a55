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

//! Invocation handlers: the base resolve-and-convert handler plus the
//! caching and eager-loading decorators that wrap it.

pub mod caching;
pub mod eager;

pub use caching::CachingInvocationHandler;
pub use eager::EagerLoadingInvocationHandler;

use async_trait::async_trait;

use crate::context::InvocationContext;
use crate::conversion::RootConverter;
use crate::error::ResolutionError;
use crate::interface::PropertySource;
use crate::resolvers::RootResolver;
use crate::target_type::PropertyValue;
use std::sync::Arc;

/// Outcome of one handled invocation.
///
/// Only `Resolved` outcomes are cacheable: a fallback stands in for a
/// currently-unresolvable property, which must be retried on the next call
/// rather than stick in the cache.
pub enum Resolution {
    /// A resolver produced the value (possibly processed and converted).
    Resolved(PropertyValue),
    /// The method's fallback supplied the value, or an empty optional was
    /// built for an optional target.
    Fallback(PropertyValue),
}

impl Resolution {
    pub fn into_value(self) -> PropertyValue {
        match self {
            Self::Resolved(v) | Self::Fallback(v) => v,
        }
    }
}

/// Handles one proxied method call.
#[async_trait]
pub trait InvocationHandler: Send + Sync {
    async fn invoke(&self, ctx: &InvocationContext) -> Result<Resolution, ResolutionError>;
}

/// Base handler: determines the property name, resolves it through the root
/// resolver and converts the raw value to the method's declared target type.
pub struct PropertyInvocationHandler {
    resolver: Arc<RootResolver>,
    converter: Arc<RootConverter>,
}

impl PropertyInvocationHandler {
    pub fn new(resolver: Arc<RootResolver>, converter: Arc<RootConverter>) -> Self {
        Self {
            resolver,
            converter,
        }
    }

    fn fallback(&self, ctx: &InvocationContext, property: &str) -> Result<Resolution, ResolutionError> {
        if let Some(default_value) = ctx.method().default_value() {
            return Ok(Resolution::Fallback(default_value(ctx.args())));
        }
        if let Some(optional) = ctx.method().target_type().optional() {
            return Ok(Resolution::Fallback(optional.empty()));
        }
        Err(ResolutionError::UnresolvedProperty {
            property: property.to_string(),
        })
    }
}

#[async_trait]
impl InvocationHandler for PropertyInvocationHandler {
    async fn invoke(&self, ctx: &InvocationContext) -> Result<Resolution, ResolutionError> {
        let property = match ctx.method().property() {
            PropertySource::Named(template) => template.clone(),
            PropertySource::FirstArgument => ctx
                .string_arg(0)
                .cloned()
                .ok_or_else(|| {
                    ResolutionError::invalid_invocation(format!(
                        "method '{}' takes its property name from the first argument, \
                         but no string argument was bound",
                        ctx.method().name()
                    ))
                })?,
            PropertySource::None => {
                // Not an externalized property; the default closure is the
                // method body.
                let Some(default_value) = ctx.method().default_value() else {
                    return Err(ResolutionError::invalid_invocation(format!(
                        "method '{}' declares neither a property nor a default body",
                        ctx.method().name()
                    )));
                };
                return Ok(Resolution::Fallback(default_value(ctx.args())));
            }
        };

        match self.resolver.resolve(ctx, &property).await? {
            Some(raw) => {
                let converted =
                    self.converter
                        .convert(ctx, &property, &raw, ctx.method().target_type())?;
                Ok(Resolution::Resolved(converted))
            }
            None => self.fallback(ctx, &property),
        }
    }
}
