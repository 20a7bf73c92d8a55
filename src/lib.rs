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

//! Externalized configuration properties behind declared interfaces.
//!
//! An interface is declared as a dispatch table of method descriptors. Invoking
//! a method resolves its property name through an ordered resolver chain,
//! expands `${variable}` tokens recursively through the same chain, applies
//! annotation-driven post-processing, converts the raw string to the method's
//! declared target type, and caches the outcome.

pub mod builder;
pub mod cache;
pub mod context;
pub mod conversion;
pub mod error;
pub mod expansion;
pub mod interface;
pub mod invocation;
pub mod processing;
pub mod resolvers;
pub mod target_type;

// Main exports for library users
pub use builder::{ExternalizedProperties, ExternalizedPropertiesBuilder, Proxy};
pub use cache::{
    CacheStrategy, ConcurrentMapCacheStrategy, ExpiringCacheStrategy, ExpiryScheduler,
    GenerationalCacheStrategy,
};
pub use context::{CacheKey, InvocationContext};
pub use conversion::{
    ConversionResult, Converter, OptionalConverter, PrimitiveConverter, RootConverter,
};
pub use error::ResolutionError;
pub use expansion::{NoOpVariableExpander, SimpleVariableExpander, VariableExpander};
pub use interface::{Annotation, Interface, MethodDescriptor, PropertySource};
pub use invocation::{
    CachingInvocationHandler, EagerLoadingInvocationHandler, InvocationHandler,
    PropertyInvocationHandler, Resolution,
};
pub use processing::{Base64DecodeProcessor, Processor, RootProcessor};
pub use resolvers::{EnvResolver, JsonFileResolver, MapResolver, Resolver, RootResolver};
pub use target_type::{PropertyValue, TargetType};
