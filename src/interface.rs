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

//! Declared interfaces as explicit dispatch tables.
//!
//! Instead of generating a dynamic proxy and discovering annotations
//! reflectively at call time, an interface is declared once as an ordered
//! table of [`MethodDescriptor`]s. Annotation metadata is captured as plain
//! declarative structs; converters and processors read it through the
//! invocation context, never the core itself.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::target_type::{PropertyValue, TargetType};

/// Fallback closure invoked when resolution yields no value. Receives the
/// call-time arguments, mirroring a default method body.
pub type DefaultValueFn = Arc<dyn Fn(&[PropertyValue]) -> PropertyValue + Send + Sync>;

/// Where the property name for a method invocation comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySource {
    /// A declared name, possibly containing `${variable}` tokens.
    Named(String),
    /// The first call-time argument supplies the property name. Methods with
    /// this source bypass the invocation cache since the cache key ignores
    /// arguments.
    FirstArgument,
    /// Not an externalized property; the default value closure is the body.
    None,
}

/// A declared annotation on a proxied method.
///
/// An annotation may name a processor id, in which case the matching
/// registered processor is applied to the resolved value. Attributes
/// (delimiter, charset, algorithm, ...) are read by converters and
/// processors, not by the core.
#[derive(Debug, Clone)]
pub struct Annotation {
    name: String,
    processor: Option<String>,
    attributes: IndexMap<String, String>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            processor: None,
            attributes: IndexMap::new(),
        }
    }

    /// Name the processor this annotation triggers.
    pub fn with_processor(mut self, processor_id: impl Into<String>) -> Self {
        self.processor = Some(processor_id.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn processor(&self) -> Option<&str> {
        self.processor.as_deref()
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Identity and metadata of one interface method. Created once per
/// interface and reused across calls.
pub struct MethodDescriptor {
    name: String,
    property: PropertySource,
    annotations: Vec<Annotation>,
    target_type: TargetType,
    default_value: Option<DefaultValueFn>,
}

impl MethodDescriptor {
    pub fn builder(name: impl Into<String>) -> MethodDescriptorBuilder {
        MethodDescriptorBuilder {
            name: name.into(),
            property: PropertySource::None,
            annotations: Vec::new(),
            target_type: TargetType::of::<String>(),
            default_value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property(&self) -> &PropertySource {
        &self.property
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name() == name)
    }

    pub fn target_type(&self) -> &TargetType {
        &self.target_type
    }

    pub fn default_value(&self) -> Option<&DefaultValueFn> {
        self.default_value.as_ref()
    }
}

impl std::fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("property", &self.property)
            .field("target_type", &self.target_type)
            .finish()
    }
}

/// Fluent builder for [`MethodDescriptor`].
pub struct MethodDescriptorBuilder {
    name: String,
    property: PropertySource,
    annotations: Vec<Annotation>,
    target_type: TargetType,
    default_value: Option<DefaultValueFn>,
}

impl MethodDescriptorBuilder {
    /// Declare the externalized property name this method resolves.
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.property = PropertySource::Named(name.into());
        self
    }

    /// Take the property name from the first call-time argument.
    pub fn property_from_argument(mut self) -> Self {
        self.property = PropertySource::FirstArgument;
        self
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn returns(mut self, target_type: TargetType) -> Self {
        self.target_type = target_type;
        self
    }

    /// Fallback body used when no resolver produces a value.
    pub fn default_value(
        mut self,
        f: impl Fn(&[PropertyValue]) -> PropertyValue + Send + Sync + 'static,
    ) -> Self {
        self.default_value = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> MethodDescriptor {
        MethodDescriptor {
            name: self.name,
            property: self.property,
            annotations: self.annotations,
            target_type: self.target_type,
            default_value: self.default_value,
        }
    }
}

/// An immutable, registration-ordered table of method descriptors. Stands in
/// for the proxied interface: lookups are by method name.
pub struct Interface {
    name: String,
    methods: IndexMap<String, Arc<MethodDescriptor>>,
}

impl Interface {
    pub fn builder(name: impl Into<String>) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.into(),
            methods: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.get(name)
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &Arc<MethodDescriptor>> {
        self.methods.values()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Builder for [`Interface`]. Re-declaring a method name replaces the
/// earlier declaration.
pub struct InterfaceBuilder {
    name: String,
    methods: IndexMap<String, Arc<MethodDescriptor>>,
}

impl InterfaceBuilder {
    pub fn method(mut self, descriptor: MethodDescriptor) -> Self {
        self.methods
            .insert(descriptor.name().to_string(), Arc::new(descriptor));
        self
    }

    pub fn build(self) -> Interface {
        Interface {
            name: self.name,
            methods: self.methods,
        }
    }
}
